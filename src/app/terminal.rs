//! What the attached terminal can show, and the stderr log subscriber.
//!
//! Colour and the live progress bar are both turned off for `TERM=dumb`;
//! colour additionally honours `NO_COLOR` and `--no-color`.

use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

/// Terminal facts read once at startup.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TerminalCaps {
    pub(crate) stderr_is_tty: bool,
    pub(crate) no_color_env: bool,
    pub(crate) dumb: bool,
}

impl TerminalCaps {
    pub(crate) fn detect() -> Self {
        Self {
            stderr_is_tty: io::stderr().is_terminal(),
            no_color_env: std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty()),
            dumb: std::env::var("TERM").is_ok_and(|value| value.eq_ignore_ascii_case("dumb")),
        }
    }

    pub(crate) fn color_enabled(self, no_color_flag: bool) -> bool {
        !(no_color_flag || self.no_color_env || self.dumb)
    }

    /// The bar redraws in place on stderr, so it needs a real, non-dumb tty.
    pub(crate) fn progress_bar_enabled(self, quiet: bool) -> bool {
        self.stderr_is_tty && !self.dumb && !quiet
    }
}

/// Installs the stderr subscriber. `RUST_LOG` is honoured unless
/// `force_level` says `-v`/`-q` was given explicitly.
pub(crate) fn init_tracing(default_level: &str, force_level: bool, ansi: bool) {
    let filter = if force_level {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(ansi)
        .with_env_filter(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN_TTY: TerminalCaps = TerminalCaps {
        stderr_is_tty: true,
        no_color_env: false,
        dumb: false,
    };

    #[test]
    fn test_color_off_for_flag_env_or_dumb_terminal() {
        assert!(PLAIN_TTY.color_enabled(false));
        assert!(!PLAIN_TTY.color_enabled(true));

        let no_color_env = TerminalCaps {
            no_color_env: true,
            ..PLAIN_TTY
        };
        assert!(!no_color_env.color_enabled(false));

        let dumb = TerminalCaps {
            dumb: true,
            ..PLAIN_TTY
        };
        assert!(!dumb.color_enabled(false));
    }

    #[test]
    fn test_progress_bar_needs_interactive_stderr() {
        assert!(PLAIN_TTY.progress_bar_enabled(false));
        assert!(!PLAIN_TTY.progress_bar_enabled(true));

        let piped = TerminalCaps {
            stderr_is_tty: false,
            ..PLAIN_TTY
        };
        assert!(!piped.progress_bar_enabled(false));

        let dumb = TerminalCaps {
            dumb: true,
            ..PLAIN_TTY
        };
        assert!(!dumb.progress_bar_enabled(false));
    }

    #[test]
    fn test_no_color_env_does_not_hide_progress_bar() {
        let caps = TerminalCaps {
            no_color_env: true,
            ..PLAIN_TTY
        };
        assert!(caps.progress_bar_enabled(false));
    }
}

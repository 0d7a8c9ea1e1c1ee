//! Browser-style User-Agent strings sent with probe and transfer requests.
//!
//! Many file hosts reject obvious bot agents, so requests present themselves
//! as a browser on the platform the tool runs on.

use crate::platform::Platform;

/// Fallback User-Agent for platforms without a browser string.
const FALLBACK_USER_AGENT: &str = "Mozilla/5.0 (compatible; IR-Downloader/1.0)";

/// User-Agent for the given platform.
#[must_use]
pub(crate) fn user_agent_for(platform: Platform) -> &'static str {
    match platform {
        Platform::Windows => "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
        Platform::MacOs => {
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36"
        }
        Platform::Linux => "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36",
        Platform::Android => "Mozilla/5.0 (Linux; Android 10; SM-G973F) AppleWebKit/537.36",
        Platform::Ios => {
            "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X) AppleWebKit/537.36"
        }
        Platform::Other => FALLBACK_USER_AGENT,
    }
}

/// User-Agent for the platform this binary was built for.
#[must_use]
pub(crate) fn default_user_agent() -> &'static str {
    user_agent_for(Platform::current())
}

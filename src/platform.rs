//! Target platform detection and the per-platform lookup tables that depend on it.
//!
//! The platform decides which characters are illegal in file names and where
//! downloads land by default.

use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the folder downloads are collected in.
pub const DOWNLOAD_FOLDER_NAME: &str = "IR_Downloads";

/// Android shared-storage download root.
const ANDROID_DOWNLOAD_ROOT: &str = "/storage/emulated/0/Download";

/// Operating system family the binary was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Android,
    Ios,
    Other,
}

impl Platform {
    /// Returns the platform of the compile target.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "ios") {
            Self::Ios
        } else if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }

    /// Stable lower-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::MacOs => "darwin",
            Self::Linux => "linux",
            Self::Android => "android",
            Self::Ios => "ios",
            Self::Other => "other",
        }
    }

    /// Whether file names must avoid the full Windows reserved set.
    ///
    /// Android shared storage is FAT-backed and rejects the same characters.
    #[must_use]
    pub const fn uses_restricted_filenames(self) -> bool {
        matches!(self, Self::Windows | Self::Android)
    }

    /// Default destination directory for this platform, relative to `home`.
    #[must_use]
    pub fn download_dir_in(self, home: &Path) -> PathBuf {
        match self {
            Self::Windows | Self::MacOs | Self::Linux => {
                home.join("Downloads").join(DOWNLOAD_FOLDER_NAME)
            }
            Self::Android => Path::new(ANDROID_DOWNLOAD_ROOT).join(DOWNLOAD_FOLDER_NAME),
            Self::Ios => home.join("Documents").join(DOWNLOAD_FOLDER_NAME),
            Self::Other => home.join(DOWNLOAD_FOLDER_NAME),
        }
    }

    /// Default destination directory, or `None` when no home directory is known.
    #[must_use]
    pub fn default_download_dir(self) -> Option<PathBuf> {
        if self == Self::Android {
            return Some(self.download_dir_in(Path::new("/")));
        }
        dirs::home_dir().map(|home| self.download_dir_in(&home))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

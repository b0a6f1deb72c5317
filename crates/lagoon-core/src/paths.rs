use crate::error::{LagoonError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const ASSIST_DIR: &str = ".lagoon-assist";
pub const CONFIG_FILE: &str = "config.yaml";
pub const LOGS_DIR: &str = "logs";

/// Config file of the wrapped Lagoon CLI, relative to the home directory.
pub const LAGOON_CONFIG_FILE: &str = ".lagoon.yml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn home_dir() -> Result<PathBuf> {
    home::home_dir().ok_or(LagoonError::HomeNotFound)
}

pub fn assist_dir(home: &Path) -> PathBuf {
    home.join(ASSIST_DIR)
}

pub fn config_path(home: &Path) -> PathBuf {
    assist_dir(home).join(CONFIG_FILE)
}

pub fn logs_dir(home: &Path) -> PathBuf {
    assist_dir(home).join(LOGS_DIR)
}

pub fn lagoon_config_path(home: &Path) -> PathBuf {
    home.join(LAGOON_CONFIG_FILE)
}

/// Expand a leading `~/` against `home`.
pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None if path == "~" => home.to_path_buf(),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let home = Path::new("/home/dev");
        assert_eq!(
            config_path(home),
            PathBuf::from("/home/dev/.lagoon-assist/config.yaml")
        );
        assert_eq!(logs_dir(home), PathBuf::from("/home/dev/.lagoon-assist/logs"));
        assert_eq!(lagoon_config_path(home), PathBuf::from("/home/dev/.lagoon.yml"));
    }

    #[test]
    fn tilde_expansion() {
        let home = Path::new("/home/dev");
        assert_eq!(
            expand_tilde("~/.ssh/id_ed25519", home),
            PathBuf::from("/home/dev/.ssh/id_ed25519")
        );
        assert_eq!(expand_tilde("~", home), PathBuf::from("/home/dev"));
        assert_eq!(expand_tilde("/etc/key", home), PathBuf::from("/etc/key"));
        assert_eq!(expand_tilde("~other/key", home), PathBuf::from("~other/key"));
    }
}

//! Platform paths for data, configuration and logs.

use std::path::PathBuf;

/// Application directory name under the platform data/config roots.
const APP_DIR: &str = "shelfmark";

/// Returns the default data directory.
///
/// `<platform data dir>/shelfmark`, e.g. `~/.local/share/shelfmark` on Linux.
/// Falls back to `./.shelfmark` when the platform directory is unknown.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".shelfmark"), |d| d.join(APP_DIR))
}

/// Returns the default configuration file path.
///
/// `<platform config dir>/shelfmark/config.toml`, or `./shelfmark.toml` when
/// the platform directory is unknown.
#[must_use]
pub fn get_config_path() -> PathBuf {
    dirs::config_dir().map_or_else(
        || PathBuf::from("shelfmark.toml"),
        |d| d.join(APP_DIR).join("config.toml"),
    )
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and all paths when the home directory is
/// unknown, are returned unchanged.
///
/// # Examples
///
/// ```
/// use shelfmark::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let Some(home) = dirs::home_dir() else {
        return PathBuf::from(path);
    };

    if path == "~" {
        home
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_ends_with_app_name() {
        assert!(get_data_dir().ends_with("shelfmark") || get_data_dir().ends_with(".shelfmark"));
    }

    #[test]
    fn tilde_expansion() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~"), home);
            assert_eq!(expand_tilde("~/books"), home.join("books"));
        }
        assert_eq!(expand_tilde("relative/~"), PathBuf::from("relative/~"));
    }
}

//! Home-directory expansion for private key paths.

use std::path::{Path, PathBuf};

/// Expand a leading `~` (alone or followed by `/`) to the current user's home
/// directory. Anything else is returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    expand_home_with(path, dirs::home_dir().as_deref())
}

/// Same as [`expand_home`] with an explicit home directory.
///
/// `~user/...` forms are left untouched; so is `~` when no home directory is
/// known.
pub fn expand_home_with(path: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(path);
    };

    if path == "~" {
        return home.to_path_buf();
    }

    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

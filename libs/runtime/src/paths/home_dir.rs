//! Resolution of the server home directory.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum HomeDirError {
    #[error("cannot determine the user's home directory")]
    NoHome,
    #[error("failed to create home directory '{path}'")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read current directory")]
    Cwd(#[source] std::io::Error),
}

/// Resolve the directory the server keeps its state in.
///
/// * `None` → `<user home>/<default_subdir>`
/// * `~` or `~/...` → expanded against the user home
/// * relative paths → joined onto the current directory
///
/// The result is always absolute; with `create` the directory is created.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf, HomeDirError> {
    let resolved = match configured {
        None => user_home()?.join(default_subdir),
        Some(raw) => expand(&raw)?,
    };

    if create {
        std::fs::create_dir_all(&resolved).map_err(|source| HomeDirError::Create {
            path: resolved.clone(),
            source,
        })?;
    }
    Ok(resolved)
}

fn expand(raw: &str) -> Result<PathBuf, HomeDirError> {
    let raw = raw.trim();
    let path = if raw == "~" {
        user_home()?
    } else if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        user_home()?.join(rest)
    } else {
        PathBuf::from(raw)
    };

    if path.is_absolute() {
        Ok(path)
    } else {
        let cwd = std::env::current_dir().map_err(HomeDirError::Cwd)?;
        Ok(cwd.join(Path::new(&path)))
    }
}

fn user_home() -> Result<PathBuf, HomeDirError> {
    dirs::home_dir().ok_or(HomeDirError::NoHome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absolute_path_is_kept_and_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("state/mindjournal");
        let out = resolve_home_dir(Some(target.to_string_lossy().into()), ".unused", true).unwrap();
        assert_eq!(out, target);
        assert!(target.is_dir());
    }

    #[test]
    fn tilde_is_expanded_against_user_home() {
        let out = resolve_home_dir(Some("~/.mj_probe".into()), ".unused", false).unwrap();
        assert!(out.is_absolute());
        assert!(out.ends_with(".mj_probe"));
        assert!(!out.to_string_lossy().contains('~'));
    }

    #[test]
    fn missing_value_uses_default_subdir() {
        let out = resolve_home_dir(None, ".mindjournal", false).unwrap();
        assert!(out.is_absolute());
        assert!(out.ends_with(".mindjournal"));
    }

    #[test]
    fn relative_path_is_anchored_to_cwd() {
        let out = resolve_home_dir(Some("var/mj".into()), ".unused", false).unwrap();
        assert!(out.is_absolute());
        assert!(out.ends_with("var/mj"));
    }
}

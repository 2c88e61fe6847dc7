//! SQLite DSN helpers.

use std::io;
use std::path::PathBuf;

/// `true` for DSNs that open a private in-memory database.
pub fn is_memory_dsn(dsn: &str) -> bool {
    if dsn.contains(":memory:") {
        return true;
    }
    url::Url::parse(dsn)
        .map(|u| {
            u.query_pairs()
                .any(|(k, v)| k.eq_ignore_ascii_case("mode") && v.eq_ignore_ascii_case("memory"))
        })
        .unwrap_or(false)
}

/// Ensure parent directories of a file-backed SQLite DSN exist.
/// The DSN itself is returned unchanged.
pub(crate) fn prepare_sqlite_path(dsn: &str, create_dirs: bool) -> io::Result<String> {
    if !create_dirs || is_memory_dsn(dsn) {
        return Ok(dsn.to_string());
    }

    if let Some(parent) = file_path_from_dsn(dsn).as_deref().and_then(|p| p.parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(dsn.to_string())
}

/// `sqlite:///abs/db.sqlite`, `sqlite://./rel/db.sqlite` and `sqlite:rel/db.sqlite`.
fn file_path_from_dsn(dsn: &str) -> Option<PathBuf> {
    let rest = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_dsns_are_detected() {
        assert!(is_memory_dsn("sqlite::memory:"));
        assert!(is_memory_dsn("sqlite://memory:"));
        assert!(is_memory_dsn("sqlite:///journal.db?mode=memory&cache=shared"));
        assert!(!is_memory_dsn("sqlite:///var/lib/mindjournal/journal.db"));
    }

    #[test]
    fn file_paths_are_extracted() {
        assert_eq!(
            file_path_from_dsn("sqlite:///var/lib/db.sqlite?mode=rwc"),
            Some(PathBuf::from("/var/lib/db.sqlite"))
        );
        assert_eq!(
            file_path_from_dsn("sqlite://./data/db.sqlite"),
            Some(PathBuf::from("./data/db.sqlite"))
        );
        assert_eq!(
            file_path_from_dsn("sqlite:data/db.sqlite"),
            Some(PathBuf::from("data/db.sqlite"))
        );
        assert_eq!(file_path_from_dsn("postgres://localhost/db"), None);
    }

    #[test]
    fn parent_directories_are_created() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("nested/dir/journal.db");
        let dsn = format!("sqlite://{}", db_path.display());

        let out = prepare_sqlite_path(&dsn, true).unwrap();
        assert_eq!(out, dsn);
        assert!(tmp.path().join("nested/dir").is_dir());
    }

    #[test]
    fn nothing_is_created_when_disabled() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("skipped/journal.db");
        let dsn = format!("sqlite://{}", db_path.display());

        prepare_sqlite_path(&dsn, false).unwrap();
        assert!(!tmp.path().join("skipped").exists());
    }
}

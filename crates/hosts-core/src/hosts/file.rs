// # Hosts File Writer
//
// Writes rendered hosts content so that readers never observe a partial
// file.
//
// ## Procedure
//
// 1. Write the content to `<file>.tmp` in the target directory and sync it
// 2. Optionally copy the current file to `<file>.backup`
// 3. Rename the temp file over the target
//
// A symlinked target is resolved first so the rename replaces the file the
// link points to and the link itself survives.
//
// When the temp file cannot be created or the rename is refused (a
// bind-mounted `/etc/hosts` inside a container is the common case) the
// content is written in place instead.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Mode applied to written hosts files on Unix
#[cfg(unix)]
const HOSTS_FILE_MODE: u32 = 0o644;

/// Write `content` to `path`, replacing the file atomically where possible
pub(crate) fn write_atomic(path: &Path, content: &str, backup: bool) -> Result<()> {
    let resolved = resolve_target(path);
    let path = resolved.as_path();
    let temp_path = sidecar_path(path, "tmp");

    if let Err(e) = write_temp(&temp_path, content) {
        tracing::warn!(
            "Cannot stage {} ({}); writing {} in place",
            temp_path.display(),
            e,
            path.display()
        );
        let _ = fs::remove_file(&temp_path);
        if backup {
            backup_existing(path);
        }
        return write_in_place(path, content);
    }

    if backup {
        backup_existing(path);
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        tracing::warn!(
            "Rename of {} to {} refused ({}); writing in place",
            temp_path.display(),
            path.display(),
            e
        );
        let _ = fs::remove_file(&temp_path);
        return write_in_place(path, content);
    }

    tracing::trace!("Hosts file written: {}", path.display());
    Ok(())
}

/// Follow symlinks to the real file; a path that does not exist yet is used as is
fn resolve_target(path: &Path) -> PathBuf {
    match fs::canonicalize(path) {
        Ok(real) => {
            if real != path {
                tracing::trace!("Resolved {} to {}", path.display(), real.display());
            }
            real
        }
        Err(_) => path.to_path_buf(),
    }
}

fn write_temp(temp_path: &Path, content: &str) -> Result<()> {
    let mut file = fs::File::create(temp_path).map_err(|e| Error::io(temp_path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::io(temp_path, e))?;
    file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    set_mode(temp_path)
}

fn write_in_place(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::io(path, e))?;
    set_mode(path)
}

/// Copy the current file to `<file>.backup`; failure only warns
fn backup_existing(path: &Path) {
    if !path.exists() {
        return;
    }
    let backup_path = backup_path(path);
    match fs::copy(path, &backup_path) {
        Ok(_) => tracing::debug!("Backed up {} to {}", path.display(), backup_path.display()),
        Err(e) => tracing::warn!("Failed to create backup {}: {}", backup_path.display(), e),
    }
}

#[cfg(unix)]
fn set_mode(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(HOSTS_FILE_MODE))
        .map_err(|e| Error::io(path, e))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path) -> Result<()> {
    Ok(())
}

/// Path of the backup copy kept next to `path`
pub fn backup_path(path: &Path) -> PathBuf {
    sidecar_path(path, "backup")
}

/// `path` with `.suffix` appended to the full file name
fn sidecar_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_new_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hosts");
        write_atomic(&path, "127.0.0.1       localhost\n", false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "127.0.0.1       localhost\n");
        assert!(!sidecar_path(&path, "tmp").exists());
    }

    #[test]
    fn backup_keeps_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, "old\n").unwrap();

        write_atomic(&path, "new\n", true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
        assert_eq!(fs::read_to_string(backup_path(&path)).unwrap(), "old\n");
    }

    #[test]
    fn no_backup_unless_asked() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, "old\n").unwrap();
        write_atomic(&path, "new\n", false).unwrap();
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn sidecar_appends_to_full_name() {
        assert_eq!(
            sidecar_path(Path::new("/etc/hosts.allow"), "backup"),
            PathBuf::from("/etc/hosts.allow.backup")
        );
        assert_eq!(sidecar_path(Path::new("/etc/hosts"), "tmp"), PathBuf::from("/etc/hosts.tmp"));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("hosts");
        let err = write_atomic(&path, "x\n", false).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_target_is_written_through() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real_hosts");
        let link = dir.path().join("hosts");
        fs::write(&real, "old\n").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        write_atomic(&link, "new\n", true).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), "new\n");
        assert_eq!(fs::read_to_string(backup_path(&real)).unwrap(), "old\n");
        assert!(!sidecar_path(&link, "tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn written_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hosts");
        write_atomic(&path, "x\n", false).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}

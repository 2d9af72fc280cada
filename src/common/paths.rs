//! Cross-platform socket and configuration paths
//!
//! Unix/macOS: the report observer listens on a Unix domain socket at
//! $XDG_RUNTIME_DIR or /tmp
//! Windows: named pipe `treeprobe-<username>`

use std::io;
use std::path::{Path, PathBuf};

/// Name used for the report socket/pipe and the config directory
const APP_NAME: &str = "treeprobe";

/// Get the default socket/pipe path for report delivery
///
/// Platform-specific:
/// - Unix: `$XDG_RUNTIME_DIR/treeprobe/report.sock` or `/tmp/treeprobe-<uid>/report.sock`
/// - Windows: Named pipe path (handled by interprocess crate)
#[cfg(unix)]
pub fn socket_path() -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        return PathBuf::from(runtime_dir).join(APP_NAME).join("report.sock");
    }

    // Fallback to /tmp with uid so users don't share an observer
    let uid = unsafe { libc::getuid() };
    PathBuf::from(format!("/tmp/{}-{}", APP_NAME, uid)).join("report.sock")
}

#[cfg(windows)]
pub fn socket_path() -> PathBuf {
    let username = std::env::var("USERNAME").unwrap_or_else(|_| "default".to_string());
    PathBuf::from(format!("{}-{}", APP_NAME, username))
}

/// Socket name suitable for interprocess `LocalSocketName` conversion
pub fn socket_name(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Ensure the directory holding `socket` exists
///
/// On Unix, creates the directory with mode 0700
#[cfg(unix)]
pub fn ensure_socket_dir(socket: &Path) -> io::Result<PathBuf> {
    let dir = socket.parent().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "Invalid socket path")
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))?;
    }

    Ok(dir.to_path_buf())
}

#[cfg(windows)]
pub fn ensure_socket_dir(_socket: &Path) -> io::Result<PathBuf> {
    // Named pipes don't need a directory on Windows
    Ok(PathBuf::new())
}

/// Remove a stale socket file if it exists
#[cfg(unix)]
pub fn remove_socket(socket: &Path) -> io::Result<()> {
    if socket.exists() {
        std::fs::remove_file(socket)?;
    }
    Ok(())
}

#[cfg(windows)]
pub fn remove_socket(_socket: &Path) -> io::Result<()> {
    // Named pipes are automatically cleaned up on Windows
    Ok(())
}

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/treeprobe/`
/// - macOS: `~/Library/Application Support/treeprobe/`
/// - Windows: `%APPDATA%\treeprobe\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

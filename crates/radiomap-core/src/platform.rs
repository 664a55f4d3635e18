use std::path::PathBuf;

pub fn data_dir() -> PathBuf {
    // XDG layout on unix; dirs' platform default elsewhere
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join("radiomap")
    }
    #[cfg(not(unix))]
    {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("radiomap")
    }
}

pub fn config_dir() -> PathBuf {
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("radiomap")
    }
    #[cfg(not(unix))]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("radiomap")
    }
}

pub fn mpv_socket_path() -> PathBuf {
    std::env::temp_dir().join("radiomap-mpv.sock")
}

pub fn mpv_socket_arg() -> String {
    format!("--input-ipc-server={}", mpv_socket_path().display())
}

fn mpv_binary_name() -> &'static str {
    #[cfg(windows)]
    {
        "mpv.exe"
    }
    #[cfg(not(windows))]
    {
        "mpv"
    }
}

/// Find the mpv binary: beside the current exe first, then PATH.
pub fn find_mpv_binary() -> Option<PathBuf> {
    let name = mpv_binary_name();

    if let Ok(current_exe) = std::env::current_exe() {
        if let Some(dir) = current_exe.parent() {
            let beside = dir.join(name);
            if beside.exists() {
                return Some(beside);
            }
        }
    }

    let path = std::env::var("PATH").ok()?;
    #[cfg(unix)]
    let sep = ":";
    #[cfg(windows)]
    let sep = ";";
    for dir in path.split(sep) {
        let candidate = PathBuf::from(dir).join(name);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

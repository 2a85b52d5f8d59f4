use std::path::{Path, PathBuf};

/// Collapses an FTP path argument against the current directory into a
/// normalized absolute virtual path.
///
/// An argument starting with `/` is taken as absolute, anything else is
/// joined onto `current_dir`. Segments are then processed left to right:
/// `..` pops the last kept segment (a no-op at the root, so the result can
/// never rise above `/`), `.` and empty segments are dropped, everything
/// else is pushed. The output therefore never contains `.` or `..`.
pub fn resolve(current_dir: &str, arg: &str) -> String {
    let joined = if arg.starts_with('/') {
        arg.to_string()
    } else {
        format!("{}/{}", current_dir, arg)
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        String::from("/")
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Anchors a virtual path under the server root. The resolver has already
/// removed every `.`/`..` segment, so plain concatenation cannot escape the
/// root.
pub fn to_real(server_root: &Path, virtual_path: &str) -> PathBuf {
    server_root.join(virtual_path.trim_start_matches('/'))
}

use crate::core_error::CommandError;
use crate::core_vfs::resolver;
use crate::session::Session;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Sends a single `<code> <text>\r\n` response line on the control
/// connection.
pub async fn send_response(
    writer: &Arc<Mutex<OwnedWriteHalf>>,
    code: u16,
    text: &str,
) -> Result<(), std::io::Error> {
    let mut writer = writer.lock().await;
    writer
        .write_all(format!("{} {}\r\n", code, text).as_bytes())
        .await?;
    writer.flush().await?;
    Ok(())
}

/// Rejects an empty command argument before a handler starts mutating
/// anything.
pub fn require_arg(arg: &str) -> Result<&str, CommandError> {
    let arg = arg.trim();
    if arg.is_empty() {
        Err(CommandError::syntax())
    } else {
        Ok(arg)
    }
}

/// Resolves a command argument against the session into the pair of paths a
/// handler works with: the normalized virtual path and the real path under
/// the server root.
pub fn resolve_paths(session: &Session, arg: &str) -> (String, PathBuf) {
    let virtual_path = resolver::resolve(&session.current_dir, arg);
    let real_path = resolver::to_real(&session.base_path, &virtual_path);
    (virtual_path, real_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn require_arg_rejects_blank() {
        assert!(require_arg("").is_err());
        assert!(require_arg("   ").is_err());
        assert_eq!(require_arg(" file.txt ").unwrap(), "file.txt");
    }

    #[test]
    fn resolve_paths_follows_the_session_directory() {
        let mut session = Session::new(PathBuf::from("/srv/ftp"));
        session.current_dir = String::from("/pub");
        let (virt, real) = resolve_paths(&session, "data/file.bin");
        assert_eq!(virt, "/pub/data/file.bin");
        assert_eq!(real, Path::new("/srv/ftp/pub/data/file.bin"));
    }
}

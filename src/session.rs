use std::borrow::Cow;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Transfer representation negotiated with TYPE. The server behaves as
/// binary until a TYPE command says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferType {
    Ascii,
    Binary,
}

impl TransferType {
    /// `I` is image/binary; every other code is treated as ASCII.
    pub fn from_code(code: char) -> Self {
        if code.eq_ignore_ascii_case(&'i') {
            TransferType::Binary
        } else {
            TransferType::Ascii
        }
    }

    /// Applies the type to one chunk of transfer data. Binary passes bytes
    /// through untouched; ASCII squeezes them through a 7-bit alphabet,
    /// replacing anything outside it with `?` the way a charset-constrained
    /// stream coder does.
    pub fn encode<'a>(&self, chunk: &'a [u8]) -> Cow<'a, [u8]> {
        match self {
            TransferType::Binary => Cow::Borrowed(chunk),
            TransferType::Ascii => {
                if chunk.is_ascii() {
                    Cow::Borrowed(chunk)
                } else {
                    Cow::Owned(
                        chunk
                            .iter()
                            .map(|&b| if b.is_ascii() { b } else { b'?' })
                            .collect(),
                    )
                }
            }
        }
    }
}

/// One control connection's state. Created on accept, dropped on disconnect
/// or QUIT; nothing in here is ever shared across connections.
#[derive(Debug)]
pub struct Session {
    /// Username stored by USER, waiting for PASS.
    pub pending_user: Option<String>,
    pub authenticated: bool,
    /// Normalized absolute virtual path, `/` on connect.
    pub current_dir: String,
    pub transfer_type: TransferType,
    /// Client address advertised with PORT; kept across transfers.
    pub data_addr: Option<SocketAddr>,
    /// Virtual path stored by RNFR, consumed by RNTO.
    pub rename_from: Option<String>,
    /// Canonicalized server root; the only directory tree ever touched.
    pub base_path: PathBuf,
}

impl Session {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            pending_user: None,
            authenticated: false,
            current_dir: String::from("/"),
            transfer_type: TransferType::Binary,
            data_addr: None,
            rename_from: None,
            base_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_unauthenticated_at_root() {
        let session = Session::new(PathBuf::from("/srv/ftp"));
        assert!(!session.authenticated);
        assert!(session.pending_user.is_none());
        assert_eq!(session.current_dir, "/");
        assert_eq!(session.transfer_type, TransferType::Binary);
        assert!(session.data_addr.is_none());
        assert!(session.rename_from.is_none());
    }

    #[test]
    fn type_code_mapping() {
        assert_eq!(TransferType::from_code('I'), TransferType::Binary);
        assert_eq!(TransferType::from_code('i'), TransferType::Binary);
        assert_eq!(TransferType::from_code('A'), TransferType::Ascii);
        assert_eq!(TransferType::from_code('E'), TransferType::Ascii);
    }

    #[test]
    fn binary_passes_bytes_unchanged() {
        let data = [0u8, 0x7f, 0x80, 0xff];
        assert_eq!(&*TransferType::Binary.encode(&data), &data);
    }

    #[test]
    fn ascii_replaces_high_bytes() {
        let data = [b'a', 0xc3, 0xa9, b'b'];
        assert_eq!(&*TransferType::Ascii.encode(&data), b"a??b");
        // Pure ASCII input borrows instead of copying.
        assert!(matches!(
            TransferType::Ascii.encode(b"hello"),
            Cow::Borrowed(_)
        ));
    }
}

use crate::core_error::CommandError;
use crate::core_ftpcommand::utils::send_response;
use crate::session::Session;
use crate::Config;
use log::info;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Parses the PORT argument `h1,h2,h3,h4,p1,p2` into a socket address.
///
/// Exactly six comma-separated decimal integers, each in 0..=255; the data
/// port is `p1 * 256 + p2`. Anything else is a syntax error.
pub fn parse_port_args(arg: &str) -> Option<SocketAddr> {
    let parts: Vec<&str> = arg.split(',').collect();
    if parts.len() != 6 {
        return None;
    }
    let mut octets = [0u8; 6];
    for (octet, part) in octets.iter_mut().zip(&parts) {
        *octet = part.parse::<u8>().ok()?;
    }
    let ip = Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]);
    let port = u16::from(octets[4]) << 8 | u16::from(octets[5]);
    Some(SocketAddr::new(IpAddr::V4(ip), port))
}

/// Handles the PORT (Active Mode) FTP command.
///
/// Stores the advertised client address in the session; the data connection
/// itself is opened later, when a transfer command needs it.
pub async fn handle_port_command(
    writer: Arc<Mutex<OwnedWriteHalf>>,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), CommandError> {
    let addr = parse_port_args(arg.trim()).ok_or_else(CommandError::syntax)?;
    info!("Client data address: {}", addr);

    session.lock().await.data_addr = Some(addr);
    send_response(&writer, 215, "PORT command successful.").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_address_and_port() {
        let addr = parse_port_args("127,0,0,1,4,1").unwrap();
        assert_eq!(addr.ip(), IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)));
        assert_eq!(addr.port(), 4 * 256 + 1);
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!(parse_port_args("1,2,3").is_none());
        assert!(parse_port_args("1,2,3,4,5,6,7").is_none());
        assert!(parse_port_args("").is_none());
    }

    #[test]
    fn rejects_out_of_range_octets() {
        assert!(parse_port_args("1,2,3,4,5,300").is_none());
        assert!(parse_port_args("256,0,0,1,4,1").is_none());
        assert!(parse_port_args("1,2,3,4,-1,5").is_none());
    }

    #[test]
    fn rejects_non_numeric_parts() {
        assert!(parse_port_args("a,b,c,d,e,f").is_none());
        assert!(parse_port_args("127,0,0,1,4,").is_none());
    }

    #[test]
    fn high_port_round_trip() {
        let addr = parse_port_args("10,0,0,2,255,255").unwrap();
        assert_eq!(addr.port(), 65535);
    }
}

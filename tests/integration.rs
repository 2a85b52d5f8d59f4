//! End-to-end tests driving a live server over loopback, including active
//! mode data transfers against a client-side listener.

use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use givreftpd::core_network::network;
use givreftpd::Config;

struct TestServer {
    port: u16,
    root: PathBuf,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

/// Spawns a server on an ephemeral port with a fresh temp root. The server
/// thread lives for the rest of the test binary; connections stop coming and
/// it just idles on accept.
fn start_server(name: &str) -> TestServer {
    let root = std::env::temp_dir().join(format!(
        "givreftpd-test-{}-{}",
        name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&root);
    fs::create_dir_all(&root).unwrap();

    let mut config = Config::default();
    config.server.server_root = root.to_string_lossy().into_owned();

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap().port()).unwrap();
            let _ = network::serve(listener, Arc::new(config)).await;
        });
    });

    TestServer {
        port: rx.recv().unwrap(),
        root,
    }
}

struct Client {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
}

impl Client {
    fn connect(port: u16) -> Self {
        let stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(10)))
            .unwrap();
        let reader = BufReader::new(stream.try_clone().unwrap());
        let mut client = Client { stream, reader };
        let greeting = client.read_response();
        assert!(greeting.starts_with("220 "), "greeting: {}", greeting);
        client
    }

    fn read_response(&mut self) -> String {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).unwrap();
        assert!(n > 0, "server closed the control connection");
        line.trim_end().to_string()
    }

    fn cmd(&mut self, line: &str) -> String {
        self.stream
            .write_all(format!("{}\r\n", line).as_bytes())
            .unwrap();
        self.read_response()
    }

    fn login(&mut self) {
        assert!(self.cmd("USER morf").starts_with("331 "));
        assert_eq!(self.cmd("PASS 123"), "230 Authorization has been successfully.");
    }

    /// Binds a local data listener and advertises it with PORT.
    fn advertise_data_port(&mut self) -> TcpListener {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let response = self.cmd(&format!("PORT 127,0,0,1,{},{}", port / 256, port % 256));
        assert_eq!(response, "215 PORT command successful.");
        listener
    }
}

fn accept_and_read(listener: &TcpListener) -> Vec<u8> {
    let (mut socket, _) = listener.accept().unwrap();
    socket
        .set_read_timeout(Some(Duration::from_secs(10)))
        .unwrap();
    let mut data = Vec::new();
    socket.read_to_end(&mut data).unwrap();
    data
}

fn accept_and_write(listener: &TcpListener, data: &[u8]) {
    let (mut socket, _) = listener.accept().unwrap();
    socket.write_all(data).unwrap();
    // Dropping the socket signals EOF to the server.
}

#[test]
fn login_gating_and_pwd() {
    let server = start_server("login");
    let mut client = Client::connect(server.port);

    assert_eq!(
        client.cmd("PWD"),
        "530 Please login with username and password."
    );
    assert_eq!(
        client.cmd("LIST"),
        "530 Please login with username and password."
    );

    client.login();
    assert_eq!(client.cmd("PWD"), "257 /");
    assert_eq!(client.cmd("SYST"), "215 UNIX");
    assert_eq!(client.cmd("CLNT tester"), "215 CLNT command successful.");
}

#[test]
fn bad_credentials_are_rejected() {
    let server = start_server("badcreds");
    let mut client = Client::connect(server.port);

    assert_eq!(client.cmd("PASS 123"), "503 Login with username first.");
    assert!(client.cmd("USER morf").starts_with("331 "));
    assert_eq!(client.cmd("PASS wrong"), "530 Login incorrect.");
    assert_eq!(
        client.cmd("PWD"),
        "530 Please login with username and password."
    );

    assert!(client.cmd("USER morf").starts_with("331 "));
    assert_eq!(client.cmd("PASS 123"), "230 Authorization has been successfully.");
    assert_eq!(client.cmd("PWD"), "257 /");
}

#[test]
fn unknown_command_echoes_the_line() {
    let server = start_server("unknown");
    let mut client = Client::connect(server.port);

    assert_eq!(client.cmd("FOO bar"), "500 'FOO bar': command not support.");
}

#[test]
fn port_argument_validation() {
    let server = start_server("portargs");
    let mut client = Client::connect(server.port);
    client.login();

    assert_eq!(
        client.cmd("PORT 1,2,3"),
        "501 Syntax error in parameters or arguments."
    );
    assert_eq!(
        client.cmd("PORT 1,2,3,4,5,300"),
        "501 Syntax error in parameters or arguments."
    );
    assert_eq!(
        client.cmd("PORT 127,0,0,1,4,1"),
        "215 PORT command successful."
    );
}

#[test]
fn type_argument_validation() {
    let server = start_server("typearg");
    let mut client = Client::connect(server.port);
    client.login();

    assert_eq!(
        client.cmd("TYPE"),
        "501 Syntax error in parameters or arguments."
    );
    assert!(client.cmd("TYPE II").starts_with("500 "));
    assert_eq!(client.cmd("TYPE I"), "215 Type set to I");
    assert_eq!(client.cmd("TYPE a"), "215 Type set to A");
}

#[test]
fn directory_lifecycle() {
    let server = start_server("dirs");
    let mut client = Client::connect(server.port);
    client.login();

    assert_eq!(client.cmd("MKD sub"), "257 \"/sub\" directory created");
    assert_eq!(client.cmd("MKD sub"), "550 sub: file exists");
    assert_eq!(client.cmd("CWD sub"), "250 CWD command successful.");
    assert_eq!(client.cmd("PWD"), "257 /sub");
    assert_eq!(client.cmd("CWD missing"), "550 missing: no such directory");

    // `..` at the root clamps instead of escaping.
    assert_eq!(client.cmd("CWD /"), "250 CWD command successful.");
    assert_eq!(client.cmd("CWD .."), "250 CWD command successful.");
    assert_eq!(client.cmd("PWD"), "257 /");

    assert_eq!(client.cmd("RMD sub"), "250 RMD command successful.");
    assert_eq!(client.cmd("RMD sub"), "550 sub: directory does not exist");
    assert!(!server.root.join("sub").exists());

    assert_eq!(
        client.cmd("DELE ghost.txt"),
        "550 ghost.txt: file does not exist"
    );
}

#[test]
fn rename_sequencing() {
    let server = start_server("rename");
    fs::write(server.root.join("old.txt"), b"contents").unwrap();
    let mut client = Client::connect(server.port);
    client.login();

    // RNTO with no pending RNFR.
    assert_eq!(
        client.cmd("RNTO new.txt"),
        "550 new.txt: file does not exist"
    );
    // RNFR on a missing path stores nothing.
    assert_eq!(
        client.cmd("RNFR ghost.txt"),
        "550 ghost.txt: file does not exist"
    );
    assert_eq!(
        client.cmd("RNTO new.txt"),
        "550 new.txt: file does not exist"
    );

    assert_eq!(client.cmd("RNFR old.txt"), "350 Pending file");
    assert_eq!(client.cmd("RNTO new.txt"), "250 RNTO command successful.");
    assert!(server.root.join("new.txt").exists());
    assert!(!server.root.join("old.txt").exists());

    // The pending source was consumed by the successful rename.
    assert_eq!(
        client.cmd("RNTO again.txt"),
        "550 again.txt: file does not exist"
    );
}

#[test]
fn stor_then_retr_round_trip_binary() {
    let server = start_server("roundtrip-bin");
    let mut client = Client::connect(server.port);
    client.login();
    assert_eq!(client.cmd("TYPE I"), "215 Type set to I");

    let payload: Vec<u8> = (0u8..=255).cycle().take(200_000).collect();

    let listener = client.advertise_data_port();
    let uploaded = payload.clone();
    let sender = thread::spawn(move || accept_and_write(&listener, &uploaded));
    assert_eq!(client.cmd("STOR up.bin"), "150 Opening data connection.");
    sender.join().unwrap();
    assert_eq!(client.read_response(), "226 Transfer complete.");
    assert_eq!(fs::read(server.root.join("up.bin")).unwrap(), payload);

    let listener = client.advertise_data_port();
    let receiver = thread::spawn(move || accept_and_read(&listener));
    assert_eq!(client.cmd("RETR up.bin"), "150 Opening data connection.");
    let downloaded = receiver.join().unwrap();
    assert_eq!(client.read_response(), "226 Transfer complete.");
    assert_eq!(downloaded, payload);
}

#[test]
fn stor_then_retr_round_trip_ascii() {
    let server = start_server("roundtrip-ascii");
    let mut client = Client::connect(server.port);
    client.login();
    assert_eq!(client.cmd("TYPE A"), "215 Type set to A");

    let payload = b"line one\r\nline two\r\nplain ascii only\r\n".to_vec();

    let listener = client.advertise_data_port();
    let uploaded = payload.clone();
    let sender = thread::spawn(move || accept_and_write(&listener, &uploaded));
    assert_eq!(client.cmd("STOR note.txt"), "150 Opening data connection.");
    sender.join().unwrap();
    assert_eq!(client.read_response(), "226 Transfer complete.");

    let listener = client.advertise_data_port();
    let receiver = thread::spawn(move || accept_and_read(&listener));
    assert_eq!(client.cmd("RETR note.txt"), "150 Opening data connection.");
    let downloaded = receiver.join().unwrap();
    assert_eq!(client.read_response(), "226 Transfer complete.");
    assert_eq!(downloaded, payload);
}

#[test]
fn stor_refuses_to_overwrite() {
    let server = start_server("stor-exists");
    fs::write(server.root.join("taken.txt"), b"original").unwrap();
    let mut client = Client::connect(server.port);
    client.login();
    let _listener = client.advertise_data_port();

    assert_eq!(
        client.cmd("STOR taken.txt"),
        "550 File exists in that location."
    );
    assert_eq!(fs::read(server.root.join("taken.txt")).unwrap(), b"original");
}

#[test]
fn failed_stor_leaves_no_file_behind() {
    let server = start_server("stor-orphan");
    let mut client = Client::connect(server.port);
    client.login();

    // No PORT address stored: the transfer is refused before the target
    // is created, so a later attempt at the same name still works.
    assert_eq!(
        client.cmd("STOR fresh.bin"),
        "425 Can't open data connection."
    );
    assert!(!server.root.join("fresh.bin").exists());

    let listener = client.advertise_data_port();
    let sender = thread::spawn(move || accept_and_write(&listener, b"second try"));
    assert_eq!(client.cmd("STOR fresh.bin"), "150 Opening data connection.");
    sender.join().unwrap();
    assert_eq!(client.read_response(), "226 Transfer complete.");
    assert_eq!(
        fs::read(server.root.join("fresh.bin")).unwrap(),
        b"second try"
    );
}

#[test]
fn retr_failures() {
    let server = start_server("retr-fail");
    fs::write(server.root.join("real.txt"), b"data").unwrap();
    let mut client = Client::connect(server.port);
    client.login();

    // No PORT address stored yet: the file check passes, the connect fails.
    assert_eq!(
        client.cmd("RETR real.txt"),
        "425 Can't open data connection."
    );

    let _listener = client.advertise_data_port();
    assert_eq!(client.cmd("RETR ghost.txt"), "550 Not a plain file.");

    // Traversal resolves under the server root, where no such file exists.
    assert_eq!(
        client.cmd("RETR ../../../../etc/passwd"),
        "550 Not a plain file."
    );
}

#[test]
fn list_renders_the_fixed_format() {
    let server = start_server("list");
    fs::write(server.root.join("a.txt"), b"hello").unwrap();
    fs::create_dir(server.root.join("sub")).unwrap();
    let mut client = Client::connect(server.port);
    client.login();

    let listener = client.advertise_data_port();
    let receiver = thread::spawn(move || accept_and_read(&listener));
    assert_eq!(client.cmd("LIST"), "150 Opening data connection.");
    let listing = String::from_utf8(receiver.join().unwrap()).unwrap();
    assert_eq!(client.read_response(), "226 Transfer complete.");

    assert!(listing.starts_with("total 2\n"), "listing: {}", listing);
    assert!(listing.ends_with("\r\n"));
    let file_line = listing
        .lines()
        .find(|l| l.ends_with("a.txt"))
        .expect("a.txt line");
    assert!(file_line.starts_with("-rwxrwxrwx 1 ftp ftp        5 "));
    let dir_line = listing
        .lines()
        .find(|l| l.ends_with(" sub"))
        .expect("sub line");
    assert!(dir_line.starts_with("drwxrwxrwx 1 ftp ftp "));

    assert_eq!(client.cmd("LIST ghost"), "550 No such directory.");
}

#[test]
fn sessions_are_isolated() {
    let server = start_server("isolation");
    let mut first = Client::connect(server.port);
    first.login();
    assert_eq!(first.cmd("MKD apart"), "257 \"/apart\" directory created");
    assert_eq!(first.cmd("CWD apart"), "250 CWD command successful.");

    // A second connection sees none of the first one's state.
    let mut second = Client::connect(server.port);
    assert_eq!(
        second.cmd("PWD"),
        "530 Please login with username and password."
    );
    second.login();
    assert_eq!(second.cmd("PWD"), "257 /");

    assert_eq!(first.cmd("PWD"), "257 /apart");
}

#[test]
fn overlong_line_closes_the_connection() {
    let server = start_server("longline");
    let mut client = Client::connect(server.port);

    // No delimiter within the frame limit: the server drops the connection
    // without sending anything back.
    client.stream.write_all(&[b'A'; 4096]).unwrap();
    let mut line = String::new();
    let n = client.reader.read_line(&mut line).unwrap_or(0);
    assert_eq!(n, 0, "connection should be closed, got: {}", line);
}

#[test]
fn quit_closes_the_connection() {
    let server = start_server("quit");
    let mut client = Client::connect(server.port);
    client.login();

    assert_eq!(client.cmd("QUIT"), "221 Goodbye...");
    client
        .stream
        .write_all(b"PWD\r\n")
        .unwrap_or_default();
    let mut line = String::new();
    let n = client.reader.read_line(&mut line).unwrap_or(0);
    assert_eq!(n, 0, "connection should be closed after QUIT");
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    SYST,
    CLNT,
    PWD,
    TYPE,
    PORT,
    LIST,
    CWD,
    RETR,
    STOR,
    MKD,
    RMD,
    DELE,
    RNFR,
    RNTO,
    QUIT,
}

impl FtpCommand {
    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "SYST" => Some(FtpCommand::SYST),
            "CLNT" => Some(FtpCommand::CLNT),
            "PWD" => Some(FtpCommand::PWD),
            "TYPE" => Some(FtpCommand::TYPE),
            "PORT" => Some(FtpCommand::PORT),
            "LIST" => Some(FtpCommand::LIST),
            "CWD" => Some(FtpCommand::CWD),
            "RETR" => Some(FtpCommand::RETR),
            "STOR" => Some(FtpCommand::STOR),
            "MKD" => Some(FtpCommand::MKD),
            "RMD" => Some(FtpCommand::RMD),
            "DELE" => Some(FtpCommand::DELE),
            "RNFR" => Some(FtpCommand::RNFR),
            "RNTO" => Some(FtpCommand::RNTO),
            "QUIT" => Some(FtpCommand::QUIT),
            _ => None,
        }
    }

    /// USER, PASS and QUIT are the only commands permitted before login.
    pub fn requires_login(&self) -> bool {
        !matches!(
            self,
            FtpCommand::USER | FtpCommand::PASS | FtpCommand::QUIT
        )
    }
}

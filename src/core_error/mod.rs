use thiserror::Error;

/// Classified command failures.
///
/// Every handler reports failure through one of these variants; the
/// dispatcher is the single place that turns them into a response line.
/// `Transport` is the exception: it means the control connection itself
/// failed, and the connection is closed without any further protocol
/// interaction.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Unknown command or malformed arguments (500/501).
    #[error("{code} {text}")]
    Protocol { code: u16, text: String },

    /// Missing username, bad credentials, or command before login (503/530).
    #[error("{code} {text}")]
    Auth { code: u16, text: String },

    /// Target missing, wrong kind, or present where absence was required (550).
    #[error("550 {text}")]
    NotFound { text: String },

    /// Data connection could not be opened or sustained (425/553).
    #[error("{code} {text}")]
    Transfer { code: u16, text: String },

    /// Failure on the control connection itself; never sent as a response.
    #[error("control connection failure: {0}")]
    Transport(#[from] std::io::Error),
}

impl CommandError {
    pub fn unknown_command(line: &str) -> Self {
        CommandError::Protocol {
            code: 500,
            text: format!("'{}': command not support.", line),
        }
    }

    pub fn syntax() -> Self {
        CommandError::Protocol {
            code: 501,
            text: String::from("Syntax error in parameters or arguments."),
        }
    }

    pub fn exception(text: impl Into<String>) -> Self {
        CommandError::Protocol {
            code: 500,
            text: text.into(),
        }
    }

    pub fn username_needed() -> Self {
        CommandError::Auth {
            code: 503,
            text: String::from("Login with username first."),
        }
    }

    pub fn login_incorrect() -> Self {
        CommandError::Auth {
            code: 530,
            text: String::from("Login incorrect."),
        }
    }

    pub fn not_logged_in() -> Self {
        CommandError::Auth {
            code: 530,
            text: String::from("Please login with username and password."),
        }
    }

    pub fn not_found(text: impl Into<String>) -> Self {
        CommandError::NotFound { text: text.into() }
    }

    pub fn data_connection() -> Self {
        CommandError::Transfer {
            code: 425,
            text: String::from("Can't open data connection."),
        }
    }

    pub fn data_io() -> Self {
        CommandError::Transfer {
            code: 553,
            text: String::from("IO exception"),
        }
    }

    /// Response line for the client. `None` for transport faults, which have
    /// no protocol representation.
    pub fn response(&self) -> Option<(u16, &str)> {
        match self {
            CommandError::Protocol { code, text } => Some((*code, text)),
            CommandError::Auth { code, text } => Some((*code, text)),
            CommandError::NotFound { text } => Some((550, text)),
            CommandError::Transfer { code, text } => Some((*code, text)),
            CommandError::Transport(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_command_echoes_the_raw_line() {
        let err = CommandError::unknown_command("FOO bar");
        assert_eq!(
            err.response(),
            Some((500, "'FOO bar': command not support."))
        );
    }

    #[test]
    fn taxonomy_codes() {
        assert_eq!(CommandError::syntax().response().unwrap().0, 501);
        assert_eq!(CommandError::username_needed().response().unwrap().0, 503);
        assert_eq!(CommandError::login_incorrect().response().unwrap().0, 530);
        assert_eq!(CommandError::not_logged_in().response().unwrap().0, 530);
        assert_eq!(CommandError::not_found("x").response().unwrap().0, 550);
        assert_eq!(CommandError::data_connection().response().unwrap().0, 425);
        assert_eq!(CommandError::data_io().response().unwrap().0, 553);
    }

    #[test]
    fn transport_faults_have_no_response() {
        let err = CommandError::from(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "broken pipe",
        ));
        assert!(err.response().is_none());
    }
}

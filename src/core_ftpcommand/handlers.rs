use crate::core_error::CommandError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::utils::send_response;
use crate::session::Session;
use crate::Config;
use log::{info, warn};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex as TokioMutex;

// Specific module for the PORT command
use crate::core_network::port;

type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), CommandError>> + Send>>;

type CommandHandler = Box<
    dyn Fn(
            Arc<TokioMutex<OwnedWriteHalf>>,
            Arc<Config>,
            Arc<TokioMutex<Session>>,
            String, // Command argument, interior spaces preserved
        ) -> HandlerFuture
        + Send
        + Sync,
>;

/// Builds the explicit verb-to-handler table. Built once per connection;
/// every supported command appears here and nowhere else.
pub fn initialize_command_handlers() -> HashMap<FtpCommand, Arc<CommandHandler>> {
    let mut handlers: HashMap<FtpCommand, Arc<CommandHandler>> = HashMap::new();

    handlers.insert(
        FtpCommand::USER,
        Arc::new(Box::new(|writer, config, session, arg| {
            Box::pin(crate::core_ftpcommand::user::handle_user_command(
                writer, config, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::PASS,
        Arc::new(Box::new(|writer, config, session, arg| {
            Box::pin(crate::core_ftpcommand::pass::handle_pass_command(
                writer, config, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::SYST,
        Arc::new(Box::new(|writer, _config, _session, _arg| {
            Box::pin(crate::core_ftpcommand::syst::handle_syst_command(writer))
        })),
    );

    handlers.insert(
        FtpCommand::CLNT,
        Arc::new(Box::new(|writer, _config, _session, arg| {
            Box::pin(crate::core_ftpcommand::clnt::handle_clnt_command(
                writer, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::PWD,
        Arc::new(Box::new(|writer, config, session, arg| {
            Box::pin(crate::core_ftpcommand::pwd::handle_pwd_command(
                writer, config, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::TYPE,
        Arc::new(Box::new(|writer, config, session, arg| {
            Box::pin(crate::core_ftpcommand::type_::handle_type_command(
                writer, config, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::PORT,
        Arc::new(Box::new(|writer, config, session, arg| {
            Box::pin(port::handle_port_command(writer, config, session, arg))
        })),
    );

    handlers.insert(
        FtpCommand::LIST,
        Arc::new(Box::new(|writer, config, session, arg| {
            Box::pin(crate::core_ftpcommand::list::handle_list_command(
                writer, config, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::CWD,
        Arc::new(Box::new(|writer, config, session, arg| {
            Box::pin(crate::core_ftpcommand::cwd::handle_cwd_command(
                writer, config, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::RETR,
        Arc::new(Box::new(|writer, config, session, arg| {
            Box::pin(crate::core_ftpcommand::retr::handle_retr_command(
                writer, config, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::STOR,
        Arc::new(Box::new(|writer, config, session, arg| {
            Box::pin(crate::core_ftpcommand::stor::handle_stor_command(
                writer, config, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::MKD,
        Arc::new(Box::new(|writer, config, session, arg| {
            Box::pin(crate::core_ftpcommand::mkd::handle_mkd_command(
                writer, config, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::RMD,
        Arc::new(Box::new(|writer, config, session, arg| {
            Box::pin(crate::core_ftpcommand::rmd::handle_rmd_command(
                writer, config, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::DELE,
        Arc::new(Box::new(|writer, config, session, arg| {
            Box::pin(crate::core_ftpcommand::dele::handle_dele_command(
                writer, config, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::RNFR,
        Arc::new(Box::new(|writer, config, session, arg| {
            Box::pin(crate::core_ftpcommand::rnfr::handle_rnfr_command(
                writer, config, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::RNTO,
        Arc::new(Box::new(|writer, config, session, arg| {
            Box::pin(crate::core_ftpcommand::rnto::handle_rnto_command(
                writer, config, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::QUIT,
        Arc::new(Box::new(|writer, _config, session, arg| {
            Box::pin(crate::core_ftpcommand::quit::handle_quit_command(
                writer, session, arg,
            ))
        })),
    );

    handlers
}

/// Dispatches one command line.
///
/// The first whitespace token is the verb (case-insensitive); the remainder
/// of the line, leading whitespace stripped, is the argument. Unknown verbs
/// and pre-login commands are answered here without invoking any handler.
/// Classified handler failures become exactly one error response line; only
/// a control-channel fault propagates as `Err` so the caller closes the
/// connection.
///
/// Returns `Ok(false)` when the connection should close (QUIT).
pub async fn dispatch_command(
    handlers: &HashMap<FtpCommand, Arc<CommandHandler>>,
    writer: Arc<TokioMutex<OwnedWriteHalf>>,
    config: Arc<Config>,
    session: Arc<TokioMutex<Session>>,
    line: &str,
) -> Result<bool, std::io::Error> {
    let verb = line.split_whitespace().next().unwrap_or_default();
    let arg = line[verb.len()..].trim_start().to_string();
    info!("Command: {}", verb);

    let command = match FtpCommand::from_str(verb) {
        Some(command) => command,
        None => {
            warn!("Unsupported command: {}", verb);
            send_response(&writer, 500, &format!("'{}': command not support.", line)).await?;
            return Ok(true);
        }
    };

    if command.requires_login() && !session.lock().await.authenticated {
        send_response(&writer, 530, "Please login with username and password.").await?;
        return Ok(true);
    }

    // The table is total over FtpCommand, so the lookup cannot miss.
    let handler = &handlers[&command];

    match handler(Arc::clone(&writer), config, session, arg).await {
        Ok(()) => Ok(command != FtpCommand::QUIT),
        Err(CommandError::Transport(e)) => Err(e),
        Err(e) => {
            // response() only returns None for Transport, matched above.
            let (code, text) = e.response().unwrap_or((500, "Internal error."));
            warn!("{} failed: {} {}", verb, code, text);
            send_response(&writer, code, text).await?;
            Ok(true)
        }
    }
}

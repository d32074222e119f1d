//! Command dispatch: bridges CLI args to the table/form layer and output.

pub mod config_cmd;
pub mod content;
pub mod login;
pub mod records;
pub mod schema;
pub mod util;

use backoffice_api::Resource;

use crate::cli::{Command, GlobalOpts};
use crate::config::Session;
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => login::handle(session, args, global).await,
        Command::Users(args) => records::handle(session, Resource::User, args.command, global).await,
        Command::Roles(args) => records::handle(session, Resource::Role, args.command, global).await,
        Command::Permissions(args) => {
            records::handle(session, Resource::Permission, args.command, global).await
        }
        Command::Categories(args) => {
            records::handle(session, Resource::Category, args.command, global).await
        }
        Command::Posts(args) => content::posts(session, args.command, global).await,
        Command::Menus(args) => content::menus(session, args.command, global).await,
        Command::Logs(args) => content::logs(session, args.command, global).await,
        Command::Files(args) => content::files(session, args.command, global).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions run without a session".into(),
        )),
    }
}

//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod products;
pub mod util;

use shopdash_core::ProductsController;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &ProductsController,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(controller, args, global).await,
        Command::Logout => auth::logout(controller, global).await,
        Command::Whoami => auth::whoami(controller, global).await,
        Command::Products(args) => products::handle(controller, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

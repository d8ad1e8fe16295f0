//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`health`], [`join`], or [`validate`].
//! Each handler lives in its own submodule.

pub mod health;
pub mod join;
pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::LaunchpadError;

pub async fn dispatch(cli: Cli) -> Result<(), LaunchpadError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Health(args)) => health::execute(args).await,
        Some(Commands::Join(args)) => join::execute(args).await,
        Some(Commands::Validate(ref args)) => validate::execute(args),
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  launchpad v{version} \u{2014} landing page with a waitlist\n\n  \
         No command provided. To get started:\n\n    \
         launchpad run                     Serve the page (auto-detects ./launchpad.yaml)\n    \
         launchpad run -c site.yaml        Start with a specific config file\n    \
         launchpad validate site.yaml      Check a config file\n    \
         launchpad --help                  See all commands and options\n"
    );
}

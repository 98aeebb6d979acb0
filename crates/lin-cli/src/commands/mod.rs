use lin_config::TrackerConfig;

use crate::cli::{Commands, GlobalFlags};

pub mod check_config;
pub mod history;
pub mod replay;
pub mod schema;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(
    command: &Commands,
    config: &TrackerConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Replay(args) => replay::handle(args, config, flags),
        Commands::History(args) => history::handle(args, flags),
        Commands::CheckConfig => check_config::handle(config, flags),
        Commands::Schema(args) => schema::handle(args, flags),
    }
}

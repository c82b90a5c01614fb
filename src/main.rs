//! Entry point: parse CLI and dispatch to command handlers.

use clap::Parser;
use fantasy_insights::{
    cli::{Cli, Commands},
    commands::{
        accounts::handle_accounts, insights::handle_insights, lineup::handle_lineup,
        scores::handle_scores, sync::handle_sync, teams::handle_teams, trade::handle_trade,
        waivers::handle_waivers, CommandContext,
    },
    logging, Result,
};

/// Run the CLI.
#[tokio::main]
async fn main() -> Result<()> {
    let Cli { common, command } = Cli::parse();
    logging::init(common.verbose);

    let (week, json) = (common.week, common.json);
    let context = || CommandContext::new(&common);

    match command {
        Commands::Accounts { cmd } => handle_accounts(cmd, json)?,
        Commands::Teams => handle_teams(&common).await?,
        Commands::Scores => handle_scores(&context()?, week, json).await?,
        Commands::Lineup => handle_lineup(&mut context()?, week, json).await?,
        Commands::Waivers { limit } => handle_waivers(&mut context()?, week, limit, json).await?,
        Commands::Trade { cmd } => handle_trade(&mut context()?, cmd, week, json).await?,
        Commands::Insights { limit } => handle_insights(&mut context()?, week, limit, json).await?,
        Commands::Sync {
            through_week,
            force,
        } => handle_sync(&mut context()?, through_week, force, json).await?,
    }

    Ok(())
}

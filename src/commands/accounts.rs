//! `accounts` command: link and unlink leagues in the config file.

use std::path::Path;

use crate::{
    cli::{
        types::{LeagueId, Platform, TeamId},
        AccountsCmd,
    },
    config::{config_path, AppConfig, LinkedAccount},
    Result,
};

use super::common::emit;

/// Handle the accounts command against the default config file
pub fn handle_accounts(cmd: AccountsCmd, json: bool) -> Result<()> {
    handle_accounts_at(&config_path(), cmd, json)
}

pub fn handle_accounts_at(path: &Path, cmd: AccountsCmd, json: bool) -> Result<()> {
    let mut config = AppConfig::load_from(path)?;

    match cmd {
        AccountsCmd::List => emit(json, &config.accounts, |accounts| render_accounts(accounts)),
        AccountsCmd::Add {
            on,
            league,
            team,
            label,
        } => {
            let account = new_account(on, league, team, label);
            println!("✓ Linked {}", describe(&account));
            config.add_account(account);
            config.save_to(path)
        }
        AccountsCmd::Remove { label } => {
            let removed = config.remove_account(&label)?;
            config.save_to(path)?;
            println!("✓ Unlinked {}", describe(&removed));
            Ok(())
        }
    }
}

pub fn new_account(
    platform: Platform,
    league_id: LeagueId,
    team_id: Option<TeamId>,
    label: Option<String>,
) -> LinkedAccount {
    let label = label
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| LinkedAccount::default_label(platform, &league_id));
    LinkedAccount {
        platform,
        league_id,
        team_id,
        label,
    }
}

fn describe(account: &LinkedAccount) -> String {
    let team = account
        .team_id
        .as_ref()
        .map(|t| format!(", team {}", t))
        .unwrap_or_default();
    format!(
        "{} ({} league {}{})",
        account.label, account.platform, account.league_id, team
    )
}

pub fn render_accounts(accounts: &[LinkedAccount]) -> String {
    if accounts.is_empty() {
        return "No linked accounts. Add one with `fantasy-insights accounts add`.".to_string();
    }
    accounts
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let marker = if i == 0 { "*" } else { " " };
            format!("{} {}\n", marker, describe(a))
        })
        .collect()
}

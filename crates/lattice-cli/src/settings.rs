// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Stored config + session selection, with command-line overrides applied.

use anyhow::{Context, Result};
use lattice_app_core::prefs::SESSION_PREFS_KEY;
use lattice_app_core::{ClientConfig, ConfigService, SessionPrefs};
use lattice_config_fs::FsConfigStore;
use lattice_graphql::{MutationContext, Timestamp};
use tracing::info;

use crate::cli::ScopeArgs;

pub fn open(scope: &ScopeArgs) -> Result<ConfigService<FsConfigStore>> {
    let store = match &scope.config_dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    }
    .context("open config store")?;
    Ok(ConfigService::new(store))
}

pub fn client_config(service: &ConfigService<FsConfigStore>, scope: &ScopeArgs) -> Result<ClientConfig> {
    let mut config = service
        .load_client_config(|key| std::env::var(key).ok())
        .context("load client config")?;
    if let Some(address) = &scope.address {
        config.address.clone_from(address);
        config.validate().context("--address")?;
    }
    Ok(config)
}

/// Saved selection with `--branch` / `--at` applied on top.
pub fn session(service: &ConfigService<FsConfigStore>, scope: &ScopeArgs) -> Result<SessionPrefs> {
    let mut prefs = service
        .load::<SessionPrefs>(SESSION_PREFS_KEY)
        .context("load session prefs")?
        .unwrap_or_default();
    apply_scope(&mut prefs, scope);
    Ok(prefs)
}

fn apply_scope(prefs: &mut SessionPrefs, scope: &ScopeArgs) {
    // selecting a branch drops the as-of time, so apply it first
    if let Some(branch) = &scope.branch {
        prefs.select_branch(branch.clone());
    }
    if let Some(at) = &scope.at {
        prefs.set_at(Some(at.clone()));
    }
}

pub fn context(config: &ClientConfig, prefs: &SessionPrefs) -> Result<MutationContext> {
    MutationContext::from_prefs(prefs, config).context("invalid as-of time")
}

/// `lattice use`: persist the branch selection.
pub fn select(scope: &ScopeArgs, branch: String, at: Option<String>) -> Result<()> {
    let service = open(scope)?;
    let mut prefs = service
        .load::<SessionPrefs>(SESSION_PREFS_KEY)
        .context("load session prefs")?
        .unwrap_or_default();
    prefs.select_branch(branch);
    if let Some(at) = at {
        // reject now rather than on the next remote command
        at.parse::<Timestamp>().context("invalid --at")?;
        prefs.set_at(Some(at));
    }
    service
        .save(SESSION_PREFS_KEY, &prefs)
        .context("save session prefs")?;
    info!(branch = ?prefs.branch, at = ?prefs.at, "branch selected");
    Ok(())
}

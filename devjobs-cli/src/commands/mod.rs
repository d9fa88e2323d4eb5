//! Command implementations for the devjobs CLI
//!
//! Every command runs against an [`Env`]: the loaded config, the stored
//! session and one API client shared by the pages it mounts.

pub mod account;
pub mod dashboard;
pub mod jobs;
pub mod post_job;
pub mod profile;
pub mod register;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;
use devjobs_client::ApiClient;
use devjobs_core::notify::{Notifier, Silent};
use devjobs_core::{AccountKind, AppContext, Deps, DevJobsConfig, DevJobsError, Session, SessionStore};
use tracing::debug;

use crate::ui::{self, TerminalNotifier};

pub use account::{run_login, run_logout, run_signup};
pub use dashboard::run_dashboard;
pub use jobs::{run_jobs, JobsPage};
pub use post_job::run_post_job;
pub use profile::run_profile;
pub use register::run_register;

/// Account type on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccountArg {
    #[default]
    JobSeeker,
    Employer,
}

impl From<AccountArg> for AccountKind {
    fn from(arg: AccountArg) -> Self {
        match arg {
            AccountArg::JobSeeker => AccountKind::JobSeeker,
            AccountArg::Employer => AccountKind::Employer,
        }
    }
}

/// Config, stored session and API client for one invocation.
pub struct Env {
    pub config: DevJobsConfig,
    pub store: SessionStore,
    pub context: AppContext,
    api: Arc<ApiClient>,
}

impl Env {
    /// `api_url` (from `--api-url`) wins over the environment and the config file.
    pub fn load(api_url: Option<&str>) -> Result<Self> {
        let mut config = DevJobsConfig::load().context("Failed to load devjobs config")?;
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            config.api.base_url = url.to_string();
        }
        let api = ApiClient::from_config(&config).context("Failed to create API client")?;

        let store = SessionStore::default();
        let session = store.load().context("Failed to read stored session")?;
        debug!(
            api = %api.base_url(),
            logged_in = session.is_some(),
            "environment loaded"
        );

        Ok(Self {
            config,
            store,
            context: AppContext::with_session(session),
            api: Arc::new(api),
        })
    }

    /// Page dependencies reporting to the terminal (nothing in `--json` mode).
    pub fn deps(&self) -> Deps {
        let notifier: Arc<dyn Notifier> = if ui::is_json_mode() {
            Arc::new(Silent)
        } else {
            Arc::new(TerminalNotifier)
        };
        self.deps_with(notifier)
    }

    pub fn deps_with(&self, notifier: Arc<dyn Notifier>) -> Deps {
        Deps::new(self.api.clone(), notifier, self.context.clone())
            .detail(self.config.detail())
            .order(self.config.fetch.resolution)
    }

    pub fn require_session(&self) -> Result<Session> {
        Ok(self.context.session().ok_or(DevJobsError::NotAuthenticated)?)
    }

    /// Persist whatever session the context holds after a command.
    pub fn persist_session(&self) -> Result<()> {
        match self.context.session() {
            Some(session) => self.store.save(&session)?,
            None => {
                self.store.clear()?;
            }
        }
        Ok(())
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

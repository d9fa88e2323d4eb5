//! `devjobs signup` / `login` / `logout`
//!
//! The session token is kept in `~/.devjobs/session.toml` between commands.

use anyhow::Result;
use clap::Parser;
use devjobs_core::pages::{self, SignupStage};
use devjobs_core::{AccountKind, LoginForm, SignupForm, SignupPage};
use tracing::info;

use super::{AccountArg, Env};
use crate::ui;
use crate::wizard::{self, WizardFillable};

#[derive(Parser, Debug, Default)]
pub struct SignupArgs {
    #[arg(long, short)]
    pub username: Option<String>,

    #[arg(long, short)]
    pub email: Option<String>,

    /// Password (prompted for when omitted)
    #[arg(long, env = "DEVJOBS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Password confirmation (defaults to --password)
    #[arg(long)]
    pub confirm_password: Option<String>,

    /// Account type
    #[arg(long = "as", value_enum, default_value_t = AccountArg::JobSeeker)]
    pub account: AccountArg,
}

impl SignupArgs {
    fn into_form(self) -> SignupForm {
        let password1 = self.password.unwrap_or_default();
        let password2 = self.confirm_password.unwrap_or_else(|| password1.clone());
        SignupForm {
            username: self.username.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            password1,
            password2,
        }
    }
}

impl WizardFillable for SignupArgs {
    fn needs_wizard(&self) -> bool {
        self.username.is_none() || self.email.is_none() || self.password.is_none()
    }

    fn fill_with_wizard(&mut self) -> Result<()> {
        println!("\n🧙 Create an Account\n");
        wizard::fill(&mut self.username, "UserName:", "Shown on your profile")?;
        wizard::fill(&mut self.email, "Email:", "A confirmation email is sent here")?;
        wizard::fill_secret(&mut self.password, "Password:")?;
        wizard::fill_secret(&mut self.confirm_password, "Confirm Password:")?;
        Ok(())
    }
}

#[derive(Parser, Debug, Default)]
pub struct LoginArgs {
    #[arg(long, short)]
    pub username: Option<String>,

    #[arg(long, env = "DEVJOBS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Account type
    #[arg(long = "as", value_enum, default_value_t = AccountArg::JobSeeker)]
    pub account: AccountArg,
}

impl WizardFillable for LoginArgs {
    fn needs_wizard(&self) -> bool {
        self.username.is_none() || self.password.is_none()
    }

    fn fill_with_wizard(&mut self) -> Result<()> {
        wizard::fill(&mut self.username, "UserName:", "")?;
        wizard::fill_secret(&mut self.password, "Password:")?;
        Ok(())
    }
}

pub async fn run_signup(env: &Env, mut args: SignupArgs) -> Result<()> {
    if args.needs_wizard() && wizard::can_use_wizard() {
        args.fill_with_wizard()?;
    }
    let kind = AccountKind::from(args.account);
    let form = args.into_form();

    let deps = env.deps();
    let mut page = SignupPage::new(&deps, kind);
    ui::with_spinner_async("Creating account", page.submit(&form)).await?;

    if page.stage() == SignupStage::Completed {
        env.persist_session()?;
        info!(path = %env.store.path().display(), "session stored");
    }
    Ok(())
}

pub async fn run_login(env: &Env, mut args: LoginArgs) -> Result<()> {
    if args.needs_wizard() && wizard::can_use_wizard() {
        args.fill_with_wizard()?;
    }
    let form = LoginForm {
        username: args.username.unwrap_or_default(),
        password: args.password.unwrap_or_default(),
    };

    let deps = env.deps();
    ui::with_spinner_async("Logging in", pages::log_in(&deps, &form, args.account.into())).await?;
    env.persist_session()?;
    Ok(())
}

pub fn run_logout(env: &Env) -> Result<()> {
    pages::log_out(&env.deps());
    env.persist_session()?;
    Ok(())
}

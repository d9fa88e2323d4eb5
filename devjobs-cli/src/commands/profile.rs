//! `devjobs profile show|edit`

use anyhow::Result;
use clap::{Parser, Subcommand};
use devjobs_core::{ProfilePage, ProfileUpdate};

use super::{print_json, Env};
use crate::ui;
use crate::wizard::{self, WizardFillable};

#[derive(Parser, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommands,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show the logged-in user's profile
    Show,
    /// Update profile fields
    Edit(EditArgs),
}

#[derive(Parser, Debug, Default)]
pub struct EditArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub country: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    /// A description of yourself
    #[arg(long)]
    pub about: Option<String>,

    #[arg(long)]
    pub experience_level: Option<String>,

    /// Salary/pay range (a positive amount)
    #[arg(long)]
    pub salary: Option<String>,
}

impl EditArgs {
    fn into_update(self) -> ProfileUpdate {
        ProfileUpdate {
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name,
            email: self.email.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            about: self.about.unwrap_or_default(),
            experience_level: self.experience_level.unwrap_or_default(),
            salary: self.salary,
            ..Default::default()
        }
    }
}

impl WizardFillable for EditArgs {
    fn needs_wizard(&self) -> bool {
        [
            &self.first_name,
            &self.email,
            &self.country,
            &self.state,
            &self.city,
            &self.about,
            &self.experience_level,
        ]
        .iter()
        .any(|field| field.is_none())
    }

    fn fill_with_wizard(&mut self) -> Result<()> {
        println!("\n🧙 Edit Profile\n");
        wizard::fill(&mut self.first_name, "First Name:", "")?;
        wizard::fill_optional(&mut self.last_name, "Last Name:")?;
        wizard::fill(&mut self.email, "Email:", "")?;
        wizard::fill(&mut self.country, "Country:", "")?;
        wizard::fill(&mut self.state, "State:", "")?;
        wizard::fill(&mut self.city, "City:", "")?;
        wizard::fill(&mut self.about, "About Me:", "A description of yourself")?;
        wizard::fill(&mut self.experience_level, "Experience Level:", "e.g. Junior, Senior")?;
        wizard::fill_optional(&mut self.salary, "Salary/Pay Range:")?;
        Ok(())
    }
}

pub async fn run_profile(env: &Env, args: ProfileArgs) -> Result<()> {
    env.require_session()?;
    let deps = env.deps();
    let page = ProfilePage::new(&deps);

    match args.command {
        ProfileCommands::Show => {
            let pb = ui::spinner("Loading profile");
            let view = page.load().await;
            ui::finish_clear(pb);
            if ui::is_json_mode() {
                print_json(&view)?;
            } else {
                println!("{}", view);
            }
        }
        ProfileCommands::Edit(mut edit) => {
            if edit.needs_wizard() && wizard::can_use_wizard() {
                edit.fill_with_wizard()?;
            }
            let update = edit.into_update();
            let saved = ui::with_spinner_async("Saving profile", page.update(&update)).await?;
            if ui::is_json_mode() {
                print_json(&saved)?;
            }
        }
    }
    Ok(())
}

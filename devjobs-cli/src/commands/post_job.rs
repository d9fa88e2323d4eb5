//! `devjobs post-job` - submit a job as the logged-in employer
//!
//! Missing fields are prompted for when a terminal is attached; otherwise the
//! form is validated as given and the field messages are returned.

use anyhow::Result;
use clap::Parser;
use devjobs_core::pages;
use devjobs_core::JobPosting;

use super::Env;
use crate::ui;
use crate::wizard::{self, WizardFillable};

#[derive(Parser, Debug, Default)]
pub struct PostJobArgs {
    /// Company phone number
    #[arg(long)]
    pub company_number: Option<String>,

    #[arg(long)]
    pub company_name: Option<String>,

    #[arg(long)]
    pub company_email: Option<String>,

    #[arg(long)]
    pub company_website: Option<String>,

    #[arg(long)]
    pub country: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    /// Job title
    #[arg(long)]
    pub title: Option<String>,

    /// Job description
    #[arg(long)]
    pub description: Option<String>,

    /// Experience level (e.g. Junior, Senior)
    #[arg(long)]
    pub experience_level: Option<String>,

    /// Expected salary
    #[arg(long)]
    pub salary: Option<String>,
}

impl PostJobArgs {
    fn required(&self) -> [&Option<String>; 9] {
        [
            &self.company_number,
            &self.company_name,
            &self.company_email,
            &self.company_website,
            &self.country,
            &self.state,
            &self.city,
            &self.title,
            &self.description,
        ]
    }

    pub fn into_posting(self) -> JobPosting {
        JobPosting {
            company_number: self.company_number.unwrap_or_default(),
            company_name: self.company_name.unwrap_or_default(),
            company_email: self.company_email.unwrap_or_default(),
            company_website: self.company_website.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            experience_level: self.experience_level,
            expected_salary: self.salary,
        }
    }
}

impl WizardFillable for PostJobArgs {
    fn needs_wizard(&self) -> bool {
        self.required()
            .iter()
            .any(|field| field.as_deref().map_or(true, |v| v.trim().is_empty()))
    }

    fn fill_with_wizard(&mut self) -> Result<()> {
        println!("\n🧙 Post a Job\n");
        wizard::fill(&mut self.company_number, "Company Number:", "Phone number recruiters can be reached on")?;
        wizard::fill(&mut self.company_name, "Company Name:", "As candidates should see it")?;
        wizard::fill(&mut self.company_email, "Company Email:", "Where applications are sent")?;
        wizard::fill(&mut self.company_website, "Company Website:", "https://...")?;
        wizard::fill(&mut self.country, "Country:", "Where the job is based")?;
        wizard::fill(&mut self.state, "State:", "Where the job is based")?;
        wizard::fill(&mut self.city, "City:", "Where the job is based")?;
        wizard::fill(&mut self.title, "Title:", "e.g. Backend Engineer")?;
        wizard::fill(&mut self.description, "Description:", "Responsibilities and requirements")?;
        wizard::fill_optional(&mut self.experience_level, "Experience Level:")?;
        wizard::fill_optional(&mut self.salary, "Expected Salary:")?;
        Ok(())
    }
}

pub async fn run_post_job(env: &Env, mut args: PostJobArgs) -> Result<()> {
    env.require_session()?;
    if args.needs_wizard() && wizard::can_use_wizard() {
        args.fill_with_wizard()?;
    }
    let posting = args.into_posting();
    let deps = env.deps();
    ui::with_spinner_async("Posting job", pages::post_job(&deps, &posting)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_args_skip_wizard() {
        let args = PostJobArgs {
            company_number: Some("555".into()),
            company_name: Some("Acme".into()),
            company_email: Some("jobs@acme.example".into()),
            company_website: Some("https://acme.example".into()),
            country: Some("NG".into()),
            state: Some("Lagos".into()),
            city: Some("Ikeja".into()),
            title: Some("Engineer".into()),
            description: Some("Build things".into()),
            ..Default::default()
        };
        assert!(!args.needs_wizard());
        let posting = args.into_posting();
        assert_eq!(posting.company_name, "Acme");
        assert_eq!(posting.expected_salary, None);
    }

    #[test]
    fn blank_required_field_needs_wizard() {
        let args = PostJobArgs {
            title: Some("   ".into()),
            ..Default::default()
        };
        assert!(args.needs_wizard());
    }
}

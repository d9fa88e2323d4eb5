//! Wizard Mode - interactive prompts for missing form fields
//!
//! When a form command is called without its required fields (e.g. `devjobs post-job`),
//! instead of erroring, we prompt for them with the `inquire` crate.
//!
//! # Example
//!
//! ```text
//! $ devjobs post-job --title "Rust Engineer"
//!
//! 🧙 Post a Job
//!
//! ? Company Name: Acme
//! ? Company Email: jobs@acme.example
//! ...
//! ```
//!
//! Fields passed as flags are never asked again. Validation happens in the
//! page after the wizard, so the messages match non-interactive use.

use anyhow::{Context, Result};
use devjobs_core::registration::{RegistrationDraft, Step};
use inquire::validator::Validation;
use inquire::{Password, PasswordDisplayMode, Select, Text};
use std::io::IsTerminal;

/// Check if we're in a context where wizard mode is available
/// (interactive TTY, not in JSON mode)
pub fn can_use_wizard() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal() && !crate::ui::is_json_mode()
}

/// Helper trait for wizard-capable arguments
pub trait WizardFillable {
    /// Check if required arguments are missing
    fn needs_wizard(&self) -> bool;

    /// Fill missing arguments interactively
    fn fill_with_wizard(&mut self) -> Result<()>;
}

/// Prompt only when the value is missing.
pub fn fill(slot: &mut Option<String>, label: &str, help: &str) -> Result<()> {
    if slot.as_deref().map_or(true, |v| v.trim().is_empty()) {
        let value = Text::new(label)
            .with_help_message(help)
            .prompt()
            .with_context(|| format!("Failed to get {}", label.trim_end_matches(':')))?;
        *slot = Some(value);
    }
    Ok(())
}

/// Like [`fill`], but an empty answer leaves the field unset.
pub fn fill_optional(slot: &mut Option<String>, label: &str) -> Result<()> {
    if slot.is_none() {
        let value = Text::new(label)
            .with_help_message("Press enter to skip")
            .prompt()
            .with_context(|| format!("Failed to get {}", label.trim_end_matches(':')))?;
        let value = value.trim();
        if !value.is_empty() {
            *slot = Some(value.to_string());
        }
    }
    Ok(())
}

pub fn fill_secret(slot: &mut Option<String>, label: &str) -> Result<()> {
    if slot.is_none() {
        let value = Password::new(label)
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .context("Failed to get password")?;
        *slot = Some(value);
    }
    Ok(())
}

fn text(label: &str, current: &str) -> Result<String> {
    let mut prompt = Text::new(label);
    if !current.is_empty() {
        prompt = prompt.with_default(current);
    }
    prompt
        .prompt()
        .with_context(|| format!("Failed to get {}", label.trim_end_matches(':')))
}

fn optional_text(label: &str, current: Option<&str>) -> Result<Option<String>> {
    let value = text(label, current.unwrap_or_default())?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

/// Blank skips the age; anything else must be a whole number.
fn parse_age(input: &str) -> std::result::Result<Option<u8>, &'static str> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse()
        .map(Some)
        .map_err(|_| "Age must be a whole number")
}

/// Re-asks until the answer parses.
fn age_prompt(current: Option<u8>) -> Result<Option<u8>> {
    let current = current.map(|a| a.to_string()).unwrap_or_default();
    let mut prompt = Text::new("Age:").with_validator(|input: &str| {
        Ok(match parse_age(input) {
            Ok(_) => Validation::Valid,
            Err(message) => Validation::Invalid(message.into()),
        })
    });
    if !current.is_empty() {
        prompt = prompt.with_default(&current);
    }
    let answer = prompt.prompt().context("Failed to get Age")?;
    Ok(parse_age(&answer).ok().flatten())
}

/// Collect the fields of one registration step into the draft.
pub fn registration_step(step: Step, draft: &mut RegistrationDraft) -> Result<()> {
    match step {
        Step::PersonalInfo => {
            draft.first_name = text("First Name:", &draft.first_name)?;
            draft.last_name = text("Last Name:", &draft.last_name)?;
            draft.age = age_prompt(draft.age)?;
            draft.gender = optional_text("Gender:", draft.gender.as_deref())?;
            draft.picture = optional_text("Picture (path):", draft.picture.as_deref())?;
        }
        Step::ContactInfo => {
            draft.email = text("Email:", &draft.email)?;
            draft.phone = optional_text("Phone Number:", draft.phone.as_deref())?;
            draft.country = text("Country:", &draft.country)?;
            draft.state = text("State:", &draft.state)?;
            draft.city = text("City:", &draft.city)?;
        }
        Step::StackInfo => {
            draft.stack = optional_text("Stack, Dev Role:", draft.stack.as_deref())?;
            draft.experience_level = text("Experience Level:", &draft.experience_level)?;
            draft.salary = optional_text("Salary/Pay Range:", draft.salary.as_deref())?;
        }
        Step::About => {
            draft.about = text("About Me:", &draft.about)?;
        }
        Step::ResumeUpload => {
            draft.cv = optional_text("Cv/Resume (path):", draft.cv.as_deref())?;
        }
        Step::Complete => {}
    }
    Ok(())
}

/// What to do after a registration step's fields are in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepChoice {
    Next,
    Back,
    Submit,
}

impl std::fmt::Display for StepChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StepChoice::Next => "Next",
            StepChoice::Back => "Back",
            StepChoice::Submit => "Submit",
        })
    }
}

/// The choices a step offers: no Back on the first, Submit on the last.
pub fn step_choices(step: Step) -> Vec<StepChoice> {
    let mut choices = Vec::new();
    if step == Step::ResumeUpload {
        choices.push(StepChoice::Submit);
    } else if step != Step::Complete {
        choices.push(StepChoice::Next);
    }
    if !matches!(step, Step::PersonalInfo | Step::Complete) {
        choices.push(StepChoice::Back);
    }
    choices
}

pub fn choose_step(step: Step) -> Result<StepChoice> {
    Select::new("Continue:", step_choices(step))
        .prompt()
        .context("Failed to get selection")
}

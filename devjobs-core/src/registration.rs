//! Job seeker registration wizard as an explicit state machine
//!
//! ```text
//! PersonalInfo ─Next─► ContactInfo ─Next─► StackInfo ─Next─► About ─Next─► ResumeUpload ─Submit─► Complete
//!      ◄─Back──────────────┘ ◄─Back───────────┘ ◄─Back──────────┘ ◄─Back─────────┘
//! ```
//!
//! Each `Next` advances exactly one step. Any event a step does not accept is
//! a [`TransitionError`] and leaves the machine where it was.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::validation::ProfileUpdate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    PersonalInfo,
    ContactInfo,
    StackInfo,
    About,
    ResumeUpload,
    Complete,
}

impl Step {
    /// The five input steps, in order.
    pub const INPUT: [Step; 5] = [
        Step::PersonalInfo,
        Step::ContactInfo,
        Step::StackInfo,
        Step::About,
        Step::ResumeUpload,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Step::PersonalInfo => "Personal Information",
            Step::ContactInfo => "Contact Information",
            Step::StackInfo => "Stack/Role Information",
            Step::About => "About Me",
            Step::ResumeUpload => "Cv/Resume",
            Step::Complete => "Registration Complete",
        }
    }

    /// 1-based position among the input steps; `None` once complete.
    pub fn number(self) -> Option<usize> {
        Self::INPUT.iter().position(|s| *s == self).map(|i| i + 1)
    }

    fn next(self) -> Option<Step> {
        match self {
            Step::PersonalInfo => Some(Step::ContactInfo),
            Step::ContactInfo => Some(Step::StackInfo),
            Step::StackInfo => Some(Step::About),
            Step::About => Some(Step::ResumeUpload),
            Step::ResumeUpload | Step::Complete => None,
        }
    }

    fn back(self) -> Option<Step> {
        match self {
            Step::PersonalInfo | Step::Complete => None,
            Step::ContactInfo => Some(Step::PersonalInfo),
            Step::StackInfo => Some(Step::ContactInfo),
            Step::About => Some(Step::StackInfo),
            Step::ResumeUpload => Some(Step::About),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Next,
    Back,
    Submit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot {event:?} from {from}")]
pub struct TransitionError {
    pub from: Step,
    pub event: Event,
}

/// Values collected across the steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationDraft {
    pub first_name: String,
    pub last_name: String,
    pub age: Option<u8>,
    pub gender: Option<String>,
    pub picture: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub country: String,
    pub state: String,
    pub city: String,
    pub stack: Option<String>,
    pub experience_level: String,
    pub salary: Option<String>,
    pub about: String,
    pub cv: Option<String>,
}

impl RegistrationDraft {
    /// The profile update submitted when the wizard completes.
    pub fn to_profile(&self) -> ProfileUpdate {
        ProfileUpdate {
            first_name: self.first_name.clone(),
            last_name: given(Some(&self.last_name)),
            email: self.email.clone(),
            country: self.country.clone(),
            state: self.state.clone(),
            city: self.city.clone(),
            about: self.about.clone(),
            experience_level: self.experience_level.clone(),
            salary: self.salary.clone(),
            age: self.age,
            gender: given(self.gender.as_ref()),
            phone_number: given(self.phone.as_ref()),
            stack_dev_role: given(self.stack.as_ref()),
            picture: given(self.picture.as_ref()),
            cv: given(self.cv.as_ref()),
        }
    }
}

fn given(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    step: Step,
    loading: bool,
    pub draft: RegistrationDraft,
}

impl Default for Registration {
    fn default() -> Self {
        Self::new()
    }
}

impl Registration {
    pub fn new() -> Self {
        Self {
            step: Step::PersonalInfo,
            loading: false,
            draft: RegistrationDraft::default(),
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn is_complete(&self) -> bool {
        self.step == Step::Complete
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// "Step N of 5", or the completion title.
    pub fn progress(&self) -> String {
        match self.step.number() {
            Some(n) => format!("Step {} of {}", n, Step::INPUT.len()),
            None => self.step.title().to_string(),
        }
    }

    pub fn apply(&mut self, event: Event) -> Result<Step, TransitionError> {
        let target = match event {
            Event::Next => self.step.next(),
            Event::Back => self.step.back(),
            Event::Submit if self.step == Step::ResumeUpload => Some(Step::Complete),
            Event::Submit => None,
        };
        let to = target.ok_or(TransitionError {
            from: self.step,
            event,
        })?;
        debug!(from = ?self.step, to = ?to, ?event, "registration transition");
        self.step = to;
        Ok(to)
    }
}

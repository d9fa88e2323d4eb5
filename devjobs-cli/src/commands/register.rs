//! `devjobs register` - the five-step job seeker registration wizard
//!
//! ```text
//! Step 1 of 5 - Personal Information
//! ? First Name: Ada
//! ...
//! ? Continue:  > Next
//!                Back
//! ```

use anyhow::{bail, Result};
use devjobs_core::registration::Step;
use devjobs_core::{DevJobsError, JobSeekerRegistration};

use super::Env;
use crate::ui;
use crate::wizard::{self, StepChoice};

pub async fn run_register(env: &Env) -> Result<()> {
    env.require_session()?;
    if !wizard::can_use_wizard() {
        bail!("register needs an interactive terminal; use `devjobs profile edit` instead");
    }

    let deps = env.deps();
    let mut flow = JobSeekerRegistration::new(&deps);
    println!("\n🧙 Job Seeker Registration");

    while flow.step() != Step::Complete {
        let step = flow.step();
        println!("\n{} - {}\n", flow.machine().progress(), step);
        wizard::registration_step(step, &mut flow.machine_mut().draft)?;

        match wizard::choose_step(step)? {
            StepChoice::Next => {
                flow.next()?;
            }
            StepChoice::Back => {
                flow.back()?;
            }
            StepChoice::Submit => match ui::with_spinner_async("Saving profile", flow.submit()).await {
                Ok(_) => {}
                Err(DevJobsError::Validation(errors)) => {
                    for error in errors.iter() {
                        eprintln!("✗ {}", error.message);
                    }
                }
                // already reported by the page; stay on this step to retry
                Err(DevJobsError::Fetch(_)) => {}
                Err(other) => return Err(other.into()),
            },
        }
    }

    println!("\n{}", Step::Complete);
    Ok(())
}

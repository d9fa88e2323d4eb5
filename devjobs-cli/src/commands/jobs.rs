//! `devjobs jobs` / `devjobs landing` - print the job listing
//!
//! ```bash
//! devjobs jobs                      # home page listing, spinner while loading
//! devjobs landing                   # same list, "Loading please wait" placeholder
//! devjobs jobs --json | jq '.[].title'
//! ```
//!
//! A failed fetch is reported as a notification and leaves the list empty;
//! the command still succeeds, as the page would keep rendering.

use anyhow::Result;
use clap::Parser;
use devjobs_core::view::{ListRegion, Placeholder};
use devjobs_core::{JobCard, JobListPage};
use tracing::debug;

use super::{print_json, Env};
use crate::ui;

#[derive(Parser, Debug)]
pub struct JobsArgs {
    /// Show at most this many jobs
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Load again after the first fetch settles ("See more jobs")
    #[arg(long)]
    pub refresh: bool,
}

/// Which page's loading placeholder to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobsPage {
    Home,
    Landing,
}

impl JobsPage {
    fn placeholder(self) -> Placeholder {
        match self {
            JobsPage::Home => Placeholder::Spinner,
            JobsPage::Landing => Placeholder::LANDING,
        }
    }
}

pub async fn run_jobs(env: &Env, which: JobsPage, args: JobsArgs) -> Result<()> {
    let deps = env.deps();
    let page = match which {
        JobsPage::Home => JobListPage::home(&deps),
        JobsPage::Landing => JobListPage::landing(&deps),
    };

    let pb = ui::placeholder(which.placeholder(), "jobs");
    let mut region = page.settled_view().await;
    if args.refresh {
        page.refresh();
        region = page.settled_view().await;
    }
    ui::finish_clear(pb);

    if ui::is_json_mode() {
        let mut jobs = page.jobs().into_vec();
        if let Some(limit) = args.limit {
            jobs.truncate(limit);
        }
        return print_json(&jobs);
    }

    let cards = visible_cards(&region, args.limit);
    debug!(shown = cards.len(), "rendering job cards");
    if cards.is_empty() {
        if !ui::is_quiet() {
            eprintln!("No jobs to show");
        }
        return Ok(());
    }
    for card in cards {
        println!("{}\n", card);
    }
    Ok(())
}

fn visible_cards(region: &ListRegion<JobCard>, limit: Option<usize>) -> Vec<&JobCard> {
    region
        .items()
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|keyed| &keyed.view)
        .collect()
}

//! Pure rendering of fetch state into view models
//!
//! Nothing here touches a terminal; front-ends turn [`ListRegion`] and the
//! card types into text or widgets.

use std::fmt;

use serde::Serialize;

use crate::fetch::FetchState;
use crate::models::{or_na, DashboardSummary, Identified, Job, Listing, NOT_AVAILABLE};

/// What a page shows in place of its list while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Spinner,
    Message(&'static str),
}

impl Placeholder {
    pub const LANDING: Placeholder = Placeholder::Message("Loading please wait");
}

/// An item view tagged with the identifier of the record it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<V> {
    pub key: String,
    pub view: V,
}

/// The list region of a page: either the placeholder or the item views.
#[derive(Debug, Clone, PartialEq)]
pub enum ListRegion<V> {
    Loading(Placeholder),
    Items(Vec<Keyed<V>>),
}

impl<V> ListRegion<V> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ListRegion::Loading(_))
    }

    /// Item views, empty while loading.
    pub fn items(&self) -> &[Keyed<V>] {
        match self {
            ListRegion::Loading(_) => &[],
            ListRegion::Items(items) => items,
        }
    }
}

/// Render a listing: placeholder while loading, otherwise one view per record.
///
/// The guard is on element count, so a placeholder payload and an empty
/// array both produce zero views.
pub fn render_list<T, V>(
    state: &FetchState<Listing<T>>,
    placeholder: Placeholder,
    item_view: impl Fn(&T) -> V,
) -> ListRegion<V>
where
    T: Identified,
{
    if state.is_loading() {
        return ListRegion::Loading(placeholder);
    }
    if state.items.is_empty() {
        return ListRegion::Items(Vec::new());
    }
    ListRegion::Items(
        state
            .items
            .iter()
            .map(|record| Keyed {
                key: record.key(),
                view: item_view(record),
            })
            .collect(),
    )
}

/// Display model for one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobCard {
    pub title: String,
    pub company: String,
    pub location: String,
    pub duration: String,
    pub experience_level: String,
    pub salary: String,
    pub applies: String,
    pub posted: String,
    pub details_url: Option<String>,
}

impl From<&Job> for JobCard {
    fn from(job: &Job) -> Self {
        Self {
            title: or_na(Some(&job.title)).to_string(),
            company: or_na(Some(&job.company_name)).to_string(),
            location: job.location().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            duration: or_na(job.duration.as_deref()).to_string(),
            experience_level: or_na(job.experience_level.as_deref()).to_string(),
            salary: or_na(job.salary.as_deref()).to_string(),
            applies: format!("{} applies", job.applications()),
            posted: job.posted(),
            details_url: job.url.clone(),
        }
    }
}

impl fmt::Display for JobCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "  Company : {}", self.company)?;
        writeln!(
            f,
            "  {} | {} | {} | {}",
            self.location, self.duration, self.experience_level, self.salary
        )?;
        write!(f, "  {} | Posted {}", self.applies, self.posted)?;
        if let Some(url) = &self.details_url {
            write!(f, "\n  See Full Details: {}", url)?;
        }
        Ok(())
    }
}

/// Render the standard job listing.
pub fn render_jobs(state: &FetchState<Listing<Job>>, placeholder: Placeholder) -> ListRegion<JobCard> {
    render_list(state, placeholder, |job| JobCard::from(job))
}

/// Employer dashboard counters, `N/A` where the backend sent nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardCounts {
    pub total_jobs_posted: String,
    pub active_jobs: String,
    pub expired_jobs: String,
}

impl From<&DashboardSummary> for DashboardCounts {
    fn from(summary: &DashboardSummary) -> Self {
        fn count(value: Option<usize>) -> String {
            value
                .map(|n| n.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        }
        Self {
            total_jobs_posted: count(summary.total_jobs_posted()),
            active_jobs: count(summary.active_jobs()),
            expired_jobs: count(summary.expired_jobs()),
        }
    }
}

impl fmt::Display for DashboardCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Jobs Posted {}", self.total_jobs_posted)?;
        writeln!(f, "  Active Job Posts   {}", self.active_jobs)?;
        write!(f, "  Expired Job Posts  {}", self.expired_jobs)
    }
}

/// The dashboard as a whole: the page swaps to a loader while fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardView {
    Loading,
    Ready(DashboardCounts),
}

pub fn render_dashboard(state: &FetchState<DashboardSummary>) -> DashboardView {
    if state.is_loading() {
        DashboardView::Loading
    } else {
        DashboardView::Ready(DashboardCounts::from(&state.items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jobs(value: serde_json::Value) -> Listing<Job> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn loading_shows_placeholder_only() {
        let state = FetchState::loading(jobs(json!([{"id": 1, "title": "Engineer"}])));
        let region = render_jobs(&state, Placeholder::Spinner);
        assert_eq!(region, ListRegion::Loading(Placeholder::Spinner));
        assert!(region.items().is_empty());
    }

    #[test]
    fn empty_object_and_empty_array_render_nothing() {
        for payload in [json!({}), json!([])] {
            let state = FetchState::loaded(jobs(payload));
            let region = render_jobs(&state, Placeholder::LANDING);
            assert!(!region.is_loading());
            assert!(region.items().is_empty());
        }
    }

    #[test]
    fn one_view_per_job_keyed_by_id() {
        let state = FetchState::loaded(jobs(json!([
            {"id": 1, "title": "Engineer", "company_name": "Acme", "users_applied": 3, "created_date": "2024-01-01"},
            {"pk": 2, "title": "Designer", "company_name": "Globex"}
        ])));
        let region = render_jobs(&state, Placeholder::Spinner);
        let keys: Vec<&str> = region.items().iter().map(|k| k.key.as_str()).collect();
        assert_eq!(keys, vec!["1", "2"]);

        let card = &region.items()[0].view;
        assert_eq!(card.title, "Engineer");
        assert_eq!(card.company, "Acme");
        assert_eq!(card.applies, "3 applies");
        assert_eq!(card.salary, NOT_AVAILABLE);
        assert_eq!(region.items()[1].view.applies, "0 applies");
    }

    #[test]
    fn card_text_lists_fallbacks() {
        let job: Job = serde_json::from_value(json!({
            "id": 5, "title": "Backend Dev", "company_name": "Initech",
            "city": "Lagos", "country": "Nigeria", "url": "https://jobs.example/5"
        }))
        .unwrap();
        let text = JobCard::from(&job).to_string();
        assert!(text.starts_with("Backend Dev\n"));
        assert!(text.contains("Company : Initech"));
        assert!(text.contains("Lagos, Nigeria | N/A | N/A | N/A"));
        assert!(text.contains("See Full Details: https://jobs.example/5"));
    }

    #[test]
    fn dashboard_counts() {
        let summary: DashboardSummary = serde_json::from_value(json!({
            "total_jobs_posted": [1, 2, 3],
            "active_jobs": [1]
        }))
        .unwrap();
        let view = render_dashboard(&FetchState::loaded(summary));
        let DashboardView::Ready(counts) = view else {
            panic!("expected ready dashboard");
        };
        assert_eq!(counts.total_jobs_posted, "3");
        assert_eq!(counts.active_jobs, "1");
        assert_eq!(counts.expired_jobs, NOT_AVAILABLE);

        let loading = render_dashboard(&FetchState::loading(DashboardSummary::default()));
        assert_eq!(loading, DashboardView::Loading);
    }
}

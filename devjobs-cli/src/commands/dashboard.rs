//! `devjobs dashboard` - employer job counters

use anyhow::Result;
use devjobs_core::view::{DashboardCounts, DashboardView};
use devjobs_core::EmployerDashboard;

use super::{print_json, Env};
use crate::ui;

pub async fn run_dashboard(env: &Env) -> Result<()> {
    env.require_session()?;
    let deps = env.deps();
    let dashboard = EmployerDashboard::mount(&deps);

    let pb = ui::spinner("Loading dashboard");
    let view = dashboard.settled_view().await;
    ui::finish_clear(pb);

    let counts = match view {
        DashboardView::Ready(counts) => counts,
        // settled() only returns once nothing is in flight
        DashboardView::Loading => DashboardCounts::from(&dashboard.state().items),
    };

    if ui::is_json_mode() {
        return print_json(&counts);
    }
    println!("{}", counts);
    Ok(())
}

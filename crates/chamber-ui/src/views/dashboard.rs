use chamber_core::board::Lane;
use chamber_core::dashboard::DashboardSummary;
use chrono::Utc;
use yew::{
  Html,
  function_component,
  html,
  use_context
};

use super::render_snapshot;
use crate::app::AppContext;
use crate::components::{
  CalendarItemCard,
  EmptyView,
  StatCard
};

const UPCOMING_LIMIT: usize = 5;
const DUE_SOON_DAYS: i64 = 7;

#[function_component(DashboardView)]
pub fn dashboard_view() -> Html {
  let context = use_context::<AppContext>();
  let greeting = context
    .as_ref()
    .and_then(|ctx| ctx.session.as_ref())
    .map(|session| {
      format!("Welcome back, {}", session.name)
    })
    .unwrap_or_else(|| {
      "Welcome".to_string()
    });

  render_snapshot(context.as_ref(), |snapshot| {
    let summary = DashboardSummary::build(
      snapshot,
      Utc::now(),
      UPCOMING_LIMIT,
      DUE_SOON_DAYS
    );
    let in_progress = summary
      .tasks_per_lane
      .get(&Lane::InProgress)
      .copied()
      .unwrap_or(0);

    html! {
        <section class="view dashboard">
            <h1>{ greeting }</h1>
            <div class="stat-grid">
                <StatCard label="Meetings" value={summary.meetings} />
                <StatCard label="Events" value={summary.events} />
                <StatCard label="Projects" value={summary.projects} />
                <StatCard label="Open tasks" value={summary.open_tasks()} />
                <StatCard label="In progress" value={in_progress} />
                <StatCard label="Overdue" value={summary.overdue_tasks} tone={Some("danger")} />
                <StatCard label="Due this week" value={summary.due_soon_tasks} tone={Some("warning")} />
            </div>
            <h2>{ "Coming up" }</h2>
            {
                if summary.upcoming.is_empty() {
                    html! { <EmptyView message="Nothing scheduled." /> }
                } else {
                    html! {
                        <div class="calendar-list">
                            {
                                for summary.upcoming.iter().cloned().map(|item| {
                                    html! { <CalendarItemCard key={item.id.clone()} {item} /> }
                                })
                            }
                        </div>
                    }
                }
            }
        </section>
    }
  })
}

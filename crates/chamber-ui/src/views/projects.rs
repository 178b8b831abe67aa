use chamber_core::board::Lane;
use chamber_core::calendar::CalendarTime;
use yew::{
  Html,
  function_component,
  html,
  use_context
};

use super::render_snapshot;
use crate::app::AppContext;
use crate::components::{
  EmptyView,
  format_calendar_time
};

#[function_component(ProjectsView)]
pub fn projects_view() -> Html {
  let context = use_context::<AppContext>();

  render_snapshot(context.as_ref(), |snapshot| {
    if snapshot.projects.is_empty() {
      return html! {
          <section class="view projects">
              <h1>{ "Projects" }</h1>
              <EmptyView message="No projects yet." />
          </section>
      };
    }

    html! {
        <section class="view projects">
            <h1>{ "Projects" }</h1>
            <div class="card-list">
                {
                    for snapshot.projects.iter().map(|project| {
                        let tasks = snapshot.tasks_for_project(&project.id);
                        let done = tasks.iter().filter(|task| task.status == Lane::Done).count();
                        let span = format!(
                            "{} – {}",
                            format_calendar_time(&CalendarTime::from_value(&project.start_date), true),
                            format_calendar_time(&CalendarTime::from_value(&project.end_date), true),
                        );
                        html! {
                            <div class="card project-card" key={project.id.to_string()}>
                                <div class="card-title">
                                    { project.title.clone().unwrap_or_else(|| "Untitled project".to_string()) }
                                </div>
                                <div class="card-meta">{ span }</div>
                                {
                                    if let Some(status) = project.status.clone() {
                                        html! { <span class="badge">{ status }</span> }
                                    } else {
                                        html! {}
                                    }
                                }
                                <div class="card-meta">{ format!("{done}/{} tasks done", tasks.len()) }</div>
                            </div>
                        }
                    })
                }
            </div>
        </section>
    }
  })
}

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::colors::{status_line, STARTED};
use crate::domain::models::BuildEvent;

/// Print build lifecycle events until every sender is dropped.
pub fn spawn_event_printer(mut events: mpsc::Receiver<BuildEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            eprintln!("{}", render_event(&event));
        }
    })
}

fn render_event(event: &BuildEvent) -> String {
    match event {
        BuildEvent::Started { build_id, .. } => status_line(build_id, STARTED),
        BuildEvent::StatusObserved { build_id, status } => status_line(build_id, status.as_str()),
        BuildEvent::Vanished { build_id } => status_line(build_id, "NOT_FOUND"),
    }
}

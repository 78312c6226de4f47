//! String-error command surface consumed by the view layer.

use std::path::PathBuf;

use crate::{
    charts::{self, ChartSeries},
    models::{SelectedFile, SummaryPayload},
    workflow::{WorkflowController, WorkflowEvent, WorkflowSnapshot},
    AppState,
};

fn controller_from_state(state: &AppState) -> WorkflowController {
    state.workflow.clone()
}

pub async fn get_workflow_state(state: &AppState) -> Result<WorkflowSnapshot, String> {
    let controller = controller_from_state(state);
    Ok(controller.current_state().await)
}

pub async fn select_file(state: &AppState, path: PathBuf) -> Result<WorkflowSnapshot, String> {
    let controller = controller_from_state(state);
    controller
        .dispatch(WorkflowEvent::FileSelected(SelectedFile::new(path)))
        .await
        .map_err(|e| e.to_string())
}

pub async fn upload_selected(state: &AppState) -> Result<WorkflowSnapshot, String> {
    let controller = controller_from_state(state);
    controller
        .dispatch(WorkflowEvent::UploadRequested)
        .await
        .map_err(|e| e.to_string())
}

pub async fn dismiss_error(state: &AppState) -> Result<WorkflowSnapshot, String> {
    let controller = controller_from_state(state);
    controller
        .dispatch(WorkflowEvent::ErrorDismissed)
        .await
        .map_err(|e| e.to_string())
}

pub async fn refresh_history(state: &AppState) -> Result<Vec<SummaryPayload>, String> {
    let controller = controller_from_state(state);
    let snapshot = controller
        .dispatch(WorkflowEvent::HistoryRequested)
        .await
        .map_err(|e| e.to_string())?;
    Ok(snapshot.history)
}

pub async fn open_report(state: &AppState) -> Result<(), String> {
    let controller = controller_from_state(state);
    controller
        .dispatch(WorkflowEvent::ReportRequested)
        .await
        .map(|_| ())
        .map_err(|e| e.to_string())
}

pub async fn save_report(state: &AppState, dest: PathBuf) -> Result<usize, String> {
    let controller = controller_from_state(state);
    controller
        .save_report(&dest)
        .await
        .map_err(|e| e.to_string())
}

pub async fn get_type_distribution_chart(state: &AppState) -> Result<Option<ChartSeries>, String> {
    let snapshot = get_workflow_state(state).await?;
    Ok(charts::project_type_distribution(snapshot.summary.as_ref()))
}

pub async fn get_averages_chart(state: &AppState) -> Result<Option<ChartSeries>, String> {
    let snapshot = get_workflow_state(state).await?;
    Ok(charts::project_averages(snapshot.summary.as_ref()))
}

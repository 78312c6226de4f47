use std::{path::Path, sync::Arc};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::Serialize;
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    api::{normalize_error, AnalysisApi, ReportLauncher},
    history::HistoryCache,
    models::{SelectedFile, SummaryPayload},
};

use super::{UploadStart, UploadState, WorkflowState};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    FileSelected(SelectedFile),
    UploadRequested,
    ErrorDismissed,
    ReportRequested,
    HistoryRequested,
}

/// Everything the view needs to draw one frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSnapshot {
    pub state: UploadState,
    pub selected_file: Option<String>,
    pub can_upload: bool,
    pub show_spinner: bool,
    pub error_banner: Option<String>,
    pub summary: Option<SummaryPayload>,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub history: Vec<SummaryPayload>,
    pub history_notice: Option<String>,
    pub history_refreshed_at: Option<DateTime<Utc>>,
}

impl WorkflowSnapshot {
    fn capture(state: &WorkflowState, history: &HistoryCache) -> Self {
        let uploading = state.is_uploading();
        let history = history.snapshot();
        Self {
            state: state.upload.clone(),
            selected_file: state
                .selected_file
                .as_ref()
                .map(|file| file.file_name().to_string()),
            can_upload: !uploading,
            show_spinner: uploading,
            error_banner: state.error_message().map(str::to_string),
            summary: state.summary().cloned(),
            uploaded_at: state.uploaded_at,
            history: history.entries,
            history_notice: history.notice,
            history_refreshed_at: history.refreshed_at,
        }
    }
}

/// Drives upload, history and report actions for one view.
///
/// State is only locked between network calls, never across them, so a
/// second trigger always sees `Uploading` while the first is in flight.
#[derive(Clone)]
pub struct WorkflowController {
    state: Arc<Mutex<WorkflowState>>,
    history: HistoryCache,
    api: Arc<dyn AnalysisApi>,
    launcher: Arc<dyn ReportLauncher>,
    snapshots: Arc<watch::Sender<WorkflowSnapshot>>,
    startup: Arc<Mutex<Option<JoinHandle<()>>>>,
    shutdown: CancellationToken,
}

impl WorkflowController {
    pub fn new(api: Arc<dyn AnalysisApi>, launcher: Arc<dyn ReportLauncher>) -> Self {
        let state = WorkflowState::new();
        let history = HistoryCache::new();
        let (snapshots, _) = watch::channel(WorkflowSnapshot::capture(&state, &history));

        Self {
            state: Arc::new(Mutex::new(state)),
            history,
            api,
            launcher,
            snapshots: Arc::new(snapshots),
            startup: Arc::new(Mutex::new(None)),
            shutdown: CancellationToken::new(),
        }
    }

    /// Kicks off the initial history fetch in the background. File selection
    /// and uploads do not wait for it.
    pub async fn start(&self) {
        let controller = self.clone();
        let handle = tokio::spawn(async move {
            controller.refresh_history().await;
            controller.emit_state_changed().await;
        });

        let mut startup = self.startup.lock().await;
        if let Some(previous) = startup.replace(handle) {
            log_debug!(
                "Startup history fetch restarted (previous finished: {})",
                previous.is_finished()
            );
        }
    }

    /// Waits for the fetch spawned by [`start`](Self::start), if any.
    pub async fn startup_complete(&self) {
        let handle = self.startup.lock().await.take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                log_error!("Startup history fetch task failed: {err}");
            }
        }
    }

    /// Marks the controller as torn down. Requests already in flight finish,
    /// but their results are dropped instead of applied.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
        log_info!("Workflow controller shut down");
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn history(&self) -> &HistoryCache {
        &self.history
    }

    pub fn report_url(&self) -> Url {
        self.api.report_url()
    }

    pub async fn current_state(&self) -> WorkflowSnapshot {
        let state = self.state.lock().await;
        WorkflowSnapshot::capture(&state, &self.history)
    }

    /// Applies one event and returns the resulting snapshot. Only a failure
    /// to launch the report viewer is returned as an error; every other
    /// failure ends up in the snapshot.
    pub async fn dispatch(&self, event: WorkflowEvent) -> Result<WorkflowSnapshot> {
        match event {
            WorkflowEvent::FileSelected(file) => {
                log_info!("Selected {}", file.path().display());
                self.state.lock().await.select_file(file);
            }
            WorkflowEvent::UploadRequested => self.upload().await,
            WorkflowEvent::ErrorDismissed => {
                self.state.lock().await.dismiss_error();
            }
            WorkflowEvent::ReportRequested => {
                let url = self.api.report_url();
                log_info!("Opening report at {url}");
                self.launcher.launch(&url)?;
            }
            WorkflowEvent::HistoryRequested => self.refresh_history().await,
        }

        self.emit_state_changed().await;
        Ok(self.current_state().await)
    }

    /// Downloads the PDF report to `dest`, returning the number of bytes written.
    pub async fn save_report(&self, dest: &Path) -> Result<usize> {
        let bytes = self
            .api
            .download_report()
            .await
            .map_err(|err| anyhow!(normalize_error(&err)))?;

        tokio::fs::write(dest, &bytes)
            .await
            .with_context(|| format!("Failed to write report to {}", dest.display()))?;

        log_info!("Saved report ({} bytes) to {}", bytes.len(), dest.display());
        Ok(bytes.len())
    }

    async fn upload(&self) {
        let attempt_id = Uuid::new_v4().to_string();
        let start = self.state.lock().await.begin_upload(attempt_id.clone());

        let file = match start {
            UploadStart::Ignored => {
                log_debug!("Upload already in flight; ignoring trigger");
                return;
            }
            UploadStart::MissingFile => {
                log_warn!("Upload requested without a selected file");
                return;
            }
            UploadStart::Started(file) => file,
        };

        self.emit_state_changed().await;
        log_info!("Upload {} started for {}", attempt_id, file.file_name());

        let result = self.api.upload(Some(&file)).await;
        if self.shutdown.is_cancelled() {
            log_debug!("Dropping result of upload {attempt_id} after shutdown");
            return;
        }

        match result {
            Ok(summary) => {
                log_info!(
                    "Upload {} analysed {} records",
                    attempt_id,
                    summary.total_count
                );
                self.state.lock().await.complete(summary, Utc::now());
                self.emit_state_changed().await;
                self.refresh_history().await;
            }
            Err(err) => {
                let message = normalize_error(&err);
                log_warn!("Upload {attempt_id} failed: {err} (shown as '{message}')");
                self.state.lock().await.fail(message);
            }
        }
    }

    async fn refresh_history(&self) {
        let result = self.api.fetch_history().await;
        if self.shutdown.is_cancelled() {
            log_debug!("Dropping history fetched after shutdown");
            return;
        }

        match self.history.apply(result) {
            Ok(count) => {
                log_info!("History refreshed with {count} entries");
            }
            Err(err) => {
                log_warn!("History refresh failed: {err}");
            }
        }
    }

    async fn emit_state_changed(&self) {
        let snapshot = self.current_state().await;
        // Never fails, even when every subscriber is gone.
        self.snapshots.send_replace(snapshot);
    }
}

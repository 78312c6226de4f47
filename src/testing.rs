//! In-memory doubles for the service seams, shared by unit tests.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde_json::Value;
use tokio::sync::Notify;

use crate::{
    api::{AnalysisApi, ApiError, ReportLauncher},
    models::{SelectedFile, SummaryPayload},
};

type Scripted = Result<SummaryPayload, (StatusCode, Value)>;

#[derive(Default)]
struct FakeServer {
    history: Vec<SummaryPayload>,
    history_failure: Option<(StatusCode, Value)>,
    history_body: Option<Value>,
    uploads: VecDeque<Scripted>,
    uploaded_files: Vec<String>,
}

/// Behaves like the analysis service: successful uploads are prepended to
/// the served history, which is capped at five entries.
#[derive(Default)]
pub(crate) struct FakeApi {
    server: Mutex<FakeServer>,
    upload_gate: Option<Arc<Notify>>,
    history_gate: Option<Arc<Notify>>,
    upload_calls: AtomicUsize,
    history_calls: AtomicUsize,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Uploads wait on `gate` before answering.
    pub(crate) fn gated(gate: Arc<Notify>) -> Self {
        Self {
            upload_gate: Some(gate),
            ..Self::default()
        }
    }

    /// History fetches wait on `gate` before answering.
    pub(crate) fn with_history_gate(gate: Arc<Notify>) -> Self {
        Self {
            history_gate: Some(gate),
            ..Self::default()
        }
    }

    pub(crate) fn seed_history(&self, entries: Vec<SummaryPayload>) {
        let mut server = self.server.lock().unwrap();
        server.history = entries;
        server.history_failure = None;
        server.history_body = None;
    }

    /// Serve `body` verbatim from the history endpoint.
    pub(crate) fn serve_history_body(&self, body: Value) {
        self.server.lock().unwrap().history_body = Some(body);
    }

    pub(crate) fn fail_history(&self, status: StatusCode, body: Value) {
        self.server.lock().unwrap().history_failure = Some((status, body));
    }

    pub(crate) fn push_upload(&self, summary: SummaryPayload) {
        self.server.lock().unwrap().uploads.push_back(Ok(summary));
    }

    pub(crate) fn push_upload_failure(&self, status: StatusCode, body: Value) {
        self.server
            .lock()
            .unwrap()
            .uploads
            .push_back(Err((status, body)));
    }

    pub(crate) fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn uploaded_files(&self) -> Vec<String> {
        self.server.lock().unwrap().uploaded_files.clone()
    }
}

#[async_trait]
impl AnalysisApi for FakeApi {
    async fn fetch_history(&self) -> Result<Vec<SummaryPayload>, ApiError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.history_gate {
            gate.notified().await;
        }

        let server = self.server.lock().unwrap();
        if let Some((status, body)) = &server.history_failure {
            return Err(ApiError::Server {
                status: *status,
                body: Some(body.clone()),
            });
        }
        if let Some(body) = &server.history_body {
            return Ok(crate::api::decode_history(body.clone()));
        }
        Ok(server.history.clone())
    }

    async fn upload(&self, file: Option<&SelectedFile>) -> Result<SummaryPayload, ApiError> {
        let file = file.ok_or_else(ApiError::missing_file)?;
        self.upload_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.upload_gate {
            gate.notified().await;
        }

        let mut server = self.server.lock().unwrap();
        server.uploaded_files.push(file.file_name().to_string());
        let scripted = server.uploads.pop_front().unwrap_or_else(|| {
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Value::String(String::new()),
            ))
        });

        match scripted {
            Ok(summary) => {
                server.history.insert(0, summary.clone());
                server.history.truncate(5);
                Ok(summary)
            }
            Err((status, body)) => Err(ApiError::Server {
                status,
                body: Some(body),
            }),
        }
    }

    fn report_url(&self) -> Url {
        Url::parse("http://127.0.0.1:8000/api/report/").unwrap()
    }

    async fn download_report(&self) -> Result<Vec<u8>, ApiError> {
        Ok(b"%PDF-1.4\n%fake\n".to_vec())
    }
}

#[derive(Default)]
pub(crate) struct RecordingLauncher {
    launched: Mutex<Vec<Url>>,
    fail: bool,
}

impl RecordingLauncher {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn launched(&self) -> Vec<Url> {
        self.launched.lock().unwrap().clone()
    }
}

impl ReportLauncher for RecordingLauncher {
    fn launch(&self, url: &Url) -> Result<()> {
        if self.fail {
            return Err(anyhow!("no browser available"));
        }
        self.launched.lock().unwrap().push(url.clone());
        Ok(())
    }
}

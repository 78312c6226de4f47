use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    api::MISSING_FILE_MESSAGE,
    models::{SelectedFile, SummaryPayload},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "camelCase")]
pub enum UploadState {
    #[default]
    Idle,
    Uploading,
    Success(SummaryPayload),
    Failed(String),
}

/// Outcome of an upload trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadStart {
    /// An upload is already in flight.
    Ignored,
    /// No file selected; the state is now `Failed`.
    MissingFile,
    Started(SelectedFile),
}

#[derive(Debug, Clone, Default)]
pub struct WorkflowState {
    pub upload: UploadState,
    pub selected_file: Option<SelectedFile>,
    /// Payload of the latest successful upload. Survives later failures so
    /// dismissing an error returns to it.
    pub last_summary: Option<SummaryPayload>,
    pub attempt_id: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_uploading(&self) -> bool {
        self.upload == UploadState::Uploading
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        self.selected_file = Some(file);
    }

    pub fn begin_upload(&mut self, attempt_id: String) -> UploadStart {
        if self.is_uploading() {
            return UploadStart::Ignored;
        }

        match self.selected_file.clone() {
            None => {
                self.upload = UploadState::Failed(MISSING_FILE_MESSAGE.to_string());
                UploadStart::MissingFile
            }
            Some(file) => {
                self.upload = UploadState::Uploading;
                self.attempt_id = Some(attempt_id);
                UploadStart::Started(file)
            }
        }
    }

    /// Overwrites any earlier payload.
    pub fn complete(&mut self, summary: SummaryPayload, at: DateTime<Utc>) {
        self.last_summary = Some(summary.clone());
        self.upload = UploadState::Success(summary);
        self.uploaded_at = Some(at);
    }

    pub fn fail(&mut self, message: String) {
        self.upload = UploadState::Failed(message);
    }

    pub fn dismiss_error(&mut self) {
        if let UploadState::Failed(_) = self.upload {
            self.upload = match &self.last_summary {
                Some(summary) => UploadState::Success(summary.clone()),
                None => UploadState::Idle,
            };
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.upload {
            UploadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Summary the view should show: the latest successful one, if any.
    pub fn summary(&self) -> Option<&SummaryPayload> {
        self.last_summary.as_ref()
    }
}

pub mod commands;
pub mod controller;
pub mod state;

pub use controller::{WorkflowController, WorkflowEvent, WorkflowSnapshot};
pub use state::{UploadStart, UploadState, WorkflowState};

pub mod client;
pub mod error;
pub mod normalize;
pub mod report;

pub use client::{decode_history, AnalysisApi, AnalysisClient};
pub use error::{ApiError, MISSING_FILE_MESSAGE};
pub use normalize::{normalize_error, FALLBACK_MESSAGE};
pub use report::{ReportLauncher, SystemLauncher};

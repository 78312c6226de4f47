pub mod selected_file;
pub mod summary;

pub use selected_file::SelectedFile;
pub use summary::{get_ignore_case, Averages, SummaryPayload, TypeCounts};

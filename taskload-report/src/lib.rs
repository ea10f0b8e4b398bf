pub mod summary;
pub mod writer;

pub use summary::RunSummary;
pub use writer::{ReportError, ResultWriter, CSV_HEADERS};

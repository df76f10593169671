pub mod extractor;
pub mod metrics;
pub mod providers;
pub mod uploads;

pub use extractor::{extract, extract_text, Extraction};
pub use metrics::{get_metrics, init_metrics, record_generation};
pub use uploads::{MediaForm, UploadError, UploadStore, UploadedFile};

//! Gallery of AI-generated product photos.
pub mod journal;
pub mod record;
pub mod store;

pub use journal::{ImageJournal, JOURNAL_CAPACITY};
pub use record::{GeneratedImageRecord, NewImage};
pub use store::{is_image_file_name, GeneratedImageStore, JOURNAL_FILE, STAGING_DIR};

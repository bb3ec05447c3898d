pub mod api_key;
pub mod record_id;

pub use api_key::{ApiKey, ApiKeyOutcome};
pub use record_id::RecordId;

//! Export serializers for activity-log slices.
//!
//! Pure functions from a slice of log entries to JSON or CSV text; callers
//! own filtering and output. Nested fields (details, metadata, tags) are
//! embedded into CSV cells as JSON strings with standard quote escaping.

mod csv;
mod json;

pub use csv::logs_to_csv;
pub use json::logs_to_json;

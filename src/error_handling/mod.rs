//! Error taxonomy for the monitoring and analytics core.

mod types;

pub use types::{FetchError, MonitorError, StoreError, TlsError};

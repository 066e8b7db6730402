//! Error type definitions.
//!
//! Failure modes split into four families:
//!
//! - [`FetchError`]: the target could not be fetched over HTTP. Non-fatal for
//!   availability checks (the site is recorded as down); fatal for checks
//!   that need the page body.
//! - [`TlsError`]: the TLS inspector could not reach the host at all.
//!   Handshake failures are NOT errors; they produce an invalid-certificate
//!   result instead.
//! - [`StoreError`]: persistence-layer failures.
//! - [`MonitorError`]: the umbrella the check entry points return. Only
//!   `SiteNotFound` is unconditionally fatal to a composite check.

use thiserror::Error;

/// Error fetching a target URL.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request did not complete within the per-check timeout.
    #[error("request timed out for {url}")]
    Timeout {
        /// The URL that was attempted.
        url: String,
    },

    /// The request failed before or during transfer.
    #[error("request failed for {url}: {source}")]
    Request {
        /// The URL that was attempted.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// The URL the failed fetch was aimed at.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Timeout { url } | FetchError::Request { url, .. } => url,
        }
    }
}

/// Error reaching a host for TLS inspection.
///
/// These represent true network/DNS failures that propagate to the caller;
/// a completed-but-failed handshake is reported as an invalid certificate
/// result, not an error.
#[derive(Error, Debug)]
pub enum TlsError {
    /// The hostname is not a valid TLS server name.
    #[error("invalid server name: {host}")]
    InvalidHost {
        /// The offending hostname.
        host: String,
    },

    /// TCP connection to port 443 failed.
    #[error("failed to connect to {host}:443: {source}")]
    Connect {
        /// Target hostname.
        host: String,
        /// Underlying socket error.
        #[source]
        source: std::io::Error,
    },

    /// The connection or handshake did not complete in time.
    #[error("TLS inspection timed out for {host}")]
    Timeout {
        /// Target hostname.
        host: String,
    },
}

/// Error from the persistence layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQL execution error.
    #[error("database error: {0}")]
    Sql(#[from] sqlx::Error),

    /// A stored JSON column could not be encoded or decoded.
    #[error("stored JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Umbrella error for check entry points.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// The requested site does not exist. The only failure that aborts a
    /// composite check.
    #[error("site not found: {0}")]
    SiteNotFound(String),

    /// The target could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The target host could not be reached for TLS inspection.
    #[error(transparent)]
    Tls(#[from] TlsError),

    /// Persistence failed while resolving required data.
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_carries_url() {
        let err = FetchError::Timeout {
            url: "https://example.com".into(),
        };
        assert_eq!(err.url(), "https://example.com");
        assert!(err.to_string().contains("example.com"));
    }

    #[test]
    fn site_not_found_message() {
        let err = MonitorError::SiteNotFound("abc".into());
        assert_eq!(err.to_string(), "site not found: abc");
    }

    #[test]
    fn store_error_wraps_sqlx() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(err.to_string().starts_with("database error"));
    }
}

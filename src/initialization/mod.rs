//! Application initialization.
//!
//! Logger setup and the process-wide TLS crypto provider. The HTTP client
//! lives with [`crate::fetch::Fetcher`]; stores are built from
//! [`crate::storage`].

use std::io::Write;

use log::LevelFilter;

use crate::config::LogFormat;

/// Initializes the logger with the specified level and format.
///
/// Reads `RUST_LOG` first, then applies the explicit level on top, so
/// `RUST_LOG=debug` works for quick debugging while the CLI flag stays
/// authoritative.
///
/// # Errors
///
/// Returns a `log::SetLoggerError` if a logger is already installed.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    builder.filter_module("html5ever", LevelFilter::Error);
    builder.filter_module("selectors", LevelFilter::Warn);
    builder.filter_module("sqlx", LevelFilter::Info);
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.filter_module("rustls", LevelFilter::Info);
    builder.filter_module("sitesentry", level);

    if let LogFormat::Json = format {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
                chrono::Utc::now().timestamp_millis(),
                record.level(),
                record.target(),
                serde_json::to_string(&record.args().to_string())
                    .unwrap_or_else(|_| "\"\"".into())
            )
        });
    }

    // try_init instead of init so tests can initialize repeatedly.
    builder.try_init()
}

/// Installs the process-wide crypto provider for `rustls`.
///
/// Must run before the first TLS inspection. Reinstalling is harmless, so
/// the result is ignored.
pub fn init_crypto_provider() {
    let _ = rustls::crypto::CryptoProvider::install_default(
        rustls::crypto::ring::default_provider(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logger_does_not_panic() {
        // Only the first initialization in the process can succeed; the
        // point is that repeated calls fail gracefully.
        let _ = init_logger_with(LevelFilter::Info, LogFormat::Plain);
        let _ = init_logger_with(LevelFilter::Debug, LogFormat::Json);
    }

    #[test]
    fn crypto_provider_is_idempotent() {
        init_crypto_provider();
        init_crypto_provider();
    }
}

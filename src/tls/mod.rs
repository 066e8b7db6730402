//! TLS certificate inspection.
//!
//! Connects to a host on :443 and extracts peer certificate details:
//! - Subject and issuer
//! - Validity period and days until expiry
//! - SHA-256 fingerprint and serial number
//!
//! Uses `tokio-rustls` for the async handshake and `x509-parser` for
//! certificate parsing. Chains are accepted without verification — validity
//! here means "not expired", never "trusted".

mod verifier;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use rustls::pki_types::ServerName;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::net::TcpStream;
use tokio_rustls::rustls::ClientConfig;
use tokio_rustls::TlsConnector;
use x509_parser::prelude::*;

use crate::config::{TCP_CONNECT_TIMEOUT_SECS, TLS_HANDSHAKE_TIMEOUT_SECS};
use crate::error_handling::TlsError;
use crate::models::Severity;
use verifier::AcceptAnyCertificate;

/// Fields extracted from a successfully inspected certificate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SslInfo {
    /// Always `true`; kept in the payload so stored results are
    /// self-describing alongside the invalid shape.
    pub valid: bool,
    /// Certificate issuer distinguished name.
    pub issuer: String,
    /// Certificate subject distinguished name.
    pub subject: String,
    /// Start of the validity window.
    pub valid_from: DateTime<Utc>,
    /// End of the validity window.
    pub valid_to: DateTime<Utc>,
    /// Whole days until expiry; negative once expired.
    pub days_remaining: i64,
    /// SHA-256 fingerprint of the DER encoding, colon-separated hex.
    pub fingerprint: String,
    /// Certificate serial number, colon-separated hex.
    pub serial_number: String,
}

/// Result of a TLS inspection: either extracted certificate fields or a
/// non-fatal explanation of why none could be obtained.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SslCheck {
    /// Certificate fields were extracted.
    Valid(SslInfo),
    /// The handshake completed without a usable certificate, or the target
    /// does not speak HTTPS.
    Invalid {
        /// Always `false`.
        valid: bool,
        /// Why no certificate information is available.
        message: String,
    },
}

impl SslCheck {
    /// Builds the invalid shape with an explanation.
    pub fn invalid(message: impl Into<String>) -> Self {
        SslCheck::Invalid {
            valid: false,
            message: message.into(),
        }
    }

    /// Whether certificate fields were extracted.
    pub fn is_valid(&self) -> bool {
        matches!(self, SslCheck::Valid(_))
    }

    /// Extracted fields, when present.
    pub fn info(&self) -> Option<&SslInfo> {
        match self {
            SslCheck::Valid(info) => Some(info),
            SslCheck::Invalid { .. } => None,
        }
    }

    /// Days until expiry, when known.
    pub fn days_remaining(&self) -> Option<i64> {
        self.info().map(|i| i.days_remaining)
    }
}

/// Classifies certificate expiry into an alert severity.
///
/// Under 7 days remaining is high, under 30 is medium, anything else low.
pub fn expiry_severity(days_remaining: i64) -> Severity {
    if days_remaining < crate::config::SSL_EXPIRY_CRITICAL_DAYS {
        Severity::High
    } else if days_remaining < crate::config::SSL_EXPIRY_WARN_DAYS {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Connects to `host:443` and inspects the presented certificate.
///
/// # Errors
///
/// Returns [`TlsError`] only for true reachability failures (invalid server
/// name, TCP connect failure, timeout). A completed-but-rejected handshake
/// and a missing peer certificate both produce `Ok(SslCheck::Invalid)`.
pub async fn inspect_certificate(host: &str) -> Result<SslCheck, TlsError> {
    debug!("Inspecting TLS certificate for {host}");

    let server_name =
        ServerName::try_from(host.to_string()).map_err(|_| TlsError::InvalidHost {
            host: host.to_string(),
        })?;

    let sock = match tokio::time::timeout(
        std::time::Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
        TcpStream::connect((host, 443)),
    )
    .await
    {
        Ok(Ok(sock)) => sock,
        Ok(Err(e)) => {
            return Err(TlsError::Connect {
                host: host.to_string(),
                source: e,
            })
        }
        Err(_) => {
            return Err(TlsError::Timeout {
                host: host.to_string(),
            })
        }
    };

    let config = ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate))
        .with_no_client_auth();
    let connector = TlsConnector::from(Arc::new(config));

    let tls_stream = match tokio::time::timeout(
        std::time::Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
        connector.connect(server_name, sock),
    )
    .await
    {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            warn!("TLS handshake failed for {host}: {e}");
            return Ok(SslCheck::invalid(format!("TLS handshake failed: {e}")));
        }
        Err(_) => {
            return Err(TlsError::Timeout {
                host: host.to_string(),
            })
        }
    };

    let Some(cert_der) = tls_stream
        .get_ref()
        .1
        .peer_certificates()
        .and_then(|certs| certs.first())
    else {
        return Ok(SslCheck::invalid("No peer certificate presented"));
    };

    match extract_certificate(host, cert_der.as_ref()) {
        Ok(info) => Ok(SslCheck::Valid(info)),
        Err(message) => {
            warn!("Certificate parsing failed for {host}: {message}");
            Ok(SslCheck::invalid(message))
        }
    }
}

fn extract_certificate(host: &str, der: &[u8]) -> Result<SslInfo, String> {
    let (_, cert) =
        parse_x509_certificate(der).map_err(|e| format!("certificate parse error: {e}"))?;

    let subject = cert.subject().to_string();
    let issuer = cert.issuer().to_string();

    let valid_from = DateTime::<Utc>::from_timestamp(cert.validity().not_before.timestamp(), 0)
        .ok_or_else(|| "certificate not_before out of range".to_string())?;
    let valid_to = DateTime::<Utc>::from_timestamp(cert.validity().not_after.timestamp(), 0)
        .ok_or_else(|| "certificate not_after out of range".to_string())?;

    let days_remaining = (valid_to.timestamp() - Utc::now().timestamp()).div_euclid(86_400);

    let fingerprint = hex_pairs(Sha256::digest(der).as_slice());
    let serial_number = cert.tbs_certificate.raw_serial_as_string();

    debug!("Certificate for {host}: {days_remaining} days remaining");

    Ok(SslInfo {
        valid: true,
        issuer,
        subject,
        valid_from,
        valid_to,
        days_remaining,
        fingerprint,
        serial_number,
    })
}

fn hex_pairs(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_severity_classification() {
        assert_eq!(expiry_severity(5), Severity::High);
        assert_eq!(expiry_severity(6), Severity::High);
        assert_eq!(expiry_severity(7), Severity::Medium);
        assert_eq!(expiry_severity(20), Severity::Medium);
        assert_eq!(expiry_severity(29), Severity::Medium);
        assert_eq!(expiry_severity(30), Severity::Low);
        assert_eq!(expiry_severity(60), Severity::Low);
        // Expired certificates are as urgent as it gets.
        assert_eq!(expiry_severity(-3), Severity::High);
    }

    #[test]
    fn invalid_shape_serializes_with_message() {
        let check = SslCheck::invalid("Site does not use HTTPS");
        let json = serde_json::to_value(&check).expect("serialize");
        assert_eq!(json["valid"], false);
        assert_eq!(json["message"], "Site does not use HTTPS");
        assert!(check.days_remaining().is_none());
    }

    #[test]
    fn hex_pairs_format() {
        assert_eq!(hex_pairs(&[0x00, 0xab, 0x5f]), "00:AB:5F");
    }

    #[tokio::test]
    async fn inspect_rejects_invalid_server_name() {
        let err = inspect_certificate("not a hostname")
            .await
            .expect_err("spaces are not valid server names");
        assert!(matches!(err, TlsError::InvalidHost { .. }));
    }
}

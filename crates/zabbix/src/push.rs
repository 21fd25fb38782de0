//! HTTPS push transport for mail-style alert payloads.
//!
//! Alerts go to `https://<resolved-ip>:<port><subpath>` as JSON. Batch
//! pushes are plain POSTs; single-alert pushes additionally carry a signed
//! `Authorization` header derived from a caller-supplied verification code
//! of the form `<appId>_<secret>`.

use crate::sender::Sender;
use crate::types::{AlertMetric, AlertPacket};
use chrono::Utc;
use chrono_tz::Tz;
use common::{Error, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use sha1::{Digest, Sha1};
use tracing::{debug, warn};

/// Environment variable naming the signing timezone.
pub const TIMEZONE_ENV: &str = "TIMEZONE";

/// Zone used when `TIMEZONE` is unset or unparseable.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Shanghai;

impl Sender {
    /// POST a full alert batch, unsigned.
    ///
    /// Returns the response body; a non-2xx status is surfaced as
    /// [`Error::HttpStatus`], never just logged.
    pub async fn alert_send(&self, packet: &AlertPacket, subpath: &str) -> Result<Vec<u8>> {
        let body = serde_json::to_vec(packet)?;
        let url = self.push_url(subpath).await?;
        debug!(%url, alerts = packet.data.len(), "pushing alert batch");

        let response = self
            .http_client()?
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        drain(response).await
    }

    /// POST a single alert with the signed Authorization scheme.
    ///
    /// The verification code must have the `<appId>_<secret>` shape. The
    /// signature is the hex SHA1 of the whole code concatenated with the
    /// unix-seconds timestamp also sent in the `t` header.
    pub async fn alert_metric_send(
        &self,
        metric: &AlertMetric,
        subpath: &str,
        verification_code: &str,
    ) -> Result<Vec<u8>> {
        let app_id = extract_app_id(verification_code)?;
        let body = serde_json::to_vec(metric)?;
        let url = self.push_url(subpath).await?;

        let (authorization, timestamp) = signed_headers(verification_code);
        debug!(%url, app_id, t = %timestamp, "pushing signed alert");

        let response = self
            .http_client()?
            .post(url)
            .header(AUTHORIZATION, authorization)
            .header("t", timestamp)
            .body(body)
            .send()
            .await?;

        drain(response).await
    }

    /// Build the push URL from the resolved endpoint address.
    async fn push_url(&self, subpath: &str) -> Result<String> {
        let addr = self.resolve().await?;
        Ok(format!("https://{}:{}{}", addr.ip(), addr.port(), subpath))
    }

    fn http_client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!self.verify_tls)
            .connect_timeout(self.connect_timeout)
            .build()?;
        Ok(client)
    }
}

/// Read the response body, then surface a non-2xx status as an error.
async fn drain(response: reqwest::Response) -> Result<Vec<u8>> {
    let status = response.status();
    let body = response.bytes().await?.to_vec();

    if !status.is_success() {
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    Ok(body)
}

/// Compute the `Authorization` value and `t` timestamp for one push.
///
/// The header label stays the literal `appId` rather than the identifier
/// extracted from the verification code; the receiving side matches on the
/// literal.
fn signed_headers(verification_code: &str) -> (String, String) {
    let timestamp = signing_timestamp(signing_zone());
    let authorization = format!("appId:{}", sign(verification_code, &timestamp));
    (authorization, timestamp)
}

/// Validate the `<appId>_<secret>` shape and return the app identifier.
fn extract_app_id(verification_code: &str) -> Result<&str> {
    match verification_code.split_once('_') {
        Some((app_id, secret)) if !app_id.is_empty() && !secret.is_empty() => Ok(app_id),
        _ => Err(Error::signature_input(
            "verification code must have the form <appId>_<secret>",
        )),
    }
}

/// Zone-local current time, taken back to UTC unix seconds.
fn signing_timestamp(zone: Tz) -> String {
    Utc::now()
        .with_timezone(&zone)
        .with_timezone(&Utc)
        .timestamp()
        .to_string()
}

/// Resolve the signing timezone from the environment.
fn signing_zone() -> Tz {
    match std::env::var_os(TIMEZONE_ENV) {
        Some(name) => parse_zone(&name.to_string_lossy()),
        None => DEFAULT_TIMEZONE,
    }
}

fn parse_zone(name: &str) -> Tz {
    name.parse().unwrap_or_else(|_| {
        warn!(zone = name, "unrecognized timezone, using default");
        DEFAULT_TIMEZONE
    })
}

/// Hex-encoded SHA1 over the verification code and timestamp.
fn sign(verification_code: &str, timestamp: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(verification_code.as_bytes());
    hasher.update(timestamp.as_bytes());
    hex::encode(hasher.finalize())
}

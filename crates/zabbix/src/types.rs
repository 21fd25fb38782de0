//! Payload types for the trapper and alert push transports.
//!
//! All types are immutable value objects: the caller builds them, hands them
//! to a send operation once, and the transports never mutate or reuse them.

use chrono::Utc;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A single item value pushed to a trapper endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub host: String,
    pub key: String,
    pub value: String,
    pub clock: i64,
}

impl Metric {
    /// Create a metric stamped with the current unix time.
    pub fn new(host: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_clock(host, key, value, Utc::now().timestamp())
    }

    /// Create a metric with an explicit collection time.
    pub fn with_clock(
        host: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
        clock: i64,
    ) -> Self {
        Self {
            host: host.into(),
            key: key.into(),
            value: value.into(),
            clock,
        }
    }
}

/// Envelope for a batch of metrics.
///
/// The `request` field routes the payload on the server side and never
/// varies for this packet kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    pub request: String,
    pub data: Vec<Metric>,
    pub clock: i64,
}

impl Packet {
    /// Request discriminator for trapper metric submissions.
    pub const REQUEST: &'static str = "sender data";

    /// Create a packet stamped with the current unix time.
    pub fn new(data: Vec<Metric>) -> Self {
        Self::with_clock(data, Utc::now().timestamp())
    }

    /// Create a packet with an explicit timestamp.
    pub fn with_clock(data: Vec<Metric>, clock: i64) -> Self {
        Self {
            request: Self::REQUEST.to_string(),
            data,
            clock,
        }
    }
}

/// Mail body content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailContentType {
    Plain = 1,
    Html = 2,
}

// Serialized as the bare integer the receiving side expects.
impl Serialize for MailContentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for MailContentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            1 => Ok(MailContentType::Plain),
            2 => Ok(MailContentType::Html),
            other => Err(de::Error::custom(format!(
                "invalid mail content type {other}"
            ))),
        }
    }
}

/// Body of a forwarded mail alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailBody {
    #[serde(rename = "contentType")]
    pub content_type: MailContentType,
    #[serde(rename = "contentBody")]
    pub content_body: String,
}

/// A mail-style alert message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: MailBody,
    pub attach: Vec<String>,
}

/// Wrapper keying the message by delivery kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessageType {
    pub mail: MailMessage,
}

/// A single alert forwarded over the HTTPS push transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMetric {
    #[serde(rename = "tm")]
    pub time: String,
    #[serde(rename = "evt")]
    pub event: i32,
    #[serde(rename = "type")]
    pub alert_type: i32,
    #[serde(rename = "msg")]
    pub message: MailMessageType,
}

impl AlertMetric {
    pub fn new(time: impl Into<String>, event: i32, alert_type: i32, message: MailMessageType) -> Self {
        Self {
            time: time.into(),
            event,
            alert_type,
            message,
        }
    }
}

/// Envelope for a batch of alerts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPacket {
    pub request: String,
    pub data: Vec<AlertMetric>,
    pub clock: i64,
}

impl AlertPacket {
    /// Request discriminator for alert submissions.
    pub const REQUEST: &'static str = "ocp alerts";

    /// Create an alert packet stamped with the current unix time.
    pub fn new(data: Vec<AlertMetric>) -> Self {
        Self::with_clock(data, Utc::now().timestamp())
    }

    /// Create an alert packet with an explicit timestamp.
    pub fn with_clock(data: Vec<AlertMetric>, clock: i64) -> Self {
        Self {
            request: Self::REQUEST.to_string(),
            data,
            clock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail_message() -> MailMessageType {
        MailMessageType {
            mail: MailMessage {
                from: "zabbix@example.com".to_string(),
                to: vec!["ops@example.com".to_string()],
                cc: vec![],
                bcc: vec![],
                subject: "disk almost full".to_string(),
                body: MailBody {
                    content_type: MailContentType::Plain,
                    content_body: "/var is at 95%".to_string(),
                },
                attach: vec![],
            },
        }
    }

    #[test]
    fn test_metric_default_clock_is_now() {
        let before = Utc::now().timestamp();
        let metric = Metric::new("srv1", "cpu.load", "0.42");
        let after = Utc::now().timestamp();

        assert!(metric.clock >= before && metric.clock <= after);
    }

    #[test]
    fn test_metric_explicit_clock() {
        let metric = Metric::with_clock("srv1", "cpu.load", "0.42", 1700000000);
        assert_eq!(metric.clock, 1700000000);
    }

    #[test]
    fn test_packet_request_discriminator() {
        let packet = Packet::new(vec![]);
        assert_eq!(packet.request, "sender data");

        let alerts = AlertPacket::new(vec![]);
        assert_eq!(alerts.request, "ocp alerts");
    }

    #[test]
    fn test_packet_json_shape() {
        let packet = Packet::with_clock(
            vec![Metric::with_clock("srv1", "cpu.load", "0.42", 1700000000)],
            1700000001,
        );
        let json = serde_json::to_value(&packet).unwrap();

        assert_eq!(json["request"], "sender data");
        assert_eq!(json["clock"], 1700000001);
        assert_eq!(json["data"][0]["host"], "srv1");
        assert_eq!(json["data"][0]["key"], "cpu.load");
        assert_eq!(json["data"][0]["value"], "0.42");
        assert_eq!(json["data"][0]["clock"], 1700000000);
    }

    #[test]
    fn test_alert_metric_json_shape() {
        let alert = AlertMetric::new("2023-11-14 22:13:20", 17, 1, mail_message());
        let json = serde_json::to_value(&alert).unwrap();

        assert_eq!(json["tm"], "2023-11-14 22:13:20");
        assert_eq!(json["evt"], 17);
        assert_eq!(json["type"], 1);
        assert_eq!(json["msg"]["mail"]["from"], "zabbix@example.com");
        assert_eq!(json["msg"]["mail"]["body"]["contentType"], 1);
        assert_eq!(json["msg"]["mail"]["body"]["contentBody"], "/var is at 95%");
    }

    #[test]
    fn test_mail_content_type_round_trip() {
        let body = MailBody {
            content_type: MailContentType::Html,
            content_body: "<b>down</b>".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"contentType\":2"));

        let back: MailBody = serde_json::from_str(&json).unwrap();
        assert_eq!(back, body);

        let err = serde_json::from_str::<MailBody>(r#"{"contentType":3,"contentBody":""}"#);
        assert!(err.is_err());
    }
}

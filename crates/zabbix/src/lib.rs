//! Zabbix relay transports.
//!
//! Delivers alert data to a Zabbix installation over two independent
//! transports sharing one data model:
//!
//! - the native binary trapper protocol over TCP (`ZBXD\x01` framing with a
//!   little-endian length prefix and a JSON body);
//! - an HTTPS JSON push for mail-style alerts, optionally signed with a
//!   SHA1-over-verification-code `Authorization` scheme.
//!
//! Both transports are one-shot: no pooling, no retries, every connection
//! closed on every exit path. Retry and backoff policy belongs to the
//! caller.
//!
//! # Example
//!
//! ```no_run
//! use zabbix::{Metric, Packet, Sender};
//!
//! # async fn example() -> common::Result<()> {
//! let sender = Sender::new("zabbix.example.com", 10051);
//!
//! let metric = Metric::new("srv1", "cpu.load", "0.42");
//! let response = sender.send(&Packet::new(vec![metric])).await?;
//! println!("{}", String::from_utf8_lossy(&response));
//! # Ok(())
//! # }
//! ```

pub mod frame;
mod push;
mod sender;
pub mod types;

pub use push::{DEFAULT_TIMEZONE, TIMEZONE_ENV};
pub use sender::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT, Sender};
pub use types::{
    AlertMetric, AlertPacket, MailBody, MailContentType, MailMessage, MailMessageType, Metric,
    Packet,
};

//! Common utilities and types shared across the Zabbix relay components.

pub mod error;
pub mod logging;

pub use error::{Error, Result};

//! Send one metric to a trapper endpoint.
//!
//! ```sh
//! cargo run --example send_metric -- zabbix.example.com 10051 srv1 cpu.load 0.42
//! ```

use tracing::info;
use zabbix::{Metric, Packet, Sender};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    common::logging::init();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let port: u16 = args.next().as_deref().unwrap_or("10051").parse()?;
    let metric_host = args.next().unwrap_or_else(|| "srv1".to_string());
    let key = args.next().unwrap_or_else(|| "cpu.load".to_string());
    let value = args.next().unwrap_or_else(|| "0.42".to_string());

    let sender = Sender::new(host, port);
    let packet = Packet::new(vec![Metric::new(metric_host, key, value)]);

    let response = sender.send(&packet).await?;
    let body = zabbix::frame::decode(&response)?;
    info!(response = %String::from_utf8_lossy(body), "server reply");

    Ok(())
}

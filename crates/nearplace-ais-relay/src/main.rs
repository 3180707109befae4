//! AIS position relay.
//!
//! Connects to a TCP feed of newline-delimited, already-decoded vessel
//! position messages (JSON objects) and forwards each one to an HTTP storage
//! endpoint. Pure I/O glue: no enrichment happens here.
//!
//! Messages without a `type` or `mmsi` field are dropped. Every forwarded
//! message is assigned a stable `_id` of `{type}_{mmsi}`, or
//! `{type}_{mmsi}_{part_num}` for multipart messages, so repeated deliveries
//! overwrite rather than duplicate downstream.

use std::io::{BufRead, BufReader};
use std::net::TcpStream;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Forwarding requests may sit behind slow storage; match the feed's pace.
const SINK_TIMEOUT: Duration = Duration::from_secs(3600);

/// Log a progress line every this many forwarded messages.
const PROGRESS_INTERVAL: usize = 1000;

#[derive(Parser, Debug)]
#[command(version, about = "Relay AIS position messages to an HTTP storage endpoint")]
struct Cli {
    /// AIS feed host name or IP address.
    #[arg(short = 'a', long = "ais-server")]
    ais_server: String,

    /// AIS feed TCP port.
    #[arg(short = 'p', long = "ais-port")]
    ais_port: u16,

    /// HTTP endpoint receiving the relayed messages.
    #[arg(short = 's', long = "sink-url")]
    sink_url: String,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let stream = TcpStream::connect((cli.ais_server.as_str(), cli.ais_port)).with_context(|| {
        format!(
            "failed to connect to AIS feed at {}:{}",
            cli.ais_server, cli.ais_port
        )
    })?;
    info!(server = %cli.ais_server, port = cli.ais_port, "connected to AIS feed");

    let client = Client::builder()
        .timeout(SINK_TIMEOUT)
        .build()
        .context("failed to build HTTP client")?;

    relay_messages(BufReader::new(stream), &client, &cli.sink_url)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Pump messages from the feed to the sink until the feed closes.
fn relay_messages(reader: impl BufRead, client: &Client, sink_url: &str) -> Result<()> {
    let mut forwarded = 0usize;

    for line in reader.lines() {
        let line = line.context("reading from the AIS feed failed")?;
        if line.trim().is_empty() {
            continue;
        }

        let message: Value = match serde_json::from_str(&line) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "skipping undecodable feed line");
                continue;
            }
        };

        let Some(message) = prepare_message(message) else {
            continue;
        };

        post_message(client, sink_url, &message)?;
        forwarded += 1;

        if forwarded % PROGRESS_INTERVAL == 0 {
            info!(forwarded, "relayed messages");
        }
    }

    info!(forwarded, "AIS feed closed");
    Ok(())
}

/// Assign the storage identity, dropping messages missing `type` or `mmsi`.
fn prepare_message(mut message: Value) -> Option<Value> {
    let id = {
        let fields = message.as_object()?;
        let msg_type = fields.get("type")?;
        let mmsi = fields.get("mmsi")?;

        match fields.get("part_num") {
            Some(part_num) => format!(
                "{}_{}_{}",
                id_part(msg_type),
                id_part(mmsi),
                id_part(part_num)
            ),
            None => format!("{}_{}", id_part(msg_type), id_part(mmsi)),
        }
    };

    message
        .as_object_mut()?
        .insert("_id".to_string(), Value::String(id));
    Some(message)
}

/// Render a JSON scalar for use in an `_id`, without surrounding quotes.
fn id_part(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn post_message(client: &Client, sink_url: &str, message: &Value) -> Result<()> {
    client
        .post(sink_url)
        .json(message)
        .send()
        .context("posting message to the sink failed")?
        .error_for_status()
        .context("sink rejected the message")?;
    Ok(())
}

//! Hex Terminal
//!
//! Sends hex frames to a serial device and prints what comes back.
//!
//! Usage:
//!   cargo run --example hex_terminal -- [OPTIONS] [HEX]...
//!
//! Options:
//!   --port PORT       Serial port (no port lists the available ones)
//!   --config FILE     Load connection settings from a JSON file
//!   --baud RATE       Baud rate (default: 9600)
//!   --parity P        none, odd or even (default: none)
//!   --data-bits N     5 to 8 (default: 8)
//!   --stop-bits N     1 or 2 (default: 1)
//!   --timeout MS      Receive timeout in ms (default: 1000)
//!   --len N           Bytes to wait for per frame (default: 1024)
//!   --lrc             Append an LRC byte to each frame
//!
//! Set RUST_LOG=portlink_core=debug to see every byte on the wire.

use anyhow::{bail, Context, Result};
use portlink_core::codec::{from_hex_default, lrc, to_hex};
use portlink_core::transport::{
    list_ports, ConnectionConfig, DataBits, Parity, ReceiveOutcome, StopBits, Transport,
    TransportError, DEFAULT_RECEIVE_LEN, DEFAULT_RECEIVE_TIMEOUT_MS,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut config = ConnectionConfig::default();
    let mut timeout_ms = DEFAULT_RECEIVE_TIMEOUT_MS;
    let mut receive_len = DEFAULT_RECEIVE_LEN;
    let mut append_lrc = false;
    let mut frames = Vec::new();

    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        let mut value = || next_value(&args, &mut i, arg);

        match arg {
            "--port" | "-p" => config.port_name = value()?.to_string(),
            "--config" | "-c" => config = ConnectionConfig::load(value()?)?,
            "--baud" | "-b" => config.baud_rate = value()?.parse().context("bad baud rate")?,
            "--parity" => {
                config.parity = match value()? {
                    "none" | "n" => Parity::None,
                    "odd" | "o" => Parity::Odd,
                    "even" | "e" => Parity::Even,
                    other => bail!("unknown parity {:?}", other),
                }
            }
            "--data-bits" => {
                let bits: u8 = value()?.parse().context("bad data bits")?;
                config.data_bits = DataBits::try_from(bits)?;
            }
            "--stop-bits" => {
                config.stop_bits = match value()? {
                    "1" => StopBits::One,
                    "2" => StopBits::Two,
                    other => bail!("unsupported stop bits {:?}", other),
                }
            }
            "--timeout" | "-t" => timeout_ms = value()?.parse().context("bad timeout")?,
            "--len" | "-n" => receive_len = value()?.parse().context("bad length")?,
            "--lrc" => append_lrc = true,
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            arg if !arg.starts_with('-') => frames.push(arg.to_string()),
            other => eprintln!("Unknown option: {}", other),
        }
        i += 1;
    }

    if config.port_name.is_empty() {
        println!("Available ports:");
        for port in list_ports() {
            println!("  {}", port);
        }
        return Ok(());
    }

    let mut transport = Transport::serial();
    transport
        .open(config.clone())
        .with_context(|| format!("opening {}", config.summary()))?;
    println!("Connected: {}", config.summary());

    let timeout = Duration::from_millis(timeout_ms);
    for text in &frames {
        let mut frame = from_hex_default(text).with_context(|| format!("frame {:?}", text))?;
        if append_lrc {
            frame.push(lrc(&frame));
        }

        transport.send(&frame)?;
        println!("> {}", to_hex(&frame, " "));

        match transport.receive(receive_len, timeout) {
            Ok(ReceiveOutcome::Complete(data)) => println!("< {}", to_hex(&data, " ")),
            Ok(ReceiveOutcome::PartialOnTimeout(data)) => {
                println!("< {} (timed out)", to_hex(&data, " "))
            }
            Err(TransportError::Timeout) => println!("< no reply within {}ms", timeout_ms),
            Err(e) => {
                transport.close();
                return Err(e.into());
            }
        }
    }

    let counters = transport.counters();
    println!(
        "Sent {} bytes in {} frames, received {} bytes",
        counters.tx_bytes, counters.tx_frames, counters.rx_bytes
    );
    transport.close();
    Ok(())
}

/// Step past a flag and return its value
fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .with_context(|| format!("{} needs a value", flag))
}

fn print_help() {
    println!("Usage: hex_terminal [OPTIONS] [HEX]...");
    println!();
    println!("Options:");
    println!("  --port, -p PORT     Serial port (omit to list ports)");
    println!("  --config, -c FILE   JSON connection settings");
    println!("  --baud, -b RATE     Baud rate (default: 9600)");
    println!("  --parity P          none, odd or even (default: none)");
    println!("  --data-bits N       5 to 8 (default: 8)");
    println!("  --stop-bits N       1 or 2 (default: 1)");
    println!("  --timeout, -t MS    Receive timeout in ms (default: 1000)");
    println!("  --len, -n N         Bytes to wait for per frame (default: 1024)");
    println!("  --lrc               Append an LRC byte to each frame");
    println!("  --help, -h          Show this help");
}

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod network;
pub mod tui;

mod client_main;
mod commands;

use anyhow::Context;
use clap::{Command, arg};
use worstchess::config::{ClientConfig, UiVariant};


fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Worstchess")
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .about("Terminal client for a worst-move chess server")
        .arg(arg!(<server_address> "WebSocket address, e.g. ws://localhost:5000/ws"))
        .arg(arg!(--"status-url" <url> "Status endpoint (default: same host, /api/game/status)"))
        .arg(arg!(--"config" <config_file> "Path to a yaml-serialized ClientConfig"))
        .arg(
            arg!(--"ui" <variant> "UI variant (overrides the configuration file)")
                .value_parser(["full", "minimal"]),
        )
        .get_matches();

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => read_config_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(variant) = matches.get_one::<String>("ui") {
        config.ui_variant = variant.parse::<UiVariant>()?;
    }
    let server_address = matches
        .get_one::<String>("server_address")
        .context("Missing server address")?
        .clone();
    let status_url = match matches.get_one::<String>("status-url") {
        Some(url) => url.clone(),
        None => network::default_status_url(&server_address)?,
    };
    client_main::run(client_main::ConsoleConfig { server_address, status_url, client: config })
}

fn read_config_file(filename: &str) -> anyhow::Result<ClientConfig> {
    let contents = std::fs::read_to_string(filename)
        .with_context(|| format!("Reading config file {filename}"))?;
    serde_yaml::from_str(&contents).with_context(|| format!("Parsing config file {filename}"))
}

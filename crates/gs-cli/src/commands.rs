use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use gs_sdk::{Codec, GifSnapshotCodec, Hub};
use gs_server::{GifStreamServer, ServerConfig};
use gs_types::Fingerprint;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Fingerprint(args) => cmd_fingerprint(args),
        Command::Snapshot(args) => cmd_snapshot(args),
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    tracing::debug!(?config, "effective configuration");

    let hub = Hub::start(config.hub_config(), Arc::new(GifSnapshotCodec));
    println!(
        "{} GifStream on {}",
        "▶".green().bold(),
        format!("http://{}", config.bind_addr).bold()
    );
    GifStreamServer::new(config, hub).serve().await?;
    Ok(())
}

fn cmd_fingerprint(args: FingerprintArgs) -> anyhow::Result<()> {
    for path in &args.paths {
        let key = fingerprint_file(path)?;
        println!("{}  {}", key.to_string().yellow(), path.display());
    }
    Ok(())
}

fn cmd_snapshot(args: SnapshotArgs) -> anyhow::Result<()> {
    let key = write_snapshot(&args.input, &args.output)?;
    println!(
        "{} {} -> {}",
        "✓".green().bold(),
        key.to_string().yellow(),
        args.output.display()
    );
    Ok(())
}

fn fingerprint_file(path: &Path) -> anyhow::Result<Fingerprint> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(gs_crypto::fingerprint(&data))
}

/// Derive the PNG still of `input` into `output`, returning the GIF's key.
fn write_snapshot(input: &Path, output: &Path) -> anyhow::Result<Fingerprint> {
    let raw = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let still = GifSnapshotCodec
        .decode_and_derive(&raw)
        .with_context(|| format!("{} is not a readable GIF", input.display()))?;
    std::fs::write(output, &still).with_context(|| format!("writing {}", output.display()))?;
    Ok(gs_crypto::fingerprint(&raw))
}

//! # neuraCanavas CLI
//!
//! Headless sketch replay and generation.

use clap::Parser;
use neura_cli::{fetch_image, load_script, replay, write_image, CliArgs, CliConfig};
use neura_client::{shared, GenerationClient, GenerationFlow};
use neura_core::{GenerationStatus, Session};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,neura_cli=debug,neura_client=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    // Use JSON format in production (RUST_LOG_FORMAT=json)
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = CliConfig::from(CliArgs::parse());
    tracing::info!("Surface {}x{}", config.width, config.height);

    let mut session = Session::new(config.width, config.height)?;
    session.set_prompt(config.prompt.as_str());

    if let Some(ref path) = config.script {
        let steps = load_script(path)?;
        tracing::info!("Replaying {} steps from {}", steps.len(), path.display());
        replay(&steps, &mut session);
    }

    if let Some(ref path) = config.sketch_out {
        write_image(path, &session.surface().export_png()?)?;
    }

    if !config.generate {
        tracing::info!("Skipping generation (--no-generate)");
        return Ok(());
    }

    let client = GenerationClient::new(&config.client)?;
    tracing::info!("Generation backend: {}", client.endpoint());
    let flow = GenerationFlow::new(client);
    let session = shared(session);

    match flow.generate(&session).await {
        Some(GenerationStatus::Completed { image }) => {
            if let Some(ref path) = config.out {
                let bytes = fetch_image(flow.backend(), &image).await?;
                write_image(path, &bytes)?;
            } else {
                println!("{image}");
            }
            Ok(())
        }
        Some(GenerationStatus::Failed { message }) => anyhow::bail!(message),
        Some(other) => anyhow::bail!("generation ended in unexpected state: {other:?}"),
        None => {
            let status = session
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .status()
                .clone();
            match status {
                GenerationStatus::Failed { message } => anyhow::bail!(message),
                other => anyhow::bail!("generation was not started: {other:?}"),
            }
        }
    }
}

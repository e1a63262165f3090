//! Market sentiment analyzer
//!
//! Resolves a company to its ticker, pulls recent headlines and asks an Azure
//! OpenAI deployment for a structured sentiment profile, printed as JSON.

mod config;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pulse_core::CompanyDirectory;
use pulse_news::NewsClient;
use pulse_research::{AzureOpenAIClient, AzureOpenAIConfig, SentimentExtractor};
use pulse_services::{LangfuseSink, SentimentPipeline, Tracer};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::PulseConfig;

#[derive(Parser)]
#[command(name = "pulse", about = "Structured news sentiment for a company")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze recent news sentiment for a company (default).
    Analyze {
        /// Company display name, e.g. "Apple Inc".
        #[arg(default_value = "Microsoft")]
        company: String,
    },
    /// Send a greeting to the configured deployment to verify credentials.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the variables may come from the shell
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env: {}", e);
        }
    }

    // Logs go to stderr so stdout carries only the result
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pulse_cli=debug")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Analyze {
        company: "Microsoft".to_string(),
    }) {
        Commands::Analyze { company } => analyze(&company).await,
        Commands::Check => check().await,
    }
}

async fn analyze(company: &str) -> anyhow::Result<()> {
    let config = PulseConfig::from_env().context("Invalid configuration")?;

    info!(
        "Using deployment {} (api version {})",
        config.azure.deployment, config.azure.api_version
    );

    let news = NewsClient::new(config.news).context("Failed to create news client")?;
    let extractor = SentimentExtractor::new(AzureOpenAIClient::new(&config.azure));
    let sink = LangfuseSink::new(config.langfuse).context("Failed to create Langfuse sink")?;
    let pipeline = SentimentPipeline::new(
        CompanyDirectory::default(),
        news,
        extractor,
        Tracer::new(Arc::new(sink)),
    );

    let outcome = pipeline
        .run(company)
        .await
        .with_context(|| format!("Sentiment analysis for {} failed", company))?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

async fn check() -> anyhow::Result<()> {
    let config = AzureOpenAIConfig::from_env().context("Invalid configuration")?;
    let client = AzureOpenAIClient::new(&config);

    info!("Checking deployment {}", client.deployment());
    let reply = client.check().await.context("Connectivity check failed")?;

    println!("{}", reply);
    Ok(())
}

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use referent_client::{ChatClientFactory, ImageClient, ReqwestFetcher, SelectorExtractor};
use referent_core::{
    Action, AppConfig, AppError, ErrorCategory, ImageGenerator, Provider, Session, Task,
};

#[derive(Parser)]
#[command(
    name = "referent",
    version,
    about = "Read an article, then translate, summarize or illustrate it"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract title, date and body text from a web page
    Parse {
        /// Article URL
        #[arg(short, long)]
        url: String,
    },

    /// Extract an article and run one generation task on it
    Run {
        /// Article URL
        #[arg(short, long)]
        url: String,

        /// translate, summarize, theses, telegram-post or image-prompt
        #[arg(short, long)]
        task: Task,

        /// openai, perplexity or openrouter (unknown names use the default)
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Generate an illustration from a text prompt
    Image {
        /// Image description
        #[arg(short, long)]
        prompt: String,

        /// Write the decoded image here instead of printing a data URI
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("referent=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            eprintln!("{}", describe(&err));
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    let config = Arc::new(AppConfig::from_env()?);

    match command {
        Commands::Parse { url } => cmd_parse(&config, &url).await,
        Commands::Run {
            url,
            task,
            provider,
        } => cmd_run(&config, &url, task, Provider::from_name(provider.as_deref())).await,
        Commands::Image { prompt, output } => {
            cmd_image(&config, &prompt, output.as_deref()).await
        }
    }
}

type CliSession = Session<ReqwestFetcher, SelectorExtractor, ChatClientFactory>;

fn session(config: &Arc<AppConfig>) -> Result<CliSession> {
    let fetcher = ReqwestFetcher::new()?;
    let fetcher = if config.allow_private_urls {
        fetcher.allow_private_urls()
    } else {
        fetcher
    };
    let generators = ChatClientFactory::new(Arc::clone(config))?;

    Ok(Session::new(
        fetcher,
        SelectorExtractor::new(),
        generators,
        config.target_language.clone(),
    ))
}

async fn cmd_parse(config: &Arc<AppConfig>, url: &str) -> Result<()> {
    let outcome = session(config)?.run(url, Action::Parse).await?;
    println!("{}", serde_json::to_string_pretty(&outcome.article)?);
    Ok(())
}

async fn cmd_run(config: &Arc<AppConfig>, url: &str, task: Task, provider: Provider) -> Result<()> {
    let outcome = session(config)?
        .run(url, Action::Generate { task, provider })
        .await?;

    if let Some(title) = &outcome.article.title {
        tracing::info!(%title, "Article extracted");
    }
    println!("{}", outcome.output.unwrap_or_default());
    Ok(())
}

async fn cmd_image(config: &Arc<AppConfig>, prompt: &str, output: Option<&Path>) -> Result<()> {
    let client = ImageClient::new(Arc::clone(config))?;
    let image = client.generate(prompt).await?;

    match output {
        Some(path) => {
            std::fs::write(path, &image.bytes)
                .with_context(|| format!("Failed to write image to {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                mime = %image.mime_type,
                bytes = image.bytes.len(),
                "Image saved"
            );
        }
        None => println!("{}", image.to_data_uri()),
    }
    Ok(())
}

/// `<headline>: <message>` for the terminal.
fn describe(err: &anyhow::Error) -> String {
    let category = err
        .downcast_ref::<AppError>()
        .map(AppError::category)
        .unwrap_or(ErrorCategory::Unknown);
    format!("{}: {err:#}", category.headline())
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use docchat_core::{
    ApiKey, AppConfig, Controller, DocumentPreview, GeminiBackend, Model, SessionSettings,
    UploadedFile,
};
use tracing_subscriber::EnvFilter;

mod output;
mod repl;

use output::ColorMode;

/// AI Document Assistant - ask questions about PDF, DOCX and text files
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract text from a document and show a preview
    Extract {
        /// Path to the PDF, DOCX or text file
        file_path: PathBuf,

        /// Print the whole extracted text instead of the preview
        #[arg(long)]
        full: bool,
    },

    /// Ask a single question, optionally about a document
    Ask {
        /// The question to ask
        question: String,

        /// Document to use as context
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Start an interactive conversation
    Chat {
        /// Document to load before the first question
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[command(flatten)]
        settings: SettingsArgs,
    },
}

#[derive(clap::Args, Debug)]
struct SettingsArgs {
    /// Model to use (gemini-1.5-pro, gemini-1.5-flash, gemini-1.0-pro)
    #[arg(short, long)]
    model: Option<Model>,

    /// Gemini API key (overrides GEMINI_API_KEY and the config file)
    #[arg(long)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let color = ColorMode(!cli.no_color);

    match cli.command {
        Command::Extract { file_path, full } => extract(&file_path, full, color).await,
        Command::Ask {
            question,
            file,
            settings,
        } => ask(&question, file.as_deref(), settings, color).await,
        Command::Chat { file, settings } => {
            let mut controller = build_controller(settings)?;
            repl::run(&mut controller, file.as_deref(), color).await
        }
    }
}

/// Resolve configuration: CLI flags > env vars > config file > defaults.
fn build_controller(args: SettingsArgs) -> anyhow::Result<Controller> {
    let config = AppConfig::load()?;
    let model = args.model.unwrap_or(config.model);
    let api_key = args.api_key.map(ApiKey::new).unwrap_or(config.api_key);

    let backend = Arc::new(GeminiBackend::new(reqwest::Client::new(), config.api_base));
    Ok(Controller::new(backend, SessionSettings { model, api_key }))
}

pub(crate) async fn read_document(path: &Path) -> anyhow::Result<UploadedFile> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime = Controller::declared_mime_for(&name).to_string();
    Ok(UploadedFile { name, mime, data })
}

async fn extract(path: &Path, full: bool, color: ColorMode) -> anyhow::Result<()> {
    let UploadedFile { name, mime, data } = read_document(path).await?;
    let text = tokio::task::spawn_blocking(move || docchat_ingest::extract(&data, &mime)).await??;

    let mut stdout = std::io::stdout();
    if full {
        output::print_full_text(&mut stdout, &name, &text, color)?;
    } else {
        output::print_preview(&mut stdout, &DocumentPreview::of(&name, &text), color)?;
    }
    Ok(())
}

async fn ask(
    question: &str,
    file: Option<&Path>,
    settings: SettingsArgs,
    color: ColorMode,
) -> anyhow::Result<()> {
    let mut controller = build_controller(settings)?;
    if let Some(path) = file {
        controller.upload(read_document(path).await?).await?;
    }

    let spinner = output::thinking_spinner(color);
    let result = controller.submit(question).await;
    spinner.finish_and_clear();

    let answer = result?;
    output::print_answer(&mut std::io::stdout(), &answer, color)?;
    Ok(())
}

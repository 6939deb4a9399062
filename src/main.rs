//! brandscope 命令行：分片上传视频、查看和分析素材
//!
//! 后端地址优先级：`--backend-url` > `BRANDSCOPE_BACKEND_URL`（或 `BACKEND_URL`）> `brandscope.toml`

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use brandscope::view::{self, TerminalNotifier};
use brandscope::{asset_page, upload_form, Config, QueryState, SubmitOutcome, UploadFile};
use brandscope::utils::format_bytes;

#[derive(Parser)]
#[command(name = "brandscope", about = "Upload videos and analyze brand exposure")]
struct Cli {
    /// Path to a TOML config file (default: ./brandscope.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides config and environment
    #[arg(long, global = true)]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a single video file in fixed-size segments
    UploadVideo {
        /// Path to the video file
        file: PathBuf,
        /// Override the content type inferred from the file extension
        #[arg(long)]
        content_type: Option<String>,
    },
    /// List or analyze assets
    Assets {
        #[command(subcommand)]
        sub: AssetCommands,
    },
    /// Show the navigation menu
    Menu {
        /// Current location, used to mark the active entry
        #[arg(long, default_value = "/")]
        path: String,
    },
}

#[derive(Subcommand)]
enum AssetCommands {
    /// Fetch all assets
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Run brand detection on the uploaded assets
    Analyze,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Commands::Menu { path } = &cli.command {
        print!("{}", view::render_menu(path));
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_backend_url(cli.backend_url);
    config.validate().context("Invalid configuration")?;

    let notifier = Arc::new(TerminalNotifier::new());

    match cli.command {
        Commands::UploadVideo { file, content_type } => {
            let mut selected = UploadFile::open(&file)
                .await
                .with_context(|| format!("Failed to open {}", file.display()))?;
            if let Some(content_type) = content_type {
                selected = selected.with_content_type(content_type);
            }

            let mut line = notifier.progress_line();
            let form = upload_form(&config, notifier)?;
            eprintln!(
                "{} ({}, {})",
                selected.name,
                format_bytes(selected.size),
                selected.content_type
            );

            let mut status_rx = form.subscribe();
            let progress_task = tokio::spawn(async move {
                while status_rx.changed().await.is_ok() {
                    let status = *status_rx.borrow_and_update();
                    if status.uploading {
                        let _ = line.draw(status.progress);
                    } else {
                        let _ = line.finish();
                    }
                }
                let _ = line.finish();
            });

            let outcome = form.submit(std::slice::from_ref(&selected)).await;
            drop(form);
            let _ = progress_task.await;

            match outcome {
                SubmitOutcome::Succeeded { batch_id, segments } => {
                    println!("batch {}: {} segments uploaded", batch_id, segments);
                    Ok(ExitCode::SUCCESS)
                }
                SubmitOutcome::Invalid(err) => {
                    eprintln!("file: {}", err);
                    Ok(ExitCode::from(2))
                }
                SubmitOutcome::Failed { .. } => Ok(ExitCode::FAILURE),
            }
        }
        Commands::Assets { sub } => {
            let page = asset_page(&config, notifier)?;
            match sub {
                AssetCommands::List { format } => {
                    let mut skeleton = false;
                    if let OutputFormat::Table = format {
                        println!("{}", view::render_heading(view::ASSETS_TITLE));
                        println!("{}\n", view::ASSETS_INTRO);
                        skeleton = view::draw_skeleton().unwrap_or(false);
                    }

                    let state = page.load().await;
                    if skeleton {
                        let _ = view::clear_skeleton();
                    }
                    match (format, &state) {
                        (OutputFormat::Json, QueryState::Success(assets)) => {
                            println!("{}", serde_json::to_string_pretty(assets).context("Serialize assets")?);
                        }
                        _ => print!("{}", view::render_asset_list(&state)),
                    }

                    if matches!(state, QueryState::Error(_)) {
                        Ok(ExitCode::FAILURE)
                    } else {
                        Ok(ExitCode::SUCCESS)
                    }
                }
                AssetCommands::Analyze => {
                    let notification = page.analyze().await;
                    if notification.is_error() {
                        Ok(ExitCode::FAILURE)
                    } else {
                        Ok(ExitCode::SUCCESS)
                    }
                }
            }
        }
        Commands::Menu { .. } => Ok(ExitCode::SUCCESS),
    }
}

use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use posture_core::{
    ClientConfig, HttpAnalyzer, Notifier, PostureCategory, UploadAnalyzeWidget, VideoFile,
    format_frame_wise_panel, format_summary_panel,
};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

#[derive(Parser)]
#[command(name = "posture-recognizer")]
#[command(about = "Upload a video to the posture analysis service and show its feedback")]
struct Cli {
    /// Analysis service base URL (overrides POSTURE_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Request timeout in seconds (overrides POSTURE_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a video and print the posture summary
    Analyze {
        /// Video file to upload
        video: Option<PathBuf>,

        /// Posture category the service should check against (squat, desk)
        #[arg(short, long, default_value = "squat")]
        category: PostureCategory,

        /// Also print the frame-wise feedback without asking
        #[arg(short, long)]
        frames: bool,
    },
    /// Check that the analysis service is reachable
    Ping,
}

/// Alerts go to stderr as a red `Error:` line.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        eprintln!("{} {}", style("Error:").red().bold(), message);
    }
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .expect("valid spinner template"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("posture_core={level},posture_recognizer={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn apply_overrides(
    mut config: ClientConfig,
    endpoint: Option<String>,
    timeout: Option<u64>,
) -> Result<ClientConfig> {
    if let Some(endpoint) = endpoint {
        config = config.with_endpoint(endpoint)?;
    }
    if let Some(secs) = timeout {
        config = config.with_timeout_secs(secs)?;
    }
    Ok(config)
}

fn confirm(prompt: &str) -> bool {
    let term = Term::stdout();
    if !term.is_term() {
        return false;
    }
    if term.write_str(&format!("{} ", prompt)).is_err() {
        return false;
    }
    matches!(
        term.read_line().map(|answer| answer.trim().to_lowercase()),
        Ok(answer) if answer == "y" || answer == "yes"
    )
}

async fn analyze(
    config: ClientConfig,
    video: Option<PathBuf>,
    category: PostureCategory,
    show_frames: bool,
) -> Result<()> {
    let endpoint = config.endpoint.clone();
    let analyzer = Arc::new(HttpAnalyzer::new(config)?);
    let widget = UploadAnalyzeWidget::new(analyzer, Arc::new(ConsoleNotifier));

    if let Some(video) = video {
        widget.set_file(VideoFile::new(video));
    }
    widget.set_category(category);

    println!(
        "\n{}  {}\n",
        style("posture-recognizer").cyan().bold(),
        style(format!("{} via {}", category, endpoint)).dim()
    );

    let start = Instant::now();
    let file_label = widget
        .inputs()
        .file()
        .map(VideoFile::file_name)
        .unwrap_or_default();
    let spinner = create_spinner(&format!("Analyzing {}...", file_label));

    if widget.submit().await.is_err() {
        // The alert has already been shown by the notifier.
        spinner.finish_and_clear();
        std::process::exit(1);
    }

    let frames = widget.frames();
    spinner.finish_with_message(format!(
        "{} Analyzed: {} frames {}",
        style("✓").green().bold(),
        frames.len(),
        style(format!("[{}]", format_duration(start.elapsed()))).dim()
    ));
    println!("{}", style("─".repeat(60)).dim());

    if widget.popups().summary_open {
        println!("{}", format_summary_panel(&widget.summary_view()));
        if show_frames || confirm("View frame-wise feedback? [y/N]") {
            widget.open_frame_wise();
        }
        widget.close_summary();
    }

    if widget.popups().frame_wise_open {
        println!("{}", format_frame_wise_panel(&frames));
        widget.close_frame_wise();
    }

    Ok(())
}

async fn ping(config: ClientConfig) -> Result<()> {
    let endpoint = config.endpoint.clone();
    let analyzer = HttpAnalyzer::new(config)?;
    let spinner = create_spinner(&format!("Pinging {}...", endpoint));

    match analyzer.ping().await {
        Ok(reply) => {
            spinner.finish_with_message(format!(
                "{} Service reachable {}",
                style("✓").green().bold(),
                style(format!("({})", reply)).dim()
            ));
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            tracing::error!(error = %e, "Ping failed");
            eprintln!(
                "{} Analysis service at {} is not reachable",
                style("Error:").red().bold(),
                endpoint
            );
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match ClientConfig::from_env()
        .map_err(anyhow::Error::from)
        .and_then(|config| apply_overrides(config, cli.endpoint, cli.timeout))
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Command::Analyze {
            video,
            category,
            frames,
        } => analyze(config, video, category, frames).await,
        Command::Ping => ping(config).await,
    }
}

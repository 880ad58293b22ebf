//! CLI front end for simulated video generations.
//!
//! State lives in a directory (`--store-dir`, default `.videoai`) with the
//! same records a browser keeps in `localStorage`, so a generation started
//! here survives the process and is resumed by the next invocation.
//!
//! Usage:
//!   videoai generate -d "A spaceship flies through the stars" [--duration 60]
//!       [--resolution 1920x1080] [--format mp4] [--audio beat.mp3] [--detach]
//!       [--save] [--download]
//!   videoai status [--json]
//!   videoai watch [--save --description "..."] [--download] [--format mp4]
//!   videoai gallery list|delete <id>|download <id>

mod output;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use videoai::config::DEFAULT_PLACEHOLDER_URL;
use videoai::{
    ControllerConfig, EndTimePolicy, ExportFormat, FileStore, GenerationController,
    GenerationRequest, Resolution, SystemClock, VideoDuration, VideoError,
};

use watch::Outcome;

type Controller = GenerationController<FileStore, SystemClock>;

#[derive(Parser, Debug)]
#[command(
    name = "videoai",
    about = "Start, follow and manage simulated text-to-video generations",
    version
)]
struct Args {
    /// Directory holding the session and gallery records
    #[arg(long, global = true, env = "VIDEOAI_STORE_DIR", default_value = ".videoai")]
    store_dir: PathBuf,

    /// How the persisted end time moves while ticking (resync or pinned)
    #[arg(long, global = true, env = "VIDEOAI_END_TIME_POLICY", default_value = "resync")]
    end_time_policy: EndTimePolicy,

    /// Artifact reference produced when a generation completes
    #[arg(long, global = true, env = "VIDEOAI_PLACEHOLDER_URL", default_value = DEFAULT_PLACEHOLDER_URL)]
    placeholder_url: String,

    /// Milliseconds between countdown ticks
    #[arg(long, global = true, env = "VIDEOAI_TICK_MS", default_value_t = 1000)]
    tick_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a new generation and follow its countdown
    Generate(GenerateArgs),

    /// Show the current session
    Status {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Follow a running session to completion
    Watch(FinishArgs),

    /// Manage saved videos
    Gallery {
        #[command(subcommand)]
        command: GalleryCommand,
    },
}

#[derive(ClapArgs, Debug)]
struct GenerateArgs {
    /// What the video should show
    #[arg(short, long)]
    description: String,

    /// Video length in seconds (30, 60, 120, 180, 240, 300)
    #[arg(long, default_value = "60")]
    duration: VideoDuration,

    /// Output resolution (1280x720, 1920x1080, 3840x2160)
    #[arg(long, default_value = "1920x1080")]
    resolution: Resolution,

    /// Export format (mp4, mov, webm)
    #[arg(long, default_value = "mp4")]
    format: ExportFormat,

    /// Name of an audio file to attach
    #[arg(long)]
    audio: Option<String>,

    /// MIME type of the audio file (guessed from the extension by default)
    #[arg(long)]
    audio_mime: Option<String>,

    /// Start the countdown and exit without following it
    #[arg(long)]
    detach: bool,

    /// Save the finished video to the gallery
    #[arg(long, conflicts_with = "detach")]
    save: bool,

    /// Print the download target of the finished video
    #[arg(long, conflicts_with = "detach")]
    download: bool,
}

#[derive(ClapArgs, Debug)]
struct FinishArgs {
    /// Export format for --download
    #[arg(long, default_value = "mp4")]
    format: ExportFormat,

    /// Save the finished video to the gallery
    #[arg(long, requires = "description")]
    save: bool,

    /// Description used for the gallery title
    #[arg(short, long)]
    description: Option<String>,

    /// Print the download target of the finished video
    #[arg(long)]
    download: bool,
}

#[derive(Subcommand, Debug)]
enum GalleryCommand {
    /// List saved videos, newest first
    List {
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a saved video
    Delete { id: String },

    /// Print the download target of a saved video
    Download { id: String },
}

/// Exit status for input the user can correct (blank description, wrong
/// file type, a generation already running).
const EXIT_INVALID_INPUT: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "videoai=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match validation_message(&err) {
            Some(message) => {
                eprintln!("{}", message);
                ExitCode::from(EXIT_INVALID_INPUT)
            }
            None => {
                eprintln!("Error: {:?}", err);
                ExitCode::FAILURE
            }
        },
    }
}

/// Notice text for user-correctable errors; `None` for real failures.
fn validation_message(err: &anyhow::Error) -> Option<String> {
    let video = err.downcast_ref::<VideoError>()?;
    if !video.is_validation() {
        return None;
    }
    Some(match video {
        VideoError::AlreadyGenerating => {
            format!("{}. Run `videoai watch` to follow it.", video)
        }
        other => other.to_string(),
    })
}

async fn run(args: Args) -> Result<()> {
    let config = ControllerConfig::new()
        .with_end_time_policy(args.end_time_policy)
        .with_placeholder_url(args.placeholder_url.clone())
        .with_tick_interval(Duration::from_millis(args.tick_ms.max(1)));
    let store = FileStore::new(&args.store_dir);
    let mut controller = GenerationController::new(store, SystemClock, config);

    // Like reopening the page: pick up whatever the last run left behind.
    if let Some(event) = controller
        .resume()
        .context("Failed to read session state")?
    {
        output::print_notice(&event);
    }

    match args.command {
        Command::Generate(generate) => run_generate(&mut controller, generate).await,
        Command::Status { json } => output::print_status(&controller, json),
        Command::Watch(finish) => {
            if watch::follow(&mut controller).await? == Outcome::Detached {
                return Ok(());
            }
            run_finish(&controller, &finish)
        }
        Command::Gallery { command } => run_gallery(&controller, command),
    }
}

async fn run_generate(controller: &mut Controller, args: GenerateArgs) -> Result<()> {
    let mut request = GenerationRequest::new(args.description.clone())
        .with_duration(args.duration)
        .with_resolution(args.resolution)
        .with_format(args.format);

    if let Some(ref name) = args.audio {
        let mime = args
            .audio_mime
            .clone()
            .unwrap_or_else(|| guess_mime(name).to_string());
        request.attach_audio(name, &mime)?;
    }

    let event = controller.submit(&request)?;
    output::print_notice(&event);

    if args.detach {
        println!("Detached. Run `videoai watch` to follow the countdown.");
        return Ok(());
    }

    if watch::follow(controller).await? == Outcome::Detached {
        return Ok(());
    }

    let finish = FinishArgs {
        format: args.format,
        save: args.save,
        description: Some(args.description),
        download: args.download,
    };
    run_finish(controller, &finish)
}

fn run_finish(controller: &Controller, args: &FinishArgs) -> Result<()> {
    if controller.result().is_none() {
        if args.save || args.download {
            anyhow::bail!("No finished video to save or download");
        }
        println!("No generation in progress.");
        return Ok(());
    }

    if args.download {
        let target = controller.download_target(args.format)?;
        output::print_download(&target);
    }

    if args.save {
        let description = args.description.as_deref().unwrap_or_default();
        let entry = controller
            .save_to_gallery(description)
            .context("Failed to save to gallery")?;
        println!("Saved to gallery: {} ({})", entry.title, entry.id);
    }

    Ok(())
}

fn run_gallery(controller: &Controller, command: GalleryCommand) -> Result<()> {
    let gallery = controller.gallery();
    match command {
        GalleryCommand::List { json } => {
            let entries = gallery.list().context("Failed to read gallery")?;
            output::print_gallery(&entries, json)
        }
        GalleryCommand::Delete { id } => {
            if gallery.delete(&id).context("Failed to update gallery")? {
                println!("Deleted {}", id);
            } else {
                println!("No gallery entry with id {}", id);
            }
            Ok(())
        }
        GalleryCommand::Download { id } => {
            let target = gallery.download_target(&id)?;
            output::print_download(&target);
            Ok(())
        }
    }
}

/// Best-effort MIME type from a file extension.
fn guess_mime(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "m4a" | "aac" => "audio/aac",
        "flac" => "audio/flac",
        "opus" => "audio/opus",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "mp4" => "video/mp4",
        _ => "application/octet-stream",
    }
}

//! Terminal rendering of notices, snapshots and gallery entries.

use anyhow::Result;

use videoai::generation::format_clock;
use videoai::{
    DownloadTarget, FileStore, GalleryEntry, GenerationController, Phase, SessionEvent,
    SystemClock,
};

pub fn print_notice(event: &SessionEvent) {
    if event.is_notice() {
        println!("{}: {}", event.title(), event.message());
    }
}

pub fn print_status(
    controller: &GenerationController<FileStore, SystemClock>,
    json: bool,
) -> Result<()> {
    let snapshot = controller.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    match snapshot.phase {
        Phase::Running => {
            println!("Generating: {}% done", snapshot.progress_percent);
            println!("  Remaining: {}", format_clock(snapshot.remaining_secs));
            println!("  Estimated: {}", format_clock(snapshot.estimated_total_secs));
            if let Some(name) = snapshot.audio_track_name {
                println!("  Music:     {}", name);
            }
        }
        Phase::Idle => match snapshot.result {
            Some(result) => println!("Video ready: {}", result.video_url),
            None => println!("No generation in progress."),
        },
    }
    Ok(())
}

pub fn print_download(target: &DownloadTarget) {
    println!("{}\t{}", target.file_name, target.url);
}

pub fn print_gallery(entries: &[GalleryEntry], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("Gallery is empty.");
        return Ok(());
    }

    for entry in entries {
        println!("  {}  {}  {}", entry.id, entry.created_at, entry.title);
    }
    println!("\n{} video(s)", entries.len());
    Ok(())
}

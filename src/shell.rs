//! Interactive prompt loop
//!
//! The whole CLI surface: prompt for a URL (or bare id), audio/video
//! choice, and for video an indexed resolution pick. Failures print a
//! short diagnostic and the loop continues.

use crate::downloader::catalog::available_resolutions;
use crate::downloader::orchestrator::{DownloadOutcome, Orchestrator};
use crate::downloader::paths::{format_upload_date, sanitize};
use crate::downloader::transcoder::Transcoder;
use crate::extractor::models::MediaInfo;
use crate::extractor::traits::MediaEngine;
use crate::extractor::ytdlp::normalize_url;
use anyhow::Result;
use std::io::{self, Write};

const QUIT_SENTINEL: &str = "q";

/// Run the prompt loop until the quit sentinel is entered
pub async fn run<E: MediaEngine, T: Transcoder>(orchestrator: &Orchestrator<E, T>) -> Result<()> {
    loop {
        let input = prompt("Enter URL or video ID (or 'q' to quit): ")?;
        if input.eq_ignore_ascii_case(QUIT_SENTINEL) {
            println!("Exiting. Goodbye!");
            return Ok(());
        }
        if input.is_empty() {
            continue;
        }

        let url = normalize_url(&input);
        if let Err(e) = run_once(orchestrator, &url).await {
            eprintln!("Failed: {e:#}");
        }
        println!();
    }
}

/// One prompt-and-download iteration; errors abort only this iteration
async fn run_once<E: MediaEngine, T: Transcoder>(
    orchestrator: &Orchestrator<E, T>,
    url: &str,
) -> Result<()> {
    let choice = prompt("Download (a)udio or (v)ideo? [a/v]: ")?;

    let outcome = if choice.eq_ignore_ascii_case("a") {
        orchestrator.download_audio(url).await?
    } else {
        let info = orchestrator.fetch_info(url).await?;
        print_media_card(&info, orchestrator);

        let catalog =
            available_resolutions(&info.streams, &orchestrator.settings().selectable_containers);
        let resolution = if catalog.is_empty() {
            println!("No selectable resolutions, using engine best.");
            None
        } else {
            pick_resolution(&catalog)?
        };

        orchestrator.download_video(url, resolution).await?
    };

    match outcome {
        DownloadOutcome::Completed(path) => println!("Saved to {}", path.display()),
        DownloadOutcome::Skipped(path) => println!("Already present: {}", path.display()),
    }
    Ok(())
}

/// Display the catalog indexed from 1; blank input means engine best
fn pick_resolution(catalog: &[u32]) -> Result<Option<u32>> {
    println!("Available resolutions:");
    for (i, height) in catalog.iter().enumerate() {
        println!("{}. {}p", i + 1, height);
    }

    let selection = prompt(&format!(
        "Select resolution [1-{}] or press Enter for best: ",
        catalog.len()
    ))?;

    Ok(selection
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=catalog.len()).contains(n))
        .map(|n| catalog[n - 1]))
}

/// Short metadata card shown before a video download starts
fn print_media_card<E: MediaEngine, T: Transcoder>(
    info: &MediaInfo,
    orchestrator: &Orchestrator<E, T>,
) {
    let channel = info.channel_or_uploader().unwrap_or("unknown");
    let folder = orchestrator.settings().base_path.join(sanitize(channel));

    println!("\n=== Media Information ===");
    println!("Title   : {}", info.title);
    println!("Channel : {}", channel);
    println!("Upload  : {}", format_upload_date(info.upload_date.as_deref()));
    println!("Length  : {}", format_duration(info.duration));
    println!("=========================");
    println!("Destination folder: {}\n", folder.display());
}

/// Human-readable duration: MM:SS, or HH:MM:SS from one hour up
fn format_duration(seconds: Option<u64>) -> String {
    let Some(total) = seconds else {
        return "unknown".to_string();
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

fn prompt(message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_minutes() {
        assert_eq!(format_duration(Some(213)), "03:33");
    }

    #[test]
    fn test_format_duration_hours() {
        assert_eq!(format_duration(Some(3723)), "1:02:03");
    }

    #[test]
    fn test_format_duration_unknown() {
        assert_eq!(format_duration(None), "unknown");
    }
}

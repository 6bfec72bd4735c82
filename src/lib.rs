//! Playback and processing core for turning uploaded documents into short
//! audio summaries with a synchronized transcript.

pub mod book;
pub mod cancellation;
pub mod config;
pub mod error;
pub mod library;
pub mod playback;
pub mod processing;
pub mod sample;
pub mod text_utils;
pub mod upload;

use std::fs;
use std::path::Path;
use ts_rs::TS;

fn export_single_type<T: TS + 'static>(out_dir: &Path) -> Result<(), String> {
    T::export_all_to(out_dir).map_err(|err| err.to_string())
}

/// Write TypeScript declarations for every type the UI receives.
pub fn export_ts_bindings(out_dir: &Path) -> Result<(), String> {
    fs::create_dir_all(out_dir)
        .map_err(|err| format!("Failed to create {}: {err}", out_dir.display()))?;

    for entry in fs::read_dir(out_dir)
        .map_err(|err| format!("Failed to list {}: {err}", out_dir.display()))?
    {
        let entry = entry.map_err(|err| format!("Failed to read entry: {err}"))?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("ts") {
            fs::remove_file(&path)
                .map_err(|err| format!("Failed to remove {}: {err}", path.display()))?;
        }
    }

    export_single_type::<playback::PlaybackEvent>(out_dir)?;
    export_single_type::<playback::PlaybackSnapshot>(out_dir)?;
    export_single_type::<playback::PlaybackStatus>(out_dir)?;
    export_single_type::<book::BookSummary>(out_dir)?;
    export_single_type::<book::TranscriptSegment>(out_dir)?;
    export_single_type::<config::SpeedProfile>(out_dir)?;
    export_single_type::<upload::FileKind>(out_dir)?;
    export_single_type::<upload::RecordStatus>(out_dir)?;
    export_single_type::<upload::UploadRecord>(out_dir)?;
    export_single_type::<processing::ProcessingProgress>(out_dir)?;

    let index_content = r#"export type { PlaybackEvent } from "./PlaybackEvent";
export type { PlaybackSnapshot } from "./PlaybackSnapshot";
export type { PlaybackStatus } from "./PlaybackStatus";
export type { BookSummary } from "./BookSummary";
export type { TranscriptSegment } from "./TranscriptSegment";
export type { SpeedProfile } from "./SpeedProfile";
export type { FileKind } from "./FileKind";
export type { RecordStatus } from "./RecordStatus";
export type { UploadRecord } from "./UploadRecord";
export type { ProcessingProgress } from "./ProcessingProgress";
"#;

    fs::write(out_dir.join("index.ts"), index_content).map_err(|err| {
        format!(
            "Failed to write {}: {err}",
            out_dir.join("index.ts").display()
        )
    })?;

    Ok(())
}

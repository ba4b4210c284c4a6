/// Batch orchestration
///
/// Runs (input files) x (selected presets) through the composition engine,
/// collecting one PNG artifact per pair. Failures are isolated per file: a
/// screenshot that fails to decode is recorded and skipped, and the rest
/// of the batch continues.

use std::io::Cursor;

use image::RgbaImage;

use crate::catalog::OutputPreset;
use crate::compose::engine::{self, PresentationOptions};
use crate::error::{Error, Result};
use crate::state::bezels::BezelRegistry;
use crate::state::margins::MarginStore;

/// One input screenshot, read into memory but not yet decoded
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// One finished mockup, ready for the archive/download collaborator
#[derive(Debug, Clone)]
pub struct GeneratedArtifact {
    /// "{source base name}-{preset id}.png"
    pub filename: String,
    /// Encoded PNG bytes
    pub bytes: Vec<u8>,
}

/// Everything a batch run produced and reported
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub artifacts: Vec<GeneratedArtifact>,
    /// (filename, reason) for every input file that could not be processed
    pub failed_files: Vec<(String, String)>,
    /// ("{base}-{preset id}", reason) for every pair that failed to compose
    /// or encode; the rest of the batch is unaffected
    pub failed_pairs: Vec<(String, String)>,
    /// Selected preset ids with no uploaded bezel asset (informational;
    /// composition falls back to the procedural bezel)
    pub missing_bezels: Vec<String>,
}

/// Run a full batch: every file against every selected preset.
///
/// The selection is deduplicated by preset id, preserving first-seen
/// order. Files are processed in input order; within one file, presets in
/// selection order. Each finished artifact is passed to `on_artifact`
/// before being collected into the report, so the caller can stream
/// previews while the batch is still running.
pub fn run_batch(
    files: &[SourceFile],
    selection: &[&OutputPreset],
    options: &PresentationOptions,
    margins: &mut MarginStore,
    bezels: &BezelRegistry,
    mut on_artifact: impl FnMut(&GeneratedArtifact),
) -> Result<BatchReport> {
    let unique = dedupe_selection(selection);
    if files.is_empty() || unique.is_empty() {
        return Err(Error::EmptySelection);
    }

    let mut report = BatchReport::default();
    if options.bezel_enabled && options.use_bezel_asset {
        report.missing_bezels = bezels.missing_for(unique.iter().copied());
    }

    for file in files {
        // decode once per file, compose once per preset
        let decoded = match image::load_from_memory(&file.bytes) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                eprintln!("⚠️  Skipping {}: {}", file.name, e);
                report.failed_files.push((file.name.clone(), e.to_string()));
                continue;
            }
        };
        let base = base_name(&file.name);

        for preset in &unique {
            let record = margins.get(preset);
            // a bad pair is recorded and skipped, like a bad file
            match compose_pair(&decoded, &base, preset, options, bezels, record) {
                Ok(artifact) => {
                    on_artifact(&artifact);
                    report.artifacts.push(artifact);
                }
                Err(e) => {
                    eprintln!("⚠️  Skipping {}-{}: {}", base, preset.id, e);
                    report
                        .failed_pairs
                        .push((format!("{}-{}", base, preset.id), e.to_string()));
                }
            }
        }
    }

    println!(
        "✅ Batch complete: {} artifacts, {} files failed, {} pairs failed",
        report.artifacts.len(),
        report.failed_files.len(),
        report.failed_pairs.len()
    );
    Ok(report)
}

fn compose_pair(
    decoded: &RgbaImage,
    base: &str,
    preset: &OutputPreset,
    options: &PresentationOptions,
    bezels: &BezelRegistry,
    record: crate::state::margins::MarginRecord,
) -> Result<GeneratedArtifact> {
    let bezel_asset = bezels.get(preset.id);
    let out = engine::compose(decoded, preset, options, bezel_asset, Some(record))?;

    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(out).write_to(&mut buf, image::ImageFormat::Png)?;

    Ok(GeneratedArtifact {
        filename: format!("{}-{}.png", base, preset.id),
        bytes: buf.into_inner(),
    })
}

/// Drop repeated presets, keeping the first occurrence of each id
fn dedupe_selection<'a>(selection: &[&'a OutputPreset]) -> Vec<&'a OutputPreset> {
    let mut unique: Vec<&OutputPreset> = Vec::new();
    for preset in selection {
        if !unique.iter().any(|p| p.id == preset.id) {
            unique.push(preset);
        }
    }
    unique
}

/// Filename with its last extension stripped
fn base_name(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((base, _)) if !base.is_empty() => base,
        _ => name,
    }
}

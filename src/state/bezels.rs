/// Bezel asset registry
///
/// Uploaded bezel rasters are keyed by preset id. The key is derived from
/// the filename by an ordered list of matcher strategies, first match wins:
/// 1. the `bezel-` pattern: optional "bezel-" prefix, an alphanumeric
///    preset key, an orientation suffix, and a raster extension
///    (e.g. "bezel-10-land.png" -> "10-land")
/// 2. exact catalog id: the extension-stripped basename equals a preset id
///    (e.g. "ipad-pro-land.png" -> "ipad-pro-land")
///
/// Loading a batch replaces the registry wholesale; re-running the upload
/// discards prior assets.

use std::collections::HashMap;

use image::{imageops::FilterType, RgbaImage};

use crate::catalog::{self, OutputPreset};

/// A filename matcher strategy: returns the registry key, or no match
type Matcher = fn(&str) -> Option<String>;

/// Ordered matcher strategies applied to each uploaded filename
const MATCHERS: &[Matcher] = &[match_patterned, match_exact_id];

/// Derive the registry key for an uploaded bezel filename
pub fn match_filename(name: &str) -> Option<String> {
    MATCHERS.iter().find_map(|m| m(name))
}

/// Strategy 1: `(bezel-)?<alnum key>-(land|port).(png|jpg|jpeg)`
fn match_patterned(name: &str) -> Option<String> {
    let lower = name.to_lowercase();
    let (stem, ext) = lower.rsplit_once('.')?;
    if !matches!(ext, "png" | "jpg" | "jpeg") {
        return None;
    }

    let stem = stem.strip_prefix("bezel-").unwrap_or(stem);
    let (key, orientation) = stem.rsplit_once('-')?;
    if !matches!(orientation, "land" | "port") {
        return None;
    }
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(format!("{}-{}", key, orientation))
}

/// Strategy 2: extension-stripped basename equal to a catalog preset id
fn match_exact_id(name: &str) -> Option<String> {
    let lower = name.to_lowercase();
    let stem = lower.rsplit_once('.').map(|(s, _)| s).unwrap_or(&lower);
    catalog::find_by_id(stem).map(|p| p.id.to_string())
}

/// One file that could not be loaded, with the reason
#[derive(Debug, Clone)]
pub struct RejectedFile {
    pub filename: String,
    pub reason: String,
}

/// Outcome of a bezel upload batch
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub rejected: Vec<RejectedFile>,
}

/// Mapping from preset id to its uploaded bezel raster
#[derive(Debug, Clone, Default)]
pub struct BezelRegistry {
    assets: HashMap<String, RgbaImage>,
}

impl BezelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registry contents with a batch of uploaded files.
    ///
    /// Each file is decoded and keyed independently; a failure rejects that
    /// file only and never aborts the batch.
    pub fn load_batch(&mut self, files: &[(String, Vec<u8>)]) -> LoadReport {
        self.assets.clear();
        let mut report = LoadReport::default();

        for (name, bytes) in files {
            let decoded = match image::load_from_memory(bytes) {
                Ok(img) => img.to_rgba8(),
                Err(e) => {
                    report.rejected.push(RejectedFile {
                        filename: name.clone(),
                        reason: format!("decode failed: {}", e),
                    });
                    continue;
                }
            };

            match match_filename(name) {
                Some(key) => {
                    self.assets.insert(key.clone(), decoded);
                    report.loaded.push(key);
                }
                None => report.rejected.push(RejectedFile {
                    filename: name.clone(),
                    reason: "unrecognized filename".to_string(),
                }),
            }
        }

        report
    }

    /// Read-only borrow of the asset for one preset
    pub fn get(&self, id: &str) -> Option<&RgbaImage> {
        self.assets.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.assets.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Ids from the selection that have no uploaded asset, in selection order
    pub fn missing_for<'a>(&self, selection: impl IntoIterator<Item = &'a OutputPreset>) -> Vec<String> {
        selection
            .into_iter()
            .filter(|p| !self.contains(p.id))
            .map(|p| p.id.to_string())
            .collect()
    }

    /// Replace the stored asset with a copy resampled to exactly the
    /// preset's output dimensions, so every later draw is a cheap blit.
    ///
    /// Idempotent but lossy: baking an already-baked asset resamples it
    /// again. Callers track bake state to avoid compounding blur.
    pub fn bake_to_preset(&mut self, preset: &OutputPreset) -> bool {
        let Some(asset) = self.assets.get(preset.id) else {
            return false;
        };
        if asset.width() == preset.width && asset.height() == preset.height {
            return true;
        }
        let scaled = image::imageops::resize(asset, preset.width, preset.height, FilterType::Lanczos3);
        self.assets.insert(preset.id.to_string(), scaled);
        true
    }
}

/// Bezel margin records and their store
///
/// A margin record describes where the screenshot shows through the bezel:
/// four pixel insets measured from the edges of a specific preset's output
/// raster. Records are created lazily with a computed default, edited by
/// the margin editor, and bulk imported/exported as JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{self, OutputPreset};
use crate::compose::geometry::Rect;
use crate::error::{Error, Result};

/// Fraction of the shorter output dimension used for the default inset
const DEFAULT_INSET_RATIO: f32 = 0.06;

/// Pixel insets from each output edge to the visible screen rectangle
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MarginRecord {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl MarginRecord {
    /// Equal inset on all four sides
    pub fn uniform(m: f32) -> Self {
        MarginRecord {
            left: m,
            top: m,
            right: m,
            bottom: m,
        }
    }

    /// Computed default for an output of the given dimensions:
    /// 6% of the shorter side, rounded, on every edge
    pub fn default_for(width: u32, height: u32) -> Self {
        MarginRecord::uniform((width.min(height) as f32 * DEFAULT_INSET_RATIO).round())
    }

    /// The screen rectangle these margins leave inside an output of the
    /// given dimensions, clamped so it is never smaller than 1x1
    pub fn screen_rect(&self, width: u32, height: u32) -> Rect {
        let w = (width as f32 - self.left - self.right).max(1.0);
        let h = (height as f32 - self.top - self.bottom).max(1.0);
        Rect::new(self.left, self.top, w, h)
    }

    /// Clamp to the store invariants for a preset of the given dimensions:
    /// no negative offsets, and opposite pairs always leave at least a
    /// 1-pixel inner rectangle. Overflow is taken from both sides evenly.
    fn clamped(mut self, width: u32, height: u32) -> Self {
        self.left = self.left.max(0.0);
        self.top = self.top.max(0.0);
        self.right = self.right.max(0.0);
        self.bottom = self.bottom.max(0.0);

        let (l, r) = clamp_pair(self.left, self.right, width as f32 - 1.0);
        let (t, b) = clamp_pair(self.top, self.bottom, height as f32 - 1.0);
        MarginRecord {
            left: l,
            top: t,
            right: r,
            bottom: b,
        }
    }
}

/// Reduce `a` and `b` symmetrically until `a + b <= max_sum`
fn clamp_pair(a: f32, b: f32, max_sum: f32) -> (f32, f32) {
    let max_sum = max_sum.max(0.0);
    let excess = a + b - max_sum;
    if excess <= 0.0 {
        return (a, b);
    }
    let mut a = a - excess / 2.0;
    let mut b = b - excess / 2.0;
    // one side may not have enough to give; take the rest from the other
    if a < 0.0 {
        b += a;
        a = 0.0;
    }
    if b < 0.0 {
        a += b;
        b = 0.0;
    }
    (a.max(0.0), b.max(0.0))
}

/// Outcome of a bulk JSON import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub applied: usize,
    pub skipped: usize,
}

/// Mapping from preset identifier to its margin record.
///
/// The store is the only owner of margin data. Reads default lazily;
/// writes clamp; nothing else mutates records.
#[derive(Debug, Clone, Default)]
pub struct MarginStore {
    records: BTreeMap<String, MarginRecord>,
}

impl MarginStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current record for a preset, computing and storing the 6% default
    /// when none exists yet
    pub fn get(&mut self, preset: &OutputPreset) -> MarginRecord {
        *self
            .records
            .entry(preset.id.to_string())
            .or_insert_with(|| MarginRecord::default_for(preset.width, preset.height))
    }

    /// Like `get`, for callers that only hold an identifier
    pub fn get_by_id(&mut self, id: &str) -> Result<MarginRecord> {
        let preset =
            catalog::find_by_id(id).ok_or_else(|| Error::UnknownPreset(id.to_string()))?;
        Ok(self.get(preset))
    }

    /// Record for a preset if one is stored, without creating a default
    pub fn peek(&self, id: &str) -> Option<MarginRecord> {
        self.records.get(id).copied()
    }

    /// Overwrite a preset's record, clamped to the store invariants
    pub fn set(&mut self, preset: &OutputPreset, record: MarginRecord) {
        self.records.insert(
            preset.id.to_string(),
            record.clamped(preset.width, preset.height),
        );
    }

    /// Drop any stored record so the next `get` recomputes the default
    pub fn reset(&mut self, id: &str) {
        self.records.remove(id);
    }

    /// Apply a JSON mapping of preset id -> margin record.
    ///
    /// Entries with an unknown id or missing/mistyped fields are skipped and
    /// counted; a valid entry is applied through `set` (so it is clamped).
    /// Only a top-level parse failure is an error.
    pub fn import_json(&mut self, text: &str) -> Result<ImportSummary> {
        let parsed: BTreeMap<String, serde_json::Value> = serde_json::from_str(text)
            .map_err(|e| Error::Decode {
                name: "margin JSON".to_string(),
                reason: e.to_string(),
            })?;

        let mut summary = ImportSummary::default();
        for (id, value) in parsed {
            let preset = match catalog::find_by_id(&id) {
                Some(p) => p,
                None => {
                    summary.skipped += 1;
                    continue;
                }
            };
            match serde_json::from_value::<MarginRecord>(value) {
                Ok(record) => {
                    self.set(preset, record);
                    summary.applied += 1;
                }
                Err(_) => summary.skipped += 1,
            }
        }
        Ok(summary)
    }

    /// Serialize the current store verbatim as pretty JSON
    pub fn export_json(&self) -> String {
        serde_json::to_string_pretty(&self.records).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_by_id;

    #[test]
    fn test_default_for_10_land() {
        // round(min(1280, 800) * 0.06) = 48 on every side
        let m = MarginRecord::default_for(1280, 800);
        assert_eq!(m, MarginRecord::uniform(48.0));

        let rect = m.screen_rect(1280, 800);
        assert_eq!((rect.x, rect.y, rect.w, rect.h), (48.0, 48.0, 1184.0, 704.0));
    }

    #[test]
    fn test_get_is_lazy_and_sticky() {
        let mut store = MarginStore::new();
        let preset = find_by_id("10-land").unwrap();
        assert!(store.peek("10-land").is_none());

        let m = store.get(preset);
        assert_eq!(m, MarginRecord::uniform(48.0));
        assert_eq!(store.peek("10-land"), Some(m));
    }

    #[test]
    fn test_get_by_id_unknown_preset() {
        let mut store = MarginStore::new();
        assert!(store.get_by_id("not-a-preset").is_err());
    }

    #[test]
    fn test_set_clamps_negatives() {
        let mut store = MarginStore::new();
        let preset = find_by_id("10-land").unwrap();
        store.set(
            preset,
            MarginRecord {
                left: -20.0,
                top: 10.0,
                right: 30.0,
                bottom: -1.0,
            },
        );
        let m = store.peek("10-land").unwrap();
        assert_eq!(m.left, 0.0);
        assert_eq!(m.bottom, 0.0);
        assert_eq!(m.right, 30.0);
    }

    #[test]
    fn test_set_clamps_oversized_pairs() {
        let mut store = MarginStore::new();
        let preset = find_by_id("10-land").unwrap(); // 1280x800
        store.set(
            preset,
            MarginRecord {
                left: 900.0,
                top: 500.0,
                right: 900.0,
                bottom: 500.0,
            },
        );
        let m = store.peek("10-land").unwrap();
        assert!(m.left + m.right < 1280.0);
        assert!(m.top + m.bottom < 800.0);
        assert!(m.left >= 0.0 && m.right >= 0.0);
        // symmetric reduction keeps the pair balanced
        assert_eq!(m.left, m.right);
        assert_eq!(m.top, m.bottom);
    }

    #[test]
    fn test_set_clamps_lopsided_pair() {
        let mut store = MarginStore::new();
        let preset = find_by_id("10-land").unwrap();
        store.set(
            preset,
            MarginRecord {
                left: 10.0,
                top: 0.0,
                right: 2000.0,
                bottom: 0.0,
            },
        );
        let m = store.peek("10-land").unwrap();
        assert!(m.left + m.right < 1280.0);
        assert!(m.left >= 0.0);
    }

    #[test]
    fn test_reset_recomputes_default() {
        let mut store = MarginStore::new();
        let preset = find_by_id("10-land").unwrap();
        store.set(preset, MarginRecord::uniform(10.0));
        store.reset("10-land");
        assert_eq!(store.get(preset), MarginRecord::uniform(48.0));
    }

    #[test]
    fn test_import_skips_malformed_entries() {
        let mut store = MarginStore::new();
        let json = r#"{
            "10-land": { "left": 48, "top": 36, "right": 48, "bottom": 36 },
            "bad": { "left": "x" }
        }"#;
        let summary = store.import_json(json).unwrap();
        assert_eq!(summary, ImportSummary { applied: 1, skipped: 1 });
        assert_eq!(
            store.peek("10-land").unwrap(),
            MarginRecord {
                left: 48.0,
                top: 36.0,
                right: 48.0,
                bottom: 36.0
            }
        );
    }

    #[test]
    fn test_import_skips_known_id_with_missing_field() {
        let mut store = MarginStore::new();
        let json = r#"{ "7-land": { "left": 1, "top": 2, "right": 3 } }"#;
        let summary = store.import_json(json).unwrap();
        assert_eq!(summary, ImportSummary { applied: 0, skipped: 1 });
        assert!(store.peek("7-land").is_none());
    }

    #[test]
    fn test_import_rejects_unparseable_blob() {
        let mut store = MarginStore::new();
        assert!(store.import_json("not json").is_err());
    }

    #[test]
    fn test_export_round_trip() {
        let mut store = MarginStore::new();
        let preset = find_by_id("gp-land").unwrap();
        store.set(preset, MarginRecord::uniform(70.0));

        let json = store.export_json();
        let mut other = MarginStore::new();
        let summary = other.import_json(&json).unwrap();
        assert_eq!(summary.applied, 1);
        assert_eq!(other.peek("gp-land"), store.peek("gp-land"));
    }
}

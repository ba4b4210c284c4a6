/// Static catalog of output presets
///
/// Every target the app can render to is defined here at process start:
/// store profile -> device group -> presets. The catalog is pure data;
/// nothing in it is computed or mutated at runtime.

use std::fmt;

use crate::error::{Error, Result};

/// Publishing destination a preset belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreProfile {
    Play,
    AppStore,
    Web,
}

impl StoreProfile {
    pub const ALL: [StoreProfile; 3] =
        [StoreProfile::Play, StoreProfile::AppStore, StoreProfile::Web];
}

impl fmt::Display for StoreProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreProfile::Play => write!(f, "Google Play"),
            StoreProfile::AppStore => write!(f, "App Store"),
            StoreProfile::Web => write!(f, "Web"),
        }
    }
}

/// A named output target with fixed pixel dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPreset {
    /// Unique identifier, also used as the margin/bezel map key
    pub id: &'static str,
    pub width: u32,
    pub height: u32,
    /// Human-readable label shown in the UI and preview cards
    pub label: &'static str,
    pub profile: StoreProfile,
    /// Device-size or category group within the profile
    pub group: &'static str,
}

impl fmt::Display for OutputPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// The full preset table, in catalog order.
///
/// Group order within a profile matters: `groups()` and selection
/// expansion preserve it.
pub const CATALOG: &[OutputPreset] = &[
    OutputPreset {
        id: "gp-land",
        width: 1920,
        height: 1080,
        label: "Google Play — Landscape (1920×1080)",
        profile: StoreProfile::Play,
        group: "gp",
    },
    OutputPreset {
        id: "gp-port",
        width: 1080,
        height: 1920,
        label: "Google Play — Portrait (1080×1920)",
        profile: StoreProfile::Play,
        group: "gp",
    },
    OutputPreset {
        id: "7-land",
        width: 1024,
        height: 600,
        label: "7\" — Landscape (1024×600)",
        profile: StoreProfile::Play,
        group: "7",
    },
    OutputPreset {
        id: "7-port",
        width: 600,
        height: 1024,
        label: "7\" — Portrait (600×1024)",
        profile: StoreProfile::Play,
        group: "7",
    },
    OutputPreset {
        id: "10-land",
        width: 1280,
        height: 800,
        label: "10\" — Landscape (1280×800)",
        profile: StoreProfile::Play,
        group: "10",
    },
    OutputPreset {
        id: "10-port",
        width: 800,
        height: 1280,
        label: "10\" — Portrait (800×1280)",
        profile: StoreProfile::Play,
        group: "10",
    },
    OutputPreset {
        id: "ipad-pro-land",
        width: 2732,
        height: 2048,
        label: "iPad Pro (12.9\") — Landscape",
        profile: StoreProfile::AppStore,
        group: "ipad",
    },
    OutputPreset {
        id: "ipad-pro-port",
        width: 2048,
        height: 2732,
        label: "iPad Pro (12.9\") — Portrait",
        profile: StoreProfile::AppStore,
        group: "ipad",
    },
    OutputPreset {
        id: "iphone-max-land",
        width: 2778,
        height: 1284,
        label: "iPhone (6.5\") — Landscape",
        profile: StoreProfile::AppStore,
        group: "iphone",
    },
    OutputPreset {
        id: "iphone-max-port",
        width: 1284,
        height: 2778,
        label: "iPhone (6.5\") — Portrait",
        profile: StoreProfile::AppStore,
        group: "iphone",
    },
    OutputPreset {
        id: "web-hero",
        width: 1600,
        height: 900,
        label: "Web Hero (16:9)",
        profile: StoreProfile::Web,
        group: "hero",
    },
];

/// Device groups of a profile, in catalog order, deduplicated
pub fn groups(profile: StoreProfile) -> Vec<&'static str> {
    let mut out = Vec::new();
    for p in CATALOG {
        if p.profile == profile && !out.contains(&p.group) {
            out.push(p.group);
        }
    }
    out
}

/// Presets of one device group, in catalog order
pub fn presets_in_group(profile: StoreProfile, group: &str) -> Vec<&'static OutputPreset> {
    CATALOG
        .iter()
        .filter(|p| p.profile == profile && p.group == group)
        .collect()
}

/// Look up a preset by identifier
pub fn find_by_id(id: &str) -> Option<&'static OutputPreset> {
    CATALOG.iter().find(|p| p.id == id)
}

/// Look up a preset by exact pixel dimensions within one profile
pub fn find_by_dimensions(
    profile: StoreProfile,
    width: u32,
    height: u32,
) -> Option<&'static OutputPreset> {
    CATALOG
        .iter()
        .find(|p| p.profile == profile && p.width == width && p.height == height)
}

/// Look up a preset by pixel dimensions across all profiles.
///
/// Unlike the scoped lookup this is an explicit error when two presets in
/// different profiles share the same dimensions, rather than silently
/// returning whichever comes first in the table.
pub fn find_by_dimensions_global(width: u32, height: u32) -> Result<&'static OutputPreset> {
    let matches: Vec<&OutputPreset> = CATALOG
        .iter()
        .filter(|p| p.width == width && p.height == height)
        .collect();

    match matches.len() {
        0 => Err(Error::UnknownPreset(format!("{}x{}", width, height))),
        1 => Ok(matches[0]),
        _ => Err(Error::AmbiguousDimensions {
            width,
            height,
            matches: matches.iter().map(|p| p.id.to_string()).collect(),
        }),
    }
}

/// Expand a profile/group choice into the list of presets a batch should
/// render.
///
/// For Google Play the 7" and 10" tablet sets are always included on top of
/// the chosen group, since the store requires tablet screenshots alongside
/// the primary phone set. Other profiles render the chosen group only.
pub fn expand_selection(profile: StoreProfile, group: &str) -> Vec<&'static OutputPreset> {
    let mut targets = presets_in_group(profile, group);

    if profile == StoreProfile::Play {
        for extra in ["7", "10"] {
            if group != extra {
                targets.extend(presets_in_group(profile, extra));
            }
        }
    }

    targets
}

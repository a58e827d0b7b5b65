//! Tolerant extraction of composition parameters from source text
//!
//! The composition source is a free-text blob; we only need four numeric
//! fields out of its `compositionConfig = { ... }` block. Extraction is
//! best-effort with per-field defaults and never fails.

use regex::Regex;
use std::sync::OnceLock;

/// Default duration in seconds
const DEFAULT_DURATION: f64 = 6.0;
/// Default frames per second
const DEFAULT_FPS: u32 = 30;
/// Default output width in pixels
const DEFAULT_WIDTH: u32 = 1080;
/// Default output height in pixels
const DEFAULT_HEIGHT: u32 = 1920;

/// Numeric parameters of one composition, always fully populated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositionConfig {
    pub duration: f64,
    pub fps: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        CompositionConfig {
            duration: DEFAULT_DURATION,
            fps: DEFAULT_FPS,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

fn block_regex() -> &'static Regex {
    static BLOCK_REGEX: OnceLock<Regex> = OnceLock::new();
    BLOCK_REGEX.get_or_init(|| {
        Regex::new(r"(?s)compositionConfig\s*=\s*\{([^}]+)\}")
            .expect("Failed to compile composition block regex")
    })
}

/// Find a named numeric field inside the config block
fn field_value(block: &str, key: &str) -> Option<f64> {
    static FIELD_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = FIELD_REGEX.get_or_init(|| {
        Regex::new(r"([A-Za-z][A-Za-z0-9]*)\s*:\s*([\d.]+)")
            .expect("Failed to compile composition field regex")
    });

    regex
        .captures_iter(block)
        .find(|caps| &caps[1] == key)
        .and_then(|caps| caps[2].parse::<f64>().ok())
}

/// Extract composition parameters from source text
///
/// Total over all inputs: a missing block yields all defaults, a missing
/// or unparsable field yields that field's default only. Only the first
/// `compositionConfig` block is considered. fps, width and height are
/// truncated to integers.
pub fn extract_composition_config(source: &str) -> CompositionConfig {
    let defaults = CompositionConfig::default();

    let Some(captures) = block_regex().captures(source) else {
        tracing::debug!("No compositionConfig block found, using defaults");
        return defaults;
    };
    let block = &captures[1];

    let int_field = |key: &str, fallback: u32| {
        field_value(block, key)
            .map(|v| v as u32)
            .unwrap_or(fallback)
    };

    CompositionConfig {
        duration: field_value(block, "durationInSeconds").unwrap_or(defaults.duration),
        fps: int_field("fps", defaults.fps),
        width: int_field("width", defaults.width),
        height: int_field("height", defaults.height),
    }
}

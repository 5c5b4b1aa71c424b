//! Display values derived from a layer's canonical fields.
//!
//! These are computed on every read and never stored on the layer, so they
//! cannot fall out of sync with the frame-based fields they come from.

use reelkit_common::{format_timecode, frames_to_seconds};
use serde::Serialize;

use crate::layer::Layer;

/// Read-only values an editor shows next to a layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayValues {
    /// Visible length in whole seconds.
    pub duration_secs: f64,
    pub start_secs: f64,
    pub end_secs: f64,
    /// `mm:ss` of the first visible frame.
    pub start_timecode: String,
    /// `mm:ss` of the end frame.
    pub end_timecode: String,
    /// Opacity as a whole percentage.
    pub opacity_percent: u32,
    /// Volume as a whole percentage, for audio-bearing layers.
    pub volume_percent: Option<u32>,
}

impl DisplayValues {
    pub fn of(layer: &Layer, fps: u32) -> Self {
        Self {
            duration_secs: frames_to_seconds(layer.duration_frames() as u64, fps),
            start_secs: frames_to_seconds(layer.start_frame as u64, fps),
            end_secs: frames_to_seconds(layer.end_frame as u64, fps),
            start_timecode: format_timecode(layer.start_frame as u64, fps),
            end_timecode: format_timecode(layer.end_frame as u64, fps),
            opacity_percent: percent(layer.opacity),
            volume_percent: layer.playback().map(|p| percent(p.volume)),
        }
    }
}

/// `round(value * 100)`, floored at zero.
pub fn percent(value: f64) -> u32 {
    let scaled = (value * 100.0).round();
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else {
        scaled as u32
    }
}

impl Layer {
    /// Visible length in whole seconds at `fps`.
    pub fn duration_secs(&self, fps: u32) -> f64 {
        frames_to_seconds(self.duration_frames() as u64, fps)
    }

    pub fn display(&self, fps: u32) -> DisplayValues {
        DisplayValues::of(self, fps)
    }
}

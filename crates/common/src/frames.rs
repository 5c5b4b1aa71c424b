//! Frame and time conversions for the composition timeline.
//!
//! All stored timing is in whole frames. Seconds are derived for display
//! only and never written back, so repeated edits cannot accumulate
//! rounding drift.

/// Frame index or frame count on a composition timeline.
pub type FrameIndex = u32;

/// Convert a frame count to whole seconds for display: `round(frames / fps)`.
///
/// Total: an `fps` of zero yields `0.0`.
pub fn frames_to_seconds(frame_count: u64, fps: u32) -> f64 {
    if fps == 0 {
        return 0.0;
    }
    (frame_count as f64 / fps as f64).round()
}

/// Convert seconds to the nearest frame count.
///
/// Negative and non-finite inputs map to frame 0; values beyond the frame
/// range saturate.
pub fn seconds_to_frames(secs: f64, fps: u32) -> FrameIndex {
    if !secs.is_finite() || secs <= 0.0 {
        return 0;
    }
    let frames = (secs * fps as f64).round();
    if frames >= FrameIndex::MAX as f64 {
        FrameIndex::MAX
    } else {
        frames as FrameIndex
    }
}

/// Format a frame index as `mm:ss` (truncated to the containing second).
pub fn format_timecode(frame: u64, fps: u32) -> String {
    let total_secs = if fps == 0 { 0 } else { frame / fps as u64 };
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

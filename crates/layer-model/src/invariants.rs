//! Layer invariants: timing, ranges, rotation, and kind-exclusivity.
//!
//! Every layer leaving this module satisfies:
//! - `0 <= start_frame < end_frame <= total_frames`
//! - opacity and volume in `[0, 1]`, rotation in `[0, 360)`
//! - kind-specific sizes, scales, and rates inside their documented ranges
//! - fades no longer than the layer itself
//!
//! Continuous-control input (sliders, drags) that overshoots is clamped or
//! wrapped silently. Only structural problems become errors: an inverted
//! interval, an empty composition, or a field the layer's kind lacks.

use reelkit_common::FrameIndex;

use crate::error::LayerError;
use crate::layer::{Layer, LayerProps, Playback};
use crate::patch::LayerPatch;

pub const OPACITY_RANGE: (f64, f64) = (0.0, 1.0);
pub const VOLUME_RANGE: (f64, f64) = (0.0, 1.0);
pub const PLAYBACK_RATE_RANGE: (f64, f64) = (0.25, 4.0);
pub const AVATAR_SCALE_RANGE: (f64, f64) = (0.5, 2.0);
pub const BUBBLE_FONT_SIZE_RANGE: (u32, u32) = (10, 60);
pub const STORY_FONT_SIZE_RANGE: (u32, u32) = (24, 72);
pub const TEXT_FONT_SIZE_RANGE: (u32, u32) = (8, 200);

/// Frame bounds of the owning composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub total_frames: FrameIndex,
}

impl Bounds {
    pub fn new(total_frames: FrameIndex) -> Self {
        Self { total_frames }
    }
}

/// Clamp a float into `[lo, hi]`; NaN reads as 0 first.
pub fn clamp_f64(value: f64, (lo, hi): (f64, f64)) -> f64 {
    let value = if value.is_nan() { 0.0 } else { value };
    value.clamp(lo, hi)
}

/// Clamp a wide integer into `[lo, hi]`.
pub fn clamp_u32(value: i64, (lo, hi): (u32, u32)) -> u32 {
    value.clamp(lo as i64, hi as i64) as u32
}

/// Wrap any angle into `[0, 360)`.
pub fn wrap_rotation(degrees: i64) -> u16 {
    degrees.rem_euclid(360) as u16
}

/// Quarter turn clockwise.
pub fn rotate_90(rotation: u16) -> u16 {
    wrap_rotation(rotation as i64 + 90)
}

/// Toggle between upright and upside-down. Angles other than 180 flip to 180.
pub fn flip(rotation: u16) -> u16 {
    if rotation % 360 == 180 {
        0
    } else {
        180
    }
}

/// Resolve a layer's interval against a patch.
///
/// A patched `end_frame` clamps to `[start + 1, total]`; a patched
/// `start_frame` clamps to `[0, end - 1]`. Setting both with `start >= end`
/// is an inversion and is rejected, as is any composition with no frames.
pub fn resolve_timing(
    current_start: FrameIndex,
    current_end: FrameIndex,
    patch_start: Option<i64>,
    patch_end: Option<i64>,
    bounds: Bounds,
) -> Result<(FrameIndex, FrameIndex), LayerError> {
    let total = bounds.total_frames as i64;
    if total == 0 {
        return Err(LayerError::invalid_timing("composition has no frames"));
    }

    let (start, end) = match (patch_start, patch_end) {
        (Some(start), Some(end)) => {
            if start >= end {
                return Err(LayerError::invalid_timing(format!(
                    "start frame {start} is not before end frame {end}"
                )));
            }
            let start = start.clamp(0, total - 1);
            (start, end.clamp(start + 1, total))
        }
        (Some(start), None) => {
            let end = (current_end as i64).min(total);
            if end == 0 {
                return Err(LayerError::invalid_timing("layer ends at frame 0"));
            }
            (start.clamp(0, end - 1), end)
        }
        (None, Some(end)) => {
            let start = current_start as i64;
            if start >= total {
                return Err(LayerError::invalid_timing(format!(
                    "start frame {start} is beyond the composition end {total}"
                )));
            }
            (start, end.clamp(start + 1, total))
        }
        (None, None) => {
            let start = current_start as i64;
            if start >= current_end as i64 {
                return Err(LayerError::invalid_timing(format!(
                    "start frame {start} is not before end frame {current_end}"
                )));
            }
            if start >= total {
                return Err(LayerError::invalid_timing(format!(
                    "start frame {start} is beyond the composition end {total}"
                )));
            }
            (start, (current_end as i64).min(total))
        }
    };

    Ok((start as FrameIndex, end as FrameIndex))
}

/// Reject patches that touch fields the layer's kind does not carry.
pub fn check_kind(layer: &Layer, patch: &LayerPatch) -> Result<(), LayerError> {
    match patch.first_illegal_field(layer.kind()) {
        Some(field) => Err(LayerError::InvalidFieldForKind {
            field: field.name(),
            kind: layer.kind(),
        }),
        None => Ok(()),
    }
}

/// Bring a whole layer into a state that satisfies every invariant.
///
/// Idempotent: normalizing a normalized layer returns it unchanged.
pub fn normalize(layer: &Layer, bounds: Bounds) -> Result<Layer, LayerError> {
    let (start_frame, end_frame) =
        resolve_timing(layer.start_frame, layer.end_frame, None, None, bounds)?;

    let mut out = layer.clone();
    out.start_frame = start_frame;
    out.end_frame = end_frame;
    out.opacity = clamp_f64(out.opacity, OPACITY_RANGE);
    out.rotation = wrap_rotation(out.rotation as i64);

    let duration = end_frame - start_frame;
    match &mut out.props {
        LayerProps::Video(p) => {
            p.transform = p.transform.clamped();
            normalize_playback(&mut p.playback, duration);
        }
        LayerProps::Image(p) => {
            p.transform = p.transform.clamped();
        }
        LayerProps::Audio(p) => {
            normalize_playback(&mut p.playback, duration);
        }
        LayerProps::ChatBubble(p) => {
            p.transform = p.transform.clamped();
            p.avatar_scale = clamp_f64(p.avatar_scale, AVATAR_SCALE_RANGE);
            p.bubble_font_size = clamp_u32(p.bubble_font_size as i64, BUBBLE_FONT_SIZE_RANGE);
            drop_empty(&mut p.sender_name);
            drop_empty(&mut p.avatar_url);
            drop_empty(&mut p.font_family);
        }
        LayerProps::RedditStory(p) => {
            p.font_size = clamp_u32(p.font_size as i64, STORY_FONT_SIZE_RANGE);
        }
        LayerProps::Text(p) => {
            p.transform = p.transform.clamped();
            p.font_size = clamp_u32(p.font_size as i64, TEXT_FONT_SIZE_RANGE);
        }
    }

    Ok(out)
}

fn normalize_playback(playback: &mut Playback, duration: FrameIndex) {
    playback.volume = clamp_f64(playback.volume, VOLUME_RANGE);
    playback.playback_rate = clamp_f64(playback.playback_rate, PLAYBACK_RATE_RANGE);
    playback.fade_in = playback.fade_in.min(duration);
    playback.fade_out = playback.fade_out.min(duration);
}

/// Blank optional text is stored as `None`.
pub(crate) fn drop_empty(value: &mut Option<String>) {
    if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
        *value = None;
    }
}

/// Report every invariant a layer violates, without correcting anything.
pub fn check(layer: &Layer, bounds: Bounds) -> Vec<String> {
    let mut issues = vec![];

    if bounds.total_frames == 0 {
        issues.push("composition has no frames".to_string());
    }
    if layer.start_frame >= layer.end_frame {
        issues.push(format!(
            "start frame {} is not before end frame {}",
            layer.start_frame, layer.end_frame
        ));
    }
    if layer.end_frame > bounds.total_frames {
        issues.push(format!(
            "end frame {} exceeds composition length {}",
            layer.end_frame, bounds.total_frames
        ));
    }
    if layer.id.trim().is_empty() {
        issues.push("layer id is empty".to_string());
    }

    check_f64(&mut issues, "opacity", layer.opacity, OPACITY_RANGE);
    if layer.rotation >= 360 {
        issues.push(format!("rotation {} is not below 360", layer.rotation));
    }

    if let Some(transform) = layer.transform() {
        if transform.clamped() != *transform {
            issues.push(format!(
                "transform {:?} is outside the canvas limits",
                transform
            ));
        }
    }

    if let Some(playback) = layer.playback() {
        check_f64(&mut issues, "volume", playback.volume, VOLUME_RANGE);
        check_f64(
            &mut issues,
            "playback_rate",
            playback.playback_rate,
            PLAYBACK_RATE_RANGE,
        );
        let duration = layer.duration_frames();
        if playback.fade_in > duration || playback.fade_out > duration {
            issues.push(format!(
                "fades ({} in, {} out) exceed layer duration {duration}",
                playback.fade_in, playback.fade_out
            ));
        }
    }

    match &layer.props {
        LayerProps::ChatBubble(p) => {
            check_f64(&mut issues, "avatar_scale", p.avatar_scale, AVATAR_SCALE_RANGE);
            for (name, value) in [
                ("sender_name", &p.sender_name),
                ("avatar_url", &p.avatar_url),
                ("font_family", &p.font_family),
            ] {
                if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                    issues.push(format!("{name} is set but blank"));
                }
            }
            check_u32(
                &mut issues,
                "bubble_font_size",
                p.bubble_font_size,
                BUBBLE_FONT_SIZE_RANGE,
            );
        }
        LayerProps::RedditStory(p) => {
            check_u32(&mut issues, "font_size", p.font_size, STORY_FONT_SIZE_RANGE);
        }
        LayerProps::Text(p) => {
            check_u32(&mut issues, "font_size", p.font_size, TEXT_FONT_SIZE_RANGE);
        }
        LayerProps::Video(_) | LayerProps::Image(_) | LayerProps::Audio(_) => {}
    }

    issues
}

fn check_f64(issues: &mut Vec<String>, name: &str, value: f64, (lo, hi): (f64, f64)) {
    if !(lo..=hi).contains(&value) {
        issues.push(format!("{name} {value} is outside [{lo}, {hi}]"));
    }
}

fn check_u32(issues: &mut Vec<String>, name: &str, value: u32, (lo, hi): (u32, u32)) {
    if !(lo..=hi).contains(&value) {
        issues.push(format!("{name} {value} is outside [{lo}, {hi}]"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{AudioProps, ChatBubbleProps, ImageProps};

    const BOUNDS: Bounds = Bounds { total_frames: 300 };

    fn audio(start: FrameIndex, end: FrameIndex) -> Layer {
        Layer::new("aud", start, end, LayerProps::Audio(AudioProps::new("a.mp3")))
    }

    #[test]
    fn test_end_frame_clamps_to_total() {
        assert_eq!(resolve_timing(0, 90, None, Some(500), BOUNDS), Ok((0, 300)));
    }

    #[test]
    fn test_end_frame_clamps_above_start() {
        assert_eq!(resolve_timing(50, 90, None, Some(10), BOUNDS), Ok((50, 51)));
    }

    #[test]
    fn test_start_frame_clamps_below_end() {
        assert_eq!(resolve_timing(0, 90, Some(200), None, BOUNDS), Ok((89, 90)));
        assert_eq!(resolve_timing(10, 90, Some(-5), None, BOUNDS), Ok((0, 90)));
    }

    #[test]
    fn test_inverted_patch_rejected() {
        let err = resolve_timing(0, 90, Some(60), Some(30), BOUNDS).unwrap_err();
        assert!(matches!(err, LayerError::InvalidTiming { .. }));
        assert!(resolve_timing(0, 90, Some(30), Some(30), BOUNDS).is_err());
    }

    #[test]
    fn test_empty_composition_rejected() {
        assert!(resolve_timing(0, 1, None, None, Bounds::new(0)).is_err());
    }

    #[test]
    fn test_both_set_beyond_total_clamps_into_last_frame() {
        assert_eq!(
            resolve_timing(0, 90, Some(500), Some(600), BOUNDS),
            Ok((299, 300))
        );
    }

    #[test]
    fn test_rotation_helpers() {
        assert_eq!(wrap_rotation(450), 90);
        assert_eq!(wrap_rotation(-90), 270);
        assert_eq!(rotate_90(270), 0);
        assert_eq!(flip(0), 180);
        assert_eq!(flip(180), 0);
        assert_eq!(flip(90), 180);
    }

    #[test]
    fn test_normalize_clamps_everything() {
        let mut layer = audio(0, 400);
        layer.opacity = 3.0;
        layer.rotation = 725;
        if let LayerProps::Audio(p) = &mut layer.props {
            p.playback.volume = -1.0;
            p.playback.playback_rate = 0.0;
            p.playback.fade_in = 1_000;
        }

        let n = normalize(&layer, BOUNDS).unwrap();
        assert_eq!(n.end_frame, 300);
        assert_eq!(n.opacity, 1.0);
        assert_eq!(n.rotation, 5);
        let playback = n.playback().unwrap();
        assert_eq!(playback.volume, 0.0);
        assert_eq!(playback.playback_rate, 0.25);
        assert_eq!(playback.fade_in, 300);
        assert!(check(&n, BOUNDS).is_empty());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut layer = Layer::new(
            "chat",
            20,
            1_000,
            LayerProps::ChatBubble(ChatBubbleProps::new("hey")),
        );
        layer.opacity = f64::NAN;
        if let LayerProps::ChatBubble(p) = &mut layer.props {
            p.avatar_scale = 9.0;
            p.bubble_font_size = 2;
            p.sender_name = Some("  ".to_string());
        }

        let once = normalize(&layer, BOUNDS).unwrap();
        let twice = normalize(&once, BOUNDS).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.opacity, 0.0);
        if let LayerProps::ChatBubble(p) = &once.props {
            assert_eq!(p.avatar_scale, 2.0);
            assert_eq!(p.bubble_font_size, 10);
            assert_eq!(p.sender_name, None);
        }
    }

    #[test]
    fn test_normalize_rejects_layer_past_end() {
        let layer = audio(350, 400);
        assert!(matches!(
            normalize(&layer, BOUNDS),
            Err(LayerError::InvalidTiming { .. })
        ));
    }

    #[test]
    fn test_check_reports_without_fixing() {
        let mut layer = Layer::new("img", 50, 20, LayerProps::Image(ImageProps::new("x")));
        layer.opacity = 1.5;

        let issues = check(&layer, BOUNDS);
        assert_eq!(issues.len(), 2);
        assert!(issues[0].contains("not before end frame"));
        assert!(issues[1].contains("opacity"));
    }

    #[test]
    fn test_check_reports_blank_bubble_text() {
        let mut props = ChatBubbleProps::new("yo");
        props.avatar_url = Some("  ".to_string());
        let layer = Layer::new("chat", 0, 10, LayerProps::ChatBubble(props));

        let issues = check(&layer, BOUNDS);
        assert_eq!(issues, vec!["avatar_url is set but blank".to_string()]);
        let fixed = normalize(&layer, BOUNDS).unwrap();
        assert!(check(&fixed, BOUNDS).is_empty());
    }

    #[test]
    fn test_check_kind() {
        let layer = Layer::new(
            "chat",
            0,
            10,
            LayerProps::ChatBubble(ChatBubbleProps::new("yo")),
        );
        let patch = LayerPatch {
            volume: Some(0.5),
            ..Default::default()
        };
        assert_eq!(
            check_kind(&layer, &patch),
            Err(LayerError::InvalidFieldForKind {
                field: "volume",
                kind: crate::layer::LayerKind::ChatBubble,
            })
        );
    }
}

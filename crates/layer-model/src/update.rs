//! The layer update protocol.
//!
//! Every editor mutates layers through [`update_layer`]: it receives the
//! current list, returns a new list with exactly one element replaced, and
//! never reorders. Because the functions here are pure, callers can keep
//! prior lists as undo snapshots.

use crate::error::LayerError;
use crate::invariants::{self, Bounds};
use crate::layer::{Layer, LayerProps};
use crate::patch::LayerPatch;

/// Merge a patch into a single layer and re-establish its invariants.
pub fn apply_patch(layer: &Layer, patch: &LayerPatch, bounds: Bounds) -> Result<Layer, LayerError> {
    invariants::check_kind(layer, patch)?;

    let (start_frame, end_frame) = invariants::resolve_timing(
        layer.start_frame,
        layer.end_frame,
        patch.start_frame,
        patch.end_frame,
        bounds,
    )?;

    let mut merged = layer.clone();
    merged.start_frame = start_frame;
    merged.end_frame = end_frame;
    if let Some(opacity) = patch.opacity {
        merged.opacity = opacity;
    }
    if let Some(rotation) = patch.rotation {
        merged.rotation = invariants::wrap_rotation(rotation);
    }

    let duration = (end_frame - start_frame) as i64;
    let fade = |frames: i64| frames.clamp(0, duration) as u32;

    match &mut merged.props {
        LayerProps::Video(p) => {
            merge_transform(&mut p.transform, patch);
            merge_playback(&mut p.playback, patch, fade);
            merge_string(&mut p.filter, &patch.filter);
            if let Some(fit) = patch.object_fit {
                p.object_fit = fit;
            }
            if let Some(entrance) = patch.entrance {
                p.animation.entrance = entrance;
            }
        }
        LayerProps::Image(p) => {
            merge_transform(&mut p.transform, patch);
            merge_string(&mut p.filter, &patch.filter);
            if let Some(fit) = patch.object_fit {
                p.object_fit = fit;
            }
            if let Some(entrance) = patch.entrance {
                p.animation.entrance = entrance;
            }
        }
        LayerProps::Audio(p) => {
            merge_playback(&mut p.playback, patch, fade);
        }
        LayerProps::ChatBubble(p) => {
            merge_transform(&mut p.transform, patch);
            merge_string(&mut p.message, &patch.message);
            if let Some(name) = &patch.sender_name {
                p.sender_name = Some(name.clone());
            }
            if let Some(family) = &patch.font_family {
                p.font_family = Some(family.clone());
            }
            if let Some(scale) = patch.avatar_scale {
                p.avatar_scale = scale;
            }
            if let Some(size) = patch.bubble_font_size {
                p.bubble_font_size =
                    invariants::clamp_u32(size, invariants::BUBBLE_FONT_SIZE_RANGE);
            }
            if let Some(is_sender) = patch.is_sender {
                p.is_sender = is_sender;
            }
        }
        LayerProps::RedditStory(p) => {
            merge_string(&mut p.story, &patch.story);
            merge_string(&mut p.font_family, &patch.font_family);
            merge_string(&mut p.font_color, &patch.font_color);
            merge_string(&mut p.sentence_bg_color, &patch.sentence_bg_color);
            if let Some(size) = patch.font_size {
                p.font_size = invariants::clamp_u32(size, invariants::STORY_FONT_SIZE_RANGE);
            }
        }
        LayerProps::Text(p) => {
            merge_transform(&mut p.transform, patch);
            merge_string(&mut p.text, &patch.text);
            merge_string(&mut p.font_family, &patch.font_family);
            merge_string(&mut p.color, &patch.color);
            if let Some(size) = patch.font_size {
                p.font_size = invariants::clamp_u32(size, invariants::TEXT_FONT_SIZE_RANGE);
            }
        }
    }

    invariants::normalize(&merged, bounds)
}

fn merge_transform(transform: &mut crate::geometry::Transform, patch: &LayerPatch) {
    if let Some(position) = patch.position {
        transform.position = position;
    }
    if let Some(size) = patch.size {
        transform.size = size;
    }
}

fn merge_playback(
    playback: &mut crate::layer::Playback,
    patch: &LayerPatch,
    fade: impl Fn(i64) -> u32,
) {
    if let Some(volume) = patch.volume {
        playback.volume = volume;
    }
    if let Some(looping) = patch.looping {
        playback.looping = looping;
    }
    if let Some(rate) = patch.playback_rate {
        playback.playback_rate = rate;
    }
    if let Some(frames) = patch.fade_in {
        playback.fade_in = fade(frames);
    }
    if let Some(frames) = patch.fade_out {
        playback.fade_out = fade(frames);
    }
}

fn merge_string(target: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}

/// Index of the layer with `id`.
pub fn find_layer(layers: &[Layer], id: &str) -> Result<usize, LayerError> {
    layers
        .iter()
        .position(|layer| layer.id == id)
        .ok_or_else(|| LayerError::not_found(id))
}

/// Strict form of [`update_layer`]: a missing id is an error.
pub fn try_update_layer(
    layers: &[Layer],
    id: &str,
    patch: &LayerPatch,
    bounds: Bounds,
) -> Result<Vec<Layer>, LayerError> {
    let index = find_layer(layers, id)?;
    let updated = apply_patch(&layers[index], patch, bounds)?;

    let mut next = layers.to_vec();
    next[index] = updated;
    Ok(next)
}

/// Apply a patch to the layer with `id`, returning the new list.
///
/// A missing id returns the list unchanged: an edit can legitimately race a
/// delete within the same event turn. Kind and timing violations are
/// returned as errors and leave the caller's list untouched.
pub fn update_layer(
    layers: &[Layer],
    id: &str,
    patch: &LayerPatch,
    bounds: Bounds,
) -> Result<Vec<Layer>, LayerError> {
    match try_update_layer(layers, id, patch, bounds) {
        Err(LayerError::LayerNotFound { .. }) => {
            tracing::debug!(layer_id = id, "Ignoring update for missing layer");
            Ok(layers.to_vec())
        }
        other => other,
    }
}

/// Turn the layer a quarter clockwise.
pub fn rotate_layer_90(layers: &[Layer], id: &str, bounds: Bounds) -> Result<Vec<Layer>, LayerError> {
    rotate_with(layers, id, bounds, invariants::rotate_90)
}

/// Toggle the layer between upright and upside-down.
pub fn flip_layer(layers: &[Layer], id: &str, bounds: Bounds) -> Result<Vec<Layer>, LayerError> {
    rotate_with(layers, id, bounds, invariants::flip)
}

fn rotate_with(
    layers: &[Layer],
    id: &str,
    bounds: Bounds,
    op: fn(u16) -> u16,
) -> Result<Vec<Layer>, LayerError> {
    let Some(layer) = layers.iter().find(|l| l.id == id) else {
        tracing::debug!(layer_id = id, "Ignoring rotation for missing layer");
        return Ok(layers.to_vec());
    };
    let patch = LayerPatch {
        rotation: Some(op(layer.rotation) as i64),
        ..Default::default()
    };
    update_layer(layers, id, &patch, bounds)
}

/// Move a layer to a new paint position (0 = bottom-most).
///
/// This is the only operation that reorders the list. Indexes past the end
/// move the layer to the top; a missing id returns the list unchanged.
pub fn move_layer(layers: &[Layer], id: &str, to_index: usize) -> Vec<Layer> {
    let mut next = layers.to_vec();
    let Some(from) = next.iter().position(|l| l.id == id) else {
        tracing::debug!(layer_id = id, "Ignoring move for missing layer");
        return next;
    };
    let layer = next.remove(from);
    let to = to_index.min(next.len());
    next.insert(to, layer);
    next
}

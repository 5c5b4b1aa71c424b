//! Layer lifecycle: create from media, swap media, delete.

use reelkit_common::{seconds_to_frames, FrameIndex};
use serde::{Deserialize, Serialize};

use crate::error::LayerError;
use crate::invariants::{self, Bounds};
use crate::layer::{
    AudioProps, ChatBubbleProps, ImageProps, Layer, LayerKind, LayerProps, RedditStoryProps,
    TextProps, VideoProps,
};

/// Layer length used when the media does not report a duration.
pub const DEFAULT_LAYER_SECONDS: u32 = 5;

/// Media as supplied by the media library or an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    pub id: String,
    pub name: String,
    /// Opaque type string (`"image"`, `"video/mp4"`, `"chat"`, ...).
    #[serde(rename = "type")]
    pub media_type: String,
    pub url: String,
    /// Duration in seconds, for time-based media.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl MediaDescriptor {
    pub fn new(
        media_type: impl Into<String>,
        url: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let url = url.into();
        Self {
            id: url.clone(),
            name: name.into(),
            media_type: media_type.into(),
            url,
            duration: None,
            thumbnail: None,
        }
    }

    pub fn with_duration(mut self, secs: f64) -> Self {
        self.duration = Some(secs);
        self
    }
}

/// Frame rate and fallback length used when creating layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateOptions {
    pub fps: u32,
    pub default_layer_secs: u32,
}

impl CreateOptions {
    pub fn new(fps: u32) -> Self {
        Self {
            fps,
            default_layer_secs: DEFAULT_LAYER_SECONDS,
        }
    }
}

/// Map a media type string to a layer kind.
///
/// Accepts bare names (`video`), MIME types (`image/png`), and the text
/// presets (`chat`, `chat_bubble`, `reddit_story`, `story`, `text`).
pub fn classify_media_type(media_type: &str) -> Result<LayerKind, LayerError> {
    let normalized = media_type.trim().to_ascii_lowercase();
    let family = normalized.split('/').next().unwrap_or_default();

    let kind = match (family, normalized.contains('/')) {
        ("video", _) => LayerKind::Video,
        ("image", _) => LayerKind::Image,
        ("audio", _) => LayerKind::Audio,
        ("chat" | "chat_bubble" | "chat-bubble" | "chatbubble", false) => LayerKind::ChatBubble,
        ("reddit_story" | "reddit-story" | "redditstory" | "story", false) => {
            LayerKind::RedditStory
        }
        ("text", false) => LayerKind::Text,
        _ => {
            return Err(LayerError::UnsupportedMediaType {
                media_type: media_type.to_string(),
            })
        }
    };
    Ok(kind)
}

/// Create a layer for `media` starting at `at_frame`.
///
/// The layer runs for the media's own duration when known, otherwise for
/// [`DEFAULT_LAYER_SECONDS`], and is cut at the composition end.
pub fn create_layer(
    media: &MediaDescriptor,
    at_frame: FrameIndex,
    total_frames: FrameIndex,
    fps: u32,
) -> Result<Layer, LayerError> {
    create_layer_with(media, at_frame, total_frames, CreateOptions::new(fps))
}

/// [`create_layer`] with an explicit fallback length.
pub fn create_layer_with(
    media: &MediaDescriptor,
    at_frame: FrameIndex,
    total_frames: FrameIndex,
    options: CreateOptions,
) -> Result<Layer, LayerError> {
    let kind = classify_media_type(&media.media_type)?;

    if total_frames == 0 {
        return Err(LayerError::invalid_timing("composition has no frames"));
    }
    if at_frame >= total_frames {
        return Err(LayerError::invalid_timing(format!(
            "cannot place a layer at frame {at_frame}; composition ends at {total_frames}"
        )));
    }

    let length = match media.duration {
        Some(secs) => seconds_to_frames(secs, options.fps),
        None => options.default_layer_secs.saturating_mul(options.fps),
    }
    .max(1);
    let end_frame = at_frame.saturating_add(length).min(total_frames);

    let props = default_props(kind, media);
    let layer = Layer::new(uuid::Uuid::new_v4().to_string(), at_frame, end_frame, props);

    tracing::debug!(
        layer_id = %layer.id,
        kind = %kind,
        start = layer.start_frame,
        end = layer.end_frame,
        "Created layer from media"
    );

    invariants::normalize(&layer, Bounds::new(total_frames))
}

fn default_props(kind: LayerKind, media: &MediaDescriptor) -> LayerProps {
    let label = if media.name.trim().is_empty() {
        "New text".to_string()
    } else {
        media.name.clone()
    };

    match kind {
        LayerKind::Video => LayerProps::Video(VideoProps::new(&media.url)),
        LayerKind::Image => LayerProps::Image(ImageProps::new(&media.url)),
        LayerKind::Audio => LayerProps::Audio(AudioProps::new(&media.url)),
        LayerKind::ChatBubble => {
            let mut props = ChatBubbleProps::new(label);
            if !media.url.trim().is_empty() {
                props.avatar_url = Some(media.url.clone());
            }
            LayerProps::ChatBubble(props)
        }
        LayerKind::RedditStory => LayerProps::RedditStory(RedditStoryProps::new(label)),
        LayerKind::Text => LayerProps::Text(TextProps::new(label)),
    }
}

/// Swap the media a layer points at, keeping every other field.
///
/// Video, image, and audio layers swap `src`; chat bubbles swap their
/// avatar. Story and text layers reference no media.
pub fn replace_layer_media(layer: &Layer, new_url: &str) -> Result<Layer, LayerError> {
    let mut replaced = layer.clone();
    match &mut replaced.props {
        LayerProps::Video(p) => p.src = new_url.to_string(),
        LayerProps::Image(p) => p.src = new_url.to_string(),
        LayerProps::Audio(p) => p.src = new_url.to_string(),
        LayerProps::ChatBubble(p) => {
            p.avatar_url = Some(new_url.to_string());
            invariants::drop_empty(&mut p.avatar_url);
        }
        LayerProps::RedditStory(_) | LayerProps::Text(_) => {
            return Err(LayerError::InvalidFieldForKind {
                field: "src",
                kind: layer.kind(),
            })
        }
    }
    Ok(replaced)
}

/// Remove the layer with `id`.
///
/// Callers must have obtained explicit user confirmation first. A missing
/// id returns the list unchanged.
pub fn delete_layer(layers: &[Layer], id: &str) -> Vec<Layer> {
    let next: Vec<Layer> = layers.iter().filter(|l| l.id != id).cloned().collect();
    if next.len() == layers.len() {
        tracing::debug!(layer_id = id, "Ignoring delete for missing layer");
    }
    next
}

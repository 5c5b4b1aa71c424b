//! Layer types for the composition timeline.
//!
//! A [`Layer`] carries the fields every kind shares (identity, timing,
//! opacity, rotation) plus a [`LayerProps`] variant holding the fields
//! only that kind may have. Serialized layers put the variant's fields
//! beside the shared ones, discriminated by a `kind` tag:
//!
//! ```json
//! { "id": "…", "start_frame": 0, "end_frame": 90, "opacity": 1.0,
//!   "rotation": 0, "kind": "image", "src": "https://…", … }
//! ```
//!
//! Paint order is the layer's position in the owning list; it is not stored.

use std::fmt;

use reelkit_common::FrameIndex;
use serde::{Deserialize, Serialize};

use crate::geometry::Transform;

/// One timed visual or audio element on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Unique, immutable identifier assigned at creation.
    pub id: String,

    /// First visible frame (inclusive).
    pub start_frame: FrameIndex,

    /// Frame where the layer stops being visible (exclusive).
    pub end_frame: FrameIndex,

    /// Opacity in `[0.0, 1.0]`.
    #[serde(default = "default_opacity")]
    pub opacity: f64,

    /// Rotation in whole degrees, `[0, 360)`.
    #[serde(default)]
    pub rotation: u16,

    /// Kind-specific properties.
    #[serde(flatten)]
    pub props: LayerProps,
}

fn default_opacity() -> f64 {
    1.0
}

/// Discriminant for the layer variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Video,
    Image,
    Audio,
    ChatBubble,
    RedditStory,
    Text,
}

impl LayerKind {
    pub const ALL: [LayerKind; 6] = [
        LayerKind::Video,
        LayerKind::Image,
        LayerKind::Audio,
        LayerKind::ChatBubble,
        LayerKind::RedditStory,
        LayerKind::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Video => "video",
            LayerKind::Image => "image",
            LayerKind::Audio => "audio",
            LayerKind::ChatBubble => "chat_bubble",
            LayerKind::RedditStory => "reddit_story",
            LayerKind::Text => "text",
        }
    }

    /// Kinds placed on the canvas with a [`Transform`].
    pub fn is_visual(&self) -> bool {
        matches!(
            self,
            LayerKind::Video | LayerKind::Image | LayerKind::ChatBubble | LayerKind::Text
        )
    }

    /// Kinds with audio playback controls.
    pub fn has_playback(&self) -> bool {
        matches!(self, LayerKind::Video | LayerKind::Audio)
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific layer properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerProps {
    Video(VideoProps),
    Image(ImageProps),
    Audio(AudioProps),
    ChatBubble(ChatBubbleProps),
    RedditStory(RedditStoryProps),
    Text(TextProps),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoProps {
    /// Media URL.
    pub src: String,
    pub transform: Transform,
    pub playback: Playback,
    /// CSS-style filter expression (e.g. `grayscale(100%) blur(2px)`).
    #[serde(default)]
    pub filter: String,
    #[serde(default)]
    pub object_fit: ObjectFit,
    #[serde(default)]
    pub animation: Animation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageProps {
    /// Media URL.
    pub src: String,
    pub transform: Transform,
    #[serde(default)]
    pub filter: String,
    #[serde(default)]
    pub object_fit: ObjectFit,
    #[serde(default)]
    pub animation: Animation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioProps {
    /// Media URL.
    pub src: String,
    pub playback: Playback,
}

/// A chat message bubble with an optional avatar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatBubbleProps {
    pub transform: Transform,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Avatar scale factor in `[0.5, 2.0]`.
    pub avatar_scale: f64,
    /// Bubble text size in `[10, 60]`.
    pub bubble_font_size: u32,
    /// Sender bubbles sit on the right, receiver bubbles on the left.
    pub is_sender: bool,
}

/// Narrated story text rendered sentence by sentence over the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditStoryProps {
    pub story: String,
    pub font_family: String,
    /// Text size in `[24, 72]`.
    pub font_size: u32,
    pub font_color: String,
    pub sentence_bg_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextProps {
    pub transform: Transform,
    pub text: String,
    pub font_family: String,
    /// Text size in `[8, 200]`.
    pub font_size: u32,
    pub color: String,
}

/// Audio playback controls for audio-bearing layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playback {
    /// Volume in `[0.0, 1.0]`.
    pub volume: f64,
    #[serde(rename = "loop", default)]
    pub looping: bool,
    /// Playback speed multiplier in `[0.25, 4.0]`.
    pub playback_rate: f64,
    /// Fade-in length in frames.
    #[serde(default)]
    pub fade_in: FrameIndex,
    /// Fade-out length in frames.
    #[serde(default)]
    pub fade_out: FrameIndex,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            volume: 1.0,
            looping: false,
            playback_rate: 1.0,
            fade_in: 0,
            fade_out: 0,
        }
    }
}

/// How media fills its layer box, matching CSS `object-fit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectFit {
    #[default]
    Cover,
    Contain,
    Fill,
    None,
    ScaleDown,
}

impl ObjectFit {
    pub const ALL: [ObjectFit; 5] = [
        ObjectFit::Cover,
        ObjectFit::Contain,
        ObjectFit::Fill,
        ObjectFit::None,
        ObjectFit::ScaleDown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectFit::Cover => "cover",
            ObjectFit::Contain => "contain",
            ObjectFit::Fill => "fill",
            ObjectFit::None => "none",
            ObjectFit::ScaleDown => "scale-down",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|fit| fit.as_str() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Animation {
    pub entrance: Entrance,
}

/// Entrance animation played when a layer first appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Entrance {
    #[default]
    None,
    Fade,
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
    Zoom,
    Bounce,
}

impl Entrance {
    pub const ALL: [Entrance; 8] = [
        Entrance::None,
        Entrance::Fade,
        Entrance::SlideLeft,
        Entrance::SlideRight,
        Entrance::SlideUp,
        Entrance::SlideDown,
        Entrance::Zoom,
        Entrance::Bounce,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Entrance::None => "none",
            Entrance::Fade => "fade",
            Entrance::SlideLeft => "slide_left",
            Entrance::SlideRight => "slide_right",
            Entrance::SlideUp => "slide_up",
            Entrance::SlideDown => "slide_down",
            Entrance::Zoom => "zoom",
            Entrance::Bounce => "bounce",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == name)
    }
}

impl VideoProps {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            transform: Transform::FULL_CANVAS,
            playback: Playback::default(),
            filter: String::new(),
            object_fit: ObjectFit::Cover,
            animation: Animation::default(),
        }
    }
}

impl ImageProps {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            transform: Transform::FULL_CANVAS,
            filter: String::new(),
            object_fit: ObjectFit::Cover,
            animation: Animation::default(),
        }
    }
}

impl AudioProps {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            playback: Playback::default(),
        }
    }
}

impl ChatBubbleProps {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            transform: Transform::centered(50.0, 50.0, 80.0, 15.0),
            message: message.into(),
            sender_name: None,
            avatar_url: None,
            font_family: None,
            avatar_scale: 1.0,
            bubble_font_size: 16,
            is_sender: true,
        }
    }
}

impl RedditStoryProps {
    pub fn new(story: impl Into<String>) -> Self {
        Self {
            story: story.into(),
            font_family: "Inter".to_string(),
            font_size: 40,
            font_color: "#FFFFFF".to_string(),
            sentence_bg_color: "#000000".to_string(),
        }
    }
}

impl TextProps {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            transform: Transform::centered(50.0, 50.0, 80.0, 20.0),
            text: text.into(),
            font_family: "Inter".to_string(),
            font_size: 48,
            color: "#FFFFFF".to_string(),
        }
    }
}

impl LayerProps {
    pub fn kind(&self) -> LayerKind {
        match self {
            LayerProps::Video(_) => LayerKind::Video,
            LayerProps::Image(_) => LayerKind::Image,
            LayerProps::Audio(_) => LayerKind::Audio,
            LayerProps::ChatBubble(_) => LayerKind::ChatBubble,
            LayerProps::RedditStory(_) => LayerKind::RedditStory,
            LayerProps::Text(_) => LayerKind::Text,
        }
    }
}

impl Layer {
    /// Create a layer with full opacity and no rotation.
    ///
    /// Timing is taken as given; run the result through
    /// [`crate::invariants::normalize`] to enforce composition bounds.
    pub fn new(
        id: impl Into<String>,
        start_frame: FrameIndex,
        end_frame: FrameIndex,
        props: LayerProps,
    ) -> Self {
        Self {
            id: id.into(),
            start_frame,
            end_frame,
            opacity: 1.0,
            rotation: 0,
            props,
        }
    }

    pub fn kind(&self) -> LayerKind {
        self.props.kind()
    }

    /// Canvas placement, for visual kinds.
    pub fn transform(&self) -> Option<&Transform> {
        match &self.props {
            LayerProps::Video(p) => Some(&p.transform),
            LayerProps::Image(p) => Some(&p.transform),
            LayerProps::ChatBubble(p) => Some(&p.transform),
            LayerProps::Text(p) => Some(&p.transform),
            LayerProps::Audio(_) | LayerProps::RedditStory(_) => None,
        }
    }

    /// Playback controls, for audio-bearing kinds.
    pub fn playback(&self) -> Option<&Playback> {
        match &self.props {
            LayerProps::Video(p) => Some(&p.playback),
            LayerProps::Audio(p) => Some(&p.playback),
            _ => None,
        }
    }

    /// The external media this layer references, if any.
    pub fn media_ref(&self) -> Option<&str> {
        match &self.props {
            LayerProps::Video(p) => Some(&p.src),
            LayerProps::Image(p) => Some(&p.src),
            LayerProps::Audio(p) => Some(&p.src),
            LayerProps::ChatBubble(p) => p.avatar_url.as_deref(),
            LayerProps::RedditStory(_) | LayerProps::Text(_) => None,
        }
    }

    /// Visible length in frames.
    pub fn duration_frames(&self) -> FrameIndex {
        self.end_frame.saturating_sub(self.start_frame)
    }

    /// Whether the renderer should paint this layer at `frame`.
    pub fn is_active_at(&self, frame: FrameIndex) -> bool {
        frame >= self.start_frame && frame < self.end_frame
    }
}

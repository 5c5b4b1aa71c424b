//! Partial layer edits.
//!
//! Editors never write layer fields directly. They produce a [`LayerPatch`]
//! holding only the fields a control changed (a slider, a checkbox, a
//! color picker) and hand it to [`crate::update::update_layer`].
//!
//! Numeric patch values are deliberately wider than the stored types
//! (`i64` frames, unconstrained `f64`) so out-of-range input survives long
//! enough to be clamped instead of failing to parse.

use serde::{Deserialize, Serialize};

use crate::error::LayerError;
use crate::geometry::{Position, Size};
use crate::layer::{Entrance, LayerKind, ObjectFit};

/// A partial set of layer field changes. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_frame: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_frame: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<i64>,

    // Visual kinds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,

    // Video and audio
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(rename = "loop", skip_serializing_if = "Option::is_none")]
    pub looping: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playback_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade_in: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade_out: Option<i64>,

    // Video and image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_fit: Option<ObjectFit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrance: Option<Entrance>,

    // Chat bubble
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// An empty name clears the sender.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bubble_font_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_sender: Option<bool>,

    // Chat bubble, story, and text
    /// On chat bubbles an empty family clears the override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,

    // Story and text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<i64>,

    // Story
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence_bg_color: Option<String>,

    // Text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Names of every patchable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchField {
    StartFrame,
    EndFrame,
    Opacity,
    Rotation,
    Position,
    Size,
    Volume,
    Loop,
    PlaybackRate,
    FadeIn,
    FadeOut,
    Filter,
    ObjectFit,
    Entrance,
    Message,
    SenderName,
    AvatarScale,
    BubbleFontSize,
    IsSender,
    FontFamily,
    FontSize,
    Story,
    FontColor,
    SentenceBgColor,
    Text,
    Color,
}

impl PatchField {
    pub const ALL: [PatchField; 26] = [
        PatchField::StartFrame,
        PatchField::EndFrame,
        PatchField::Opacity,
        PatchField::Rotation,
        PatchField::Position,
        PatchField::Size,
        PatchField::Volume,
        PatchField::Loop,
        PatchField::PlaybackRate,
        PatchField::FadeIn,
        PatchField::FadeOut,
        PatchField::Filter,
        PatchField::ObjectFit,
        PatchField::Entrance,
        PatchField::Message,
        PatchField::SenderName,
        PatchField::AvatarScale,
        PatchField::BubbleFontSize,
        PatchField::IsSender,
        PatchField::FontFamily,
        PatchField::FontSize,
        PatchField::Story,
        PatchField::FontColor,
        PatchField::SentenceBgColor,
        PatchField::Text,
        PatchField::Color,
    ];

    /// Serialized field name.
    pub fn name(&self) -> &'static str {
        match self {
            PatchField::StartFrame => "start_frame",
            PatchField::EndFrame => "end_frame",
            PatchField::Opacity => "opacity",
            PatchField::Rotation => "rotation",
            PatchField::Position => "position",
            PatchField::Size => "size",
            PatchField::Volume => "volume",
            PatchField::Loop => "loop",
            PatchField::PlaybackRate => "playback_rate",
            PatchField::FadeIn => "fade_in",
            PatchField::FadeOut => "fade_out",
            PatchField::Filter => "filter",
            PatchField::ObjectFit => "object_fit",
            PatchField::Entrance => "entrance",
            PatchField::Message => "message",
            PatchField::SenderName => "sender_name",
            PatchField::AvatarScale => "avatar_scale",
            PatchField::BubbleFontSize => "bubble_font_size",
            PatchField::IsSender => "is_sender",
            PatchField::FontFamily => "font_family",
            PatchField::FontSize => "font_size",
            PatchField::Story => "story",
            PatchField::FontColor => "font_color",
            PatchField::SentenceBgColor => "sentence_bg_color",
            PatchField::Text => "text",
            PatchField::Color => "color",
        }
    }

    /// Look up a field by its serialized name. Editor-style camelCase
    /// names (`startFrame`, `bubbleFontSize`) are accepted too.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = to_snake_case(name.trim());
        Self::ALL.into_iter().find(|f| f.name() == normalized)
    }
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else if ch == '-' {
            out.push('_');
        } else {
            out.push(ch);
        }
    }
    out
}

impl LayerKind {
    /// Whether layers of this kind carry the given field.
    pub fn allows(&self, field: PatchField) -> bool {
        use PatchField as F;
        match field {
            F::StartFrame | F::EndFrame | F::Opacity | F::Rotation => true,
            F::Position | F::Size => self.is_visual(),
            F::Volume | F::Loop | F::PlaybackRate | F::FadeIn | F::FadeOut => {
                self.has_playback()
            }
            F::Filter | F::ObjectFit | F::Entrance => {
                matches!(self, LayerKind::Video | LayerKind::Image)
            }
            F::Message | F::SenderName | F::AvatarScale | F::BubbleFontSize | F::IsSender => {
                *self == LayerKind::ChatBubble
            }
            F::FontFamily => matches!(
                self,
                LayerKind::ChatBubble | LayerKind::RedditStory | LayerKind::Text
            ),
            F::FontSize => matches!(self, LayerKind::RedditStory | LayerKind::Text),
            F::Story | F::FontColor | F::SentenceBgColor => *self == LayerKind::RedditStory,
            F::Text | F::Color => *self == LayerKind::Text,
        }
    }
}

impl LayerPatch {
    /// Fields this patch sets, in declaration order.
    pub fn touched(&self) -> Vec<PatchField> {
        use PatchField as F;
        let flags = [
            (F::StartFrame, self.start_frame.is_some()),
            (F::EndFrame, self.end_frame.is_some()),
            (F::Opacity, self.opacity.is_some()),
            (F::Rotation, self.rotation.is_some()),
            (F::Position, self.position.is_some()),
            (F::Size, self.size.is_some()),
            (F::Volume, self.volume.is_some()),
            (F::Loop, self.looping.is_some()),
            (F::PlaybackRate, self.playback_rate.is_some()),
            (F::FadeIn, self.fade_in.is_some()),
            (F::FadeOut, self.fade_out.is_some()),
            (F::Filter, self.filter.is_some()),
            (F::ObjectFit, self.object_fit.is_some()),
            (F::Entrance, self.entrance.is_some()),
            (F::Message, self.message.is_some()),
            (F::SenderName, self.sender_name.is_some()),
            (F::AvatarScale, self.avatar_scale.is_some()),
            (F::BubbleFontSize, self.bubble_font_size.is_some()),
            (F::IsSender, self.is_sender.is_some()),
            (F::FontFamily, self.font_family.is_some()),
            (F::FontSize, self.font_size.is_some()),
            (F::Story, self.story.is_some()),
            (F::FontColor, self.font_color.is_some()),
            (F::SentenceBgColor, self.sentence_bg_color.is_some()),
            (F::Text, self.text.is_some()),
            (F::Color, self.color.is_some()),
        ];
        flags
            .into_iter()
            .filter_map(|(field, set)| set.then_some(field))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.touched().is_empty()
    }

    /// First touched field the given kind does not carry.
    pub fn first_illegal_field(&self, kind: LayerKind) -> Option<PatchField> {
        self.touched().into_iter().find(|f| !kind.allows(*f))
    }

    /// Set one field from raw text typed into an editor control.
    ///
    /// Numeric text is tolerant: empty or unparsable input becomes `0`
    /// (range clamping happens later, when the patch is applied).
    /// Positions and sizes take `"x,y"` / `"width,height"`.
    pub fn set_field(&mut self, name: &str, raw: &str) -> Result<(), LayerError> {
        let field = PatchField::from_name(name).ok_or_else(|| LayerError::UnknownField {
            field: name.to_string(),
        })?;
        let text = raw.to_string();
        match field {
            PatchField::StartFrame => self.start_frame = Some(parse_integer(raw)),
            PatchField::EndFrame => self.end_frame = Some(parse_integer(raw)),
            PatchField::Opacity => self.opacity = Some(parse_numeric(raw)),
            PatchField::Rotation => self.rotation = Some(parse_integer(raw)),
            PatchField::Position => {
                let (x, y) = parse_pair(raw);
                self.position = Some(Position::new(x, y));
            }
            PatchField::Size => {
                let (width, height) = parse_pair(raw);
                self.size = Some(Size::new(width, height));
            }
            PatchField::Volume => self.volume = Some(parse_numeric(raw)),
            PatchField::Loop => self.looping = Some(parse_flag(raw)),
            PatchField::PlaybackRate => self.playback_rate = Some(parse_numeric(raw)),
            PatchField::FadeIn => self.fade_in = Some(parse_integer(raw)),
            PatchField::FadeOut => self.fade_out = Some(parse_integer(raw)),
            PatchField::Filter => self.filter = Some(text),
            PatchField::ObjectFit => {
                let fit = ObjectFit::from_name(raw.trim()).ok_or(LayerError::InvalidValue {
                    field: field.name(),
                    value: text,
                })?;
                self.object_fit = Some(fit);
            }
            PatchField::Entrance => {
                let entrance =
                    Entrance::from_name(raw.trim()).ok_or(LayerError::InvalidValue {
                        field: field.name(),
                        value: text,
                    })?;
                self.entrance = Some(entrance);
            }
            PatchField::Message => self.message = Some(text),
            PatchField::SenderName => self.sender_name = Some(text),
            PatchField::AvatarScale => self.avatar_scale = Some(parse_numeric(raw)),
            PatchField::BubbleFontSize => self.bubble_font_size = Some(parse_integer(raw)),
            PatchField::IsSender => self.is_sender = Some(parse_flag(raw)),
            PatchField::FontFamily => self.font_family = Some(text),
            PatchField::FontSize => self.font_size = Some(parse_integer(raw)),
            PatchField::Story => self.story = Some(text),
            PatchField::FontColor => self.font_color = Some(text),
            PatchField::SentenceBgColor => self.sentence_bg_color = Some(text),
            PatchField::Text => self.text = Some(text),
            PatchField::Color => self.color = Some(text),
        }
        Ok(())
    }
}

/// Parse a numeric field the way editor number inputs do: empty or
/// unparsable text reads as `0`.
pub fn parse_numeric(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Integer variant of [`parse_numeric`]; fractional input rounds.
pub fn parse_integer(raw: &str) -> i64 {
    parse_numeric(raw).round() as i64
}

fn parse_pair(raw: &str) -> (f64, f64) {
    let mut parts = raw.split(',');
    let first = parts.next().map(parse_numeric).unwrap_or(0.0);
    let second = parts.next().map(parse_numeric).unwrap_or(0.0);
    (first, second)
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touched_lists_set_fields() {
        let patch = LayerPatch {
            end_frame: Some(90),
            volume: Some(0.5),
            ..Default::default()
        };
        assert_eq!(patch.touched(), vec![PatchField::EndFrame, PatchField::Volume]);
        assert!(LayerPatch::default().is_empty());
    }

    #[test]
    fn test_volume_illegal_on_chat_bubble() {
        let patch = LayerPatch {
            volume: Some(0.5),
            ..Default::default()
        };
        assert_eq!(
            patch.first_illegal_field(LayerKind::ChatBubble),
            Some(PatchField::Volume)
        );
        assert_eq!(patch.first_illegal_field(LayerKind::Video), None);
        assert_eq!(patch.first_illegal_field(LayerKind::Audio), None);
    }

    #[test]
    fn test_shared_fields_allowed_everywhere() {
        for kind in LayerKind::ALL {
            for field in [
                PatchField::StartFrame,
                PatchField::EndFrame,
                PatchField::Opacity,
                PatchField::Rotation,
            ] {
                assert!(kind.allows(field), "{kind} should allow {}", field.name());
            }
        }
    }

    #[test]
    fn test_object_fit_only_on_video_and_image() {
        let allowed: Vec<_> = LayerKind::ALL
            .into_iter()
            .filter(|k| k.allows(PatchField::ObjectFit))
            .collect();
        assert_eq!(allowed, vec![LayerKind::Video, LayerKind::Image]);
    }

    #[test]
    fn test_field_names_roundtrip() {
        for field in PatchField::ALL {
            assert_eq!(PatchField::from_name(field.name()), Some(field));
        }
        assert_eq!(
            PatchField::from_name("bubbleFontSize"),
            Some(PatchField::BubbleFontSize)
        );
        assert_eq!(PatchField::from_name("object-fit"), Some(PatchField::ObjectFit));
        assert_eq!(PatchField::from_name("bogus"), None);
    }

    #[test]
    fn test_patch_json_uses_field_names() {
        let patch = LayerPatch {
            looping: Some(true),
            opacity: Some(0.25),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "opacity": 0.25, "loop": true }));

        let parsed: LayerPatch = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, patch);
    }

    #[test]
    fn test_parse_numeric_is_tolerant() {
        assert_eq!(parse_numeric("0.75"), 0.75);
        assert_eq!(parse_numeric(" 12 "), 12.0);
        assert_eq!(parse_numeric(""), 0.0);
        assert_eq!(parse_numeric("abc"), 0.0);
        assert_eq!(parse_numeric("NaN"), 0.0);
        assert_eq!(parse_integer("14.6"), 15);
    }

    #[test]
    fn test_set_field_from_raw_text() {
        let mut patch = LayerPatch::default();
        patch.set_field("fadeIn", "").unwrap();
        patch.set_field("position", "10, 20").unwrap();
        patch.set_field("loop", "on").unwrap();
        patch.set_field("object_fit", "contain").unwrap();
        patch.set_field("message", "hello there").unwrap();

        assert_eq!(patch.fade_in, Some(0));
        assert_eq!(patch.position, Some(Position::new(10.0, 20.0)));
        assert_eq!(patch.looping, Some(true));
        assert_eq!(patch.object_fit, Some(ObjectFit::Contain));
        assert_eq!(patch.message.as_deref(), Some("hello there"));
    }

    #[test]
    fn test_set_field_rejects_unknown_names_and_enum_values() {
        let mut patch = LayerPatch::default();
        assert!(matches!(
            patch.set_field("speed", "2"),
            Err(LayerError::UnknownField { .. })
        ));
        assert!(matches!(
            patch.set_field("entrance", "spin"),
            Err(LayerError::InvalidValue {
                field: "entrance",
                ..
            })
        ));
        assert!(patch.is_empty());
    }
}

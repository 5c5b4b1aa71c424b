//! Errors produced by layer operations.
//!
//! Range problems (an opacity of 1.5, a rotation of 450) never show up here:
//! they are corrected by clamping or wrapping. These variants describe
//! structural problems the caller has to handle.

use crate::layer::LayerKind;

/// Errors that can occur when creating or mutating layers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayerError {
    /// The interval is inverted or cannot fit inside the composition.
    #[error("Invalid timing: {reason}")]
    InvalidTiming { reason: String },

    /// A patch or operation touched a field the layer's kind does not have.
    #[error("Field `{field}` is not valid for {kind} layers")]
    InvalidFieldForKind {
        field: &'static str,
        kind: LayerKind,
    },

    /// No layer with this id exists in the list.
    #[error("Layer not found: {id}")]
    LayerNotFound { id: String },

    /// A media descriptor type that maps to no layer kind.
    #[error("Unsupported media type: {media_type}")]
    UnsupportedMediaType { media_type: String },

    /// A raw field name that maps to no layer property.
    #[error("Unknown layer field: {field}")]
    UnknownField { field: String },

    /// A raw value for an enumerated field that matches no variant.
    #[error("Invalid value `{value}` for field `{field}`")]
    InvalidValue { field: &'static str, value: String },
}

impl LayerError {
    pub fn invalid_timing(reason: impl Into<String>) -> Self {
        Self::InvalidTiming {
            reason: reason.into(),
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::LayerNotFound { id: id.into() }
    }
}

impl From<LayerError> for reelkit_common::ReelError {
    fn from(err: LayerError) -> Self {
        reelkit_common::ReelError::layer(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_for_kind_message() {
        let err = LayerError::InvalidFieldForKind {
            field: "volume",
            kind: LayerKind::ChatBubble,
        };
        assert_eq!(
            err.to_string(),
            "Field `volume` is not valid for chat_bubble layers"
        );
    }

    #[test]
    fn test_converts_to_common_error() {
        let err: reelkit_common::ReelError = LayerError::not_found("abc").into();
        assert_eq!(err.to_string(), "Layer error: Layer not found: abc");
    }
}

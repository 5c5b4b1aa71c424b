//! ReelKit Layer Model
//!
//! Defines the core data contracts for ReelKit compositions:
//! - **Layers:** Timed, typed visual/audio elements (video, image, audio,
//!   chat bubble, story, text) with kind-specific properties
//! - **Invariants:** Timing, geometry, and range rules every layer satisfies
//! - **Updates:** The single patch-based mutation entry point used by editors
//! - **Lifecycle:** Creating layers from media, swapping media, deleting
//! - **Composition:** The ordered layer list, its frame bounds, and persistence
//!
//! Timing is stored in whole frames. Geometry is stored in percentages of
//! the composition canvas so layouts survive resolution changes.
//!
//! Everything except [`composition::LoadedComposition`] is pure: inputs are
//! values, outputs are new values, and the caller owns storage.

pub mod composition;
pub mod derived;
pub mod error;
pub mod geometry;
pub mod invariants;
pub mod layer;
pub mod lifecycle;
pub mod patch;
pub mod update;

pub use composition::*;
pub use derived::*;
pub use error::*;
pub use geometry::*;
pub use invariants::Bounds;
pub use layer::*;
pub use lifecycle::*;
pub use patch::*;
pub use update::*;

//! Shared types used by the wallpaper host, the asset loaders and the renderers.

mod types;

pub use types::{Axis, Color, ScreenDimensions, Transform};

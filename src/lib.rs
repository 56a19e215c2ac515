// Pose overlay: draw detector landmarks on top of a live camera preview.
// The detector reports landmarks normalized to the image it analyzed. The
// preview shows that image scaled into a window that usually has a different
// aspect ratio, either cropped to fill it or letterboxed to fit it.
// `geometry` maps one space onto the other; `overlay` draws the result.

pub mod camera;
pub mod config;
pub mod detector;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod inference;
pub mod overlay;
pub mod skeleton;
pub mod types;

pub use error::{Error, Result};
pub use geometry::{
    FillMode, Mapping, MappingCache, Point, Size, compute_offset, compute_scale_factor, map_point,
    map_pose,
};
pub use types::{Connection, DetectionResult, FrameBuffer, Landmark, Pose};

// Coordinate mapping from the detector's normalized space to window pixels.
// Visual expectation: a landmark at the center of the analyzed frame lands at the
// center of the window, and every landmark sits on the body part you see in the
// preview, whether the preview crops (fill) or letterboxes (fit) the camera image.

use std::fmt::{self, Display};
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::types::Pose;

/// A 2D point. Normalized (0..1) or pixel space depending on where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions strictly positive and finite.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    fn validate(self, what: &str) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(Error::InvalidArgument(format!(
                "{what} size must be positive and finite, got {}x{}",
                self.width, self.height
            )))
        }
    }

    fn scaled(self, scale: f32) -> Size {
        Size::new(self.width * scale, self.height * scale)
    }
}

impl From<(usize, usize)> for Size {
    fn from((width, height): (usize, usize)) -> Self {
        Size::new(width as f32, height as f32)
    }
}

/// How the source image is scaled into the destination view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Cover the whole view, cropping the overflow (live full-bleed preview).
    #[default]
    ScaleToFill,
    /// Show the whole image, leaving letterbox/pillarbox margins (static images).
    ScaleToFit,
}

impl FillMode {
    pub fn toggled(self) -> Self {
        match self {
            FillMode::ScaleToFill => FillMode::ScaleToFit,
            FillMode::ScaleToFit => FillMode::ScaleToFill,
        }
    }

    /// Short tag for the HUD.
    pub fn label(self) -> &'static str {
        match self {
            FillMode::ScaleToFill => "FILL",
            FillMode::ScaleToFit => "FIT",
        }
    }
}

impl Display for FillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillMode::ScaleToFill => write!(f, "fill"),
            FillMode::ScaleToFit => write!(f, "fit"),
        }
    }
}

impl FromStr for FillMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "fill" | "scale-to-fill" | "scaletofill" => Ok(FillMode::ScaleToFill),
            "fit" | "scale-to-fit" | "scaletofit" => Ok(FillMode::ScaleToFit),
            other => Err(Error::InvalidArgument(format!(
                "unknown fill mode '{other}' (expected 'fill' or 'fit')"
            ))),
        }
    }
}

/// Uniform scale that takes `source` onto `dest`.
///
/// Fill picks the larger axis ratio so the scaled source covers the destination;
/// fit picks the smaller one so it fits inside.
pub fn compute_scale_factor(source: Size, dest: Size, mode: FillMode) -> Result<f32> {
    let source = source.validate("source")?;
    let dest = dest.validate("destination")?;

    let sx = dest.width / source.width;
    let sy = dest.height / source.height;
    let scale = match mode {
        FillMode::ScaleToFill => sx.max(sy),
        FillMode::ScaleToFit => sx.min(sy),
    };

    // Extreme size ratios can still overflow or underflow f32.
    if !(scale.is_finite() && scale > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "scale factor {scale} for {}x{} -> {}x{} is not usable",
            source.width, source.height, dest.width, dest.height
        )));
    }
    Ok(scale)
}

/// Top-left corner of the scaled source when centered in `dest`.
/// Negative components mean the source overflows (cropped); positive means margins.
pub fn compute_offset(source: Size, dest: Size, scale: f32) -> Point {
    debug_assert!(scale > 0.0, "scale must be positive");
    let scaled = source.scaled(scale);
    Point::new(
        (dest.width - scaled.width) / 2.0,
        (dest.height - scaled.height) / 2.0,
    )
}

/// Normalized point -> destination pixel. Values outside 0..1 are extrapolated, not clamped.
#[inline]
pub fn map_point(normalized: Point, source: Size, scale: f32, offset: Point) -> Point {
    Point::new(
        offset.x + normalized.x * source.width * scale,
        offset.y + normalized.y * source.height * scale,
    )
}

/// Map every landmark of `pose`, in order. Fails before mapping anything if a size is invalid.
pub fn map_pose(pose: &Pose, source: Size, dest: Size, mode: FillMode) -> Result<Vec<Point>> {
    Ok(Mapping::new(source, dest, mode)?.map_pose(pose))
}

/// Scale and offset for one (source, destination, mode) triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mapping {
    source: Size,
    dest: Size,
    mode: FillMode,
    scale: f32,
    offset: Point,
}

impl Mapping {
    pub fn new(source: Size, dest: Size, mode: FillMode) -> Result<Self> {
        let scale = compute_scale_factor(source, dest, mode)?;
        let offset = compute_offset(source, dest, scale);
        let scaled = source.scaled(scale);

        // A finite scale can still overflow once multiplied back into pixels.
        if ![scaled.width, scaled.height, offset.x, offset.y].iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidArgument(format!(
                "{}x{} -> {}x{} overflows at scale {scale}",
                source.width, source.height, dest.width, dest.height
            )));
        }
        Ok(Self { source, dest, mode, scale, offset })
    }

    pub fn source(&self) -> Size {
        self.source
    }

    pub fn dest(&self) -> Size {
        self.dest
    }

    pub fn mode(&self) -> FillMode {
        self.mode
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Size of the whole source after scaling (may exceed the destination under fill).
    pub fn scaled_size(&self) -> Size {
        self.source.scaled(self.scale)
    }

    #[inline]
    pub fn map_point(&self, normalized: Point) -> Point {
        map_point(normalized, self.source, self.scale, self.offset)
    }

    pub fn map_pose(&self, pose: &Pose) -> Vec<Point> {
        pose.positions().map(|p| self.map_point(p)).collect()
    }

    /// Destination pixel -> source pixel (not normalized).
    /// Visual: which camera pixel ends up under a given window pixel.
    #[inline]
    pub fn to_source_pixel(&self, dest_pixel: Point) -> Point {
        Point::new(
            (dest_pixel.x - self.offset.x) / self.scale,
            (dest_pixel.y - self.offset.y) / self.scale,
        )
    }

    fn matches(&self, source: Size, dest: Size, mode: FillMode) -> bool {
        self.source == source && self.dest == dest && self.mode == mode
    }
}

/// Keeps the last mapping while the frame size, window size and mode stay the same.
#[derive(Debug, Default)]
pub struct MappingCache {
    current: Option<Mapping>,
}

impl MappingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, source: Size, dest: Size, mode: FillMode) -> Result<Mapping> {
        if let Some(m) = self.current {
            if m.matches(source, dest, mode) {
                return Ok(m);
            }
        }

        let m = Mapping::new(source, dest, mode)?;
        tracing::debug!(
            scale = m.scale,
            offset_x = m.offset.x,
            offset_y = m.offset.y,
            %mode,
            "mapping recomputed"
        );
        self.current = Some(m);
        Ok(m)
    }
}

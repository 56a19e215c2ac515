// Core types shared by the camera, detector, mapper and renderer.

use std::time::Duration;

use crate::geometry::{Point, Size};

#[derive(Clone, Debug)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// All-black buffer of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    pub fn size(&self) -> Size {
        Size::from((self.width, self.height))
    }

    /// Reallocate only when the window size actually changed.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, 0);
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }
}

/// One detected keypoint, normalized to the analyzed image (0..1 on both axes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub position: Point,
    /// Detector confidence that the keypoint is visible; the mapper ignores it.
    pub visibility: Option<f32>,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { position: Point::new(x, y), visibility: None }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = Some(visibility);
        self
    }
}

/// Landmarks of one body in one frame. Index = anatomical landmark id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    landmarks: Vec<Landmark>,
}

impl Pose {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.landmarks.iter().map(|l| l.position)
    }
}

impl FromIterator<Landmark> for Pose {
    fn from_iter<I: IntoIterator<Item = Landmark>>(iter: I) -> Self {
        Self { landmarks: iter.into_iter().collect() }
    }
}

/// A skeletal edge between two landmark indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub start: usize,
    pub end: usize,
}

impl Connection {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Both endpoints, or None when either index is past the end of `items`.
    /// Lite detector configurations can return fewer landmarks than the topology names.
    pub fn endpoints<T: Copy>(&self, items: &[T]) -> Option<(T, T)> {
        Some((*items.get(self.start)?, *items.get(self.end)?))
    }
}

/// Everything the detector reports for one processed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    /// Pixel size of the image the detector analyzed (the mapper's source size).
    pub input_size: Size,
    pub poses: Vec<Pose>,
    pub inference_time: Duration,
}

impl DetectionResult {
    pub fn inference_ms(&self) -> f64 {
        self.inference_time.as_secs_f64() * 1000.0
    }
}

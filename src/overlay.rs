// Pose overlay renderer.
// Visual outcomes:
// - The camera frame fills (or fits into) the window, cropped or letterboxed.
// - Teal bones and yellow keypoints sit exactly on the body in that preview.
// - A small bar chart shows recent inference times.

use std::time::Instant;

use crate::draw::{draw_thick_line, fill_disc, fill_rect};
use crate::error::Result;
use crate::geometry::{FillMode, Mapping, MappingCache, Point};
use crate::inference::InferenceTimeHistory;
use crate::types::{Connection, DetectionResult, FrameBuffer};

pub const LANDMARK_STROKE_WIDTH: f32 = 12.0;
pub const POINT_COLOR: u32 = 0x00FF_FF00; // yellow
pub const LINE_COLOR: u32 = 0x0000_7F8B;  // teal

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub point_color: u32,
    pub line_color: u32,
    /// Line thickness and keypoint diameter, in window pixels.
    pub stroke_width: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            point_color: POINT_COLOR,
            line_color: LINE_COLOR,
            stroke_width: LANDMARK_STROKE_WIDTH,
        }
    }
}

/// Draw one already-mapped pose: bones first, keypoints on top.
/// Connections naming a landmark the pose doesn't have are skipped.
pub fn draw_pose(fb: &mut FrameBuffer, points: &[Point], connections: &[Connection], style: &OverlayStyle) {
    for conn in connections {
        match conn.endpoints(points) {
            Some((a, b)) => draw_thick_line(fb, a, b, style.stroke_width, style.line_color),
            None => tracing::trace!(start = conn.start, end = conn.end, "connection endpoint missing"),
        }
    }

    let radius = style.stroke_width / 2.0;
    for &p in points {
        fill_disc(fb, p, radius, style.point_color);
    }
}

/// Map every pose of `result` onto `fb` and draw it. Returns how many poses were drawn.
///
/// Fails with `InvalidArgument` before drawing anything when the detector's image size
/// or the framebuffer size is unusable; the caller skips the overlay for that frame.
pub fn draw_detection(
    fb: &mut FrameBuffer,
    result: &DetectionResult,
    mode: FillMode,
    cache: &mut MappingCache,
    connections: &[Connection],
    style: &OverlayStyle,
) -> Result<usize> {
    let mapping = cache.get(result.input_size, fb.size(), mode)?;
    for pose in &result.poses {
        let points = mapping.map_pose(pose);
        draw_pose(fb, &points, connections, style);
    }
    Ok(result.poses.len())
}

/// Nearest-neighbour copy of `frame` into `screen` through `mapping`.
/// Visual: the live preview, cropped under fill, with black bars under fit.
pub fn blit_frame(screen: &mut FrameBuffer, frame: &FrameBuffer, mapping: &Mapping) {
    // The transform is separable: one source column per screen column, one row per row.
    let cols: Vec<Option<usize>> = (0..screen.width)
        .map(|x| {
            let sx = mapping.to_source_pixel(Point::new(x as f32 + 0.5, 0.0)).x;
            source_index(sx, frame.width)
        })
        .collect();

    for y in 0..screen.height {
        let row = &mut screen.pixels[y * screen.width..(y + 1) * screen.width];
        let sy = mapping.to_source_pixel(Point::new(0.0, y as f32 + 0.5)).y;
        let Some(src_y) = source_index(sy, frame.height) else {
            row.fill(0); // letterbox bar
            continue;
        };
        let src_row = src_y * frame.width;
        for (dst, col) in row.iter_mut().zip(&cols) {
            *dst = col
                .and_then(|sx| frame.pixels.get(src_row + sx).copied())
                .unwrap_or(0);
        }
    }
}

#[inline]
fn source_index(s: f32, limit: usize) -> Option<usize> {
    (s >= 0.0 && s < limit as f32).then(|| (s as usize).min(limit - 1))
}

/// Bars for the samples in `history`, newest on the right edge, scaled to the window's max.
/// Visual: a small dark panel at (x,y) whose bars scroll left as they age out.
pub fn draw_inference_chart(
    fb: &mut FrameBuffer,
    history: &InferenceTimeHistory,
    now: Instant,
    origin: (i32, i32),
    size: (i32, i32),
    color: u32,
) {
    let (x, y) = origin;
    let (w, h) = size;
    if w <= 2 || h <= 2 {
        return;
    }
    fill_rect(fb, x, y, w, h, 0x0020_2020);

    let Some(max_ms) = history.max_ms().filter(|m| *m > 0.0) else { return };
    let window = history.window().as_secs_f64();
    if window <= 0.0 {
        return;
    }

    let inner_w = (w - 2) as f64;
    let inner_h = (h - 2) as f64;
    for sample in history.samples() {
        let age = now.saturating_duration_since(sample.at).as_secs_f64();
        let fx = (1.0 - age / window).clamp(0.0, 1.0);
        let bar_x = x + 1 + (fx * (inner_w - 2.0)) as i32;
        let bar_h = ((sample.inference_ms / max_ms) * inner_h).round().max(1.0) as i32;
        fill_rect(fb, bar_x, y + 1 + (inner_h as i32 - bar_h), 2, bar_h, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::skeleton::POSE_CONNECTIONS;
    use crate::types::{Landmark, Pose};
    use std::time::Duration;

    fn count(fb: &FrameBuffer, color: u32) -> usize {
        fb.pixels.iter().filter(|&&p| p == color).count()
    }

    #[test]
    fn short_pose_draws_without_out_of_range_edges() {
        let mut fb = FrameBuffer::new(100, 100);
        // Only 3 of 33 landmarks: most connections must be skipped.
        let points = [Point::new(10.0, 10.0), Point::new(50.0, 10.0), Point::new(90.0, 10.0)];
        draw_pose(&mut fb, &points, &POSE_CONNECTIONS, &OverlayStyle::default());
        assert_eq!(fb.get(30, 10), Some(LINE_COLOR)); // 0-1 edge
        assert_eq!(fb.get(70, 10), Some(LINE_COLOR)); // 1-2 edge
        assert_eq!(fb.get(50, 10), Some(POINT_COLOR));
        assert_eq!(fb.get(50, 60), Some(0));
    }

    #[test]
    fn empty_pose_draws_nothing() {
        let mut fb = FrameBuffer::new(10, 10);
        draw_pose(&mut fb, &[], &POSE_CONNECTIONS, &OverlayStyle::default());
        assert!(fb.pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn detection_lands_on_the_mapped_pixel() {
        let mut fb = FrameBuffer::new(200, 100);
        let result = DetectionResult {
            input_size: Size::new(100.0, 100.0),
            poses: vec![[Landmark::new(0.5, 0.5)].into_iter().collect::<Pose>()],
            inference_time: Duration::from_millis(5),
        };
        let style = OverlayStyle { stroke_width: 4.0, ..OverlayStyle::default() };
        let mut cache = MappingCache::new();

        // fit: scale 1, offset (50, 0) -> center of the window
        let drawn = draw_detection(&mut fb, &result, FillMode::ScaleToFit, &mut cache, &POSE_CONNECTIONS, &style).unwrap();
        assert_eq!(drawn, 1);
        assert_eq!(fb.get(100, 50), Some(POINT_COLOR));
        assert_eq!(count(&fb, LINE_COLOR), 0);
    }

    #[test]
    fn detection_with_bad_input_size_draws_nothing() {
        let mut fb = FrameBuffer::new(20, 20);
        let result = DetectionResult {
            input_size: Size::new(0.0, 480.0),
            poses: vec![[Landmark::new(0.5, 0.5)].into_iter().collect::<Pose>()],
            inference_time: Duration::ZERO,
        };
        let err = draw_detection(
            &mut fb,
            &result,
            FillMode::ScaleToFill,
            &mut MappingCache::new(),
            &POSE_CONNECTIONS,
            &OverlayStyle::default(),
        );
        assert!(err.is_err());
        assert!(fb.pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn blit_fit_letterboxes_and_fill_crops() {
        // 2x1 source: left red, right blue
        let frame = FrameBuffer { width: 2, height: 1, pixels: vec![0x00FF_0000, 0x0000_00FF] };

        // fit into 4x4: scale 2, image rows 1..3, black bars above and below
        let mut screen = FrameBuffer::new(4, 4);
        let fit = Mapping::new(frame.size(), screen.size(), FillMode::ScaleToFit).unwrap();
        blit_frame(&mut screen, &frame, &fit);
        assert_eq!(screen.get(0, 0), Some(0));
        assert_eq!(screen.get(0, 1), Some(0x00FF_0000));
        assert_eq!(screen.get(3, 2), Some(0x0000_00FF));
        assert_eq!(screen.get(3, 3), Some(0));

        // fill 4x4: scale 4, source is 8 wide, centered -> 2 columns of each color
        let fill = Mapping::new(frame.size(), screen.size(), FillMode::ScaleToFill).unwrap();
        blit_frame(&mut screen, &frame, &fill);
        assert_eq!(screen.get(0, 0), Some(0x00FF_0000));
        assert_eq!(screen.get(1, 3), Some(0x00FF_0000));
        assert_eq!(screen.get(2, 0), Some(0x0000_00FF));
        assert_eq!(screen.get(3, 3), Some(0x0000_00FF));
    }

    #[test]
    fn chart_scales_bars_to_max() {
        let t0 = Instant::now();
        let mut history = InferenceTimeHistory::default();
        history.record(10.0, t0);
        history.record(20.0, t0 + Duration::from_secs(1));

        let mut fb = FrameBuffer::new(50, 30);
        let color = 0x0000_FF00;
        draw_inference_chart(&mut fb, &history, t0 + Duration::from_secs(1), (0, 0), (50, 30), color);
        // newest (max) bar reaches the top of the inner area
        let newest_x = (0..50).rev().find(|&x| fb.get(x, 1) == Some(color));
        assert!(newest_x.is_some());
        assert!(count(&fb, color) > 0);
    }
}

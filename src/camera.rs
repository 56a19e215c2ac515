// Frame sources: a live camera, or a still image shown in place of the camera.
// Visual expectation: each `next_frame()` is one upright RGB image packed as
// 0x00RRGGBB; the renderer scales it into the window with fill or fit.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::FrameBuffer;

use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

const TARGET_FPS: u32 = 30;

// A small wrapper around nokhwa::Camera so the main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` near the requested resolution and start streaming.
    pub fn open(index: u32, width: u32, height: u32) -> Result<Self> {
        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            TARGET_FPS,
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(CameraIndex::Index(index), req)
            .map_err(|e| Error::CameraInit(format!("Create camera {index}: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The stream might settle on a slightly different resolution.
        let actual = cam.resolution();
        tracing::info!(
            index,
            requested_width = width,
            requested_height = height,
            width = actual.width(),
            height = actual.height(),
            "camera stream opened"
        );

        Ok(Self { cam, width: actual.width(), height: actual.height() })
    }

    /// Grab one frame (blocks until the camera delivers it).
    pub fn next_frame(&mut self) -> Result<FrameBuffer> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        let rgb = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        let fb = pack_rgb(rgb.width(), rgb.height(), rgb.as_raw());
        if (fb.width as u32, fb.height as u32) != (self.width, self.height) {
            tracing::debug!(width = fb.width, height = fb.height, "camera resolution changed");
            self.width = fb.width as u32;
            self.height = fb.height as u32;
        }
        Ok(fb)
    }
}

/// Where frames come from: the webcam, or one still image repeated forever.
pub enum FrameSource {
    Camera(CameraCapture),
    Still(FrameBuffer),
}

impl FrameSource {
    pub fn next_frame(&mut self) -> Result<FrameBuffer> {
        match self {
            FrameSource::Camera(cam) => cam.next_frame(),
            FrameSource::Still(fb) => Ok(fb.clone()),
        }
    }
}

/// Decode an image file (any format the `image` crate knows) into a framebuffer.
pub fn load_still(path: impl AsRef<Path>) -> Result<FrameBuffer> {
    let path = path.as_ref();
    let rgb = image::open(path)?.to_rgb8();
    tracing::info!(path = %path.display(), width = rgb.width(), height = rgb.height(), "loaded still image");
    Ok(pack_rgb(rgb.width(), rgb.height(), rgb.as_raw()))
}

/// Tightly packed RGB8 bytes -> 0x00RRGGBB framebuffer.
pub fn pack_rgb(width: u32, height: u32, rgb: &[u8]) -> FrameBuffer {
    let pixels = rgb
        .chunks_exact(3)
        .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
        .collect();
    FrameBuffer { width: width as usize, height: height as usize, pixels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn packs_rgb_row_major() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(1, 0, Rgb([0x12, 0x34, 0x56]));
        img.put_pixel(0, 1, Rgb([0xFF, 0x00, 0x00]));

        let fb = pack_rgb(img.width(), img.height(), img.as_raw());
        assert_eq!((fb.width, fb.height), (2, 2));
        assert_eq!(fb.get(1, 0), Some(0x0012_3456));
        assert_eq!(fb.get(0, 1), Some(0x00FF_0000));
        assert_eq!(fb.get(0, 0), Some(0));
    }

    #[test]
    fn still_source_repeats_the_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("still.png");
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 1, Rgb([0, 0xFF, 0]));
        img.save(&path).unwrap();

        let mut source = FrameSource::Still(load_still(&path).unwrap());
        let a = source.next_frame().unwrap();
        let b = source.next_frame().unwrap();
        assert_eq!((a.width, a.height), (3, 2));
        assert_eq!(a.get(2, 1), Some(0x0000_FF00));
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn missing_still_is_an_error() {
        assert!(load_still("/definitely/not/here.png").is_err());
    }
}

// What you SEE now:
// • Live camera (or a still image) fills the window; resize the window freely.
// • With POSE_REPLAY_PATH set, the recorded skeleton is drawn on top:
//   teal bones, yellow keypoints, aligned with the cropped/letterboxed preview.
// • F toggles FILL (crop, full-bleed) and FIT (letterbox). ESC quits.
// • HUD shows mode, latest inference time, FPS, and a 10 s inference chart.
// • A small crosshair marks the center of the camera image.

use std::time::{Duration, Instant};

use pose_overlay::camera::{load_still, CameraCapture, FrameSource};
use pose_overlay::config::Config;
use pose_overlay::detector::{PoseDetector, ReplayDetector};
use pose_overlay::draw::{draw_crosshair, draw_text_5x7, Drawer};
use pose_overlay::inference::InferenceTimeHistory;
use pose_overlay::overlay::{blit_frame, draw_detection, draw_inference_chart, OverlayStyle};
use pose_overlay::skeleton::POSE_CONNECTIONS;
use pose_overlay::{Error, FrameBuffer, MappingCache, Point};
use tracing_subscriber::EnvFilter;

const TITLE: &str = "Pose Overlay";
const HUD_COLOR: u32 = 0x00_FF_FF_FF;
const CHART_COLOR: u32 = 0x00_00_C8_96;

fn main() -> Result<(), Error> {
    // .env is optional
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    tracing::info!(?config, "starting");

    /* --- Frame source + detector + window ---
       Visual: window opens showing the camera (or still image). */
    let mut source = match &config.image_path {
        Some(path) => FrameSource::Still(load_still(path)?),
        None => FrameSource::Camera(CameraCapture::open(
            config.camera_index,
            config.camera_width,
            config.camera_height,
        )?),
    };
    let mut detector: Option<Box<dyn PoseDetector>> = match &config.replay_path {
        Some(path) => Some(Box::new(ReplayDetector::from_path(path)?)),
        None => {
            tracing::info!("no POSE_REPLAY_PATH set; showing the preview without an overlay");
            None
        }
    };
    let mut drawer = Drawer::new(TITLE, config.window_width, config.window_height)?;

    /* --- Reusable screen buffer ---
       Visual: this is the image you actually see each frame; follows the window size. */
    let mut screen = FrameBuffer::new(config.window_width, config.window_height);

    /* --- Mapping state ---
       One cache for the camera frame, one for the detector's input image:
       they usually share a size, but the detector may analyze a downscaled copy. */
    let mut fill_mode = config.fill_mode;
    let mut preview_mapping = MappingCache::new();
    let mut pose_mapping = MappingCache::new();
    let style = OverlayStyle::default();

    /* --- HUD / FPS / inference history --- */
    let mut history = InferenceTimeHistory::default();
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();

        /* 1) Inputs + window size */
        if drawer.f_pressed_once() {
            fill_mode = fill_mode.toggled();
            tracing::debug!(%fill_mode, "fill mode toggled");
        }
        let (win_w, win_h) = drawer.size();
        if win_w == 0 || win_h == 0 {
            // minimized: nothing to draw into, keep the window pumping
            drawer.present(&screen)?;
            continue;
        }
        screen.resize(win_w, win_h);

        /* 2) Grab a fresh frame and run the detector on it */
        let frame = source.next_frame()?;
        let detection = match detector.as_mut() {
            Some(d) => d.detect(&frame)?,
            None => None,
        };
        if let Some(result) = &detection {
            history.record(result.inference_ms(), now);
        }

        /* 3) Preview: camera frame scaled into the window with the current mode.
           Visual: full-bleed crop under FILL, black bars under FIT. */
        let frame_center = match preview_mapping.get(frame.size(), screen.size(), fill_mode) {
            Ok(mapping) => {
                blit_frame(&mut screen, &frame, &mapping);
                Some(mapping.map_point(Point::new(0.5, 0.5)))
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping preview for this frame");
                screen.fill(0);
                None
            }
        };

        /* 4) Overlay: landmarks mapped through the same fill mode.
           Visual: skeleton sits on the body. A bad size skips this frame's overlay. */
        let mut poses_drawn = 0;
        if let Some(result) = &detection {
            match draw_detection(&mut screen, result, fill_mode, &mut pose_mapping, &POSE_CONNECTIONS, &style) {
                Ok(n) => poses_drawn = n,
                Err(e) => tracing::warn!(error = %e, "skipping pose overlay for this frame"),
            }
        }

        /* 5) HUD text + inference chart */
        let inference_text = match history.latest() {
            Some(ms) => format!("INFERENCE: {ms:.1} MS"),
            None => String::from("INFERENCE: -"),
        };
        let hud = format!(
            "{} | {} | POSES: {} | {} | F: FILL/FIT  ESC: QUIT",
            fill_mode.label(),
            inference_text,
            poses_drawn,
            hud_fps_text
        );
        draw_text_5x7(&mut screen, 8, 8, &hud, HUD_COLOR);
        // Visual: "+" on the middle of the camera image; stays centered in both modes.
        if let Some(center) = frame_center {
            draw_crosshair(&mut screen, center, 8, HUD_COLOR);
        }
        if detector.is_some() {
            let chart_h = 40;
            draw_inference_chart(
                &mut screen,
                &history,
                now,
                (8, win_h as i32 - chart_h - 8),
                (160, chart_h),
                CHART_COLOR,
            );
        }

        /* 6) Present to the window (this is when the on-screen image updates). */
        drawer.present(&screen)?;

        /* 7) FPS counter (logs + HUD once per second) */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            tracing::info!("FPS: {:.1}", fps);
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}

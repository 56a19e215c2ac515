// The seam to the pose detector, plus a detector that replays recorded results.
// Visual: with a replay file configured, a recorded skeleton moves over the live
// camera preview, exactly as a live landmarker's output would be drawn.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::geometry::Size;
use crate::types::{DetectionResult, FrameBuffer, Landmark, Pose};

/// Anything that turns a camera frame into normalized pose landmarks.
pub trait PoseDetector {
    /// `Ok(None)` means "no result for this frame" (dropped, still warming up, ...).
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Option<DetectionResult>>;
}

/// One line of a recording.
#[derive(Debug, Deserialize)]
struct RecordedResult {
    image_width: f32,
    image_height: f32,
    #[serde(default)]
    inference_time_ms: f64,
    #[serde(default)]
    poses: Vec<Vec<RecordedLandmark>>,
}

#[derive(Debug, Deserialize)]
struct RecordedLandmark {
    x: f32,
    y: f32,
    #[serde(default)]
    visibility: Option<f32>,
}

impl RecordedResult {
    fn into_result(self, line: usize) -> Result<DetectionResult> {
        let input_size = Size::new(self.image_width, self.image_height);
        if !input_size.is_valid() {
            return Err(Error::Replay {
                line,
                message: format!("image size {}x{} is not positive", self.image_width, self.image_height),
            });
        }
        if !(self.inference_time_ms.is_finite() && self.inference_time_ms >= 0.0) {
            return Err(Error::Replay {
                line,
                message: format!("inference_time_ms {} is not a duration", self.inference_time_ms),
            });
        }

        let poses = self
            .poses
            .into_iter()
            .map(|landmarks| {
                landmarks
                    .into_iter()
                    .map(|l| match l.visibility {
                        Some(v) => Landmark::new(l.x, l.y).with_visibility(v),
                        None => Landmark::new(l.x, l.y),
                    })
                    .collect::<Pose>()
            })
            .collect();

        Ok(DetectionResult {
            input_size,
            poses,
            inference_time: Duration::from_nanos((self.inference_time_ms * 1e6).round() as u64),
        })
    }
}

/// Plays back a JSON Lines recording, one result per frame, looping at the end.
#[derive(Debug)]
pub struct ReplayDetector {
    results: Vec<DetectionResult>,
    cursor: usize,
}

impl ReplayDetector {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let detector = Self::from_reader(BufReader::new(file))?;
        tracing::info!(path = %path.display(), results = detector.len(), "loaded pose recording");
        Ok(detector)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut results = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: RecordedResult = serde_json::from_str(&line)
                .map_err(|e| Error::Replay { line: line_no, message: e.to_string() })?;
            results.push(record.into_result(line_no)?);
        }
        Ok(Self { results, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl PoseDetector for ReplayDetector {
    fn detect(&mut self, _frame: &FrameBuffer) -> Result<Option<DetectionResult>> {
        if self.results.is_empty() {
            return Ok(None);
        }
        let result = self.results[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.results.len();
        Ok(Some(result))
    }
}

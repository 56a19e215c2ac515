// Rolling record of how long the detector took per frame.
// Visual: drives the "INFERENCE: 12.3 MS" HUD text and the small bar chart in the corner.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How far back the chart looks.
pub const DEFAULT_HISTORY_WINDOW: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferenceSample {
    pub inference_ms: f64,
    pub at: Instant,
}

#[derive(Debug)]
pub struct InferenceTimeHistory {
    window: Duration,
    latest: Option<f64>,
    samples: VecDeque<InferenceSample>, // newest at the front
}

impl Default for InferenceTimeHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl InferenceTimeHistory {
    pub fn new(window: Duration) -> Self {
        Self { window, latest: None, samples: VecDeque::new() }
    }

    /// Store one measurement taken at `now` and drop everything older than the window.
    pub fn record(&mut self, inference_ms: f64, now: Instant) {
        self.latest = Some(inference_ms);
        self.samples.push_front(InferenceSample { inference_ms, at: now });

        // Instant can't go below the process start; no cutoff means nothing is old yet.
        if let Some(cutoff) = now.checked_sub(self.window) {
            while self.samples.back().is_some_and(|s| s.at < cutoff) {
                self.samples.pop_back();
            }
        }
    }

    pub fn latest(&self) -> Option<f64> {
        self.latest
    }

    /// Samples inside the window, newest first.
    pub fn samples(&self) -> impl ExactSizeIterator<Item = &InferenceSample> + '_ {
        self.samples.iter()
    }

    pub fn max_ms(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.inference_ms).reduce(f64::max)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

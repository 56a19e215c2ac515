// 33-point body model topology (BlazePose / MediaPipe pose landmarker).
// Visual: these pairs are the teal "bones" drawn between the yellow keypoints.

use crate::types::Connection;

/// Landmarks per pose in the full body model.
pub const POSE_LANDMARK_COUNT: usize = 33;

const fn c(start: usize, end: usize) -> Connection {
    Connection::new(start, end)
}

/// Which landmark pairs are joined by a skeletal edge.
pub const POSE_CONNECTIONS: [Connection; 35] = [
    // Face: nose -> eyes -> ears, mouth
    c(0, 1), c(1, 2), c(2, 3), c(3, 7),
    c(0, 4), c(4, 5), c(5, 6), c(6, 8),
    c(9, 10),
    // Shoulders and arms
    c(11, 12),
    c(11, 13), c(13, 15),
    c(12, 14), c(14, 16),
    // Left hand: wrist -> pinky / index / thumb
    c(15, 17), c(15, 19), c(15, 21), c(17, 19),
    // Right hand
    c(16, 18), c(16, 20), c(16, 22), c(18, 20),
    // Torso
    c(11, 23), c(12, 24), c(23, 24),
    // Legs
    c(23, 25), c(25, 27),
    c(24, 26), c(26, 28),
    // Feet: ankle -> heel -> foot index
    c(27, 29), c(29, 31), c(27, 31),
    c(28, 30), c(30, 32), c(28, 32),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_index_is_inside_the_model() {
        for conn in POSE_CONNECTIONS {
            assert!(conn.start < POSE_LANDMARK_COUNT, "{conn:?}");
            assert!(conn.end < POSE_LANDMARK_COUNT, "{conn:?}");
            assert_ne!(conn.start, conn.end);
        }
    }

    #[test]
    fn no_duplicate_edges() {
        let edges: HashSet<(usize, usize)> = POSE_CONNECTIONS
            .iter()
            .map(|c| (c.start.min(c.end), c.start.max(c.end)))
            .collect();
        assert_eq!(edges.len(), POSE_CONNECTIONS.len());
    }

    #[test]
    fn every_landmark_is_connected() {
        let touched: HashSet<usize> = POSE_CONNECTIONS
            .iter()
            .flat_map(|c| [c.start, c.end])
            .collect();
        assert_eq!(touched.len(), POSE_LANDMARK_COUNT);
    }
}

// End-to-end checks of the landmark -> window transform through the public API.

use pose_overlay::skeleton::{POSE_CONNECTIONS, POSE_LANDMARK_COUNT};
use pose_overlay::{
    compute_offset, compute_scale_factor, map_point, map_pose, Error, FillMode, Landmark, Mapping,
    Point, Pose, Size,
};
use proptest::prelude::*;

const MODES: [FillMode; 2] = [FillMode::ScaleToFill, FillMode::ScaleToFit];

fn landmarks(coords: &[(f32, f32)]) -> Pose {
    coords.iter().map(|&(x, y)| Landmark::new(x, y)).collect()
}

#[test]
fn camera_on_phone_screen_fill() {
    let source = Size::new(640.0, 480.0);
    let dest = Size::new(1080.0, 2280.0);

    let scale = compute_scale_factor(source, dest, FillMode::ScaleToFill).unwrap();
    assert_eq!(scale, 4.75);
    let offset = compute_offset(source, dest, scale);
    assert_eq!(offset, Point::new(-980.0, 0.0));

    let center = map_point(Point::new(0.5, 0.5), source, scale, offset);
    assert_eq!(center, Point::new(540.0, 1140.0));
}

#[test]
fn same_size_fit_maps_straight_through() {
    let size = Size::new(640.0, 480.0);
    let scale = compute_scale_factor(size, size, FillMode::ScaleToFit).unwrap();
    assert_eq!(scale, 1.0);
    let offset = compute_offset(size, size, scale);
    assert_eq!(offset, Point::ORIGIN);
    assert_eq!(map_point(Point::new(0.25, 0.75), size, scale, offset), Point::new(160.0, 360.0));
}

#[test]
fn empty_pose_maps_to_nothing() {
    let out = map_pose(&Pose::default(), Size::new(640.0, 480.0), Size::new(100.0, 100.0), FillMode::ScaleToFill)
        .unwrap();
    assert!(out.is_empty());
}

#[test]
fn zero_dimensions_are_invalid_arguments() {
    let ok = Size::new(640.0, 480.0);
    for bad in [Size::new(0.0, 480.0), Size::new(640.0, 0.0), Size::new(0.0, 0.0)] {
        for mode in MODES {
            assert!(matches!(compute_scale_factor(bad, ok, mode), Err(Error::InvalidArgument(_))));
            assert!(matches!(compute_scale_factor(ok, bad, mode), Err(Error::InvalidArgument(_))));
            assert!(matches!(map_pose(&landmarks(&[(0.5, 0.5)]), bad, ok, mode), Err(Error::InvalidArgument(_))));
        }
    }
}

#[test]
fn full_body_pose_maps_every_landmark_in_order() {
    let coords: Vec<(f32, f32)> = (0..POSE_LANDMARK_COUNT)
        .map(|i| (i as f32 / 32.0, 1.0 - i as f32 / 32.0))
        .collect();
    let pose = landmarks(&coords);
    let m = Mapping::new(Size::new(480.0, 640.0), Size::new(1080.0, 1920.0), FillMode::ScaleToFill).unwrap();
    let points = m.map_pose(&pose);

    assert_eq!(points.len(), POSE_LANDMARK_COUNT);
    for (p, &(x, y)) in points.iter().zip(&coords) {
        assert_eq!(*p, m.map_point(Point::new(x, y)));
    }
    for conn in POSE_CONNECTIONS {
        assert!(conn.endpoints(&points).is_some());
    }
}

#[test]
fn mapping_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync + Copy>() {}
    assert_send_sync::<Mapping>();
    assert_send_sync::<Size>();
    assert_send_sync::<Point>();

    let m = Mapping::new(Size::new(640.0, 480.0), Size::new(1280.0, 720.0), FillMode::ScaleToFit).unwrap();
    let expected = m.map_point(Point::new(0.4, 0.6));
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(move || m.map_point(Point::new(0.4, 0.6))))
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}

fn dim() -> impl Strategy<Value = f32> {
    1.0f32..4096.0
}

fn size() -> impl Strategy<Value = Size> {
    (dim(), dim()).prop_map(|(w, h)| Size::new(w, h))
}

proptest! {
    #[test]
    fn fill_scales_at_least_as_much_as_fit(source in size(), dest in size()) {
        let fill = compute_scale_factor(source, dest, FillMode::ScaleToFill).unwrap();
        let fit = compute_scale_factor(source, dest, FillMode::ScaleToFit).unwrap();
        prop_assert!(fill >= fit);
        prop_assert!(fit > 0.0);
    }

    #[test]
    fn identical_sizes_need_no_transform(source in size()) {
        for mode in MODES {
            let m = Mapping::new(source, source, mode).unwrap();
            prop_assert_eq!(m.scale(), 1.0);
            prop_assert_eq!(m.offset(), Point::ORIGIN);
        }
    }

    #[test]
    fn corners_land_on_offset_and_far_corner(source in size(), dest in size()) {
        for mode in MODES {
            let m = Mapping::new(source, dest, mode).unwrap();
            let scale = m.scale();
            let offset = m.offset();
            prop_assert_eq!(m.map_point(Point::new(0.0, 0.0)), offset);
            prop_assert_eq!(
                m.map_point(Point::new(1.0, 1.0)),
                Point::new(offset.x + source.width * scale, offset.y + source.height * scale)
            );
        }
    }

    #[test]
    fn fill_covers_and_fit_fits(source in size(), dest in size()) {
        let fill = Mapping::new(source, dest, FillMode::ScaleToFill).unwrap();
        prop_assert!(fill.offset().x <= 1e-3 && fill.offset().y <= 1e-3);

        let fit = Mapping::new(source, dest, FillMode::ScaleToFit).unwrap();
        prop_assert!(fit.offset().x >= -1e-3 && fit.offset().y >= -1e-3);
    }

    #[test]
    fn map_pose_is_deterministic(
        coords in prop::collection::vec((-0.5f32..1.5, -0.5f32..1.5), 0..40),
        source in size(),
        dest in size(),
        fit in any::<bool>(),
    ) {
        let mode = if fit { FillMode::ScaleToFit } else { FillMode::ScaleToFill };
        let pose = landmarks(&coords);
        let a = map_pose(&pose, source, dest, mode).unwrap();
        let b = map_pose(&pose, source, dest, mode).unwrap();
        prop_assert_eq!(a.len(), coords.len());
        let bits = |v: &[Point]| v.iter().map(|p| (p.x.to_bits(), p.y.to_bits())).collect::<Vec<_>>();
        prop_assert_eq!(bits(&a), bits(&b));
    }
}

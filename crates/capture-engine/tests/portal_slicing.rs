use image::RgbaImage;
use lasso_capture_engine::portal::{global_scale_factor, slice_combined, slice_rect};
use lasso_platform_core::{virtual_desktop_bounds, LogicalRect, ScreenInfo};
use proptest::prelude::*;

/// Screens laid out in a row, left to right, all at `y`.
fn row(widths: &[u32], height: u32, origin_x: i32, y: i32) -> Vec<ScreenInfo> {
    let mut x = origin_x;
    widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            let geometry = LogicalRect::new(x, y, *width, height);
            let screen = ScreenInfo::new(format!("S{i}"), geometry, 1.0);
            x += *width as i32;
            screen
        })
        .collect()
}

#[test]
fn hidpi_pair_round_trips_at_double_scale() {
    let layout = row(&[1280, 1280], 800, 0, 0);
    let combined = RgbaImage::new(5120, 1600);

    let frames = slice_combined(&combined, &layout).unwrap();
    assert_eq!(frames.len(), 2);
    for frame in &frames {
        assert_eq!(frame.scale_factor, 2.0);
        assert_eq!(frame.physical_size(), (2560, 1600));
    }
}

#[cfg(target_os = "linux")]
#[test]
fn xcap_reported_hidpi_pair_slices_to_native_panels() {
    use lasso_platform_linux::reported_screen;

    // Two 3840x2160 panels at scale 2, as xcap reports them.
    let layout = vec![
        reported_screen("DP-1", 0, 0, 1920, 1080, 2.0),
        reported_screen("DP-2", 1920, 0, 1920, 1080, 2.0),
    ];
    let combined = RgbaImage::new(7680, 2160);

    let frames = slice_combined(&combined, &layout).unwrap();
    assert_eq!(frames.len(), 2);
    for frame in &frames {
        assert_eq!(frame.scale_factor, 2.0);
        assert_eq!(frame.physical_size(), (3840, 2160));
    }
    assert_eq!(frames[1].geometry.x, 1920);
}

#[test]
fn stacked_screens_keep_enumeration_order_on_tied_x() {
    let layout = vec![
        ScreenInfo::new("top", LogicalRect::new(0, 0, 1920, 1080), 1.0),
        ScreenInfo::new("bottom", LogicalRect::new(0, 1080, 1920, 1080), 1.0),
    ];
    let combined = RgbaImage::new(1920, 2160);

    let frames = slice_combined(&combined, &layout).unwrap();
    let names: Vec<_> = frames.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["top", "bottom"]);
}

#[test]
fn empty_layout_is_an_error() {
    assert!(slice_combined(&RgbaImage::new(10, 10), &[]).is_err());
}

proptest! {
    #[test]
    fn slices_always_fit_inside_the_image(
        rects in prop::collection::vec(
            (-3000i32..3000, -2000i32..2000, 0u32..3000, 0u32..2000),
            1..5,
        ),
        image_width in 0u32..6000,
        image_height in 0u32..4000,
    ) {
        let layout: Vec<ScreenInfo> = rects
            .iter()
            .map(|(x, y, w, h)| ScreenInfo::new("s", LogicalRect::new(*x, *y, *w, *h), 1.0))
            .collect();
        prop_assume!(virtual_desktop_bounds(&layout).is_some());
        let bounds = virtual_desktop_bounds(&layout).unwrap();
        let scale = global_scale_factor(image_width, bounds.width);

        prop_assert!(scale.is_finite() && scale > 0.0);
        for screen in &layout {
            let slice = slice_rect(&screen.geometry, &bounds, scale, image_width, image_height);
            if let Some(rect) = slice {
                prop_assert!(rect.width > 0 && rect.height > 0);
                prop_assert!(rect.fits_within(image_width, image_height));
            }
        }
    }

    #[test]
    fn side_by_side_slices_tile_the_image_at_integer_scale(
        widths in prop::collection::vec(1u32..120, 1..4),
        height in 1u32..80,
        origin_x in -400i32..400,
        scale in 1u32..=3,
    ) {
        let layout = row(&widths, height, origin_x, 0);
        let total: u32 = widths.iter().sum();
        let combined = RgbaImage::new(total * scale, height * scale);

        let frames = slice_combined(&combined, &layout).unwrap();
        prop_assert_eq!(frames.len(), widths.len());

        let area: u64 = frames
            .iter()
            .map(|f| f.image.width() as u64 * f.image.height() as u64)
            .sum();
        prop_assert_eq!(area, combined.width() as u64 * combined.height() as u64);

        for (frame, width) in frames.iter().zip(&widths) {
            prop_assert_eq!(frame.scale_factor, scale as f64);
            prop_assert_eq!(frame.physical_size(), (width * scale, height * scale));
        }
    }

    #[test]
    fn side_by_side_slices_meet_within_a_pixel_at_fractional_scale(
        widths in prop::collection::vec(1u32..400, 2..5),
        height in 1u32..300,
        origin_x in -400i32..400,
        scale in prop::sample::select(vec![1.25f64, 1.5, 1.75]),
    ) {
        let layout = row(&widths, height, origin_x, 0);
        let total: u32 = widths.iter().sum();
        let image_width = (total as f64 * scale).round() as u32;
        let image_height = (height as f64 * scale).round() as u32;

        let bounds = virtual_desktop_bounds(&layout).unwrap();
        let derived = global_scale_factor(image_width, bounds.width);
        let slices: Vec<_> = layout
            .iter()
            .map(|screen| slice_rect(&screen.geometry, &bounds, derived, image_width, image_height))
            .collect::<Option<Vec<_>>>()
            .unwrap();

        prop_assert_eq!(slices[0].x, 0);
        for pair in slices.windows(2) {
            let gap = pair[1].x as i64 - (pair[0].x + pair[0].width) as i64;
            prop_assert!(gap.abs() <= 1, "gap {} between {:?} and {:?}", gap, pair[0], pair[1]);
        }
        let last = slices[slices.len() - 1];
        prop_assert!((image_width as i64 - (last.x + last.width) as i64).abs() <= 1);
        for slice in &slices {
            prop_assert!((image_height as i64 - slice.height as i64).abs() <= 1);
        }
    }

    #[test]
    fn frames_come_out_left_to_right(
        rects in prop::collection::vec((-500i32..500, 0i32..300, 1u32..200, 1u32..200), 1..5),
    ) {
        let layout: Vec<ScreenInfo> = rects
            .iter()
            .enumerate()
            .map(|(i, (x, y, w, h))| {
                ScreenInfo::new(format!("s{i}"), LogicalRect::new(*x, *y, *w, *h), 1.0)
            })
            .collect();
        let bounds = virtual_desktop_bounds(&layout).unwrap();
        let combined = RgbaImage::new(bounds.width, bounds.height);

        let frames = slice_combined(&combined, &layout).unwrap();
        for (position, frame) in frames.iter().enumerate() {
            prop_assert_eq!(frame.index, position);
        }
        for pair in frames.windows(2) {
            prop_assert!(pair[0].geometry.x <= pair[1].geometry.x);
        }
    }
}

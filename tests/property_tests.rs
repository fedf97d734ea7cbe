use image::{DynamicImage, Rgba, RgbaImage};
use img_mirror::batch::RunStats;
use img_mirror::config::RunConfig;
use img_mirror::processing::WorkingImage;
use img_mirror::utils::calculate_savings;
use img_mirror::validation::mirrored_output_path;
use proptest::prelude::*;
use std::path::Path;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn shrink_to_fit_stays_within_bounds(
        width in 1u32..=1200u32,
        height in 1u32..=1200u32,
        max_width in 1u32..=800u32,
        max_height in 1u32..=800u32
    ) {
        let mut img = WorkingImage::from_dynamic(DynamicImage::new_rgb8(width, height));
        img.shrink_to_fit(max_width, max_height);

        let (new_w, new_h) = img.dimensions();
        prop_assert!(new_w <= max_width && new_h <= max_height);
        prop_assert!(new_w <= width && new_h <= height);
        prop_assert!(new_w >= 1 && new_h >= 1);
    }

    #[test]
    fn shrink_to_fit_preserves_aspect_ratio(
        width in 50u32..=1200u32,
        height in 50u32..=1200u32,
        max_width in 20u32..=600u32,
        max_height in 20u32..=600u32
    ) {
        let mut img = WorkingImage::from_dynamic(DynamicImage::new_rgb8(width, height));
        img.shrink_to_fit(max_width, max_height);

        let (new_w, new_h) = img.dimensions();
        let (w, h) = (f64::from(width), f64::from(height));
        let (nw, nh) = (f64::from(new_w), f64::from(new_h));

        // Whichever side was derived from the other is off by rounding only.
        let height_error = (nh - h * nw / w).abs();
        let width_error = (nw - w * nh / h).abs();
        prop_assert!(
            height_error <= 1.0 || width_error <= 1.0,
            "{}x{} -> {}x{}", width, height, new_w, new_h
        );
    }

    #[test]
    fn shrink_to_fit_never_enlarges(
        width in 1u32..=400u32,
        height in 1u32..=400u32,
        extra_w in 0u32..=400u32,
        extra_h in 0u32..=400u32
    ) {
        let mut img = WorkingImage::from_dynamic(DynamicImage::new_rgb8(width, height));
        let resized = img.shrink_to_fit(width + extra_w, height + extra_h);

        prop_assert!(!resized);
        prop_assert_eq!(img.dimensions(), (width, height));
    }

    #[test]
    fn flatten_removes_alpha(
        width in 1u32..=32u32,
        height in 1u32..=32u32,
        r in any::<u8>(),
        g in any::<u8>(),
        b in any::<u8>(),
        a in any::<u8>()
    ) {
        let rgba = RgbaImage::from_pixel(width, height, Rgba([r, g, b, a]));
        let img = WorkingImage::from_dynamic(DynamicImage::ImageRgba8(rgba)).flatten();

        prop_assert!(!img.has_alpha());
        prop_assert_eq!(img.dimensions(), (width, height));

        let [fr, fg, fb] = img.as_dynamic().as_rgb8().unwrap().get_pixel(0, 0).0;
        // Compositing over white can only brighten a channel.
        prop_assert!(fr >= r && fg >= g && fb >= b);
        if a == 255 {
            prop_assert_eq!((fr, fg, fb), (r, g, b));
        }
        if a == 0 {
            prop_assert_eq!((fr, fg, fb), (255, 255, 255));
        }
    }

    #[test]
    fn mirrored_output_path_keeps_directories(
        dirs in prop::collection::vec("[a-z0-9_-]{1,8}", 0..4),
        stem in "[a-zA-Z0-9_-]{1,12}",
        ext in prop::sample::select(&["png", "jpg", "jpeg", "gif", "webp"])
    ) {
        let mut source = String::from("/");
        for dir in &dirs {
            source.push_str(dir);
            source.push('/');
        }
        source.push_str(&format!("{}.{}", stem, ext));

        let output = mirrored_output_path(Path::new("out"), &source).unwrap();

        let mut expected = Path::new("out").to_path_buf();
        for dir in &dirs {
            expected.push(dir);
        }
        expected.push(format!("{}.webp", stem));
        prop_assert_eq!(output, expected);
    }

    #[test]
    fn resolve_url_joins_with_single_slash(
        host in "[a-z]{1,10}",
        trailing in prop::bool::ANY,
        leading in prop::bool::ANY,
        path in "[a-z]{1,8}/[a-z]{1,8}\\.png"
    ) {
        let base = format!("https://{}.com{}", host, if trailing { "/" } else { "" });
        let config = RunConfig::new(base, "out".into(), None, None).unwrap();
        let descriptor_path = format!("{}{}", if leading { "/" } else { "" }, path);

        let url = config.resolve_url(&descriptor_path);
        prop_assert_eq!(url, format!("https://{}.com/{}", host, path));
    }

    #[test]
    fn run_stats_total_is_sum(successes in 0usize..50, failures in 0usize..50) {
        let mut stats = RunStats::default();
        for _ in 0..failures {
            stats.record_failure();
        }
        stats.succeeded = successes;
        prop_assert_eq!(stats.total(), successes + failures);
    }

    #[test]
    fn savings_bounded_above_by_100(original in 1u64..10_000_000, optimized in 0u64..10_000_000) {
        let savings = calculate_savings(original, optimized);
        prop_assert!(savings <= 100.0);
        prop_assert_eq!(savings >= 0.0, optimized <= original);
    }
}

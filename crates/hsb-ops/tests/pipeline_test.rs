//! End-to-end behavior of the adjustment pipeline.

use approx::assert_abs_diff_eq;
use hsb_core::{ColorSpace, Origin, PixelBuffer};
use hsb_ops::{
    ColorAdjustPipeline, ColorControls, FilterEvaluationError, HsbParameters, HueAdjust,
};

/// Gradient with varied hue, saturation and alpha.
fn gradient(width: u32, height: u32, color_space: ColorSpace) -> PixelBuffer {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let u = x as f32 / (width.max(2) - 1) as f32;
            let v = y as f32 / (height.max(2) - 1) as f32;
            data.extend_from_slice(&[u, 0.3 + 0.4 * v, 1.0 - u * v, 0.5 + 0.5 * u]);
        }
    }
    PixelBuffer::from_data(width, height, data, Origin::BottomLeft, color_space).unwrap()
}

fn max_abs_diff(a: &PixelBuffer, b: &PixelBuffer) -> f32 {
    a.data()
        .iter()
        .zip(b.data())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f32::max)
}

#[test]
fn test_output_dimensions_match_source() {
    let pipeline = ColorAdjustPipeline::new();
    for (w, h) in [(1, 1), (7, 3), (64, 48)] {
        let src = gradient(w, h, ColorSpace::DeviceRgb);
        let out = pipeline
            .apply(&src, HsbParameters::new(2.5, 0.2, -0.4))
            .unwrap();
        assert_eq!(out.dimensions(), (w, h));
        assert_eq!(out.data().len(), src.data().len());
        assert_eq!(out.origin(), src.origin());
        assert_eq!(out.color_space(), src.color_space());
    }
}

#[test]
fn test_identity_is_near_identity() {
    let pipeline = ColorAdjustPipeline::new();
    for cs in [ColorSpace::DeviceRgb, ColorSpace::LinearRgb] {
        let src = gradient(32, 16, cs);
        let out = pipeline.apply(&src, HsbParameters::identity()).unwrap();
        assert!(
            max_abs_diff(&src, &out) < 1e-4,
            "{:?}: diff {}",
            cs,
            max_abs_diff(&src, &out)
        );
    }
}

#[test]
fn test_stage_order_matters() {
    // Pipeline order: color controls then hue. Compare against the reverse.
    let params = HsbParameters::new(2.0, 1.5, 0.2);
    let src = PixelBuffer::filled(
        1,
        1,
        [0.8, 0.3, 0.1, 1.0],
        Origin::TopLeft,
        ColorSpace::LinearRgb,
    );

    let forward = ColorAdjustPipeline::new().apply(&src, params).unwrap();

    let controls = ColorControls::new(params.saturation, params.brightness);
    let hue = HueAdjust::new(params.hue);
    let reversed = controls.apply(hue.apply([0.8, 0.3, 0.1]));
    let expected_forward = hue.apply(controls.apply([0.8, 0.3, 0.1]));

    let px = forward.pixel(0, 0);
    for i in 0..3 {
        assert_abs_diff_eq!(px[i], expected_forward[i], epsilon = 1e-6);
    }
    let diff = (0..3)
        .map(|i| (px[i] - reversed[i]).abs())
        .fold(0.0, f32::max);
    assert!(diff > 1e-3, "stage order should change the result, diff {}", diff);
}

#[test]
fn test_deterministic() {
    let pipeline = ColorAdjustPipeline::new();
    let src = gradient(40, 30, ColorSpace::DeviceRgb);
    let params = HsbParameters::new(-1.2, 1.7, 0.15);

    let a = pipeline.apply(&src, params).unwrap();
    let b = pipeline.apply(&src, params).unwrap();
    assert_eq!(a.data(), b.data());
}

#[test]
fn test_no_drift_across_frames() {
    let pipeline = ColorAdjustPipeline::new();
    let src = gradient(16, 16, ColorSpace::DeviceRgb);
    let original = src.data().to_vec();
    let params = HsbParameters::new(0.9, 0.6, 0.3);

    let first = pipeline.apply(&src, params).unwrap();
    for _ in 0..10 {
        let next = pipeline.apply(&src, params).unwrap();
        assert_eq!(next.data(), first.data());
    }
    assert_eq!(src.data(), original.as_slice());
}

#[test]
fn test_previous_parameters_leave_no_trace() {
    let pipeline = ColorAdjustPipeline::new();
    let src = gradient(16, 16, ColorSpace::DeviceRgb);
    let p1 = HsbParameters::new(1.0, 1.8, 0.3);
    let p2 = HsbParameters::new(-0.5, 0.4, -0.1);

    let direct = pipeline.apply(&src, p2).unwrap();
    let first = pipeline.apply(&src, p1).unwrap();
    let after = pipeline.apply(&src, p2).unwrap();

    assert!(max_abs_diff(&first, &direct) > 0.05);
    assert_eq!(after.data(), direct.data());
}

#[test]
fn test_reset_parameters_restore_source() {
    let pipeline = ColorAdjustPipeline::new();
    let src = gradient(8, 8, ColorSpace::DeviceRgb);

    let adjusted = pipeline
        .apply(&src, HsbParameters::new(1.0, 1.5, 0.2))
        .unwrap();
    assert!(max_abs_diff(&src, &adjusted) > 0.05);

    let reset = pipeline.apply(&src, HsbParameters::default()).unwrap();
    assert!(max_abs_diff(&src, &reset) < 1e-4);
}

#[test]
fn test_empty_image_fails() {
    let pipeline = ColorAdjustPipeline::new();
    let empty = PixelBuffer::empty(Origin::BottomLeft, ColorSpace::DeviceRgb);
    let err = pipeline
        .apply(&empty, HsbParameters::identity())
        .unwrap_err();
    assert!(matches!(err, FilterEvaluationError::EmptyImage { .. }));

    let zero_height = PixelBuffer::new(10, 0, Origin::TopLeft, ColorSpace::DeviceRgb);
    assert!(pipeline.apply(&zero_height, HsbParameters::identity()).is_err());
}

#[test]
fn test_zero_saturation_gives_gray() {
    let pipeline = ColorAdjustPipeline::new();
    let src = gradient(8, 4, ColorSpace::DeviceRgb);
    let out = pipeline
        .apply(&src, HsbParameters::new(1.3, 0.0, 0.0))
        .unwrap();
    for px in out.data().chunks_exact(4) {
        assert_abs_diff_eq!(px[0], px[1], epsilon = 1e-4);
        assert_abs_diff_eq!(px[1], px[2], epsilon = 1e-4);
    }
}

#[test]
fn test_alpha_untouched() {
    let pipeline = ColorAdjustPipeline::new();
    let src = gradient(8, 4, ColorSpace::DeviceRgb);
    let out = pipeline
        .apply(&src, HsbParameters::new(-2.0, 1.8, 0.5))
        .unwrap();
    for (a, b) in src.data().chunks_exact(4).zip(out.data().chunks_exact(4)) {
        assert_eq!(a[3], b[3]);
    }
}

#[test]
fn test_out_of_range_values_not_clamped() {
    let pipeline = ColorAdjustPipeline::new();
    let src = PixelBuffer::filled(
        2,
        2,
        [0.9, 0.9, 0.9, 1.0],
        Origin::TopLeft,
        ColorSpace::LinearRgb,
    );
    let out = pipeline
        .apply(&src, HsbParameters::new(0.0, 1.0, 3.0))
        .unwrap();
    assert_abs_diff_eq!(out.pixel(1, 1)[0], 3.9, epsilon = 1e-4);

    // Values outside the slider domains are still accepted.
    assert!(
        pipeline
            .apply(&src, HsbParameters::new(12.0, 4.0, -2.5))
            .is_ok()
    );
}

#[test]
fn test_brightness_raises_mean() {
    let pipeline = ColorAdjustPipeline::new();
    let src = gradient(16, 16, ColorSpace::DeviceRgb);
    let brighter = pipeline
        .apply(&src, HsbParameters::identity().with_brightness(0.2))
        .unwrap();
    let darker = pipeline
        .apply(&src, HsbParameters::identity().with_brightness(-0.2))
        .unwrap();
    assert!(brighter.mean()[1] > src.mean()[1]);
    assert!(darker.mean()[1] < src.mean()[1]);
}

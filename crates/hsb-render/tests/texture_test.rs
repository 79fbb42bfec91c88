//! Render loop over a wgpu texture surface.
//!
//! Needs a GPU adapter; tests return early without one.

#![cfg(feature = "wgpu")]

use hsb_core::{ColorSpace, Origin, PixelBuffer};
use hsb_render::{
    Drawable, FrameOutcome, FrameRenderer, RenderConfig, RenderSurface, SurfaceError,
    TextureSurface,
};

fn surface(width: u32, height: u32) -> Option<TextureSurface> {
    match TextureSurface::new(width, height) {
        Ok(surface) => Some(surface),
        Err(e) => {
            eprintln!("Skipping test: {}", e);
            None
        }
    }
}

fn source() -> PixelBuffer {
    PixelBuffer::filled(
        6,
        4,
        [0.7, 0.3, 0.2, 1.0],
        Origin::BottomLeft,
        ColorSpace::DeviceRgb,
    )
}

#[test]
fn test_texture_surface_presents() {
    let Some(mut surface) = surface(6, 4) else {
        return;
    };
    println!(
        "adapter: {} ({:?})",
        surface.context().device_name(),
        surface.context().backend()
    );
    let (renderer, params) = FrameRenderer::from_config(source(), &RenderConfig::default()).unwrap();
    params.set_saturation(0.5);

    for _ in 0..3 {
        let outcome = renderer.render_frame(&mut surface);
        assert!(matches!(outcome, FrameOutcome::Presented { width: 6, height: 4 }));
    }
    assert_eq!(surface.presented_count(), 3);

    let texture = surface.last_texture().unwrap();
    assert_eq!((texture.width(), texture.height()), (6, 4));
    assert_eq!(texture.format(), wgpu::TextureFormat::Rgba8Unorm);
}

#[test]
fn test_texture_surface_resizes_next_drawable() {
    let Some(mut surface) = surface(2, 2) else {
        return;
    };
    let (renderer, _params) = FrameRenderer::from_config(source(), &RenderConfig::default()).unwrap();

    let first = renderer.render_frame(&mut surface);
    assert!(matches!(first, FrameOutcome::Presented { width: 2, height: 2 }));
    assert_eq!(surface.drawable_size(), (6, 4));

    let second = renderer.render_frame(&mut surface);
    assert!(matches!(second, FrameOutcome::Presented { width: 6, height: 4 }));
    assert_eq!(surface.last_texture().unwrap().width(), 6);
}

#[test]
fn test_empty_texture_drawable() {
    let Some(mut surface) = surface(0, 0) else {
        return;
    };
    let mut drawable = surface.acquire_drawable().unwrap();
    assert_eq!(drawable.size(), (0, 0));
    let err = drawable
        .write_image(&source(), ColorSpace::DeviceRgb)
        .unwrap_err();
    assert!(matches!(err, SurfaceError::EmptyDrawable { .. }));
}

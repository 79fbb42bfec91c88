//! Simulated display loop.
//!
//! The main thread ticks a [`FrameRenderer`] over a [`HeadlessSurface`]. A
//! second thread plays the UI: it sweeps the three sliders through their
//! ranges until the reset tick, when it stops and the parameters are reset.

use crate::PlayArgs;
use anyhow::{Context, Result};
use hsb_ops::{BRIGHTNESS_RANGE, HUE_RANGE, SATURATION_RANGE};
use hsb_render::{
    FrameOutcome, FrameRenderer, FrameStats, HeadlessSurface, ParameterState, RenderConfig,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Delay between slider events.
const SLIDER_STEP: Duration = Duration::from_millis(4);

/// Runs the loop and prints outcome counts.
pub fn run(args: PlayArgs, verbose: bool) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => RenderConfig::default(),
    };
    if let Some(fps) = args.fps {
        config.frame_rate = fps;
    }
    if let Some(backend) = args.backend {
        config.backend = backend;
    }

    let source = super::load_image(&args.input, config.origin)?;
    let mut surface =
        HeadlessSurface::new(source.width(), source.height()).with_skip_every(args.skip_every);
    let (renderer, params) =
        FrameRenderer::from_config(source, &config).context("Failed to set up renderer")?;

    if verbose {
        println!(
            "Playing {} ticks at {} fps on {} ({})",
            args.frames,
            config.frame_rate,
            renderer.backend_name(),
            renderer.output_color_space().name()
        );
    }

    let stop = Arc::new(AtomicBool::new(false));
    let mut ui = Some(spawn_slider_sweep(Arc::clone(&params), Arc::clone(&stop)));

    let interval = config.frame_interval();
    let start = Instant::now();
    let mut stats = FrameStats::default();

    for tick in 0..args.frames {
        if args.reset_at == Some(tick) {
            stop_sweep(&stop, ui.take());
            params.reset_parameters();
            if verbose {
                println!("tick {}: parameters reset", tick);
            }
        }

        let outcome = renderer.render_frame(&mut surface);
        if let FrameOutcome::Dropped(e) = &outcome {
            if verbose {
                println!("tick {}: dropped ({})", tick, e);
            }
        }
        stats.record(&outcome);

        if !args.unpaced {
            let deadline = interval * (tick as u32 + 1);
            if let Some(wait) = deadline.checked_sub(start.elapsed()) {
                thread::sleep(wait);
            }
        }
    }
    stop_sweep(&stop, ui.take());

    let elapsed = start.elapsed();
    println!("{}", stats);
    if verbose {
        println!(
            "elapsed {:.2}s, final parameters: {}",
            elapsed.as_secs_f64(),
            params.snapshot()
        );
    }

    if let Some(path) = &args.output {
        let frame = surface
            .last_frame()
            .context("No frame was presented; nothing to save")?;
        let image = frame.to_pixel_buffer(renderer.output_color_space())?;
        super::save_image(path, &image)?;
        if verbose {
            println!("Saved tick #{} to {}", frame.id, path.display());
        }
    }
    Ok(())
}

/// Moves all three sliders along triangle waves until `stop` is set.
fn spawn_slider_sweep(params: Arc<ParameterState>, stop: Arc<AtomicBool>) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut step = 0u32;
        while !stop.load(Ordering::Relaxed) {
            params.set_hue(HUE_RANGE.lerp(triangle(step, 240)));
            params.set_saturation(SATURATION_RANGE.lerp(triangle(step, 180)));
            params.set_brightness(BRIGHTNESS_RANGE.lerp(0.25 + 0.5 * triangle(step, 300)));
            step = step.wrapping_add(1);
            thread::sleep(SLIDER_STEP);
        }
    })
}

fn stop_sweep(stop: &AtomicBool, handle: Option<JoinHandle<()>>) {
    stop.store(true, Ordering::Relaxed);
    if let Some(handle) = handle {
        if handle.join().is_err() {
            tracing::warn!("slider thread panicked");
        }
    }
}

/// 0 -> 1 -> 0 over `period` steps.
fn triangle(step: u32, period: u32) -> f32 {
    let phase = (step % period) as f32 / period as f32;
    1.0 - (2.0 * phase - 1.0).abs()
}

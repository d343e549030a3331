use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::gpu::{GpuState, PassUniforms};
use crate::runtime::{DeltaClock, FrameScheduler, RenderPolicy};
use crate::RendererConfig;

/// Owns the clock and both passes' uniform state, and advances them once
/// per frame. The uniforms live here, not in the passes, so each draw call
/// receives its inputs explicitly.
struct AnimationDriver {
    clock: DeltaClock,
    pinned_time: Option<f32>,
    noise_uniforms: PassUniforms,
    composite_uniforms: PassUniforms,
}

impl AnimationDriver {
    fn new(policy: &RenderPolicy, size: PhysicalSize<u32>) -> Self {
        let pinned_time = match policy {
            RenderPolicy::Still { time } => Some(time.unwrap_or(0.0)),
            _ => None,
        };
        Self {
            clock: DeltaClock::new(),
            pinned_time,
            noise_uniforms: PassUniforms::new(size.width, size.height),
            composite_uniforms: PassUniforms::new(size.width, size.height),
        }
    }

    /// Per-frame update: one clock query, the same delta added to both time
    /// counters, and the current drawable size written to both resolutions.
    fn tick(&mut self, size: PhysicalSize<u32>) {
        let delta = self.clock.delta().as_secs_f32();
        match self.pinned_time {
            Some(time) => {
                self.noise_uniforms.set_time(time);
                self.composite_uniforms.set_time(time);
            }
            None => {
                self.noise_uniforms.advance(delta);
                self.composite_uniforms.advance(delta);
            }
        }
        self.noise_uniforms
            .set_resolution(size.width as f32, size.height as f32);
        self.composite_uniforms
            .set_resolution(size.width as f32, size.height as f32);
    }
}

/// Opens the window and drives the winit event loop until close.
pub(crate) fn run(config: &RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title("warpbg")
        .with_inner_size(window_size)
        .build(&event_loop)
        .context("failed to create window")?;
    let window = Arc::new(window);

    let drawable = config.drawable_size();
    let drawable = PhysicalSize::new(drawable.0, drawable.1);
    let mut state = GpuState::new(window.as_ref(), drawable, config.antialiasing)?;
    let mut driver = AnimationDriver::new(&config.policy, state.size());
    let mut scheduler = match &config.policy {
        RenderPolicy::Animate { target_fps } => FrameScheduler::new(*target_fps),
        _ => FrameScheduler::new(None),
    };

    window.request_redraw();

    event_loop
        .run(move |event, elwt| {
            match event {
                Event::WindowEvent { window_id, event } if window_id == window.id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            elwt.exit();
                        }
                        WindowEvent::Resized(new_size) => {
                            // The notification's dimensions are ignored; the
                            // configured size is reapplied to the surface and
                            // the field buffer alike.
                            debug!(
                                ?new_size,
                                "resize notification; reapplying configured size"
                            );
                            state.reapply_configured_size();
                        }
                        WindowEvent::ScaleFactorChanged {
                            mut inner_size_writer,
                            ..
                        } => {
                            let _ = inner_size_writer.request_inner_size(window_size);
                        }
                        WindowEvent::RedrawRequested => {
                            if !state.surface_matches_configured() {
                                state.reconfigure_surface();
                            }
                            driver.tick(state.size());
                            scheduler.mark_rendered(Instant::now());
                            match state.render(&driver.noise_uniforms, &driver.composite_uniforms)
                            {
                                Ok(()) => {}
                                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                    state.reconfigure_surface();
                                }
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    eprintln!("surface out of memory; exiting");
                                    elwt.exit();
                                }
                                Err(err) => {
                                    eprintln!("surface error: {err:?}; retrying next frame");
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    let now = Instant::now();
                    if scheduler.ready_for_frame(now) {
                        window.request_redraw();
                        elwt.set_control_flow(ControlFlow::Wait);
                    } else if let Some(deadline) = scheduler.next_deadline() {
                        elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
                    } else {
                        elwt.set_control_flow(ControlFlow::Wait);
                    }
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow::anyhow!("window event loop error: {err}"))
}

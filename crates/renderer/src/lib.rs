//! Two-pass warp renderer.
//!
//! The crate glues a winit window, a `wgpu` device, and two fixed GLSL
//! passes together:
//!
//! ```text
//!   warpbg CLI
//!        │ RendererConfig
//!        ▼
//!   Renderer::run ──▶ winit event loop ──▶ AnimationDriver::tick()
//!                                              │
//!                            NoiseFieldPass ───┤ (off-screen buffer)
//!                            PostCompositePass ┘ (surface)
//! ```
//!
//! The first pass writes the procedural warp pattern into an off-screen
//! color buffer; the second resamples it with scanline shear, per-row
//! jitter, and a chromatic split, straight onto the swapchain. Both shader
//! programs are inline GLSL compiled through naga; their per-fragment
//! behaviour is mirrored by the pure functions in `warpfield`, which the
//! still-export path reuses to evaluate a frame without a GPU.

mod compile;
mod export;
mod gpu;
mod runtime;
mod window;

use anyhow::Result;

pub use runtime::RenderPolicy;

/// Anti-aliasing policy for the composite (surface) pass.
///
/// The off-screen field buffer is always single-sampled; MSAA only shapes
/// how the final pass resolves onto the swapchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

impl Default for Antialiasing {
    fn default() -> Self {
        Self::Auto
    }
}

/// Immutable configuration passed to the renderer at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Window size in logical pixels.
    pub surface_size: (u32, u32),
    /// Backing-store scale applied to the surface and the field buffer.
    pub scale: u32,
    /// Anti-aliasing mode for the composite pass.
    pub antialiasing: Antialiasing,
    /// High-level render behaviour requested by the caller.
    pub policy: RenderPolicy,
}

impl RendererConfig {
    /// Drawable size in device pixels: the configured size times the scale.
    ///
    /// Both the surface and the off-screen field buffer are created at this
    /// size, and resize notifications reapply it verbatim.
    pub fn drawable_size(&self) -> (u32, u32) {
        let scale = self.scale.max(1);
        (
            self.surface_size.0.max(1) * scale,
            self.surface_size.1.max(1) * scale,
        )
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (800, 600),
            scale: 2,
            antialiasing: Antialiasing::default(),
            policy: RenderPolicy::default(),
        }
    }
}

/// Thin entry point that picks between the window loop and the CPU export
/// path based on the configured policy.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn run(&mut self) -> Result<()> {
        match self.config.policy.clone() {
            RenderPolicy::Export { time, path } => {
                export::run_export(&self.config, time.unwrap_or(0.0), &path)
            }
            _ => window::run(&self.config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawable_size_applies_scale() {
        let config = RendererConfig::default();
        assert_eq!(config.drawable_size(), (1600, 1200));
    }

    #[test]
    fn drawable_size_guards_degenerate_inputs() {
        let config = RendererConfig {
            surface_size: (0, 600),
            scale: 0,
            ..RendererConfig::default()
        };
        assert_eq!(config.drawable_size(), (1, 600));
    }
}

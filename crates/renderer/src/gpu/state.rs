use std::time::{Duration, Instant};

use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::debug;
use winit::dpi::PhysicalSize;

use crate::Antialiasing;

use super::context::GpuContext;
use super::offscreen::FieldTarget;
use super::pipeline::{NoiseFieldPass, PipelineLayouts, PostCompositePass};
use super::uniforms::PassUniforms;

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let extent = wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: extent,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Owns the GPU resources of both passes plus the surface they present to.
pub(crate) struct GpuState {
    context: GpuContext,
    layouts: PipelineLayouts,
    noise_pass: NoiseFieldPass,
    composite_pass: PostCompositePass,
    field_target: FieldTarget,
    multisample_target: Option<MultisampleTarget>,
    /// Drawable size from the startup configuration. Resize paths reapply
    /// this; nothing ever tracks the live window dimensions.
    configured_size: PhysicalSize<u32>,
    last_fps_update: Instant,
    frames_since_last_update: u32,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        configured_size: PhysicalSize<u32>,
        antialiasing: Antialiasing,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, configured_size, antialiasing)?;
        let layouts = PipelineLayouts::new(&context.device)?;
        let field_target = FieldTarget::new(&context.device, configured_size);
        let noise_pass = NoiseFieldPass::new(&context.device, &layouts)?;
        let composite_pass = PostCompositePass::new(
            &context.device,
            &layouts,
            context.surface_format,
            context.sample_count,
            &field_target,
        )?;
        let multisample_target = if context.sample_count > 1 {
            Some(MultisampleTarget::new(
                &context.device,
                context.surface_format,
                context.size,
                context.sample_count,
            ))
        } else {
            None
        };

        Ok(Self {
            context,
            layouts,
            noise_pass,
            composite_pass,
            field_target,
            multisample_target,
            configured_size,
            last_fps_update: Instant::now(),
            frames_since_last_update: 0,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn surface_matches_configured(&self) -> bool {
        self.context.size == self.configured_size
    }

    /// Reconfigures the surface back to the configured drawable size. The
    /// per-frame path and surface-loss recovery both land here; neither
    /// touches the field target.
    pub(crate) fn reconfigure_surface(&mut self) {
        self.context.resize(self.configured_size);
        self.rebuild_multisample_target();
    }

    /// Resize-notification path: reapplies the configured size to the
    /// surface AND the field target, regardless of the notified dimensions.
    pub(crate) fn reapply_configured_size(&mut self) {
        self.context.resize(self.configured_size);
        self.field_target = FieldTarget::new(&self.context.device, self.configured_size);
        self.composite_pass
            .rebind_field(&self.context.device, &self.layouts, &self.field_target);
        self.rebuild_multisample_target();
    }

    fn rebuild_multisample_target(&mut self) {
        self.multisample_target = if self.context.sample_count > 1 {
            Some(MultisampleTarget::new(
                &self.context.device,
                self.context.surface_format,
                self.context.size,
                self.context.sample_count,
            ))
        } else {
            None
        };
    }

    /// Renders one frame: noise field into the off-screen buffer, then the
    /// composite onto the acquired swapchain texture, in that fixed order.
    pub(crate) fn render(
        &mut self,
        noise_uniforms: &PassUniforms,
        composite_uniforms: &PassUniforms,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;

        let now = Instant::now();
        self.frames_since_last_update += 1;
        let elapsed = now.saturating_duration_since(self.last_fps_update);
        if elapsed >= Duration::from_secs(1) {
            let fps = self.frames_since_last_update as f32 / elapsed.as_secs_f32();
            self.frames_since_last_update = 0;
            self.last_fps_update = now;
            debug!(
                fps = fps.round(),
                time = noise_uniforms.time,
                field = ?self.field_target.size,
                surface = ?self.context.size,
                "render stats"
            );
        }

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });

        self.noise_pass.encode(
            &self.context.queue,
            &mut encoder,
            &self.field_target,
            noise_uniforms,
        );

        let (attachment, resolve_target) = match self.multisample_target.as_ref() {
            Some(msaa) => (&msaa.view, Some(&view)),
            None => (&view, None),
        };
        self.composite_pass.encode(
            &self.context.queue,
            &mut encoder,
            attachment,
            resolve_target,
            composite_uniforms,
        );

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

use winit::dpi::PhysicalSize;

/// Storage format of the field buffer. 8-bit UNORM clamps the unbounded
/// accumulator to `[0, 1]` on store, the same way the composite pass's CPU
/// mirror does before sampling.
pub(crate) const FIELD_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Off-screen color buffer the noise pass renders into.
///
/// No depth or stencil planes; fully overwritten every frame. Recreated only
/// when a resize notification reapplies the configured size.
pub(crate) struct FieldTarget {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub size: PhysicalSize<u32>,
}

impl FieldTarget {
    pub fn new(device: &wgpu::Device, size: PhysicalSize<u32>) -> Self {
        let extent = wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("field color target"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FIELD_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
            size,
        }
    }
}

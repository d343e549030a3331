use std::borrow::Cow;

use anyhow::Result;
use wgpu::naga::ShaderStage;

/// Compiles the static full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fullscreen triangle vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    }))
}

/// Compiles the noise-field fragment program (off-screen pass).
pub(crate) fn compile_noise_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("noise field fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(NOISE_FIELD_GLSL),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    }))
}

/// Compiles the glitch-composite fragment program (surface pass).
pub(crate) fn compile_composite_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("post composite fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(POST_COMPOSITE_GLSL),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    }))
}

/// Minimal full-screen triangle vertex shader shared by both passes.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    vec2 pos = positions[vertex_index];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";

/// First pass: layered warp pattern accumulated over a fixed 20-step march.
///
/// The uniform block layout must match `PassUniforms` in `gpu/uniforms.rs`.
/// `warpfield::shade_fragment` is the CPU mirror of `main` below.
const NOISE_FIELD_GLSL: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform PassParams {
    vec2 Resolution;
    float Time;
    float TimeDelta;
} ubo;

float noise(vec2 x) {
    return fract(sin(dot(x / 500.0, vec2(12.9898, 78.233))) * 43758.5453);
}

void main() {
    vec3 r = vec3(2.0 * (gl_FragCoord.xy - ubo.Resolution * 0.5) / ubo.Resolution,
                  (sin(ubo.Time * 0.01) * 0.5 + 0.5) * 0.6 + 0.4);

    float o = ubo.Time * 0.08;

    vec3 c = vec3(0.0);
    vec3 s = r / max(abs(r.x), abs(r.y));

    vec3 p = 2.0 * s + 0.1;
    for (int i = 0; i < 20; ++i) {
        vec3 d = vec3(30.0 * fract(noise(round(p.xy)) - o) - p.z);
        c += max(vec3(0.0), vec3(0.9) - abs(d * vec3(0.76))) * d;
        p += s;
    }

    outColor = vec4(c, 1.0);
}
";

/// Second pass: scanline-banded shear, per-row jitter, and a 3-tap chromatic
/// split over the field texture. Mirrored by `warpfield::composite_fragment`.
const POST_COMPOSITE_GLSL: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform PassParams {
    vec2 Resolution;
    float Time;
    float TimeDelta;
} ubo;

layout(set = 1, binding = 0) uniform texture2D field_texture;
layout(set = 1, binding = 1) uniform sampler field_sampler;

const vec2 randConst = vec2(12.9898, 78.233);
const float randMultiplier = 43758.5453;

void main() {
    vec2 uv = v_uv;

    float bandHeight = 1.0 / 15.0;
    float bandStart = bandHeight * floor(ubo.Time * 0.5 / bandHeight);
    float bandEnd = bandStart + bandHeight;
    float edge = smoothstep(bandStart, bandEnd, uv.y);

    float o = 0.01 * sin(1.0 - tan(ubo.Time * 0.005));

    uv.x += (edge * o) - ((1.0 - edge) * o);
    uv.x += fract(sin(dot(vec2(ubo.Time * 0.00001, floor(uv.y * 200.0) / 200.0), randConst)) * randMultiplier) * 0.005;

    float red = texture(sampler2D(field_texture, field_sampler), uv + vec2(0.010, 0.0)).r;
    float green = texture(sampler2D(field_texture, field_sampler), uv + vec2(0.005, 0.0)).r;
    float blue = texture(sampler2D(field_texture, field_sampler), uv).r;

    outColor = vec4(red, green, blue, 1.0);
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_share_the_uniform_block_layout() {
        let block = "layout(std140, set = 0, binding = 0) uniform PassParams";
        assert!(NOISE_FIELD_GLSL.contains(block));
        assert!(POST_COMPOSITE_GLSL.contains(block));
        for source in [NOISE_FIELD_GLSL, POST_COMPOSITE_GLSL] {
            assert!(source.contains("vec2 Resolution;"));
            assert!(source.contains("float Time;"));
        }
    }

    #[test]
    fn composite_uses_the_fixed_chroma_offsets() {
        assert!(POST_COMPOSITE_GLSL.contains("vec2(0.010, 0.0)"));
        assert!(POST_COMPOSITE_GLSL.contains("vec2(0.005, 0.0)"));
        // The blue tap samples the undistorted coordinate.
        assert!(POST_COMPOSITE_GLSL.contains("field_sampler), uv).r"));
    }

    #[test]
    fn hash_constants_match_the_cpu_mirror() {
        for source in [NOISE_FIELD_GLSL, POST_COMPOSITE_GLSL] {
            assert!(source.contains("12.9898"));
            assert!(source.contains("78.233"));
            assert!(source.contains("43758.5453"));
        }
    }
}

use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageBuffer, Rgba};
use tracing::info;
use warpfield::{composite_fragment, FieldImage};

use crate::RendererConfig;

/// Evaluates both passes on the CPU at a fixed timestamp and writes the
/// composited frame as a PNG.
///
/// Uses the `warpfield` mirrors of the shaders, so the output doubles as a
/// deterministic regression baseline for the GPU path.
pub(crate) fn run_export(config: &RendererConfig, time: f32, path: &Path) -> Result<()> {
    let (width, height) = config.drawable_size();
    let frame = render_frame(time, width, height);
    frame
        .save(path)
        .with_context(|| format!("failed to write exported frame to {}", path.display()))?;
    info!(path = %path.display(), time, width, height, "still frame exported");
    Ok(())
}

fn render_frame(time: f32, width: u32, height: u32) -> ImageBuffer<Rgba<u8>, Vec<u8>> {
    let field = FieldImage::render(time, width, height);
    ImageBuffer::from_fn(width, height, |x, y| {
        let uv = [
            (x as f32 + 0.5) / width as f32,
            (y as f32 + 0.5) / height as f32,
        ];
        let color = composite_fragment(&field, time, uv);
        Rgba([
            to_byte(color[0]),
            to_byte(color[1]),
            to_byte(color[2]),
            255,
        ])
    })
}

fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Antialiasing, RenderPolicy};

    fn small_config() -> RendererConfig {
        RendererConfig {
            surface_size: (48, 36),
            scale: 1,
            antialiasing: Antialiasing::Off,
            policy: RenderPolicy::default(),
        }
    }

    #[test]
    fn rendered_frames_are_deterministic() {
        let first = render_frame(3.0, 48, 36);
        let second = render_frame(3.0, 48, 36);
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn export_writes_a_decodable_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("frame.png");
        run_export(&small_config(), 1.5, &path).expect("export");

        let decoded = image::open(&path).expect("reload exported frame");
        assert_eq!(decoded.width(), 48);
        assert_eq!(decoded.height(), 36);
    }

    #[test]
    fn alpha_is_forced_opaque() {
        let frame = render_frame(0.0, 16, 16);
        assert!(frame.pixels().all(|pixel| pixel.0[3] == 255));
    }
}

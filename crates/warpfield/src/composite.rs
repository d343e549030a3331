use crate::field::FieldImage;
use crate::hash::rand;

/// Vertical extent of one scanline band; band edges land on multiples of it.
pub const BAND_HEIGHT: f32 = 1.0 / 15.0;

/// Row quantisation of the fine per-scanline jitter.
pub const SCANLINE_ROWS: f32 = 200.0;

/// Horizontal sample offsets of the chromatic split, one per output channel.
pub const CHROMA_OFFSETS: [f32; 3] = [0.010, 0.005, 0.000];

/// Quantises time into the current scanline band, returning `(start, end)`
/// with `end - start == BAND_HEIGHT` and both edges multiples of it.
pub fn band_window(time: f32) -> (f32, f32) {
    let start = BAND_HEIGHT * (time * 0.5 / BAND_HEIGHT).floor();
    (start, start + BAND_HEIGHT)
}

/// GLSL `smoothstep`: cubic Hermite ramp between the two edges.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Slow horizontal shear driven by time alone.
pub fn shear_offset(time: f32) -> f32 {
    0.01 * (1.0 - (time * 0.005).tan()).sin()
}

/// Fine random jitter for the scanline row containing `v`.
pub fn scanline_jitter(time: f32, v: f32) -> f32 {
    rand(time * 0.00001, (v * SCANLINE_ROWS).floor() / SCANLINE_ROWS) * 0.005
}

/// Applies the banded shear and per-scanline jitter to a texture coordinate.
///
/// Fragments on opposite sides of the smoothed band transition shear in
/// opposite horizontal directions; the jitter is added on top.
pub fn distort_uv(time: f32, uv: [f32; 2]) -> [f32; 2] {
    let (start, end) = band_window(time);
    let edge = smoothstep(start, end, uv[1]);
    let shear = shear_offset(time);
    let u = uv[0] + edge * shear - (1.0 - edge) * shear + scanline_jitter(time, uv[1]);
    [u, uv[1]]
}

/// Full composite contract for one fragment: distort the coordinate, then
/// take the red channel of the field at each chroma offset to rebuild RGB.
pub fn composite_fragment(field: &FieldImage, time: f32, uv: [f32; 2]) -> [f32; 3] {
    let distorted = distort_uv(time, uv);
    let mut color = [0.0f32; 3];
    for (channel, offset) in CHROMA_OFFSETS.iter().enumerate() {
        color[channel] = field.sample(distorted[0] + offset, distorted[1]);
    }
    color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges_are_multiples_of_band_height() {
        for i in 0..200 {
            let time = i as f32 * 0.173;
            let (start, end) = band_window(time);
            assert!((end - start - BAND_HEIGHT).abs() < 1e-6);
            let quantised = time * 0.5;
            assert!(start <= quantised + 1e-6, "start > t/2 at {time}");
            assert!(quantised < end + 1e-6, "t/2 >= end at {time}");
            let steps = start / BAND_HEIGHT;
            assert!((steps - steps.round()).abs() < 1e-4, "start off-grid at {time}");
        }
    }

    #[test]
    fn smoothstep_matches_expected_values() {
        assert!((smoothstep(0.0, 1.0, 0.0) - 0.0).abs() < 1e-6);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
        assert!((smoothstep(0.0, 1.0, 1.0) - 1.0).abs() < 1e-6);
        assert_eq!(smoothstep(0.2, 0.4, 0.1), 0.0);
        assert_eq!(smoothstep(0.2, 0.4, 0.9), 1.0);
    }

    #[test]
    fn shear_flips_sign_across_the_band() {
        // Early enough that the band still lies inside the visible [0, 1]
        // range, with a comfortably nonzero shear.
        let time = 1.0;
        let shear = shear_offset(time);
        assert!(shear.abs() > 1e-5);

        let (start, end) = band_window(time);
        assert!(start >= 0.0 && end <= 1.0);
        let below = [0.5, start - 0.2];
        let above = [0.5, end + 0.2];
        let below_dx = distort_uv(time, below)[0] - below[0] - scanline_jitter(time, below[1]);
        let above_dx = distort_uv(time, above)[0] - above[0] - scanline_jitter(time, above[1]);
        assert!((below_dx + shear).abs() < 1e-6, "below band should shear by -o");
        assert!((above_dx - shear).abs() < 1e-6, "above band should shear by +o");
    }

    #[test]
    fn jitter_is_constant_within_a_row() {
        let time = 3.7;
        let row = 120.0 / SCANLINE_ROWS;
        let a = scanline_jitter(time, row + 0.0001);
        let b = scanline_jitter(time, row + 0.004);
        assert_eq!(a, b);
        assert!(a.abs() < 0.005);
    }

    #[test]
    fn chroma_offsets_map_channels_to_shifted_taps() {
        let field = FieldImage::render(2.5, 32, 24);
        let time = 6.0;
        let uv = [0.4, 0.6];
        let color = composite_fragment(&field, time, uv);
        let distorted = distort_uv(time, uv);
        for (channel, offset) in CHROMA_OFFSETS.iter().enumerate() {
            let expected = field.sample(distorted[0] + offset, distorted[1]);
            assert_eq!(color[channel], expected, "channel {channel}");
        }
        assert_eq!(color[2], field.sample(distorted[0], distorted[1]));
    }

    #[test]
    fn composite_is_pure() {
        let field = FieldImage::render(1.0, 16, 16);
        let first = composite_fragment(&field, 2.0, [0.25, 0.75]);
        let second = composite_fragment(&field, 2.0, [0.25, 0.75]);
        assert_eq!(first, second);
    }
}

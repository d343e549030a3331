//! CPU reference for the two warp passes.
//!
//! Everything in this crate is a pure function of its inputs: the sine-dot
//! hash, the layered noise field, and the composite UV distortion that the
//! GPU shaders in the `renderer` crate implement fragment-for-fragment. The
//! renderer's still-export path evaluates frames through this crate, and the
//! unit tests here anchor the behaviour the shaders are expected to match.

mod composite;
mod field;
mod hash;

pub use composite::{
    band_window, composite_fragment, distort_uv, scanline_jitter, shear_offset, smoothstep,
    BAND_HEIGHT, CHROMA_OFFSETS, SCANLINE_ROWS,
};
pub use field::{phase_offset, shade_fragment, FieldImage, MARCH_STEPS};
pub use hash::{fract, noise, rand};

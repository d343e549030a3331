//! GPU orchestration for the two-pass effect.
//!
//! - `context` owns wgpu instance/device/surface wiring and reconfigures the
//!   swapchain when a size is reapplied.
//! - `offscreen` materialises the field render target the first pass writes
//!   and the second pass samples.
//! - `pipeline` compiles the inline GLSL into the two render pipelines and
//!   owns each pass's uniform buffer and bind groups.
//! - `uniforms` is the per-pass uniform state the driver owns and hands into
//!   every draw.
//! - `state` glues everything together and exposes the `GpuState` API used
//!   by `window`.

mod context;
mod offscreen;
mod pipeline;
mod state;
mod uniforms;

pub(crate) use state::GpuState;
pub(crate) use uniforms::PassUniforms;

//! Flagblend averages a set of flag images into one composite image.
//!
//! Given an ordered list of [`ImageSource`] locators, the compositor decodes
//! each flag onto a fixed 300x200 canvas (stretch-to-fit, standard 3:2 flag
//! proportion), sums every channel of every pixel across the sources that
//! decoded, divides by the success count, and returns one [`PixelRaster`].
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: `ImageSource -> bytes` via a [`SourceResolver`]
//! 2. **Decode**: bytes -> 300x200 straight RGBA8 (bitmaps via `image`,
//!    SVG flags via `usvg`/`resvg` through a per-invocation [`ScratchSurface`])
//! 3. **Join**: every source settles (decoded or failed) before any blending
//! 4. **Accumulate**: one unified mean pass over the successes, in fixed
//!    source order, rounding half up and clamping to `[0, 255]`
//! 5. **Export** (optional): PNG bytes or a `data:` URI for host UIs
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: a fixed set of decodable sources always produces a
//!   bit-identical composite, independent of decode completion order.
//! - **Failure isolation**: an undecodable source is excluded from the mean
//!   and recorded; it never aborts the other sources.
//! - **Scoped resources**: scratch surfaces live for exactly one invocation
//!   and are never shared across concurrent invocations.
//!
//! Host UIs that restart requests as the selection changes should drive the
//! compositor through [`BlendSession`], which tags every request with a
//! generation and discards superseded results.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod blend;
mod foundation;
mod session;

pub use assets::decode::{decode_bitmap, decode_flag, parse_svg};
pub use assets::source::{
    FsResolver, ImageSource, MemoryResolver, SourceResolver, normalize_rel_path,
};
pub use blend::accumulate::AccumulatorBuffer;
pub use blend::compositor::{
    BlendThreading, Composite, Compositor, CompositorOpts, DecodeFailure,
};
pub use blend::encode::{encode_png, to_data_uri};
pub use blend::surface::ScratchSurface;
pub use foundation::core::{Canvas, FLAG_HEIGHT, FLAG_WIDTH, PixelRaster, Rgba8};
pub use foundation::error::{BlendError, BlendResult};
pub use session::blend_session::{BlendSession, BlendState};

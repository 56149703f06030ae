//! The pixel-averaging core: accumulate, composite, encode.

/// Per-channel sum buffer and the mean pass.
pub mod accumulate;
/// The compositor entry point.
pub mod compositor;
/// Export of composite rasters to displayable encodings.
pub mod encode;
/// Scratch raster surface for SVG rasterization.
pub mod surface;

//! Source resolution and image decoding.

/// Decoding encoded bytes onto the fixed flag canvas.
pub mod decode;
/// Image sources and the resolver boundary.
pub mod source;

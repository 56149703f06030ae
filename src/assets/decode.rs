use anyhow::Context;

use crate::{
    blend::surface::ScratchSurface,
    foundation::core::{Canvas, PixelRaster},
    foundation::error::BlendResult,
};

/// Decode one source's encoded bytes into a raster of the fixed flag canvas.
///
/// Bitmap formats are detected by magic bytes and resampled stretch-to-fit;
/// anything else is treated as an SVG document and rasterized through the
/// scratch surface. Both paths produce straight (non-premultiplied) RGBA8.
pub fn decode_flag(surface: &mut ScratchSurface, bytes: &[u8]) -> BlendResult<PixelRaster> {
    if image::guess_format(bytes).is_ok() {
        decode_bitmap(bytes)
    } else {
        let tree = parse_svg(bytes)?;
        surface.rasterize_svg(&tree)
    }
}

/// Parse SVG bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> BlendResult<usvg::Tree> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Decode bitmap bytes and stretch-to-fit onto the fixed flag canvas.
pub fn decode_bitmap(bytes: &[u8]) -> BlendResult<PixelRaster> {
    let canvas = Canvas::flag();
    let dyn_img = image::load_from_memory(bytes).context("decode bitmap from memory")?;

    let rgba = dyn_img.to_rgba8();
    let rgba = if rgba.dimensions() == (canvas.width, canvas.height) {
        rgba
    } else {
        // Non-aspect-preserving on purpose: every flag is forced onto the 3:2 canvas.
        dyn_img
            .resize_exact(
                canvas.width,
                canvas.height,
                image::imageops::FilterType::Triangle,
            )
            .to_rgba8()
    };

    PixelRaster::from_rgba8(canvas, rgba.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;

use std::io::Cursor;

use anyhow::Context;
use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::foundation::core::PixelRaster;
use crate::foundation::error::BlendResult;

/// Encode a composite raster as PNG bytes.
pub fn encode_png(raster: &PixelRaster) -> BlendResult<Vec<u8>> {
    let canvas = raster.canvas();
    let img = image::RgbaImage::from_raw(canvas.width, canvas.height, raster.data().to_vec())
        .ok_or_else(|| anyhow::anyhow!("raster bytes do not fill the canvas"))?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode composite png")?;
    Ok(buf)
}

/// Encode a composite raster as a `data:image/png;base64,` URI.
///
/// The returned string is directly usable as an image source by a host UI.
pub fn to_data_uri(raster: &PixelRaster) -> BlendResult<String> {
    let png = encode_png(raster)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

#[cfg(test)]
#[path = "../../tests/unit/blend/encode.rs"]
mod tests;

use super::*;
use crate::assets::decode::parse_svg;
use crate::foundation::core::Rgba8;

#[test]
fn surface_has_flag_canvas() {
    let surface = ScratchSurface::new().unwrap();
    assert_eq!(surface.canvas(), Canvas::flag());
}

#[test]
fn surface_is_clean_between_rasterizations() {
    // Draw a fully opaque flag, then a transparent one: no residue from the
    // first draw may leak into the second extraction.
    let opaque = parse_svg(
        br##"<svg xmlns="http://www.w3.org/2000/svg" width="3" height="2"><rect width="3" height="2" fill="#00ff00"/></svg>"##,
    )
    .unwrap();
    let empty = parse_svg(
        br##"<svg xmlns="http://www.w3.org/2000/svg" width="3" height="2"></svg>"##,
    )
    .unwrap();

    let mut surface = ScratchSurface::new().unwrap();
    let first = surface.rasterize_svg(&opaque).unwrap();
    let second = surface.rasterize_svg(&empty).unwrap();

    assert_eq!(first.pixel(150, 100), Some(Rgba8::new(0, 255, 0, 255)));
    assert_eq!(second.pixel(150, 100), Some(Rgba8::transparent()));
    assert!(second.data().iter().all(|&b| b == 0));
}

//! Rasterizing packed discs onto an RGBA canvas.
use image::{Rgba, RgbaImage};

use crate::packing::{Disc, PackedSet};

/// Draws every disc of `discs`, in placement order, over a `side` × `side` canvas filled with
/// `background`.
pub fn render_discs(discs: &PackedSet, side: u32, background: [u8; 4]) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(side, side, Rgba(background));
    for disc in discs {
        stamp_disc(&mut canvas, disc);
    }
    canvas
}

/// Fills the pixels whose centers satisfy `dx² + dy² <= r²`, clipped to the canvas.
pub fn stamp_disc(canvas: &mut RgbaImage, disc: &Disc) {
    let (w, h) = canvas.dimensions();
    if w == 0 || h == 0 {
        return;
    }
    let w_i = w as i64;
    let h_i = h as i64;
    let (px, py) = (disc.x as i64, disc.y as i64);
    let r = disc.radius as i64;

    let start_x = (px - r).max(0);
    let end_x = (px + r).min(w_i - 1);
    let start_y = (py - r).max(0);
    let end_y = (py + r).min(h_i - 1);

    let r2 = r * r;
    let [cr, cg, cb] = disc.color.0;
    for sy in start_y..=end_y {
        let dy = sy - py;
        for sx in start_x..=end_x {
            let dx = sx - px;
            if dx * dx + dy * dy <= r2 {
                canvas.put_pixel(sx as u32, sy as u32, Rgba([cr, cg, cb, 255]));
            }
        }
    }
}

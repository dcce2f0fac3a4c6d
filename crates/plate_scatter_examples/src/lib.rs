#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{init_tracing, save_mask_png, save_plate_pngs, save_png, side_by_side};

use std::path::Path;

use anyhow::Context;
use image::{imageops, Rgba, RgbaImage};
use plate_scatter::glyph::GlyphMask;
use plate_scatter::plate::Plate;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber; `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second call (or a subscriber installed elsewhere) is not an error for examples.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn save_png(image: &RgbaImage, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    image
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {}.", path.display());
    Ok(())
}

/// Places images left to right with `gap` pixels between them, over `background`.
pub fn side_by_side(images: &[&RgbaImage], gap: u32, background: [u8; 4]) -> RgbaImage {
    let width = images.iter().map(|img| img.width()).sum::<u32>()
        + gap * images.len().saturating_sub(1) as u32;
    let height = images.iter().map(|img| img.height()).max().unwrap_or(0);

    let mut out = RgbaImage::from_pixel(width, height, Rgba(background));
    let mut x = 0i64;
    for img in images {
        imageops::overlay(&mut out, *img, x, 0);
        x += (img.width() + gap) as i64;
    }
    out
}

/// Writes `<stem>-normal.png`, `<stem>-<kind>.png` and `<stem>-pair.png`.
pub fn save_plate_pngs(plate: &Plate, stem: &str) -> anyhow::Result<()> {
    save_png(&plate.normal, format!("{stem}-normal.png"))?;
    save_png(
        &plate.simulated,
        format!("{stem}-{}.png", plate.deficiency.kind),
    )?;
    let pair = side_by_side(&[&plate.normal, &plate.simulated], 16, [255, 255, 255, 255]);
    save_png(&pair, format!("{stem}-pair.png"))
}

pub fn save_mask_png(mask: &GlyphMask, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    mask.to_luma()
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {}.", path.display());
    Ok(())
}

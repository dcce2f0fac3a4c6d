use std::time::Instant;

use plate_scatter::prelude::*;
use plate_scatter_examples::{init_tracing, save_mask_png, save_png, side_by_side};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let side = 600;
    let mask = BitmapDigits.rasterize("8", side)?.thinned(3);
    save_mask_png(&mask, "packing-grid-vs-exact-mask.png")?;

    let palette = PlatePalette::new(PlatePalette::RED, PlatePalette::DARK_GREEN);
    let packer = DiscPacker::try_new(
        PackConfig::new(side).with_glyph_policy(GlyphPolicy::SkipPoint),
        palette,
    )?;

    let mut canvases = Vec::new();
    for strategy in [
        OccupancyStrategy::Grid { cell_size: 10 },
        OccupancyStrategy::default(),
        OccupancyStrategy::Exact,
    ] {
        let mut index = strategy.build(side);
        let mut rng = StdRng::seed_from_u64(2024);
        let start = Instant::now();
        let result = packer.pack(&mask, index.as_mut(), &mut rng)?;
        let elapsed = start.elapsed();

        let area: f64 = result
            .discs
            .iter()
            .map(|d| std::f64::consts::PI * (d.radius as f64).powi(2))
            .sum();
        println!(
            "{:<12} {:>5} discs, coverage {:>5.1}%, {:>8.2?}",
            format!("{strategy:?}"),
            result.discs.len(),
            100.0 * area / (side as f64 * side as f64),
            elapsed
        );

        let mut canvas = render_discs(&result.discs, side, [255, 255, 255, 255]);
        CircularMask::hard().apply(&mut canvas);
        canvases.push(canvas);
    }

    let refs: Vec<_> = canvases.iter().collect();
    save_png(
        &side_by_side(&refs, 16, [255, 255, 255, 255]),
        "packing-grid-vs-exact.png",
    )
}

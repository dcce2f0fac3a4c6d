use image::RgbaImage;
use plate_scatter::prelude::*;
use plate_scatter_examples::{init_tracing, save_png, side_by_side};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Glyph discs all red, background all blue, every glyph point visited.
    let pack = PackConfig::new(400)
        .with_glyph_policy(GlyphPolicy::SkipPoint)
        .with_primary_ratios(1.0, 0.0);

    let mut panels = Vec::new();
    for severity in [0, 25, 50, 75, 100] {
        let config = PlateConfig::new(DeficiencySpec::new(DeficiencyKind::Protanopia, severity))
            .with_pack(pack.clone())
            .with_mask(CircularMask::smoothed(2.0));
        let assembler = PlateAssembler::try_new(config, &BitmapDigits, &MachadoTransform)?;

        // Same seed for every panel: only the simulation differs.
        let mut rng = StdRng::seed_from_u64(7);
        let plate = assembler.generate("29", &mut rng)?;
        println!(
            "severity {severity:>3}: {} discs, {} glyph points skipped",
            plate.discs.len(),
            plate.stats.glyph_exhausted
        );
        panels.push(plate.simulated);
    }

    let refs: Vec<&RgbaImage> = panels.iter().collect();
    save_png(
        &side_by_side(&refs, 12, [255, 255, 255, 255]),
        "plate-protanopia-severity-sweep.png",
    )
}

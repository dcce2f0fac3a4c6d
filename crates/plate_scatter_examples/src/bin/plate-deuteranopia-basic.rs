use plate_scatter::prelude::*;
use plate_scatter_examples::{init_tracing, save_plate_pngs};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Defaults: 600px canvas, red on dark green, glyph sampled on a 35px lattice.
    let config = PlateConfig::new(DeficiencySpec::full(DeficiencyKind::Deuteranopia));
    let assembler = PlateAssembler::try_new(config, &BitmapDigits, &MachadoTransform)?;

    let mut rng = StdRng::seed_from_u64(42);
    let plate = assembler.generate("74", &mut rng)?;

    println!(
        "{} discs ({} glyph of {} points, aborted: {})",
        plate.discs.len(),
        plate.stats.glyph_placed,
        plate.stats.glyph_points,
        plate.stats.priority_aborted
    );
    save_plate_pngs(&plate, "plate-deuteranopia-basic")
}

use image::{GrayImage, Luma};
use plate_scatter::prelude::*;
use plate_scatter_examples::{init_tracing, save_plate_pngs};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A ring drawn as a grayscale coverage image.
fn ring(side: u32, inner: f32, outer: f32) -> GrayImage {
    let c = side as f32 / 2.0;
    GrayImage::from_fn(side, side, |x, y| {
        let d = ((x as f32 - c).powi(2) + (y as f32 - c).powi(2)).sqrt();
        Luma([if (inner..=outer).contains(&d) { 255 } else { 0 }])
    })
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let side = 500;
    let mask = GlyphMask::from_luma(&ring(side, 120.0, 170.0));

    // Uniform order: no priority phase, discs landing on the ring use the glyph ratio.
    let pack = PackConfig::new(side)
        .with_phase_order(PhaseOrder::Uniform)
        .with_primary_ratios(0.9, 0.1);
    let config = PlateConfig::new(DeficiencySpec::new(DeficiencyKind::Deuteranopia, 80))
        .with_pack(pack)
        .with_occupancy(OccupancyStrategy::Exact)
        .with_background([30, 30, 30, 255]);
    let assembler = PlateAssembler::try_new(config, &BitmapDigits, &MachadoTransform)?;

    let mut sink = FnSink::new(|event: PlateEvent| match event {
        PlateEvent::StageEntered { stage } => println!("stage: {stage:?}"),
        PlateEvent::PhaseFinished {
            phase,
            placed,
            attempts,
        } => println!("  {phase:?}: {placed} placed in {attempts} attempts"),
        _ => {}
    });

    let mut rng = StdRng::seed_from_u64(99);
    let plate = assembler.generate_from_mask_with_events(mask, &mut rng, &mut sink)?;
    println!(
        "{} discs on the ring, {} elsewhere",
        plate.stats.glyph_placed, plate.stats.background_placed
    );
    save_plate_pngs(&plate, "plate-custom-mask")
}

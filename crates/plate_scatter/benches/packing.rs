mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use plate_scatter::prelude::{
    BitmapDigits, DeficiencyKind, DeficiencySpec, DiscPacker, GlyphPolicy, MachadoTransform,
    OccupancyStrategy, PackConfig, PlateAssembler, PlateConfig, PlatePalette,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn pack_config(side: u32) -> PackConfig {
    PackConfig::new(side)
        .with_background_attempts(5_000)
        .with_glyph_policy(GlyphPolicy::SkipPoint)
}

fn packing_benches(c: &mut Criterion) {
    let palette = PlatePalette::new(PlatePalette::RED, PlatePalette::DARK_GREEN);

    for strategy in [OccupancyStrategy::default(), OccupancyStrategy::Exact] {
        let mut group = c.benchmark_group(format!("packing/{}", strategy.name()));

        for &side in &common::SIDES {
            let mask = common::digits_mask(side, 4);
            let packer = DiscPacker::new(pack_config(side), palette);

            let mut rng_preview = StdRng::seed_from_u64(0xD15C ^ side as u64);
            let mut index = strategy.build(side);
            if let Ok(preview) = packer.pack(&mask, index.as_mut(), &mut rng_preview) {
                group.throughput(common::elements_throughput(preview.discs.len()));
            }

            let mut rng = StdRng::seed_from_u64(0xBADC0DE ^ side as u64);
            group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, &side| {
                b.iter(|| {
                    let mut index = strategy.build(side);
                    let result = packer.pack(&mask, index.as_mut(), &mut rng);
                    black_box(result.map(|r| r.discs.len()).unwrap_or(0));
                });
            });
        }

        group.finish();
    }
}

fn plate_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("plate/generate");

    for &side in &common::SIDES {
        let config = PlateConfig::new(DeficiencySpec::full(DeficiencyKind::Deuteranopia))
            .with_pack(pack_config(side));
        let Ok(assembler) = PlateAssembler::try_new(config, &BitmapDigits, &MachadoTransform)
        else {
            continue;
        };
        let mut rng = StdRng::seed_from_u64(0x9_1A7E ^ side as u64);

        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, _| {
            b.iter(|| {
                let plate = assembler.generate("74", &mut rng);
                black_box(plate.map(|p| p.discs.len()).unwrap_or(0));
            });
        });
    }

    group.finish();
}

fn benches(c: &mut Criterion) {
    packing_benches(c);
    plate_benches(c);
}

criterion_group! {
    name = packing;
    config = common::default_criterion();
    targets = benches
}
criterion_main!(packing);

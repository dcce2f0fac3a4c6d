//! Plate assembly: glyph mask → packed discs → round canvas → simulated appearance.
use image::RgbaImage;
use rand::Rng as RngCore;
use tracing::{debug, info};

use crate::color::{ColorAppearanceTransform, DeficiencyKind, DeficiencySpec, PlatePalette};
use crate::error::{Error, Result};
use crate::events::{EventSink, PlateEvent, PlateEventKind};
use crate::glyph::{GlyphMask, GlyphSource};
use crate::mask::CircularMask;
use crate::packing::{DiscPacker, OccupancyStrategy, PackConfig, PackStats, PackedSet};
use crate::raster::render_discs;

/// Stages of one plate generation, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlateStage {
    AwaitGlyph,
    Packing,
    Masking,
    Simulating,
    Done,
}

/// Configuration for [`PlateAssembler`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlateConfig {
    /// Packing parameters, including the canvas side.
    pub pack: PackConfig,
    /// Collision strategy used while packing.
    pub occupancy: OccupancyStrategy,
    /// Deficiency to simulate.
    pub deficiency: DeficiencySpec,
    /// Base colors; `None` picks the built-in palette for the deficiency kind.
    pub palette: Option<PlatePalette>,
    /// Canvas color behind the discs.
    pub background: [u8; 4],
    pub mask: CircularMask,
    /// Lattice spacing used to sample rasterized text into glyph points. `None` picks the
    /// smallest spacing at which no two priority discs can collide; `Some(1)` keeps every
    /// covered pixel.
    pub glyph_step: Option<u32>,
}

impl Default for PlateConfig {
    fn default() -> Self {
        Self {
            pack: PackConfig::default(),
            occupancy: OccupancyStrategy::default(),
            deficiency: DeficiencySpec::full(DeficiencyKind::Deuteranopia),
            palette: None,
            background: [0, 0, 0, 0],
            mask: CircularMask::hard(),
            glyph_step: None,
        }
    }
}

impl PlateConfig {
    /// Creates a new [`PlateConfig`] simulating `deficiency`.
    pub fn new(deficiency: DeficiencySpec) -> Self {
        Self {
            deficiency,
            ..Default::default()
        }
    }

    pub fn with_pack(mut self, pack: PackConfig) -> Self {
        self.pack = pack;
        self
    }

    pub fn with_occupancy(mut self, occupancy: OccupancyStrategy) -> Self {
        self.occupancy = occupancy;
        self
    }

    pub fn with_palette(mut self, palette: PlatePalette) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn with_background(mut self, background: [u8; 4]) -> Self {
        self.background = background;
        self
    }

    pub fn with_mask(mut self, mask: CircularMask) -> Self {
        self.mask = mask;
        self
    }

    pub fn with_glyph_step(mut self, step: u32) -> Self {
        self.glyph_step = Some(step);
        self
    }

    /// Spacing of the glyph point lattice used by [`PlateAssembler::generate`].
    ///
    /// Without an explicit step, neighbouring lattice points sit two maximum priority radii
    /// apart, plus one grid cell when the grid strategy is used, since the grid reserves
    /// whole cells around each disc.
    pub fn glyph_step(&self) -> u32 {
        self.glyph_step.unwrap_or_else(|| {
            let slack = match self.occupancy {
                OccupancyStrategy::Grid { cell_size } => cell_size.max(1),
                OccupancyStrategy::Exact => 0,
            };
            self.pack.priority_radius.1.saturating_mul(2).saturating_add(slack)
        })
    }

    /// Canvas side length in pixels.
    pub fn side(&self) -> u32 {
        self.pack.side
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        self.pack.validate()?;
        self.deficiency.validate()?;
        if let OccupancyStrategy::Grid { cell_size: 0 } = self.occupancy {
            return Err(Error::InvalidConfig("grid cell_size must be > 0".into()));
        }
        if self.glyph_step == Some(0) {
            return Err(Error::InvalidConfig("glyph_step must be > 0".into()));
        }
        Ok(())
    }

    fn resolve_palette(&self) -> Result<PlatePalette> {
        match self.palette {
            Some(palette) => Ok(palette),
            None => PlatePalette::for_kind(self.deficiency.kind),
        }
    }
}

/// A generated plate as seen with normal vision and under the simulated deficiency.
#[derive(Debug, Clone)]
pub struct Plate {
    pub normal: RgbaImage,
    pub simulated: RgbaImage,
    pub discs: PackedSet,
    pub stats: PackStats,
    pub deficiency: DeficiencySpec,
}

/// Runs the plate pipeline with a glyph source and a color appearance transform.
pub struct PlateAssembler<'a> {
    /// Configuration applied to every plate.
    pub config: PlateConfig,
    /// Text-to-mask collaborator.
    pub glyphs: &'a dyn GlyphSource,
    /// Deficiency simulation.
    pub transform: &'a dyn ColorAppearanceTransform,
}

impl<'a> PlateAssembler<'a> {
    pub fn try_new(
        config: PlateConfig,
        glyphs: &'a dyn GlyphSource,
        transform: &'a dyn ColorAppearanceTransform,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            glyphs,
            transform,
        })
    }

    /// Generates a plate showing `text`.
    ///
    /// The rasterized text is sampled on a lattice of [`PlateConfig::glyph_step`] pixels
    /// before packing.
    pub fn generate(&self, text: &str, rng: &mut dyn RngCore) -> Result<Plate> {
        self.generate_with_events(text, rng, &mut ())
    }

    pub fn generate_with_events(
        &self,
        text: &str,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<Plate> {
        enter(sink, PlateStage::AwaitGlyph);
        let covered = self.glyphs.rasterize(text, self.config.side())?;
        let step = self.config.glyph_step();
        let mask = covered.thinned(step);
        debug!(
            "Glyph '{}' covers {} pixels, {} glyph points at step {}.",
            text,
            covered.count(),
            mask.count(),
            step
        );
        self.assemble(mask, rng, sink)
    }

    /// Generates a plate from a caller-supplied mask of canvas dimensions.
    ///
    /// Every covered pixel of `mask` is a glyph point; the mask is not resampled.
    pub fn generate_from_mask(&self, mask: GlyphMask, rng: &mut dyn RngCore) -> Result<Plate> {
        self.generate_from_mask_with_events(mask, rng, &mut ())
    }

    pub fn generate_from_mask_with_events(
        &self,
        mask: GlyphMask,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<Plate> {
        enter(sink, PlateStage::AwaitGlyph);
        self.assemble(mask, rng, sink)
    }

    fn assemble(
        &self,
        mask: GlyphMask,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<Plate> {
        let side = self.config.side();
        if mask.dimensions() != (side, side) {
            return Err(Error::InvalidConfig(format!(
                "glyph mask is {:?}, canvas is {side}x{side}",
                mask.dimensions()
            )));
        }
        let palette = self.config.resolve_palette()?;

        enter(sink, PlateStage::Packing);
        let packer = DiscPacker::try_new(self.config.pack.clone(), palette)?;
        let mut index = self.config.occupancy.build(side);
        let packed = packer.pack_with_events(&mask, index.as_mut(), rng, sink)?;

        enter(sink, PlateStage::Masking);
        let mut normal = render_discs(&packed.discs, side, self.config.background);
        self.config.mask.apply(&mut normal);

        enter(sink, PlateStage::Simulating);
        let simulated = self.transform.simulate(&normal, &self.config.deficiency)?;

        enter(sink, PlateStage::Done);
        info!(
            "Plate ready: {} discs, {} simulated at severity {} ({} occupancy).",
            packed.discs.len(),
            self.config.deficiency.kind,
            self.config.deficiency.severity,
            self.config.occupancy.name(),
        );

        Ok(Plate {
            normal,
            simulated,
            discs: packed.discs,
            stats: packed.stats,
            deficiency: self.config.deficiency,
        })
    }
}

fn enter(sink: &mut dyn EventSink, stage: PlateStage) {
    debug!("Plate stage {:?}.", stage);
    if sink.wants(PlateEventKind::StageEntered) {
        sink.send(PlateEvent::StageEntered { stage });
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::color::MachadoTransform;
    use crate::events::VecSink;
    use crate::glyph::BitmapDigits;
    use crate::packing::GlyphPolicy;

    fn small_config(kind: DeficiencyKind) -> PlateConfig {
        PlateConfig::new(DeficiencySpec::full(kind))
            .with_pack(
                PackConfig::new(160)
                    .with_background_attempts(400)
                    .with_glyph_policy(GlyphPolicy::SkipPoint),
            )
            .with_glyph_step(7)
    }

    #[test]
    fn default_text_plate_draws_the_whole_glyph_lattice() {
        let config = PlateConfig::new(DeficiencySpec::full(DeficiencyKind::Deuteranopia));
        assert_eq!(config.pack.glyph_policy, GlyphPolicy::AbortRemaining);
        let assembler = PlateAssembler::try_new(config, &BitmapDigits, &MachadoTransform).unwrap();

        for seed in [42, 7] {
            let plate = assembler
                .generate("74", &mut StdRng::seed_from_u64(seed))
                .unwrap();
            let stats = &plate.stats;
            assert!(!stats.priority_aborted, "seed {seed}: {stats:?}");
            assert_eq!(stats.glyph_exhausted, 0);
            assert!(stats.glyph_placed > 1, "seed {seed}: {stats:?}");
            assert_eq!(stats.glyph_placed, stats.glyph_points - stats.glyph_ignored);
            assert_eq!(plate.discs.priority().len(), stats.glyph_placed);
            assert_eq!(plate.discs.find_overlap(), None);
        }
    }

    #[test]
    fn every_pixel_as_glyph_point_aborts_after_one_disc() {
        let config = PlateConfig::new(DeficiencySpec::full(DeficiencyKind::Deuteranopia))
            .with_pack(PackConfig::new(600).with_background_attempts(0))
            .with_glyph_step(1);
        let assembler = PlateAssembler::try_new(config, &BitmapDigits, &MachadoTransform).unwrap();
        let plate = assembler
            .generate("74", &mut StdRng::seed_from_u64(42))
            .unwrap();
        assert!(plate.stats.priority_aborted);
        assert_eq!(plate.stats.glyph_placed, 1);
    }

    #[test]
    fn glyph_step_follows_priority_radius_and_strategy() {
        let config = PlateConfig::default();
        assert_eq!(config.glyph_step(), 35);
        let exact = config.clone().with_occupancy(OccupancyStrategy::Exact);
        assert_eq!(exact.glyph_step(), 30);
        let narrow = config
            .clone()
            .with_pack(PackConfig::default().with_priority_radius(5, 8))
            .with_occupancy(OccupancyStrategy::Grid { cell_size: 10 });
        assert_eq!(narrow.glyph_step(), 26);
        assert_eq!(config.clone().with_glyph_step(1).glyph_step(), 1);

        let zero = config.with_glyph_step(0);
        assert!(matches!(zero.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn plate_pair_shares_alpha_and_size() {
        let assembler = PlateAssembler::try_new(
            small_config(DeficiencyKind::Protanopia),
            &BitmapDigits,
            &MachadoTransform,
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let plate = assembler.generate("42", &mut rng).unwrap();

        assert_eq!(plate.normal.dimensions(), (160, 160));
        assert_eq!(plate.simulated.dimensions(), (160, 160));
        for (a, b) in plate.normal.pixels().zip(plate.simulated.pixels()) {
            assert_eq!(a.0[3], b.0[3]);
        }
        assert_eq!(plate.normal.get_pixel(0, 0).0[3], 0);
        assert_eq!(plate.normal.get_pixel(80, 80).0[3], 255);
        assert!(plate.stats.glyph_placed > 0);
        assert_eq!(plate.discs.find_overlap(), None);
    }

    #[test]
    fn stages_are_entered_in_order() {
        let assembler = PlateAssembler::try_new(
            small_config(DeficiencyKind::Deuteranopia),
            &BitmapDigits,
            &MachadoTransform,
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let mut sink = VecSink::without_discs();
        assembler.generate_with_events("7", &mut rng, &mut sink).unwrap();

        let stages: Vec<PlateStage> = sink
            .into_inner()
            .into_iter()
            .filter_map(|e| match e {
                PlateEvent::StageEntered { stage } => Some(stage),
                _ => None,
            })
            .collect();
        assert_eq!(
            stages,
            vec![
                PlateStage::AwaitGlyph,
                PlateStage::Packing,
                PlateStage::Masking,
                PlateStage::Simulating,
                PlateStage::Done,
            ]
        );
    }

    #[test]
    fn same_seed_gives_identical_plates() {
        let assembler = PlateAssembler::try_new(
            small_config(DeficiencyKind::Deuteranopia),
            &BitmapDigits,
            &MachadoTransform,
        )
        .unwrap();
        let a = assembler
            .generate("12", &mut StdRng::seed_from_u64(5))
            .unwrap();
        let b = assembler
            .generate("12", &mut StdRng::seed_from_u64(5))
            .unwrap();
        assert_eq!(a.discs, b.discs);
        assert_eq!(a.normal, b.normal);
        assert_eq!(a.simulated, b.simulated);

        let c = assembler
            .generate("12", &mut StdRng::seed_from_u64(6))
            .unwrap();
        assert_ne!(a.normal, c.normal);
    }

    #[test]
    fn end_to_end_sparse_glyph_keeps_glyph_count_across_seeds() {
        let side = 600;
        let pts = (0..5).flat_map(|i| (0..3).map(move |j| (200 + i * 40, 240 + j * 40)));
        let mask = GlyphMask::from_points(side, side, pts);
        let config = PlateConfig::new(DeficiencySpec::full(DeficiencyKind::Deuteranopia))
            .with_pack(PackConfig::new(side).with_background_attempts(10_000));
        let assembler = PlateAssembler::try_new(config, &BitmapDigits, &MachadoTransform).unwrap();

        let a = assembler
            .generate_from_mask(mask.clone(), &mut StdRng::seed_from_u64(9))
            .unwrap();
        let b = assembler
            .generate_from_mask(mask.clone(), &mut StdRng::seed_from_u64(9))
            .unwrap();
        assert_eq!(a.discs, b.discs);
        assert_eq!(a.normal.as_raw(), b.normal.as_raw());

        let c = assembler
            .generate_from_mask(mask, &mut StdRng::seed_from_u64(10))
            .unwrap();
        assert!(!a.stats.priority_aborted && !c.stats.priority_aborted);
        assert_eq!(a.discs.priority().len(), 15);
        assert_eq!(c.discs.priority().len(), 15);
        assert_ne!(a.discs.background(), c.discs.background());
        for d in &a.discs {
            assert!(d.fits_in(side));
        }
    }

    #[test]
    fn unsupported_kind_fails_the_plate() {
        let config = small_config(DeficiencyKind::Tritanopia);
        let assembler = PlateAssembler::try_new(config, &BitmapDigits, &MachadoTransform).unwrap();
        let err = assembler
            .generate("3", &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedDeficiencyKind { .. }));

        // A custom palette gets past packing; the transform still refuses.
        let config = small_config(DeficiencyKind::Tritanopia)
            .with_palette(PlatePalette::new([255, 0, 0], [0, 0, 255]));
        let assembler = PlateAssembler::try_new(config, &BitmapDigits, &MachadoTransform).unwrap();
        let err = assembler
            .generate("3", &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedDeficiencyKind { .. }));
    }

    #[test]
    fn mismatched_mask_is_rejected() {
        let assembler = PlateAssembler::try_new(
            small_config(DeficiencyKind::Deuteranopia),
            &BitmapDigits,
            &MachadoTransform,
        )
        .unwrap();
        let err = assembler
            .generate_from_mask(GlyphMask::new(10, 10), &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn zero_canvas_degrades_to_empty_plate() {
        let config = PlateConfig::default().with_pack(PackConfig::new(0));
        let assembler = PlateAssembler::try_new(config, &BitmapDigits, &MachadoTransform).unwrap();
        let plate = assembler
            .generate("5", &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert!(plate.discs.is_empty());
        assert_eq!(plate.normal.dimensions(), (0, 0));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = PlateConfig::new(DeficiencySpec::new(DeficiencyKind::Protanopia, 150));
        assert!(PlateAssembler::try_new(config, &BitmapDigits, &MachadoTransform).is_err());

        let config =
            PlateConfig::default().with_occupancy(OccupancyStrategy::Grid { cell_size: 0 });
        assert!(PlateAssembler::try_new(config, &BitmapDigits, &MachadoTransform).is_err());
    }
}

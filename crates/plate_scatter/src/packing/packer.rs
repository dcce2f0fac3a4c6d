//! Two-phase disc packer.
//!
//! The priority phase places one disc on every covered glyph point; the background phase then
//! fills the canvas class by class, largest radius first, with a fixed attempt budget per
//! class. Both phases only ever call [`OccupancyIndex::try_reserve`], so the packer works the
//! same with either occupancy strategy.
use rand::Rng as RngCore;
use tracing::{debug, info, warn};

use crate::color::{jitter, ColorCategory, PlatePalette, DEFAULT_JITTER_SPREAD};
use crate::error::{Error, Result};
use crate::events::{EventSink, PlateEvent, PlateEventKind};
use crate::glyph::GlyphMask;
use crate::packing::occupancy::OccupancyIndex;
use crate::packing::{Disc, PackedSet};
use crate::sampling::{center_inside, chance, rand_int};

/// What to do when a glyph point runs out of placement attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlyphPolicy {
    /// Stop the priority phase and continue with the background.
    #[default]
    AbortRemaining,
    /// Skip the point and continue with the next one.
    SkipPoint,
    /// Fail the whole packing with [`Error::GlyphPlacementExhausted`].
    Fail,
}

/// How glyph coverage enters the packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhaseOrder {
    /// Priority discs on every glyph point, then background fill.
    #[default]
    GlyphFirst,
    /// Background fill only; discs centered on the glyph use the glyph color ratio.
    Uniform,
}

/// Packing phase, reported in events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackPhase {
    Priority,
    Background { radius: u32 },
}

/// Configuration for [`DiscPacker`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackConfig {
    /// Canvas side length in pixels.
    pub side: u32,
    /// Background radius classes, largest first.
    pub radius_classes: Vec<u32>,
    /// Placement attempts per background radius class.
    pub background_attempts: usize,
    /// Inclusive radius range for priority discs.
    pub priority_radius: (u32, u32),
    /// Placement attempts per glyph point.
    pub priority_attempts: usize,
    pub glyph_policy: GlyphPolicy,
    pub phase_order: PhaseOrder,
    /// Probability that a glyph disc is [`ColorCategory::Primary`].
    pub glyph_primary_ratio: f32,
    /// Probability that a background disc is [`ColorCategory::Primary`].
    pub background_primary_ratio: f32,
    /// Per-channel color jitter.
    pub jitter_spread: u32,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            side: 600,
            radius_classes: vec![15, 12, 10, 8, 6, 5],
            background_attempts: 10_000,
            priority_radius: (5, 15),
            priority_attempts: 100,
            glyph_policy: GlyphPolicy::default(),
            phase_order: PhaseOrder::default(),
            glyph_primary_ratio: 0.5,
            background_primary_ratio: 0.5,
            jitter_spread: DEFAULT_JITTER_SPREAD,
        }
    }
}

impl PackConfig {
    /// Creates a new [`PackConfig`] for a canvas of `side` pixels.
    pub fn new(side: u32) -> Self {
        Self {
            side,
            ..Default::default()
        }
    }

    /// Sets the background radius classes.
    pub fn with_radius_classes(mut self, radius_classes: Vec<u32>) -> Self {
        self.radius_classes = radius_classes;
        self
    }

    /// Sets the attempt budget per background radius class.
    pub fn with_background_attempts(mut self, attempts: usize) -> Self {
        self.background_attempts = attempts;
        self
    }

    /// Sets the inclusive priority radius range.
    pub fn with_priority_radius(mut self, min: u32, max: u32) -> Self {
        self.priority_radius = (min, max);
        self
    }

    /// Sets the attempt budget per glyph point.
    pub fn with_priority_attempts(mut self, attempts: usize) -> Self {
        self.priority_attempts = attempts;
        self
    }

    pub fn with_glyph_policy(mut self, policy: GlyphPolicy) -> Self {
        self.glyph_policy = policy;
        self
    }

    pub fn with_phase_order(mut self, order: PhaseOrder) -> Self {
        self.phase_order = order;
        self
    }

    /// Sets the primary-color probabilities for glyph and background discs.
    pub fn with_primary_ratios(mut self, glyph: f32, background: f32) -> Self {
        self.glyph_primary_ratio = glyph;
        self.background_primary_ratio = background;
        self
    }

    pub fn with_jitter_spread(mut self, spread: u32) -> Self {
        self.jitter_spread = spread;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    ///
    /// A zero side or an empty radius list is allowed and simply packs nothing.
    pub fn validate(&self) -> Result<()> {
        for (name, ratio) in [
            ("glyph_primary_ratio", self.glyph_primary_ratio),
            ("background_primary_ratio", self.background_primary_ratio),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {ratio}"
                )));
            }
        }
        let (min, max) = self.priority_radius;
        if min == 0 || min > max {
            return Err(Error::InvalidConfig(format!(
                "priority_radius must be a non-empty range of positive radii, got {min}..={max}"
            )));
        }
        if self.radius_classes.windows(2).any(|w| w[0] < w[1]) {
            return Err(Error::InvalidConfig(format!(
                "radius_classes must be in descending order, got {:?}",
                self.radius_classes
            )));
        }
        Ok(())
    }
}

/// Counters describing one packing run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackStats {
    /// Covered glyph points visited.
    pub glyph_points: usize,
    /// Glyph discs placed.
    pub glyph_placed: usize,
    /// Glyph points ignored because they lie off canvas or too close to its edge.
    pub glyph_ignored: usize,
    /// Glyph points that exhausted their attempt budget.
    pub glyph_exhausted: usize,
    /// Whether the priority phase stopped early.
    pub priority_aborted: bool,
    /// Background placement attempts made.
    pub background_attempts: usize,
    /// Background discs placed.
    pub background_placed: usize,
}

/// Result of a packing run.
#[derive(Debug, Clone, Default)]
pub struct PackResult {
    pub discs: PackedSet,
    pub stats: PackStats,
}

/// Places non-overlapping discs for a plate.
#[derive(Debug, Clone)]
pub struct DiscPacker {
    config: PackConfig,
    palette: PlatePalette,
}

impl DiscPacker {
    pub fn try_new(config: PackConfig, palette: PlatePalette) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, palette })
    }

    pub fn new(config: PackConfig, palette: PlatePalette) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid pack config");
        Self { config, palette }
    }

    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    /// Packs discs onto the canvas, reserving space in `index`.
    pub fn pack(
        &self,
        mask: &GlyphMask,
        index: &mut dyn OccupancyIndex,
        rng: &mut dyn RngCore,
    ) -> Result<PackResult> {
        self.pack_with_events(mask, index, rng, &mut ())
    }

    pub fn pack_with_events(
        &self,
        mask: &GlyphMask,
        index: &mut dyn OccupancyIndex,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<PackResult> {
        let mut result = PackResult::default();

        if self.config.phase_order == PhaseOrder::GlyphFirst {
            self.priority_phase(mask, index, rng, sink, &mut result)?;
        }
        self.background_phase(mask, index, rng, sink, &mut result);

        info!(
            "Packed {} discs ({} glyph, {} background) on a {}px canvas.",
            result.discs.len(),
            result.stats.glyph_placed,
            result.stats.background_placed,
            self.config.side,
        );
        if sink.wants(PlateEventKind::PackFinished) {
            sink.send(PlateEvent::PackFinished {
                stats: result.stats.clone(),
            });
        }
        Ok(result)
    }

    fn priority_phase(
        &self,
        mask: &GlyphMask,
        index: &mut dyn OccupancyIndex,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
        result: &mut PackResult,
    ) -> Result<()> {
        let phase = PackPhase::Priority;
        if sink.wants(PlateEventKind::PhaseStarted) {
            sink.send(PlateEvent::PhaseStarted { phase });
        }

        let side = self.config.side as i64;
        let (min_r, max_r) = self.config.priority_radius;
        let mut attempts_made = 0;

        for (x, y) in mask.points() {
            result.stats.glyph_points += 1;

            let (px, py) = (x as i64, y as i64);
            let room = px.min(py).min(side - px).min(side - py);
            if room < min_r as i64 {
                result.stats.glyph_ignored += 1;
                continue;
            }
            let max_r = (max_r as i64).min(room);

            let mut placed = false;
            for _ in 0..self.config.priority_attempts {
                attempts_made += 1;
                let radius = rand_int(rng, min_r as i64, max_r) as u32;
                let category = self.draw_category(rng, self.config.glyph_primary_ratio);
                if index.try_reserve(x, y, radius) {
                    let disc = self.make_disc(x, y, radius, category, rng);
                    result.discs.push_priority(disc);
                    result.stats.glyph_placed += 1;
                    if sink.wants(PlateEventKind::DiscPlaced) {
                        sink.send(PlateEvent::DiscPlaced { phase, disc });
                    }
                    placed = true;
                    break;
                }
            }
            if placed {
                continue;
            }

            result.stats.glyph_exhausted += 1;
            let policy = self.config.glyph_policy;
            if sink.wants(PlateEventKind::GlyphPlacementExhausted) {
                sink.send(PlateEvent::GlyphPlacementExhausted {
                    x,
                    y,
                    attempts: self.config.priority_attempts,
                    policy,
                });
            }
            match policy {
                GlyphPolicy::AbortRemaining => {
                    warn!(
                        "Glyph point ({}, {}) found no free spot in {} attempts; stopping glyph placement after {} discs.",
                        x, y, self.config.priority_attempts, result.stats.glyph_placed
                    );
                    if sink.wants(PlateEventKind::Warning) {
                        sink.send(PlateEvent::Warning {
                            context: "priority".into(),
                            message: format!(
                                "Glyph placement exhausted at ({x}, {y}); remaining glyph points dropped"
                            ),
                        });
                    }
                    result.stats.priority_aborted = true;
                    break;
                }
                GlyphPolicy::SkipPoint => {
                    debug!("Skipping glyph point ({}, {}).", x, y);
                }
                GlyphPolicy::Fail => {
                    return Err(Error::GlyphPlacementExhausted {
                        x,
                        y,
                        attempts: self.config.priority_attempts,
                    });
                }
            }
        }

        if result.stats.glyph_exhausted > 0 && self.config.glyph_policy == GlyphPolicy::SkipPoint {
            warn!(
                "{} of {} glyph points found no free spot and were skipped.",
                result.stats.glyph_exhausted, result.stats.glyph_points
            );
        }
        if sink.wants(PlateEventKind::PhaseFinished) {
            sink.send(PlateEvent::PhaseFinished {
                phase,
                placed: result.stats.glyph_placed,
                attempts: attempts_made,
            });
        }
        Ok(())
    }

    fn background_phase(
        &self,
        mask: &GlyphMask,
        index: &mut dyn OccupancyIndex,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
        result: &mut PackResult,
    ) {
        for &radius in &self.config.radius_classes {
            if radius == 0 {
                debug!("Skipping zero radius class.");
                continue;
            }
            let phase = PackPhase::Background { radius };
            if sink.wants(PlateEventKind::PhaseStarted) {
                sink.send(PlateEvent::PhaseStarted { phase });
            }

            let mut placed = 0;
            let mut attempts = 0;
            for _ in 0..self.config.background_attempts {
                let Some((x, y)) = center_inside(rng, self.config.side, radius) else {
                    debug!(
                        "Radius {} does not fit a {}px canvas.",
                        radius, self.config.side
                    );
                    break;
                };
                attempts += 1;
                if !index.try_reserve(x, y, radius) {
                    continue;
                }

                let on_glyph =
                    self.config.phase_order == PhaseOrder::Uniform && mask.contains(x, y);
                let ratio = if on_glyph {
                    self.config.glyph_primary_ratio
                } else {
                    self.config.background_primary_ratio
                };
                let category = self.draw_category(rng, ratio);
                let disc = self.make_disc(x, y, radius, category, rng);
                result.discs.push_background(disc);
                if on_glyph {
                    result.stats.glyph_placed += 1;
                } else {
                    result.stats.background_placed += 1;
                }
                placed += 1;
                if sink.wants(PlateEventKind::DiscPlaced) {
                    sink.send(PlateEvent::DiscPlaced { phase, disc });
                }
            }

            result.stats.background_attempts += attempts;
            debug!(
                "Radius class {}: {} placed in {} attempts.",
                radius, placed, attempts
            );
            if sink.wants(PlateEventKind::PhaseFinished) {
                sink.send(PlateEvent::PhaseFinished {
                    phase,
                    placed,
                    attempts,
                });
            }
        }
    }

    fn draw_category(&self, rng: &mut dyn RngCore, primary_ratio: f32) -> ColorCategory {
        if chance(rng, primary_ratio) {
            ColorCategory::Primary
        } else {
            ColorCategory::Secondary
        }
    }

    fn make_disc(
        &self,
        x: i32,
        y: i32,
        radius: u32,
        category: ColorCategory,
        rng: &mut dyn RngCore,
    ) -> Disc {
        let color = jitter(self.palette.base(category), self.config.jitter_spread, rng);
        Disc {
            x,
            y,
            radius,
            category,
            color,
        }
    }
}

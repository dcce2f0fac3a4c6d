//! Event types and sinks for observing plate generation.
//!
//! This module defines [`PlateEvent`] and a few sinks to collect or forward events while
//! running [`crate::packing::DiscPacker::pack_with_events`] or
//! [`crate::plate::PlateAssembler::generate_with_events`].
use crate::packing::packer::{GlyphPolicy, PackPhase, PackStats};
use crate::packing::Disc;
use crate::plate::PlateStage;

/// Describes events emitted while generating a plate.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum PlateEvent {
    /// The assembler moved to a new stage.
    StageEntered { stage: PlateStage },

    /// A packing phase started.
    PhaseStarted { phase: PackPhase },

    /// A disc was placed.
    DiscPlaced { phase: PackPhase, disc: Disc },

    /// A glyph point ran out of attempts.
    GlyphPlacementExhausted {
        x: i32,
        y: i32,
        attempts: usize,
        /// Policy applied in response.
        policy: GlyphPolicy,
    },

    /// A packing phase finished.
    PhaseFinished {
        phase: PackPhase,
        /// Discs placed during the phase.
        placed: usize,
        /// Placement attempts made during the phase.
        attempts: usize,
    },

    /// Packing finished.
    PackFinished { stats: PackStats },

    /// Non-fatal warning.
    Warning {
        /// Context string (e.g. phase or stage).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`PlateEvent`], used by sinks to opt out of noisy events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlateEventKind {
    StageEntered,
    PhaseStarted,
    DiscPlaced,
    GlyphPlacementExhausted,
    PhaseFinished,
    PackFinished,
    Warning,
}

impl PlateEvent {
    pub fn kind(&self) -> PlateEventKind {
        match self {
            PlateEvent::StageEntered { .. } => PlateEventKind::StageEntered,
            PlateEvent::PhaseStarted { .. } => PlateEventKind::PhaseStarted,
            PlateEvent::DiscPlaced { .. } => PlateEventKind::DiscPlaced,
            PlateEvent::GlyphPlacementExhausted { .. } => PlateEventKind::GlyphPlacementExhausted,
            PlateEvent::PhaseFinished { .. } => PlateEventKind::PhaseFinished,
            PlateEvent::PackFinished { .. } => PlateEventKind::PackFinished,
            PlateEvent::Warning { .. } => PlateEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`PlateEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: PlateEvent);

    /// Whether events of `kind` should be built and sent at all.
    fn wants(&self, _kind: PlateEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: PlateEvent) {}

    #[inline]
    fn wants(&self, _kind: PlateEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(PlateEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(PlateEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(PlateEvent),
{
    #[inline]
    fn send(&mut self, event: PlateEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally skipping per-disc events.
#[derive(Default)]
pub struct VecSink {
    events: Vec<PlateEvent>,
    skip_discs: bool,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects everything except [`PlateEvent::DiscPlaced`].
    pub fn without_discs() -> Self {
        Self {
            events: Vec::new(),
            skip_discs: true,
        }
    }

    pub fn into_inner(self) -> Vec<PlateEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[PlateEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: PlateEvent) {
        self.events.push(event);
    }

    fn wants(&self, kind: PlateEventKind) -> bool {
        !(self.skip_discs && kind == PlateEventKind::DiscPlaced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_sink_wants_nothing() {
        assert!(!().wants(PlateEventKind::Warning));
    }

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::new();
        assert!(sink.is_empty());
        sink.send(PlateEvent::Warning {
            context: "a".into(),
            message: "m".into(),
        });
        sink.send(PlateEvent::StageEntered {
            stage: PlateStage::Packing,
        });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.as_slice()[1].kind(), PlateEventKind::StageEntered);
    }

    #[test]
    fn vec_sink_can_skip_disc_events() {
        let sink = VecSink::without_discs();
        assert!(!sink.wants(PlateEventKind::DiscPlaced));
        assert!(sink.wants(PlateEventKind::PhaseFinished));
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(PlateEvent::Warning {
            context: "ctx".into(),
            message: "msg".into(),
        });
        assert_eq!(count, 1);
    }
}

//! Event types and sinks for observing dot generation runs.
//!
//! This module defines [`DotsEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while running [`crate::dots::runner::DotsRunner`],
//! [`crate::dots::runner::run_selected`] or [`crate::dots::runner::run_layer`].
use crate::dots::config::DotsConfig;
use crate::dots::materialize::MaterializeReport;
use crate::dots::runner::Outcome;
use crate::model::EntityId;

/// Describes events emitted while generating dots.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum DotsEvent {
    /// Emitted when a run over one or more source entities starts.
    RunStarted {
        /// The validated configuration used.
        config: DotsConfig,
        /// Number of source entities about to be processed.
        entity_count: usize,
    },

    /// Emitted when all source entities have been processed.
    RunFinished {
        /// Entities that produced a commit.
        materialized: usize,
        /// Entities that were skipped.
        skipped: usize,
    },

    /// Emitted before points are generated for a source entity.
    EntityStarted {
        /// Position of the entity in the run.
        index: usize,
        /// Id of the source entity.
        entity_id: EntityId,
        /// Kind of geographic extent, e.g. `"line"` or `"area"`.
        location_kind: &'static str,
    },

    /// Emitted after point generation for a source entity.
    PointsGenerated {
        entity_id: EntityId,
        /// Number of generated points.
        count: usize,
        /// Whether generation hit the point cap.
        truncated: bool,
    },

    /// Emitted after the batch for a source entity was committed.
    Committed {
        entity_id: EntityId,
        report: MaterializeReport,
    },

    /// Emitted when a source entity (or the whole run) produced nothing.
    Skipped {
        entity_id: Option<EntityId>,
        outcome: Outcome,
    },

    /// Non-fatal warning.
    Warning {
        /// Context string (e.g. entity id).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`DotsEvent`] used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DotsEventKind {
    RunStarted,
    RunFinished,
    EntityStarted,
    PointsGenerated,
    Committed,
    Skipped,
    Warning,
}

impl DotsEvent {
    pub fn kind(&self) -> DotsEventKind {
        match self {
            DotsEvent::RunStarted { .. } => DotsEventKind::RunStarted,
            DotsEvent::RunFinished { .. } => DotsEventKind::RunFinished,
            DotsEvent::EntityStarted { .. } => DotsEventKind::EntityStarted,
            DotsEvent::PointsGenerated { .. } => DotsEventKind::PointsGenerated,
            DotsEvent::Committed { .. } => DotsEventKind::Committed,
            DotsEvent::Skipped { .. } => DotsEventKind::Skipped,
            DotsEvent::Warning { .. } => DotsEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`DotsEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: DotsEvent);

    /// Whether events of `kind` should be built at all.
    #[inline]
    fn wants(&self, _kind: DotsEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: DotsEvent) {}

    #[inline]
    fn wants(&self, _kind: DotsEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(DotsEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(DotsEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(DotsEvent),
{
    #[inline]
    fn send(&mut self, event: DotsEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<DotsEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<DotsEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[DotsEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Kinds of the collected events in emission order.
    pub fn kinds(&self) -> Vec<DotsEventKind> {
        self.events.iter().map(DotsEvent::kind).collect()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: DotsEvent) {
        self.events.push(event);
    }
}

/// Sink that only forwards the listed event kinds to `inner`.
pub struct FilterSink<S: EventSink> {
    inner: S,
    kinds: Vec<DotsEventKind>,
}

impl<S: EventSink> FilterSink<S> {
    pub fn new(inner: S, kinds: impl IntoIterator<Item = DotsEventKind>) -> Self {
        Self {
            inner,
            kinds: kinds.into_iter().collect(),
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: EventSink> EventSink for FilterSink<S> {
    fn send(&mut self, event: DotsEvent) {
        if self.wants(event.kind()) {
            self.inner.send(event);
        }
    }

    fn wants(&self, kind: DotsEventKind) -> bool {
        self.kinds.contains(&kind) && self.inner.wants(kind)
    }
}

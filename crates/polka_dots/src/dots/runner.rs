//! High-level driver for generating dots from the selection or a whole layer.
use rand::Rng;
use tracing::{debug, info, warn};

use crate::dots::config::{DotsConfig, DotsInputs};
use crate::dots::events::{DotsEvent, DotsEventKind, EventSink};
use crate::dots::materialize::{materialize, MaterializeReport};
use crate::dots::style::DotStyle;
use crate::error::{Error, Result};
use crate::model::batch::CommitSink;
use crate::model::{Entity, EntityId, HostModel, Layer};
use crate::sampling::ShapeSampler;

/// What happened to one source entity (or to a selection run).
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Dots were committed.
    Materialized(MaterializeReport),
    /// Nothing was selected.
    NoSelection,
    /// The raw inputs did not parse into a valid configuration.
    InvalidInput,
    /// The extent produced no points; nothing was committed or deleted.
    NoPoints,
}

impl Outcome {
    pub fn is_materialized(&self) -> bool {
        matches!(self, Outcome::Materialized(_))
    }

    pub fn report(&self) -> Option<&MaterializeReport> {
        match self {
            Outcome::Materialized(report) => Some(report),
            _ => None,
        }
    }
}

/// Per-member outcomes of a layer run, in layer order.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerReport {
    pub layer_id: EntityId,
    pub outcomes: Vec<(EntityId, Outcome)>,
    /// Set when the run never started because the inputs were invalid.
    pub invalid_input: bool,
}

impl LayerReport {
    pub fn new(layer_id: impl Into<EntityId>) -> Self {
        Self {
            layer_id: layer_id.into(),
            outcomes: Vec::new(),
            invalid_input: false,
        }
    }

    fn invalid(layer_id: impl Into<EntityId>) -> Self {
        Self {
            invalid_input: true,
            ..Self::new(layer_id)
        }
    }

    /// Members that produced a commit.
    pub fn materialized(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_materialized()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.materialized()
    }

    /// Total number of dots created across all members.
    pub fn dots_created(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|(_, o)| o.report())
            .map(|r| r.created.len())
            .sum()
    }

    pub fn outcome(&self, entity_id: &str) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|(id, _)| id == entity_id)
            .map(|(_, o)| o)
    }
}

/// Runs dot generation against a host that is both model and commit sink.
pub struct DotsRunner<'a, H: HostModel + CommitSink + ?Sized> {
    /// Configuration shared by every source entity.
    pub config: DotsConfig,
    /// Host read for sources and written through its commit boundary.
    pub host: &'a mut H,
}

impl<'a, H: HostModel + CommitSink + ?Sized> DotsRunner<'a, H> {
    pub fn try_new(config: DotsConfig, host: &'a mut H) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, host })
    }

    /// Build a runner from raw host inputs.
    pub fn from_inputs(inputs: &DotsInputs, host: &'a mut H) -> Result<Self> {
        Self::try_new(DotsConfig::from_inputs(inputs)?, host)
    }

    pub fn new(config: DotsConfig, host: &'a mut H) -> Self {
        debug_assert!(
            config.step_m.is_finite() && config.step_m > 0.0,
            "step_m must be a positive finite number"
        );
        debug_assert!(config.max_points > 0, "max_points must be > 0");

        Self { config, host }
    }

    /// Generates dots for the host's current selection.
    pub fn run_selected(&mut self, rng: &mut impl Rng) -> Result<Outcome> {
        run_selected(&mut *self.host, &self.config, rng, None)
    }

    pub fn run_selected_with_events(
        &mut self,
        rng: &mut impl Rng,
        sink: &mut dyn EventSink,
    ) -> Result<Outcome> {
        run_selected(&mut *self.host, &self.config, rng, Some(sink))
    }

    /// Generates dots for every member of a layer snapshot.
    pub fn run_layer(&mut self, layer: &Layer, rng: &mut impl Rng) -> Result<LayerReport> {
        run_layer(layer, &self.config, &mut *self.host, rng, None)
    }

    pub fn run_layer_with_events(
        &mut self,
        layer: &Layer,
        rng: &mut impl Rng,
        sink: &mut dyn EventSink,
    ) -> Result<LayerReport> {
        run_layer(layer, &self.config, &mut *self.host, rng, Some(sink))
    }

    /// Looks up `layer_id` in the host and runs its current members.
    pub fn run_layer_by_id(
        &mut self,
        layer_id: &str,
        rng: &mut impl Rng,
    ) -> Result<LayerReport> {
        let layer = snapshot_layer(&*self.host, layer_id)?;
        self.run_layer(&layer, rng)
    }
}

fn snapshot_layer<H: HostModel + ?Sized>(host: &H, layer_id: &str) -> Result<Layer> {
    let content = host.layer_content(layer_id).ok_or_else(|| Error::UnknownLayer {
        id: layer_id.to_owned(),
    })?;
    Ok(Layer {
        id: layer_id.to_owned(),
        name: String::new(),
        content,
    })
}

/// Generates and commits dots for a single source entity.
pub fn run_entity<C: CommitSink + ?Sized, R: Rng>(
    entity: &Entity,
    config: &DotsConfig,
    commit: &mut C,
    rng: &mut R,
    sink: Option<&mut dyn EventSink>,
) -> Result<Outcome> {
    if let Some(s) = sink {
        single_entity_internal(entity, config, commit, rng, s)
    } else {
        single_entity_internal(entity, config, commit, rng, &mut ())
    }
}

/// Generates dots for the selected entity of `host`, committing through the same host.
pub fn run_selected<H: HostModel + CommitSink + ?Sized, R: Rng>(
    host: &mut H,
    config: &DotsConfig,
    rng: &mut R,
    sink: Option<&mut dyn EventSink>,
) -> Result<Outcome> {
    if let Some(s) = sink {
        run_selected_internal(host, config, rng, s)
    } else {
        run_selected_internal(host, config, rng, &mut ())
    }
}

/// Generates dots for every member of `layer`, one commit per member.
///
/// A commit failure aborts the remaining members and is returned as the error;
/// members committed before it stay committed.
pub fn run_layer<C: CommitSink + ?Sized, R: Rng>(
    layer: &Layer,
    config: &DotsConfig,
    commit: &mut C,
    rng: &mut R,
    sink: Option<&mut dyn EventSink>,
) -> Result<LayerReport> {
    if let Some(s) = sink {
        run_layer_internal(layer, config, commit, rng, s)
    } else {
        run_layer_internal(layer, config, commit, rng, &mut ())
    }
}

/// Parses `inputs` and runs the selection, reporting bad inputs as [`Outcome::InvalidInput`].
pub fn run_selected_with_inputs<H: HostModel + CommitSink + ?Sized, R: Rng>(
    host: &mut H,
    inputs: &DotsInputs,
    rng: &mut R,
    sink: Option<&mut dyn EventSink>,
) -> Result<Outcome> {
    if let Some(s) = sink {
        selected_with_inputs_internal(host, inputs, rng, s)
    } else {
        selected_with_inputs_internal(host, inputs, rng, &mut ())
    }
}

/// Parses `inputs` and runs the layer `layer_id` of `host`.
pub fn run_layer_with_inputs<H: HostModel + CommitSink + ?Sized, R: Rng>(
    host: &mut H,
    layer_id: &str,
    inputs: &DotsInputs,
    rng: &mut R,
    sink: Option<&mut dyn EventSink>,
) -> Result<LayerReport> {
    if let Some(s) = sink {
        layer_with_inputs_internal(host, layer_id, inputs, rng, s)
    } else {
        layer_with_inputs_internal(host, layer_id, inputs, rng, &mut ())
    }
}

fn selected_with_inputs_internal<H: HostModel + CommitSink + ?Sized, R: Rng>(
    host: &mut H,
    inputs: &DotsInputs,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Result<Outcome> {
    match parse_inputs(inputs, "selection", sink)? {
        Some(config) => run_selected_internal(host, &config, rng, sink),
        None => Ok(Outcome::InvalidInput),
    }
}

fn layer_with_inputs_internal<H: HostModel + CommitSink + ?Sized, R: Rng>(
    host: &mut H,
    layer_id: &str,
    inputs: &DotsInputs,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Result<LayerReport> {
    let Some(config) = parse_inputs(inputs, &format!("layer:{layer_id}"), sink)? else {
        return Ok(LayerReport::invalid(layer_id));
    };
    let layer = snapshot_layer(&*host, layer_id)?;
    run_layer_internal(&layer, &config, host, rng, sink)
}

fn parse_inputs(
    inputs: &DotsInputs,
    context: &str,
    sink: &mut dyn EventSink,
) -> Result<Option<DotsConfig>> {
    match DotsConfig::from_inputs(inputs) {
        Ok(config) => Ok(Some(config)),
        Err(Error::InvalidConfig(message)) => {
            report_invalid(context, message, sink);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Returns `Ok(false)` after reporting when `config` must not drive a run.
fn accept_config(config: &DotsConfig, context: &str, sink: &mut dyn EventSink) -> Result<bool> {
    match config.validate() {
        Ok(()) => Ok(true),
        Err(Error::InvalidConfig(message)) => {
            report_invalid(context, message, sink);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

fn report_invalid(context: &str, message: String, sink: &mut dyn EventSink) {
    warn!("Rejected dot configuration for {context}: {message}.");
    if sink.wants(DotsEventKind::Warning) {
        sink.send(DotsEvent::Warning {
            context: context.to_owned(),
            message,
        });
    }
    if sink.wants(DotsEventKind::Skipped) {
        sink.send(DotsEvent::Skipped {
            entity_id: None,
            outcome: Outcome::InvalidInput,
        });
    }
}

fn single_entity_internal<C: CommitSink + ?Sized, R: Rng>(
    entity: &Entity,
    config: &DotsConfig,
    commit: &mut C,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Result<Outcome> {
    if !accept_config(config, &format!("entity:{}", entity.id), sink)? {
        return Ok(Outcome::InvalidInput);
    }
    run_entity_internal(0, entity, config, commit, rng, sink)
}

fn run_selected_internal<H: HostModel + CommitSink + ?Sized, R: Rng>(
    host: &mut H,
    config: &DotsConfig,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Result<Outcome> {
    if !accept_config(config, "selection", sink)? {
        return Ok(Outcome::InvalidInput);
    }

    let selected = host.selected_entity();
    if sink.wants(DotsEventKind::RunStarted) {
        sink.send(DotsEvent::RunStarted {
            config: config.clone(),
            entity_count: usize::from(selected.is_some()),
        });
    }

    let Some(entity) = selected else {
        debug!("No entity selected; nothing to do.");
        if sink.wants(DotsEventKind::Skipped) {
            sink.send(DotsEvent::Skipped {
                entity_id: None,
                outcome: Outcome::NoSelection,
            });
        }
        if sink.wants(DotsEventKind::RunFinished) {
            sink.send(DotsEvent::RunFinished {
                materialized: 0,
                skipped: 1,
            });
        }
        return Ok(Outcome::NoSelection);
    };

    let outcome = run_entity_internal(0, &entity, config, host, rng, sink)?;
    if sink.wants(DotsEventKind::RunFinished) {
        let materialized = usize::from(outcome.is_materialized());
        sink.send(DotsEvent::RunFinished {
            materialized,
            skipped: 1 - materialized,
        });
    }
    Ok(outcome)
}

fn run_layer_internal<C: CommitSink + ?Sized, R: Rng>(
    layer: &Layer,
    config: &DotsConfig,
    commit: &mut C,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Result<LayerReport> {
    if !accept_config(config, &format!("layer:{}", layer.id), sink)? {
        return Ok(LayerReport::invalid(layer.id.clone()));
    }

    if sink.wants(DotsEventKind::RunStarted) {
        sink.send(DotsEvent::RunStarted {
            config: config.clone(),
            entity_count: layer.content.len(),
        });
    }

    let mut report = LayerReport::new(layer.id.clone());
    if layer.content.is_empty() {
        warn!("Layer '{}' has no members; skipping.", layer.id);
        if sink.wants(DotsEventKind::Warning) {
            sink.send(DotsEvent::Warning {
                context: format!("layer:{}", layer.id),
                message: "Layer has no members; skipping".into(),
            });
        }
    }

    for (index, entity) in layer.content.iter().enumerate() {
        let outcome = run_entity_internal(index, entity, config, commit, rng, sink)?;
        report.outcomes.push((entity.id.clone(), outcome));
    }

    info!(
        "Layer '{}' -> materialized {} of {} members ({} dots).",
        layer.id,
        report.materialized(),
        report.outcomes.len(),
        report.dots_created()
    );
    if sink.wants(DotsEventKind::RunFinished) {
        sink.send(DotsEvent::RunFinished {
            materialized: report.materialized(),
            skipped: report.skipped(),
        });
    }
    Ok(report)
}

fn run_entity_internal<C: CommitSink + ?Sized, R: Rng>(
    index: usize,
    entity: &Entity,
    config: &DotsConfig,
    commit: &mut C,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Result<Outcome> {
    if sink.wants(DotsEventKind::EntityStarted) {
        sink.send(DotsEvent::EntityStarted {
            index,
            entity_id: entity.id.clone(),
            location_kind: entity.location.kind_name(),
        });
    }

    let generated = ShapeSampler::new(config.step_m)
        .with_max_points(config.max_points)
        .generate(&entity.location);
    if sink.wants(DotsEventKind::PointsGenerated) {
        sink.send(DotsEvent::PointsGenerated {
            entity_id: entity.id.clone(),
            count: generated.len(),
            truncated: generated.truncated,
        });
    }
    if generated.truncated && sink.wants(DotsEventKind::Warning) {
        sink.send(DotsEvent::Warning {
            context: format!("entity:{}", entity.id),
            message: format!("Point generation capped at {} points", config.max_points),
        });
    }

    if generated.is_empty() {
        debug!(
            "No points for {} entity '{}'; leaving it untouched.",
            entity.location.kind_name(),
            entity.id
        );
        if sink.wants(DotsEventKind::Skipped) {
            sink.send(DotsEvent::Skipped {
                entity_id: Some(entity.id.clone()),
                outcome: Outcome::NoPoints,
            });
        }
        return Ok(Outcome::NoPoints);
    }

    let style = DotStyle::resolve(config, entity);
    let mut report = match materialize(&generated.points, entity, &style, config, rng, commit) {
        Ok(report) => report,
        Err(e) => {
            warn!("Failed to commit dots for '{}': {}.", entity.id, e);
            if sink.wants(DotsEventKind::Warning) {
                sink.send(DotsEvent::Warning {
                    context: format!("entity:{}", entity.id),
                    message: format!("Commit failed: {e}"),
                });
            }
            return Err(e);
        }
    };
    report.truncated = generated.truncated;

    if sink.wants(DotsEventKind::Committed) {
        sink.send(DotsEvent::Committed {
            entity_id: entity.id.clone(),
            report: report.clone(),
        });
    }
    Ok(Outcome::Materialized(report))
}

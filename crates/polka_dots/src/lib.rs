#![forbid(unsafe_code)]
//! polka_dots: evenly spaced point markers along paths and inside areas of a map model.
//!
//! Modules:
//! - geo: geodesic primitives and the geographic extents of map entities
//! - sampling: path resampling, polygon lattice rasterization, shape dispatch
//! - model: entities, associations, the host boundary and an in-memory store
//! - dots: configuration, styling, materialization, runner, events
pub mod dots;
pub mod error;
pub mod geo;
pub mod model;
pub mod sampling;

/// Convenient re-exports for common types. Import with `use polka_dots::prelude::*;`.
pub mod prelude {
    pub use crate::dots::events::{
        DotsEvent, DotsEventKind, EventSink, FilterSink, FnSink, VecSink,
    };
    pub use crate::dots::{
        materialize, run_entity, run_layer, run_layer_with_inputs, run_selected,
        run_selected_with_inputs, ColorSource, DotStyle, DotsConfig, DotsInputs, DotsRunner,
        LayerReport, MaterializeReport, Outcome, PrefixSource, GENERATED_SYMBOL_KEY,
    };
    pub use crate::error::{Error, Result};
    pub use crate::geo::{
        calculate_point, distance_to, proportional_point, Approximable, ArcLocation,
        ArrowLocation, AreaLocation, GeoBox, GeoPoint, LineLocation, Location, Shape,
    };
    pub use crate::model::batch::{Batch, CommitSink, CommitSummary, StagedChange};
    pub use crate::model::store::MemoryStore;
    pub use crate::model::{
        Association, AssociationType, Color, Entity, EntityId, HostModel, Layer,
        VisualAttributes,
    };
    pub use crate::sampling::{
        point_in_polygon, points_for_location, Generated, LatticeSampler, PathResampler,
        ShapeSampler,
    };
}

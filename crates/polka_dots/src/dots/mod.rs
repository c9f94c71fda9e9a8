//! Dot generation pipeline: configuration, styling, materialization and the batch driver.
pub mod config;
pub mod events;
pub mod materialize;
pub mod runner;
pub mod style;

pub use config::{ColorSource, DotsConfig, DotsInputs, PrefixSource, GENERATED_SYMBOL_KEY};
pub use materialize::{materialize, stage_dots, MaterializeReport};
pub use runner::{
    run_entity, run_layer, run_layer_with_inputs, run_selected, run_selected_with_inputs,
    DotsRunner, LayerReport, Outcome,
};
pub use style::DotStyle;

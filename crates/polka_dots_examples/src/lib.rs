#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{init_tracing, render_store_to_png, RenderConfig};

//! superchart: lazily resolved chart plugins behind a memoized transform pipeline.
//!
//! A host asks for a chart by its type key. [`api::SuperChartCore`] resolves
//! the rendering component and transform from injected registries, tracks the
//! loading/error/success lifecycle, and feeds chart props through
//! `post(transform(pre(props)))` before handing them to the component.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod registry;
pub mod render;
pub mod telemetry;

pub use api::{ChartContext, SuperChartCore, SuperChartProps};
pub use error::{ChartError, ChartResult};

//! Optional building blocks layered on top of the registries.

pub mod plugins;

pub use plugins::{ChartPlugin, PluginSource};

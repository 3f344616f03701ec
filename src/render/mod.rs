mod container_ref;
mod element;
mod null_chart;

use std::sync::Arc;

pub use container_ref::{ContainerHandle, ContainerRef};
pub use element::{ChartOutput, Container, Diagnostic, Element};
pub use null_chart::NullChart;

use crate::core::ChartProps;

/// Contract implemented by every resolvable visualization.
///
/// Components receive the fully transformed props so drawing code stays
/// isolated from resolution and pipeline concerns.
pub trait ChartComponent: Send + Sync {
    fn name(&self) -> &str;

    fn render(&self, props: &ChartProps) -> Element {
        Element::Chart(ChartOutput {
            component: self.name().to_owned(),
            props: props.clone(),
        })
    }
}

pub type SharedComponent = Arc<dyn ChartComponent>;

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::ChartProps;
use crate::render::{ChartComponent, ChartOutput, Element};

/// Headless component used by tests and hosts without a drawing backend.
///
/// It renders nothing visual but records the final props it received so
/// callers can assert on what the pipeline produced.
#[derive(Debug)]
pub struct NullChart {
    name: String,
    render_count: AtomicUsize,
    last_props: Mutex<Option<ChartProps>>,
}

impl NullChart {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            render_count: AtomicUsize::new(0),
            last_props: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn render_count(&self) -> usize {
        self.render_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn last_props(&self) -> Option<ChartProps> {
        self.last_props
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl ChartComponent for NullChart {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, props: &ChartProps) -> Element {
        self.render_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_props
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(props.clone());
        Element::Chart(ChartOutput {
            component: self.name.clone(),
            props: props.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::NullChart;
    use crate::core::ChartProps;
    use crate::render::ChartComponent;

    #[test]
    fn records_props_and_counts_renders() {
        let chart = NullChart::new("Line");
        let props = ChartProps::blank();

        let element = chart.render(&props);
        let _ = chart.render(&props);

        assert_eq!(chart.render_count(), 2);
        assert!(chart.last_props().expect("props").ptr_eq(&props));
        assert_eq!(
            element.as_chart().map(|c| c.component.as_str()),
            Some("Line")
        );
    }
}

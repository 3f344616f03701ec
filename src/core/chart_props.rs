use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ChartError, ChartResult};

pub const DEFAULT_CHART_WIDTH: f64 = 800.0;
pub const DEFAULT_CHART_HEIGHT: f64 = 600.0;

static BLANK_CHART_PROPS: LazyLock<ChartProps> =
    LazyLock::new(|| ChartProps::new(ChartPropsData::default()));

/// Field storage behind a [`ChartProps`] handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPropsData {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub form_data: Map<String, Value>,
    #[serde(default)]
    pub payload: Value,
}

fn default_width() -> f64 {
    DEFAULT_CHART_WIDTH
}

fn default_height() -> f64 {
    DEFAULT_CHART_HEIGHT
}

impl Default for ChartPropsData {
    fn default() -> Self {
        Self {
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
            form_data: Map::new(),
            payload: Value::Null,
        }
    }
}

/// Immutable input bag handed to a visualization.
///
/// Cloning shares the same allocation, so identity survives clones and
/// [`ChartProps::ptr_eq`] is what memoized stages compare. `PartialEq`
/// compares field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartProps(Arc<ChartPropsData>);

impl ChartProps {
    #[must_use]
    pub fn new(data: ChartPropsData) -> Self {
        Self(Arc::new(data))
    }

    /// Shared default instance used when the host supplies no chart props.
    #[must_use]
    pub fn blank() -> Self {
        BLANK_CHART_PROPS.clone()
    }

    #[must_use]
    pub fn builder() -> ChartPropsBuilder {
        ChartPropsBuilder::default()
    }

    pub fn from_json(json: &str) -> ChartResult<Self> {
        let data: ChartPropsData = serde_json::from_str(json)
            .map_err(|err| ChartError::InvalidData(format!("chart props: {err}")))?;
        if !data.width.is_finite() || !data.height.is_finite() {
            return Err(ChartError::InvalidData(
                "chart props dimensions must be finite".to_owned(),
            ));
        }
        Ok(Self::new(data))
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.ptr_eq(&BLANK_CHART_PROPS)
    }

    #[must_use]
    pub fn data(&self) -> &ChartPropsData {
        &self.0
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.0.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.0.height
    }

    #[must_use]
    pub fn form_data(&self) -> &Map<String, Value> {
        &self.0.form_data
    }

    #[must_use]
    pub fn payload(&self) -> &Value {
        &self.0.payload
    }

    /// Returns a builder seeded with a copy of these fields.
    #[must_use]
    pub fn to_builder(&self) -> ChartPropsBuilder {
        ChartPropsBuilder {
            data: self.0.as_ref().clone(),
        }
    }
}

impl Default for ChartProps {
    fn default() -> Self {
        Self::blank()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChartPropsBuilder {
    data: ChartPropsData,
}

impl ChartPropsBuilder {
    #[must_use]
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.data.width = width;
        self.data.height = height;
        self
    }

    #[must_use]
    pub fn form_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.form_data.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn payload(mut self, payload: Value) -> Self {
        self.data.payload = payload;
        self
    }

    #[must_use]
    pub fn build(self) -> ChartProps {
        ChartProps::new(self.data)
    }
}

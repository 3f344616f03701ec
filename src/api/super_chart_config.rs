use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Serializable subset of [`super::SuperChartProps`].
///
/// Hosts can persist which chart a slot shows without inventing their own
/// format. Functions and chart data stay in code.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperChartConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default)]
    pub chart_type: String,
}

impl SuperChartConfig {
    #[must_use]
    pub fn new(chart_type: impl Into<String>) -> Self {
        Self {
            chart_type: chart_type.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// An empty chart type is accepted and renders an empty container.
    pub fn validate(&self) -> ChartResult<()> {
        if self.chart_type.chars().any(char::is_whitespace) {
            return Err(ChartError::InvalidConfig(format!(
                "chart type `{}` must not contain whitespace",
                self.chart_type
            )));
        }
        Ok(())
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

use serde::Serialize;

use crate::core::ChartProps;
use crate::error::ChartError;

/// Backend-agnostic output tree produced by one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Container(Container),
    Diagnostic(Diagnostic),
    Chart(ChartOutput),
}

/// Wrapper element owned by the orchestrator.
///
/// `id` and `class_name` are only present when the host supplied non-empty
/// values, so no empty attributes are ever emitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Container {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub children: Vec<Element>,
}

impl Container {
    #[must_use]
    pub fn new(id: Option<&str>, class_name: Option<&str>) -> Self {
        Self {
            id: non_empty(id),
            class_name: non_empty(class_name),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_child(mut self, child: Option<Element>) -> Self {
        self.children.extend(child);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_owned)
}

/// Inline alert shown in place of a chart whose resolution failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub chart_type: String,
    pub message: String,
}

impl Diagnostic {
    pub const CLASS_NAME: &'static str = "alert alert-warning";
    pub const ROLE: &'static str = "alert";

    #[must_use]
    pub fn new(chart_type: impl Into<String>, error: &ChartError) -> Self {
        Self {
            chart_type: chart_type.into(),
            message: error.to_string(),
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        format!("ERROR chartType=\"{}\" - {}", self.chart_type, self.message)
    }
}

/// What a rendering component hands back: its name and the final props it drew.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOutput {
    pub component: String,
    pub props: ChartProps,
}

impl Element {
    #[must_use]
    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Self::Container(container) => Some(container),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Diagnostic(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_chart(&self) -> Option<&ChartOutput> {
        match self {
            Self::Chart(output) => Some(output),
            _ => None,
        }
    }

    /// Depth-first search for the first rendered chart.
    #[must_use]
    pub fn find_chart(&self) -> Option<&ChartOutput> {
        match self {
            Self::Chart(output) => Some(output),
            Self::Container(container) => container.children.iter().find_map(Self::find_chart),
            Self::Diagnostic(_) => None,
        }
    }

    #[must_use]
    pub fn find_diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Diagnostic(diagnostic) => Some(diagnostic),
            Self::Container(container) => {
                container.children.iter().find_map(Self::find_diagnostic)
            }
            Self::Chart(_) => None,
        }
    }

    #[must_use]
    pub fn text_content(&self) -> String {
        match self {
            Self::Container(container) => container
                .children
                .iter()
                .map(Self::text_content)
                .collect(),
            Self::Diagnostic(diagnostic) => diagnostic.text(),
            Self::Chart(_) => String::new(),
        }
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Container(container) => {
                out.push_str("<div");
                if let Some(id) = &container.id {
                    push_attr(out, "id", id);
                }
                if let Some(class_name) = &container.class_name {
                    push_attr(out, "class", class_name);
                }
                out.push('>');
                for child in &container.children {
                    child.write_html(out);
                }
                out.push_str("</div>");
            }
            Self::Diagnostic(diagnostic) => {
                out.push_str("<div");
                push_attr(out, "class", Diagnostic::CLASS_NAME);
                push_attr(out, "role", Diagnostic::ROLE);
                out.push_str("><strong>ERROR</strong> <code>chartType=&quot;");
                push_escaped(out, &diagnostic.chart_type);
                out.push_str("&quot;</code> - ");
                push_escaped(out, &diagnostic.message);
                out.push_str("</div>");
            }
            Self::Chart(output) => {
                out.push_str("<chart");
                push_attr(out, "data-component", &output.component);
                out.push_str("></chart>");
            }
        }
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    push_escaped(out, value);
    out.push('"');
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

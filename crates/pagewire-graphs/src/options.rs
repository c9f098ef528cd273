use serde::{Deserialize, Serialize};

use crate::GraphError;

/// Colors used when a graph does not provide its own
pub const DEFAULT_COLORS: [&str; 8] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
];

/// Background painted behind the plot and inside donut holes
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphType {
    #[default]
    Bar,
    Line,
    Pie,
    Donut,
}

/// What to draw and how
///
/// Deserializes from the same shape apps keep in JSON:
///
/// ```
/// use pagewire_graphs::{GraphOptions, GraphType};
///
/// let options: GraphOptions = serde_json::from_str(
///     r#"{"type": "pie", "title": "Share", "labels": ["a", "b"], "values": [1, 3]}"#,
/// ).unwrap();
/// assert_eq!(options.graph_type, GraphType::Pie);
/// assert_eq!(options.values, vec![1.0, 3.0]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    #[serde(rename = "type")]
    pub graph_type: GraphType,
    pub title: Option<String>,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
    pub background: Option<String>,
    /// Draw the labels next to bars, points or slices
    pub show_labels: bool,
}

impl GraphOptions {
    pub fn new(graph_type: GraphType, values: impl Into<Vec<f64>>) -> Self {
        Self {
            graph_type,
            values: values.into(),
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self.show_labels = true;
        self
    }

    pub fn colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    pub fn background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    /// Color of the `index`th value, cycling through the palette
    pub fn color(&self, index: usize) -> &str {
        if self.colors.is_empty() {
            DEFAULT_COLORS[index % DEFAULT_COLORS.len()]
        } else {
            &self.colors[index % self.colors.len()]
        }
    }

    pub fn background_color(&self) -> &str {
        self.background.as_deref().unwrap_or(DEFAULT_BACKGROUND)
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Checks the values can be drawn as the configured graph type
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.values.is_empty() {
            return Err(GraphError::NoData);
        }
        if !self.labels.is_empty() && self.labels.len() != self.values.len() {
            return Err(GraphError::LabelCount {
                labels: self.labels.len(),
                values: self.values.len(),
            });
        }
        if let Some(index) = self.values.iter().position(|v| !v.is_finite()) {
            return Err(GraphError::NonFinite { index });
        }

        if matches!(self.graph_type, GraphType::Pie | GraphType::Donut) {
            if let Some((index, value)) = self.values.iter().enumerate().find(|(_, v)| **v < 0.0) {
                return Err(GraphError::NegativeValue {
                    graph_type: self.graph_type,
                    index,
                    value: *value,
                });
            }
            if self.values.iter().sum::<f64>() == 0.0 {
                return Err(GraphError::ZeroTotal {
                    graph_type: self.graph_type,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_cycle() {
        let options = GraphOptions::new(GraphType::Bar, vec![1.0]).colors(["red", "blue"]);
        assert_eq!(options.color(0), "red");
        assert_eq!(options.color(3), "blue");
        assert_eq!(GraphOptions::default().color(9), DEFAULT_COLORS[1]);
    }

    #[test]
    fn test_validate_rejects_negative_pie_values() {
        let options = GraphOptions::new(GraphType::Pie, vec![1.0, -2.0]);
        assert_eq!(
            options.validate(),
            Err(GraphError::NegativeValue {
                graph_type: GraphType::Pie,
                index: 1,
                value: -2.0,
            })
        );
        let bars = GraphOptions::new(GraphType::Bar, vec![1.0, -2.0]);
        assert_eq!(bars.validate(), Ok(()));
    }

    #[test]
    fn test_validate_label_count() {
        let options = GraphOptions::new(GraphType::Line, vec![1.0, 2.0]).labels(["a"]);
        assert_eq!(
            options.validate(),
            Err(GraphError::LabelCount {
                labels: 1,
                values: 2
            })
        );
    }

    #[test]
    fn test_validate_zero_total() {
        let options = GraphOptions::new(GraphType::Donut, vec![0.0, 0.0]);
        assert!(matches!(options.validate(), Err(GraphError::ZeroTotal { .. })));
    }
}

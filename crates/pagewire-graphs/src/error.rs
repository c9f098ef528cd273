use thiserror::Error;

use crate::GraphType;

/// Errors raised while validating or drawing a graph
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("graph has no values")]
    NoData,

    #[error("{labels} labels given for {values} values")]
    LabelCount { labels: usize, values: usize },

    #[error("value at index {index} is not a finite number")]
    NonFinite { index: usize },

    #[error("{graph_type:?} graphs cannot show the negative value {value} at index {index}")]
    NegativeValue {
        graph_type: GraphType,
        index: usize,
        value: f64,
    },

    #[error("{graph_type:?} graph values sum to zero")]
    ZeroTotal { graph_type: GraphType },

    #[error("canvas is too small to draw on ({width}x{height})")]
    CanvasTooSmall { width: f64, height: f64 },
}

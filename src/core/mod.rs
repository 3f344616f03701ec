pub mod chart_props;
pub mod transform;

pub use chart_props::{
    ChartProps, ChartPropsBuilder, ChartPropsData, DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH,
};
pub use transform::{TransformFn, same_stage};

pub mod cost;
pub mod source;

pub use cost::{CostBreakdown, CostError, JOULES_TO_KWH, integrate_cost, joules_to_kwh};
pub use source::{PriceError, PriceSeries, market_to_retail};

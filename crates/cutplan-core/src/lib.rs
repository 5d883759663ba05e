//! cutplan-core - cutting-stock optimization for sheets and bars.
//!
//! Given a list of required pieces, a standard stock unit and a cut policy,
//! the engine computes a set of consumed units, the placement of every piece
//! on them and the reusable offcuts they leave behind.
//!
//! # Example
//!
//! ```
//! use cutplan_core::{plan_cuts, CutRequest, Demand, Parameters, StockUnit};
//! use rust_decimal::Decimal;
//!
//! let request = CutRequest {
//!     stock: StockUnit::sheet(Decimal::from(2000), Decimal::from(1000)),
//!     parameters: Parameters::default(),
//!     pieces: vec![Demand::rect("door", Decimal::from(600), Decimal::from(400), 4)],
//! };
//!
//! let plan = plan_cuts(request).unwrap();
//! assert_eq!(plan.units_consumed, 1);
//! assert_eq!(plan.utilization_pct, Decimal::from(48));
//! ```

pub mod optimizer;
pub mod types;

pub use optimizer::{validate, Optimizer, MAX_DIMENSION, MAX_PIECES};
pub use types::*;

/// Validates a job and computes its cut plan in one call.
pub fn plan_cuts(request: CutRequest) -> Result<CutPlan> {
    Ok(Optimizer::new(request)?.optimize())
}

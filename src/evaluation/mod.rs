//! Route cost evaluation and solution feasibility checks.

mod evaluator;

pub use evaluator::RouteEvaluator;

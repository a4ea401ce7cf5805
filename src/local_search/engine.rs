//! Best-improvement local search loop with a wall-clock budget.
//!
//! # Algorithm
//!
//! Each iteration tries the neighborhoods in order (Relocate, Swap, 2-opt
//! by default). The first one that applies an improving move ends the
//! iteration and the next one starts again from the first neighborhood.
//! The search stops when no neighborhood improves (local optimum) or when
//! the budget is found exceeded at the top of an iteration.
//!
//! The budget is `time_limit` from the start of the run, cut short by an
//! optional deadline shared with the caller.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::config::SearchConfig;
use super::relocate::Relocate;
use super::swap::Swap;
use super::two_opt::TwoOpt;
use crate::evaluation::RouteEvaluator;
use crate::models::Solution;

/// A move family the engine can apply to a solution.
///
/// Implementations evaluate candidates on temporary sequences and write to
/// the solution only when they apply a strictly improving move.
pub trait Neighborhood: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Applies at most one improving step. Returns `true` if the solution
    /// changed.
    fn improve(&self, solution: &mut Solution, evaluator: &RouteEvaluator<'_>) -> bool;
}

/// Why the engine stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// No neighborhood found an improving move.
    LocalOptimum,
    /// The wall-clock budget ran out.
    TimeBudget,
}

/// Result of an engine run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Total cost before the first iteration.
    pub initial_cost: f64,
    /// Total cost after the last applied move.
    pub final_cost: f64,
    /// Number of improving moves applied.
    pub iterations: usize,
    /// Total cost before the run and after every applied move.
    pub cost_history: Vec<f64>,
    /// Wall-clock time spent.
    pub elapsed: Duration,
    /// Why the run stopped.
    pub termination: Termination,
}

/// Local search engine over a fixed list of neighborhoods.
///
/// # Examples
///
/// ```
/// use carp_routing::models::Instance;
/// use carp_routing::distance::GraphModel;
/// use carp_routing::evaluation::RouteEvaluator;
/// use carp_routing::constructive::greedy_insertion;
/// use carp_routing::local_search::{LocalSearchEngine, SearchConfig, Termination};
///
/// let instance = Instance::builder(10, 1)
///     .required_node(2, 1, 0)
///     .required_node(3, 1, 0)
///     .edge(1, 2, 1)
///     .edge(2, 3, 1)
///     .build();
/// let graph = GraphModel::new(&instance).unwrap();
/// let evaluator = RouteEvaluator::new(&graph, instance.depot, instance.capacity);
/// let mut solution = greedy_insertion(&instance.services(), &evaluator);
///
/// let engine = LocalSearchEngine::new(evaluator, SearchConfig::default());
/// let outcome = engine.run(&mut solution);
/// assert_eq!(outcome.termination, Termination::LocalOptimum);
/// assert!(outcome.final_cost <= outcome.initial_cost);
/// ```
pub struct LocalSearchEngine<'a> {
    evaluator: RouteEvaluator<'a>,
    config: SearchConfig,
    neighborhoods: Vec<Box<dyn Neighborhood>>,
    deadline: Option<Instant>,
}

impl<'a> LocalSearchEngine<'a> {
    /// Creates an engine with Relocate, Swap and 2-opt, in that order.
    pub fn new(evaluator: RouteEvaluator<'a>, config: SearchConfig) -> Self {
        let neighborhoods: Vec<Box<dyn Neighborhood>> =
            vec![Box::new(Relocate), Box::new(Swap), Box::new(TwoOpt)];
        Self::with_neighborhoods(evaluator, config, neighborhoods)
    }

    /// Creates an engine with a custom neighborhood order.
    pub fn with_neighborhoods(
        evaluator: RouteEvaluator<'a>,
        config: SearchConfig,
        neighborhoods: Vec<Box<dyn Neighborhood>>,
    ) -> Self {
        Self {
            evaluator,
            config,
            neighborhoods,
            deadline: None,
        }
    }

    /// Stops the run at `deadline` even if `time_limit` has not elapsed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// The engine configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Improves `solution` in place until a local optimum or the budget.
    ///
    /// Routes left empty by relocations are removed at the end.
    #[tracing::instrument(level = "debug", name = "local search", skip_all)]
    pub fn run(&self, solution: &mut Solution) -> SearchOutcome {
        let start = Instant::now();
        let deadline = match (self.deadline, start.checked_add(self.config.time_limit)) {
            (Some(shared), Some(own)) => Some(shared.min(own)),
            (shared, own) => shared.or(own),
        };
        let initial_cost = solution.total_cost();
        let mut cost_history = vec![initial_cost];
        let mut iterations = 0;

        let termination = loop {
            if deadline.is_some_and(|d| Instant::now() > d) {
                tracing::warn!(
                    iterations,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "time budget exceeded before reaching a local optimum"
                );
                break Termination::TimeBudget;
            }

            let applied = self
                .neighborhoods
                .iter()
                .find(|n| n.improve(solution, &self.evaluator));

            match applied {
                Some(neighborhood) => {
                    iterations += 1;
                    let cost = solution.total_cost();
                    cost_history.push(cost);
                    tracing::debug!(
                        iterations,
                        neighborhood = neighborhood.name(),
                        cost,
                        "improving move applied"
                    );
                }
                None => break Termination::LocalOptimum,
            }
        };

        solution.prune_empty_routes();
        let final_cost = solution.total_cost();
        let elapsed = start.elapsed();
        tracing::info!(
            ?termination,
            iterations,
            initial_cost,
            final_cost,
            routes = solution.num_routes(),
            "local search finished"
        );

        SearchOutcome {
            initial_cost,
            final_cost,
            iterations,
            cost_history,
            elapsed,
            termination,
        }
    }
}

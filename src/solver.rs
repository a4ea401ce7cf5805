//! End-to-end solve pipeline.
//!
//! Instance → graph → greedy construction → local search → optional VNS.
//!
//! The time limit is one budget for the whole pipeline, measured from the
//! start of [`CarpSolver::solve`]: the local search and every engine run
//! inside the VNS stop at the same deadline.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use u_metaheur::vns::{VnsConfig, VnsProblem, VnsRunner};

use crate::constructive::greedy_insertion;
use crate::distance::GraphModel;
use crate::error::CarpError;
use crate::evaluation::RouteEvaluator;
use crate::local_search::{LocalSearchEngine, SearchConfig, Termination};
use crate::models::{Instance, Service, Solution};
use crate::vns::CarpVnsProblem;

/// Configuration for [`CarpSolver`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use carp_routing::solver::SolverConfig;
/// use u_metaheur::vns::VnsConfig;
///
/// let config = SolverConfig::default()
///     .with_time_limit(Duration::from_secs(10))
///     .with_vns(VnsConfig::default().with_max_iterations(50));
/// assert_eq!(config.search.time_limit, Duration::from_secs(10));
/// assert!(config.vns.is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Local search settings. `time_limit` bounds the whole pipeline.
    pub search: SearchConfig,
    /// VNS perturbation after the local search. Off when `None`.
    pub vns: Option<VnsConfig>,
}

impl SolverConfig {
    /// Sets the time budget of the whole pipeline.
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.search.time_limit = time_limit;
        self
    }

    /// Enables VNS perturbation.
    pub fn with_vns(mut self, vns: VnsConfig) -> Self {
        self.vns = Some(vns);
        self
    }
}

/// Result of [`CarpSolver::solve`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveReport {
    /// Instance name.
    pub name: String,
    /// Best solution found.
    pub solution: Solution,
    /// Cost after construction.
    pub initial_cost: f64,
    /// Cost of `solution`.
    pub final_cost: f64,
    /// Global ids of services left out of every route.
    pub unserved: Vec<usize>,
    /// Why the first local search (right after construction) stopped.
    pub termination: Termination,
    /// Improving moves applied by the first local search.
    pub iterations: usize,
    /// Neighborhood switches executed by the VNS runner. `None` when VNS
    /// is off.
    pub vns_iterations: Option<usize>,
    /// Wall-clock time of the whole pipeline.
    pub elapsed: Duration,
}

impl SolveReport {
    /// Returns `true` if every service is served.
    pub fn is_complete(&self) -> bool {
        self.unserved.is_empty()
    }
}

/// Capacitated arc routing solver.
///
/// # Examples
///
/// ```
/// use carp_routing::models::Instance;
/// use carp_routing::solver::{CarpSolver, SolverConfig};
///
/// let instance = Instance::builder(10, 1)
///     .name("triangle")
///     .required_edge(1, 2, 5, 3, 5)
///     .required_arc(2, 3, 4, 3, 4)
///     .arc(3, 1, 6)
///     .build();
///
/// let solver = CarpSolver::new(&instance, SolverConfig::default()).unwrap();
/// let report = solver.solve();
/// assert!(report.is_complete());
/// assert_eq!(report.solution.num_routes(), 1);
/// assert_eq!(report.final_cost, 24.0);
/// ```
#[derive(Debug)]
pub struct CarpSolver {
    name: String,
    depot: usize,
    capacity: u32,
    services: Vec<Service>,
    graph: GraphModel,
    config: SolverConfig,
}

impl CarpSolver {
    /// Validates the instance and builds its graph.
    pub fn new(instance: &Instance, config: SolverConfig) -> Result<Self, CarpError> {
        let graph = GraphModel::new(instance)?;
        Ok(Self {
            name: instance.name.clone(),
            depot: instance.depot,
            capacity: instance.capacity,
            services: instance.services(),
            graph,
            config,
        })
    }

    /// The instance graph.
    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    /// Services under their global numbering.
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// The solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Evaluator bound to this instance's graph, depot and capacity.
    pub fn evaluator(&self) -> RouteEvaluator<'_> {
        RouteEvaluator::new(&self.graph, self.depot, self.capacity)
    }

    /// Runs greedy construction only.
    pub fn construct(&self) -> Solution {
        greedy_insertion(&self.services, &self.evaluator())
    }

    /// Runs the full pipeline.
    pub fn solve(&self) -> SolveReport {
        let start = Instant::now();
        let deadline = start.checked_add(self.config.search.time_limit);
        let evaluator = self.evaluator();

        let mut solution = self.construct();
        let initial_cost = solution.total_cost();
        tracing::info!(
            instance = %self.name,
            routes = solution.num_routes(),
            unserved = solution.num_unserved(),
            cost = initial_cost,
            "initial solution constructed"
        );

        let mut engine = LocalSearchEngine::new(evaluator, self.config.search);
        if let Some(deadline) = deadline {
            engine = engine.with_deadline(deadline);
        }
        let outcome = engine.run(&mut solution);

        let mut vns_iterations = None;
        if let Some(vns) = &self.config.vns {
            let mut problem = CarpVnsProblem::new(&self.services, evaluator, self.config.search)
                .with_start(solution.clone());
            if let Some(deadline) = deadline {
                problem = problem.with_deadline(deadline);
            }
            let result = VnsRunner::run(&problem, vns);
            vns_iterations = Some(result.iterations);
            if result.best_cost < problem.cost(&solution) {
                tracing::info!(
                    before = solution.total_cost(),
                    after = result.best.total_cost(),
                    iterations = result.iterations,
                    "VNS improved the local optimum"
                );
                solution = result.best;
            }
        }

        let final_cost = solution.total_cost();
        let unserved = solution.unserved();
        if !unserved.is_empty() {
            tracing::warn!(count = unserved.len(), "solution leaves services unserved");
        }

        SolveReport {
            name: self.name.clone(),
            solution,
            initial_cost,
            final_cost,
            unserved,
            termination: outcome.termination,
            iterations: outcome.iterations,
            vns_iterations,
            elapsed: start.elapsed(),
        }
    }
}

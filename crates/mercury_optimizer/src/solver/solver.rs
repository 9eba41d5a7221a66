use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    error::SolveError,
    problem::routing_problem::RoutingProblem,
    solver::{
        construction::construct_solution,
        deadline::{Clock, Deadline, SystemClock},
        extract::{SolutionSummary, extract_solution},
        ls::local_search::GuidedLocalSearch,
        solver_params::SolverParams,
    },
};

#[derive(Copy, Clone, Debug, Serialize)]
pub enum SolverStatus {
    Pending,
    Running,
    Completed,
}

/// One solve of one problem instance: construction, guided local search
/// within the configured budget, and extraction of the best solution.
pub struct Solver {
    problem: Arc<RoutingProblem>,
    params: SolverParams,
    status: RwLock<SolverStatus>,
}

impl Solver {
    pub fn new(problem: RoutingProblem, params: SolverParams) -> Self {
        Solver {
            problem: Arc::new(problem),
            params,
            status: RwLock::new(SolverStatus::Pending),
        }
    }

    pub fn status(&self) -> SolverStatus {
        *self.status.read()
    }

    pub fn problem(&self) -> &RoutingProblem {
        &self.problem
    }

    pub fn solve(&self) -> Result<SolutionSummary, SolveError> {
        self.solve_with_clock(&SystemClock)
    }

    /// Like [`Solver::solve`], but with an injected time source so tests
    /// can exercise budget expiry without waiting.
    pub fn solve_with_clock(&self, clock: &dyn Clock) -> Result<SolutionSummary, SolveError> {
        *self.status.write() = SolverStatus::Running;
        let result = self.run_search(clock);
        *self.status.write() = SolverStatus::Completed;

        result
    }

    fn run_search(&self, clock: &dyn Clock) -> Result<SolutionSummary, SolveError> {
        self.check_feasibility()?;

        let initial = construct_solution(&self.problem)?;
        let initial_cost = initial.total_distance();
        debug!(
            customers = self.problem.num_customers(),
            vehicles = self.problem.fleet().len(),
            initial_cost,
            "starting local search"
        );

        let deadline = match self.params.time_budget() {
            Some(budget) => Deadline::new(clock, budget),
            None => Deadline::unbounded(clock),
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.params.search_threads.number_of_threads())
            .build()
            .unwrap();

        let mut search = GuidedLocalSearch::new(&self.problem, &self.params);
        let best = pool.install(|| search.run(initial, &deadline));

        info!(
            initial_cost,
            best_cost = best.total_distance(),
            "search finished"
        );

        Ok(extract_solution(&best))
    }

    /// Cheap infeasibility screens before any search effort is spent.
    fn check_feasibility(&self) -> Result<(), SolveError> {
        let fleet = self.problem.fleet();

        if self.problem.max_demand() > fleet.max_capacity() {
            return Err(SolveError::NoSolution);
        }

        if self.problem.total_demand() > fleet.total_capacity() {
            return Err(SolveError::NoSolution);
        }

        Ok(())
    }
}

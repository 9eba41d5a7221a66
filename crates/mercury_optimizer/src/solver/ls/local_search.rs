use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::debug;

use crate::{
    problem::{routing_problem::RoutingProblem, travel_cost_matrix::Cost},
    solver::{
        deadline::Deadline,
        ls::{
            inter_relocate::InterRelocateOperator,
            inter_swap::InterSwapOperator,
            r#move::{LocalSearchMove, LocalSearchOperator},
            penalties::ArcPenalties,
            relocate::RelocateOperator,
            two_opt::TwoOptOperator,
        },
        solution::{route_id::RouteIdx, working_solution::WorkingSolution},
        solver_params::{SolverParams, Termination},
    },
};

type RoutePair = (RouteIdx, RouteIdx);

const IMPROVEMENT_EPSILON: f64 = 1e-6;

/// Guided local search over relocate / exchange / 2-opt neighborhoods.
///
/// Moves are scored against the penalized cost `distance + lambda *
/// penalties`; whenever that function reaches a local optimum, the arcs of
/// the current solution with the highest utility get penalized and the
/// search continues. The best solution by *true* distance seen along the
/// way is what gets returned, so the result never regresses below the
/// construction.
pub struct GuidedLocalSearch {
    penalties: ArcPenalties,
    lambda: f64,
    gls_alpha: f64,
    terminations: Vec<Termination>,
    pairs: Vec<RoutePair>,
}

enum Scan {
    Improving(LocalSearchMove),
    LocalOptimum,
    NoMoves,
}

impl GuidedLocalSearch {
    pub fn new(problem: &RoutingProblem, params: &SolverParams) -> Self {
        GuidedLocalSearch {
            penalties: ArcPenalties::new(problem.num_locations(), problem.is_symmetric()),
            lambda: 0.0,
            gls_alpha: params.gls_alpha,
            terminations: params.terminations.clone(),
            pairs: Vec::new(),
        }
    }

    /// Improves `initial` until the budget runs out or the neighborhood is
    /// exhausted, returning the best feasible solution observed.
    pub fn run(&mut self, initial: WorkingSolution, deadline: &Deadline) -> WorkingSolution {
        let mut current = initial;
        let mut best = current.clone();
        let mut best_cost = best.total_distance();

        self.lambda = self.initial_lambda(&best, best_cost);
        self.build_pairs(&current);

        let mut iteration = 0_usize;
        let mut since_improvement = 0_usize;

        loop {
            iteration += 1;

            if self.should_terminate(deadline, iteration, since_improvement) {
                debug!(iteration, best_cost, "local search: budget exhausted");
                break;
            }

            match self.best_move(&current) {
                Scan::Improving(best_move) => {
                    debug!(
                        "Apply {} (d={}) {:?}",
                        best_move.operator_name(),
                        best_move.cost_delta(&current),
                        best_move
                    );

                    best_move.apply(&mut current);

                    let cost = current.total_distance();
                    if cost < best_cost {
                        best_cost = cost;
                        best = current.clone();
                        since_improvement = 0;
                    } else {
                        since_improvement += 1;
                    }
                }
                Scan::LocalOptimum => {
                    since_improvement += 1;
                    if self.penalties.penalize_highest_utility(&current) == 0 {
                        break;
                    }
                }
                Scan::NoMoves => {
                    debug!(iteration, "local search: neighborhood is empty");
                    break;
                }
            }
        }

        best
    }

    /// Classic GLS calibration: a fraction of the initial objective spread
    /// over the features (arcs) a solution of this size traverses.
    fn initial_lambda(&self, solution: &WorkingSolution, initial_cost: Cost) -> f64 {
        let features =
            solution.problem().num_customers() + solution.non_empty_routes_iter().count();

        self.gls_alpha * initial_cost as f64 / features.max(1) as f64
    }

    fn build_pairs(&mut self, solution: &WorkingSolution) {
        self.pairs.clear();

        for r1 in 0..solution.routes().len() {
            for r2 in 0..solution.routes().len() {
                self.pairs.push((RouteIdx::new(r1), RouteIdx::new(r2)));
            }
        }
    }

    fn should_terminate(
        &self,
        deadline: &Deadline,
        iteration: usize,
        since_improvement: usize,
    ) -> bool {
        if deadline.expired() {
            return true;
        }

        self.terminations.iter().any(|termination| match termination {
            // Wall-clock budgets are realized by the deadline above.
            Termination::Duration(_) => false,
            Termination::Iterations(max) => iteration > *max,
            Termination::IterationsWithoutImprovement(max) => since_improvement >= *max,
        })
    }

    fn augmented_delta(
        &self,
        solution: &WorkingSolution,
        operator: &impl LocalSearchOperator,
    ) -> f64 {
        operator.cost_delta(solution) as f64
            + self.lambda * operator.penalty_delta(solution, &self.penalties)
    }

    /// Scans every route pair in parallel for its best move; acceptance is
    /// serialized here so exactly one move is applied per iteration.
    fn best_move(&self, solution: &WorkingSolution) -> Scan {
        let results = self
            .pairs
            .par_iter()
            .map(|&(r1, r2)| {
                // Best penalized delta for the pair
                let mut best_delta = 0.0_f64;
                let mut best_move: Option<LocalSearchMove> = None;
                let mut candidates = 0_usize;

                RelocateOperator::generate_moves(solution, (r1, r2), |op| {
                    candidates += 1;
                    let delta = self.augmented_delta(solution, &op);
                    if delta < best_delta && op.is_valid(solution) {
                        best_delta = delta;
                        best_move = Some(LocalSearchMove::Relocate(op));
                    }
                });

                InterRelocateOperator::generate_moves(solution, (r1, r2), |op| {
                    candidates += 1;
                    let delta = self.augmented_delta(solution, &op);
                    if delta < best_delta && op.is_valid(solution) {
                        best_delta = delta;
                        best_move = Some(LocalSearchMove::InterRelocate(op));
                    }
                });

                InterSwapOperator::generate_moves(solution, (r1, r2), |op| {
                    candidates += 1;
                    let delta = self.augmented_delta(solution, &op);
                    if delta < best_delta && op.is_valid(solution) {
                        best_delta = delta;
                        best_move = Some(LocalSearchMove::InterSwap(op));
                    }
                });

                TwoOptOperator::generate_moves(solution, (r1, r2), |op| {
                    candidates += 1;
                    let delta = self.augmented_delta(solution, &op);
                    if delta < best_delta && op.is_valid(solution) {
                        best_delta = delta;
                        best_move = Some(LocalSearchMove::TwoOpt(op));
                    }
                });

                (best_delta, best_move, candidates)
            })
            .collect::<Vec<_>>();

        let mut total_candidates = 0_usize;
        let mut best_delta = -IMPROVEMENT_EPSILON;
        let mut best_move = None;

        for (delta, candidate, candidates) in results {
            total_candidates += candidates;
            if let Some(candidate) = candidate
                && delta < best_delta
            {
                best_delta = delta;
                best_move = Some(candidate);
            }
        }

        match best_move {
            Some(best_move) => Scan::Improving(best_move),
            None if total_candidates == 0 => Scan::NoMoves,
            None => Scan::LocalOptimum,
        }
    }
}

use crate::{
    problem::{location::LocationIdx, travel_cost_matrix::Cost},
    solver::{
        ls::{
            inter_relocate::InterRelocateOperator, inter_swap::InterSwapOperator,
            penalties::ArcPenalties, relocate::RelocateOperator, two_opt::TwoOptOperator,
        },
        solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    },
};

/// A per-arc weight used for move evaluation: the travel cost when scoring
/// true distance, the penalty count when scoring the guided term.
pub type ArcWeight<'a> = dyn Fn(LocationIdx, LocationIdx) -> f64 + 'a;

pub trait LocalSearchOperator: Sized {
    /// Enumerates every candidate move of this kind for the given route
    /// pair, feeding each to `consumer`.
    fn generate_moves<C>(solution: &WorkingSolution, pair: (RouteIdx, RouteIdx), consumer: C)
    where
        C: FnMut(Self);

    /// Signed change of the summed arc weight if the move were applied.
    fn arc_delta(&self, solution: &WorkingSolution, arc: &ArcWeight) -> f64;

    fn is_valid(&self, solution: &WorkingSolution) -> bool;
    fn apply(&self, solution: &mut WorkingSolution);
    fn updated_routes(&self) -> Vec<RouteIdx>;

    fn cost_delta(&self, solution: &WorkingSolution) -> Cost {
        let problem = solution.problem();
        self.arc_delta(solution, &|from, to| problem.travel_cost(from, to) as f64)
            .round() as Cost
    }

    fn penalty_delta(&self, solution: &WorkingSolution, penalties: &ArcPenalties) -> f64 {
        self.arc_delta(solution, &|from, to| penalties.count(from, to) as f64)
    }
}

#[derive(Debug)]
pub enum LocalSearchMove {
    /// Moves a customer to another position within its route.
    Relocate(RelocateOperator),
    /// Moves a customer from one route to another.
    InterRelocate(InterRelocateOperator),
    /// Exchanges two customers between different routes.
    InterSwap(InterSwapOperator),
    /// Reverses a contiguous segment within a route.
    TwoOpt(TwoOptOperator),
}

impl LocalSearchMove {
    pub fn operator_name(&self) -> &'static str {
        match self {
            LocalSearchMove::Relocate { .. } => "Relocate",
            LocalSearchMove::InterRelocate { .. } => "Inter-Relocate",
            LocalSearchMove::InterSwap { .. } => "Inter-Swap",
            LocalSearchMove::TwoOpt { .. } => "Two-Opt",
        }
    }

    pub fn cost_delta(&self, solution: &WorkingSolution) -> Cost {
        match self {
            LocalSearchMove::Relocate(op) => op.cost_delta(solution),
            LocalSearchMove::InterRelocate(op) => op.cost_delta(solution),
            LocalSearchMove::InterSwap(op) => op.cost_delta(solution),
            LocalSearchMove::TwoOpt(op) => op.cost_delta(solution),
        }
    }

    pub fn penalty_delta(&self, solution: &WorkingSolution, penalties: &ArcPenalties) -> f64 {
        match self {
            LocalSearchMove::Relocate(op) => op.penalty_delta(solution, penalties),
            LocalSearchMove::InterRelocate(op) => op.penalty_delta(solution, penalties),
            LocalSearchMove::InterSwap(op) => op.penalty_delta(solution, penalties),
            LocalSearchMove::TwoOpt(op) => op.penalty_delta(solution, penalties),
        }
    }

    pub fn is_valid(&self, solution: &WorkingSolution) -> bool {
        match self {
            LocalSearchMove::Relocate(op) => op.is_valid(solution),
            LocalSearchMove::InterRelocate(op) => op.is_valid(solution),
            LocalSearchMove::InterSwap(op) => op.is_valid(solution),
            LocalSearchMove::TwoOpt(op) => op.is_valid(solution),
        }
    }

    pub fn apply(&self, solution: &mut WorkingSolution) {
        match self {
            LocalSearchMove::Relocate(op) => op.apply(solution),
            LocalSearchMove::InterRelocate(op) => op.apply(solution),
            LocalSearchMove::InterSwap(op) => op.apply(solution),
            LocalSearchMove::TwoOpt(op) => op.apply(solution),
        }
    }

    pub fn updated_routes(&self) -> Vec<RouteIdx> {
        match self {
            LocalSearchMove::Relocate(op) => op.updated_routes(),
            LocalSearchMove::InterRelocate(op) => op.updated_routes(),
            LocalSearchMove::InterSwap(op) => op.updated_routes(),
            LocalSearchMove::TwoOpt(op) => op.updated_routes(),
        }
    }
}

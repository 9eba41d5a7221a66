use crate::solver::{
    ls::r#move::{ArcWeight, LocalSearchOperator},
    solution::{route_id::RouteIdx, working_solution::WorkingSolution},
};

/// **Intra-Route 2-Opt**
///
/// Reverses the sequence of customers between `from` and `to` (inclusive).
/// This eliminates crossing edges within a single route.
///
/// ```text
/// BEFORE:
///    ... (prev) --x--> [from] -> ... -> [to] --x--> (next) ...
///
/// AFTER (Sequence Reversed):
///    ... (prev) -----> [to] -> ... -> [from] -----> (next) ...
///
/// Edges Removed: (prev->from), (to->next)
/// Edges Added:   (prev->to),   (from->next)
/// ```
#[derive(Debug)]
pub struct TwoOptOperator {
    params: TwoOptParams,
}

#[derive(Debug)]
pub struct TwoOptParams {
    pub route_id: RouteIdx,
    pub from: usize,
    pub to: usize,
}

impl TwoOptOperator {
    pub fn new(params: TwoOptParams) -> Self {
        if params.from >= params.to {
            panic!("TwoOpt: cannot have from >= to");
        }

        TwoOptOperator { params }
    }

    /// With symmetric arcs only the two boundary edges change.
    fn symmetric_delta(&self, solution: &WorkingSolution, arc: &ArcWeight) -> f64 {
        let problem = solution.problem();
        let route = solution.route(self.params.route_id);

        let prev = route.previous_location_id(problem, self.params.from);
        let from = route.location_id(self.params.from);
        let to = route.location_id(self.params.to);
        let next = route.next_location_id(problem, self.params.to);

        arc(prev, to) + arc(from, next) - arc(prev, from) - arc(to, next)
    }

    /// With asymmetric arcs every edge inside the segment flips direction.
    fn asymmetric_delta(&self, solution: &WorkingSolution, arc: &ArcWeight) -> f64 {
        let route = solution.route(self.params.route_id);

        let mut delta = self.symmetric_delta(solution, arc);

        for position in self.params.from..self.params.to {
            let a = route.location_id(position);
            let b = route.location_id(position + 1);
            delta += arc(b, a) - arc(a, b);
        }

        delta
    }
}

impl LocalSearchOperator for TwoOptOperator {
    fn generate_moves<C>(solution: &WorkingSolution, (r1, r2): (RouteIdx, RouteIdx), mut consumer: C)
    where
        C: FnMut(Self),
    {
        if r1 != r2 {
            return;
        }

        let route = solution.route(r1);
        if route.len() < 2 {
            return;
        }

        for from in 0..route.len() - 1 {
            for to in (from + 1)..route.len() {
                consumer(TwoOptOperator::new(TwoOptParams {
                    route_id: r1,
                    from,
                    to,
                }));
            }
        }
    }

    fn arc_delta(&self, solution: &WorkingSolution, arc: &ArcWeight) -> f64 {
        if solution.problem().is_symmetric() {
            self.symmetric_delta(solution, arc)
        } else {
            self.asymmetric_delta(solution, arc)
        }
    }

    fn is_valid(&self, _solution: &WorkingSolution) -> bool {
        // Reversal leaves the route load untouched.
        true
    }

    fn apply(&self, solution: &mut WorkingSolution) {
        solution
            .route_mut(self.params.route_id)
            .reverse_segment(self.params.from, self.params.to);
    }

    fn updated_routes(&self) -> Vec<RouteIdx> {
        vec![self.params.route_id]
    }
}

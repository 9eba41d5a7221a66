use crate::solver::{
    ls::r#move::{ArcWeight, LocalSearchOperator},
    solution::{route_id::RouteIdx, working_solution::WorkingSolution},
};

/// **Intra-Route Relocate**
///
/// Removes the customer at `from` and reinserts it at `to`, where `to`
/// indexes the route after the removal.
///
/// ```text
/// BEFORE:
///    ... (A) -> [from] -> (B) -> ... -> (X) -> (Y) ...
///
/// AFTER:
///    ... (A) -> (B) -> ... -> (X) -> [from] -> (Y) ...
/// ```
#[derive(Debug)]
pub struct RelocateOperator {
    params: RelocateParams,
}

#[derive(Debug)]
pub struct RelocateParams {
    pub route_id: RouteIdx,
    pub from: usize,
    pub to: usize,
}

impl RelocateOperator {
    pub fn new(params: RelocateParams) -> Self {
        if params.from == params.to {
            panic!("Relocate: from == to is a no-op");
        }

        RelocateOperator { params }
    }
}

impl LocalSearchOperator for RelocateOperator {
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

        for from in 0..route.len() {
            for to in 0..route.len() {
                if to == from {
                    continue;
                }

                consumer(RelocateOperator::new(RelocateParams {
                    route_id: r1,
                    from,
                    to,
                }));
            }
        }
    }

    fn arc_delta(&self, solution: &WorkingSolution, arc: &ArcWeight) -> f64 {
        let problem = solution.problem();
        let route = solution.route(self.params.route_id);

        let node = route.location_id(self.params.from);
        let a = route.previous_location_id(problem, self.params.from);
        let b = route.next_location_id(problem, self.params.from);

        // Insertion neighbors in the route as it looks after the removal.
        let (x, y) = if self.params.to < self.params.from {
            (
                route.previous_location_id(problem, self.params.to),
                route.location_id(self.params.to),
            )
        } else {
            (
                route.location_id(self.params.to),
                route.next_location_id(problem, self.params.to),
            )
        };

        arc(a, b) + arc(x, node) + arc(node, y) - arc(a, node) - arc(node, b) - arc(x, y)
    }

    fn is_valid(&self, _solution: &WorkingSolution) -> bool {
        // The route load does not change.
        true
    }

    fn apply(&self, solution: &mut WorkingSolution) {
        let problem = solution.problem_arc();
        let route = solution.route_mut(self.params.route_id);
        let node = route.remove(&problem, self.params.from);
        route.insert(&problem, self.params.to, node);
    }

    fn updated_routes(&self) -> Vec<RouteIdx> {
        vec![self.params.route_id]
    }
}

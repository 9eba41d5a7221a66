use crate::solver::{
    ls::r#move::{ArcWeight, LocalSearchOperator},
    solution::{route_id::RouteIdx, working_solution::WorkingSolution},
};

/// **Inter-Route Relocate**
///
/// Moves the customer at `from` in `from_route_id` to position `to` in
/// `to_route_id`. The workhorse for load balancing between vehicles.
///
/// ```text
/// BEFORE:
///    R1: ... (A) -> [from] -> (B) ...
///    R2: ... (X) -> (Y) ...
///
/// AFTER:
///    R1: ... (A) -> (B) ...
///    R2: ... (X) -> [from] -> (Y) ...
/// ```
#[derive(Debug)]
pub struct InterRelocateOperator {
    params: InterRelocateParams,
}

#[derive(Debug)]
pub struct InterRelocateParams {
    pub from_route_id: RouteIdx,
    pub to_route_id: RouteIdx,
    pub from: usize,
    pub to: usize,
}

impl InterRelocateOperator {
    pub fn new(params: InterRelocateParams) -> Self {
        if params.from_route_id == params.to_route_id {
            panic!("InterRelocate: cannot be used for intra-route relocation");
        }

        Self { params }
    }
}

impl LocalSearchOperator for InterRelocateOperator {
    fn generate_moves<C>(solution: &WorkingSolution, (r1, r2): (RouteIdx, RouteIdx), mut consumer: C)
    where
        C: FnMut(Self),
    {
        if r1 == r2 {
            return;
        }

        let from_route = solution.route(r1);
        let to_route = solution.route(r2);

        for from in 0..from_route.len() {
            for to in 0..=to_route.len() {
                consumer(InterRelocateOperator::new(InterRelocateParams {
                    from_route_id: r1,
                    to_route_id: r2,
                    from,
                    to,
                }));
            }
        }
    }

    fn arc_delta(&self, solution: &WorkingSolution, arc: &ArcWeight) -> f64 {
        let problem = solution.problem();
        let r1 = solution.route(self.params.from_route_id);
        let r2 = solution.route(self.params.to_route_id);

        let node = r1.location_id(self.params.from);
        let a = r1.previous_location_id(problem, self.params.from);
        let b = r1.next_location_id(problem, self.params.from);

        let x = if self.params.to == 0 {
            problem.depot()
        } else {
            r2.location_id(self.params.to - 1)
        };
        let y = if self.params.to == r2.len() {
            problem.depot()
        } else {
            r2.location_id(self.params.to)
        };

        arc(a, b) + arc(x, node) + arc(node, y) - arc(a, node) - arc(node, b) - arc(x, y)
    }

    fn is_valid(&self, solution: &WorkingSolution) -> bool {
        let problem = solution.problem();
        let from_route = solution.route(self.params.from_route_id);
        let to_route = solution.route(self.params.to_route_id);

        let node = from_route.location_id(self.params.from);
        to_route.fits(problem, problem.demand(node))
    }

    fn apply(&self, solution: &mut WorkingSolution) {
        let problem = solution.problem_arc();
        let node = solution
            .route_mut(self.params.from_route_id)
            .remove(&problem, self.params.from);
        solution
            .route_mut(self.params.to_route_id)
            .insert(&problem, self.params.to, node);
    }

    fn updated_routes(&self) -> Vec<RouteIdx> {
        vec![self.params.from_route_id, self.params.to_route_id]
    }
}

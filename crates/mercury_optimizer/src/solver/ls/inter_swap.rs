use crate::solver::{
    ls::r#move::{ArcWeight, LocalSearchOperator},
    solution::{route_id::RouteIdx, working_solution::WorkingSolution},
};

/// **Inter-Route Swap**
///
/// Exchanges the customer at `first` in `first_route_id` with the customer
/// at `second` in `second_route_id`.
///
/// ```text
/// BEFORE:
///    R1: ... (A) -> [n1] -> (B) ...
///    R2: ... (X) -> [n2] -> (Y) ...
///
/// AFTER:
///    R1: ... (A) -> [n2] -> (B) ...
///    R2: ... (X) -> [n1] -> (Y) ...
/// ```
#[derive(Debug)]
pub struct InterSwapOperator {
    params: InterSwapParams,
}

#[derive(Debug)]
pub struct InterSwapParams {
    pub first_route_id: RouteIdx,
    pub second_route_id: RouteIdx,
    pub first: usize,
    pub second: usize,
}

impl InterSwapOperator {
    pub fn new(params: InterSwapParams) -> Self {
        if params.first_route_id == params.second_route_id {
            panic!("InterSwap: cannot be used within a single route");
        }

        Self { params }
    }
}

impl LocalSearchOperator for InterSwapOperator {
    fn generate_moves<C>(solution: &WorkingSolution, (r1, r2): (RouteIdx, RouteIdx), mut consumer: C)
    where
        C: FnMut(Self),
    {
        // Swaps are symmetric in the route pair; only generate them once.
        if r1 >= r2 {
            return;
        }

        let first_route = solution.route(r1);
        let second_route = solution.route(r2);

        for first in 0..first_route.len() {
            for second in 0..second_route.len() {
                consumer(InterSwapOperator::new(InterSwapParams {
                    first_route_id: r1,
                    second_route_id: r2,
                    first,
                    second,
                }));
            }
        }
    }

    fn arc_delta(&self, solution: &WorkingSolution, arc: &ArcWeight) -> f64 {
        let problem = solution.problem();
        let r1 = solution.route(self.params.first_route_id);
        let r2 = solution.route(self.params.second_route_id);

        let n1 = r1.location_id(self.params.first);
        let a = r1.previous_location_id(problem, self.params.first);
        let b = r1.next_location_id(problem, self.params.first);

        let n2 = r2.location_id(self.params.second);
        let x = r2.previous_location_id(problem, self.params.second);
        let y = r2.next_location_id(problem, self.params.second);

        arc(a, n2) + arc(n2, b) + arc(x, n1) + arc(n1, y)
            - arc(a, n1)
            - arc(n1, b)
            - arc(x, n2)
            - arc(n2, y)
    }

    fn is_valid(&self, solution: &WorkingSolution) -> bool {
        let problem = solution.problem();
        let r1 = solution.route(self.params.first_route_id);
        let r2 = solution.route(self.params.second_route_id);

        let d1 = problem.demand(r1.location_id(self.params.first));
        let d2 = problem.demand(r2.location_id(self.params.second));

        r1.fits_exchanged(problem, d1, d2) && r2.fits_exchanged(problem, d2, d1)
    }

    fn apply(&self, solution: &mut WorkingSolution) {
        let problem = solution.problem_arc();
        let n1 = solution
            .route(self.params.first_route_id)
            .location_id(self.params.first);
        let n2 = solution
            .route(self.params.second_route_id)
            .location_id(self.params.second);

        solution
            .route_mut(self.params.first_route_id)
            .replace(&problem, self.params.first, n2);
        solution
            .route_mut(self.params.second_route_id)
            .replace(&problem, self.params.second, n1);
    }

    fn updated_routes(&self) -> Vec<RouteIdx> {
        vec![self.params.first_route_id, self.params.second_route_id]
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_utils;

    #[test]
    fn test_inter_swap_delta_matches_applied_distance() {
        let problem = Arc::new(test_utils::create_test_problem(
            vec![(0.0, 0.0), (5.0, 0.0), (0.0, 5.0), (4.0, 0.0), (0.0, 4.0)],
            vec![0.0, 1.0, 1.0, 1.0, 1.0],
            vec![10.0, 10.0],
        ));

        // Customers 1 and 3 lie on the x axis, 2 and 4 on the y axis, but
        // the routes mix the two clusters.
        let mut solution =
            test_utils::create_test_solution(&problem, vec![vec![1, 4], vec![2, 3]]);

        let operator = InterSwapOperator::new(InterSwapParams {
            first_route_id: RouteIdx::new(0),
            second_route_id: RouteIdx::new(1),
            first: 1,
            second: 1,
        });

        assert!(operator.is_valid(&solution));

        let before = solution.total_distance();
        let delta = operator.cost_delta(&solution);
        assert!(delta < 0);

        operator.apply(&mut solution);
        assert_eq!(solution.total_distance(), before + delta);

        let first: Vec<usize> = solution
            .route(RouteIdx::new(0))
            .customers()
            .iter()
            .map(|id| id.get())
            .collect();
        let second: Vec<usize> = solution
            .route(RouteIdx::new(1))
            .customers()
            .iter()
            .map(|id| id.get())
            .collect();
        assert_eq!(first, vec![1, 3]);
        assert_eq!(second, vec![2, 4]);
    }

    #[test]
    fn test_inter_swap_respects_both_capacities() {
        let problem = Arc::new(test_utils::create_test_problem(
            vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)],
            vec![0.0, 8.0, 2.0, 4.0],
            vec![10.0, 5.0],
        ));

        let solution = test_utils::create_test_solution(&problem, vec![vec![1, 2], vec![3]]);

        // Swapping 8.0 onto the 5.0-capacity vehicle must be rejected.
        let operator = InterSwapOperator::new(InterSwapParams {
            first_route_id: RouteIdx::new(0),
            second_route_id: RouteIdx::new(1),
            first: 0,
            second: 0,
        });
        assert!(!operator.is_valid(&solution));

        // Swapping the 2.0 customer is fine for both.
        let operator = InterSwapOperator::new(InterSwapParams {
            first_route_id: RouteIdx::new(0),
            second_route_id: RouteIdx::new(1),
            first: 1,
            second: 0,
        });
        assert!(operator.is_valid(&solution));
    }
}

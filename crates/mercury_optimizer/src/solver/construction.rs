use std::sync::Arc;

use tracing::debug;

use crate::{
    error::SolveError,
    problem::{location::LocationIdx, routing_problem::RoutingProblem, travel_cost_matrix::Cost},
    solver::solution::{route::SolutionRoute, route_id::RouteIdx, working_solution::WorkingSolution},
};

/// Marginal cost of appending `node` to the end of `route`.
fn extension_cost(problem: &RoutingProblem, route: &SolutionRoute, node: LocationIdx) -> Cost {
    let depot = problem.depot();
    let tail = if route.is_empty() {
        depot
    } else {
        route.location_id(route.len() - 1)
    };

    problem.travel_cost(tail, node) + problem.travel_cost(node, depot)
        - problem.travel_cost(tail, depot)
}

/// Path-cheapest-arc construction: repeatedly extend whichever route can
/// absorb an unrouted customer at the least marginal cost. Ties break on
/// the lowest candidate node index, then the lowest route index.
fn extend_cheapest_arc(solution: &mut WorkingSolution) -> bool {
    let problem = solution.problem_arc();

    while solution.has_unassigned() {
        let mut best: Option<(LocationIdx, RouteIdx, Cost)> = None;

        for node in solution.unassigned_sorted() {
            let demand = problem.demand(node);

            for (route_id, route) in solution.routes().iter().enumerate() {
                if !route.fits(&problem, demand) {
                    continue;
                }

                let cost = extension_cost(&problem, route, node);
                if best.is_none_or(|(_, _, best_cost)| cost < best_cost) {
                    best = Some((node, RouteIdx::new(route_id), cost));
                }
            }
        }

        let Some((node, route_id, _)) = best else {
            return false;
        };

        solution.push(route_id, node);
    }

    true
}

/// Fallback for tightly packed instances: place customers in decreasing
/// demand order, each on its cheapest feasible route.
fn extend_demand_first(solution: &mut WorkingSolution) -> bool {
    let problem = solution.problem_arc();

    let mut customers = solution.unassigned_sorted();
    customers.sort_by(|&a, &b| {
        problem
            .demand(b)
            .total_cmp(&problem.demand(a))
            .then(a.cmp(&b))
    });

    for node in customers {
        let demand = problem.demand(node);
        let mut best: Option<(RouteIdx, Cost)> = None;

        for (route_id, route) in solution.routes().iter().enumerate() {
            if !route.fits(&problem, demand) {
                continue;
            }

            let cost = extension_cost(&problem, route, node);
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((RouteIdx::new(route_id), cost));
            }
        }

        let Some((route_id, _)) = best else {
            return false;
        };

        solution.push(route_id, node);
    }

    true
}

/// Builds one feasible initial solution, or reports that none could be
/// constructed within the fleet's capacities.
pub fn construct_solution(problem: &Arc<RoutingProblem>) -> Result<WorkingSolution, SolveError> {
    let mut solution = WorkingSolution::new(Arc::clone(problem));

    if extend_cheapest_arc(&mut solution) {
        debug!(
            distance = solution.total_distance(),
            "construction: cheapest-arc extension placed all customers"
        );
        return Ok(solution);
    }

    debug!("construction: cheapest-arc extension dead-ended, retrying in demand order");

    solution.clear();
    if extend_demand_first(&mut solution) {
        debug!(
            distance = solution.total_distance(),
            "construction: demand-first extension placed all customers"
        );
        return Ok(solution);
    }

    Err(SolveError::NoSolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn test_single_vehicle_visits_in_increasing_distance_order() {
        let problem = Arc::new(test_utils::create_test_problem(
            vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)],
            vec![0.0, 5.0, 5.0],
            vec![10.0],
        ));

        let solution = construct_solution(&problem).unwrap();

        let order: Vec<usize> = solution
            .route(RouteIdx::new(0))
            .customers()
            .iter()
            .map(|id| id.get())
            .collect();
        assert_eq!(order, vec![1, 2]);
        assert_eq!(solution.total_distance(), 4000);
        assert!(solution.is_feasible());
    }

    #[test]
    fn test_capacity_forces_second_route() {
        let problem = Arc::new(test_utils::create_test_problem(
            vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)],
            vec![0.0, 6.0, 6.0],
            vec![10.0, 10.0],
        ));

        let solution = construct_solution(&problem).unwrap();

        assert!(solution.is_feasible());
        assert_eq!(solution.non_empty_routes_iter().count(), 2);
    }

    #[test]
    fn test_tight_packing_uses_demand_fallback() {
        // Only feasible split is {2, 3} + {2, 3}. Nearest-first packs the
        // three clustered customers onto one vehicle and dead-ends on the
        // far one; the demand-ordered fallback has to finish the job.
        let problem = Arc::new(test_utils::create_test_problem(
            vec![(0.0, 0.0), (1.0, 0.0), (1.1, 0.0), (1.2, 0.0), (5.0, 0.0)],
            vec![0.0, 2.0, 2.0, 3.0, 3.0],
            vec![5.0, 5.0],
        ));

        let solution = construct_solution(&problem).unwrap();

        assert!(solution.is_feasible());
        for route in solution.non_empty_routes_iter() {
            assert!(route.is_load_within_capacity(&problem));
        }
    }

    #[test]
    fn test_unservable_demand_reports_no_solution() {
        let problem = Arc::new(test_utils::create_test_problem(
            vec![(0.0, 0.0), (1.0, 0.0)],
            vec![0.0, 20.0],
            vec![10.0],
        ));

        assert!(matches!(
            construct_solution(&problem),
            Err(SolveError::NoSolution)
        ));
    }

    #[test]
    fn test_construction_is_deterministic() {
        let problem = Arc::new(test_utils::create_test_problem(
            vec![
                (0.0, 0.0),
                (4.0, 1.0),
                (1.0, 3.0),
                (2.0, 2.0),
                (5.0, 5.0),
                (1.0, 1.0),
            ],
            vec![0.0, 2.0, 3.0, 4.0, 1.0, 2.0],
            vec![7.0, 7.0],
        ));

        let first = construct_solution(&problem).unwrap();
        let second = construct_solution(&problem).unwrap();

        assert_eq!(first.total_distance(), second.total_distance());
        for (a, b) in first.routes().iter().zip(second.routes()) {
            assert_eq!(a.customers(), b.customers());
        }
    }
}

use std::sync::Arc;

use fxhash::FxHashSet;

use crate::{
    problem::{location::LocationIdx, routing_problem::RoutingProblem, travel_cost_matrix::Cost},
    solver::solution::{route::SolutionRoute, route_id::RouteIdx},
};

/// The mutable route assignment the search works on: one route per vehicle
/// (possibly empty) plus the set of customers not yet routed.
#[derive(Clone)]
pub struct WorkingSolution {
    problem: Arc<RoutingProblem>,
    routes: Vec<SolutionRoute>,
    unassigned: FxHashSet<LocationIdx>,
}

impl WorkingSolution {
    pub fn new(problem: Arc<RoutingProblem>) -> Self {
        let routes = (0..problem.fleet().len())
            .map(|vehicle_id| SolutionRoute::empty(vehicle_id.into()))
            .collect();
        let unassigned = problem.customers().collect();

        WorkingSolution {
            problem,
            routes,
            unassigned,
        }
    }

    pub fn problem(&self) -> &RoutingProblem {
        self.problem.as_ref()
    }

    pub fn problem_arc(&self) -> Arc<RoutingProblem> {
        Arc::clone(&self.problem)
    }

    pub fn routes(&self) -> &[SolutionRoute] {
        &self.routes
    }

    pub fn route(&self, route_id: RouteIdx) -> &SolutionRoute {
        &self.routes[route_id]
    }

    pub fn route_mut(&mut self, route_id: RouteIdx) -> &mut SolutionRoute {
        &mut self.routes[route_id]
    }

    pub fn non_empty_routes_iter(&self) -> impl Iterator<Item = &SolutionRoute> {
        self.routes.iter().filter(|route| !route.is_empty())
    }

    pub fn has_unassigned(&self) -> bool {
        !self.unassigned.is_empty()
    }

    /// Unrouted customers in ascending index order, so iteration order is
    /// reproducible.
    pub fn unassigned_sorted(&self) -> Vec<LocationIdx> {
        let mut unassigned: Vec<LocationIdx> = self.unassigned.iter().copied().collect();
        unassigned.sort_unstable();
        unassigned
    }

    pub fn push(&mut self, route_id: RouteIdx, node: LocationIdx) {
        let problem = Arc::clone(&self.problem);
        self.routes[route_id].push(&problem, node);
        self.unassigned.remove(&node);
    }

    /// Drops every route assignment, marking all customers unassigned again.
    pub fn clear(&mut self) {
        for route in &mut self.routes {
            *route = SolutionRoute::empty(route.vehicle_id());
        }
        self.unassigned = self.problem.customers().collect();
    }

    pub fn total_distance(&self) -> Cost {
        self.routes
            .iter()
            .map(|route| route.distance(&self.problem))
            .sum()
    }

    /// True when every route load fits its vehicle and every customer is
    /// routed exactly once.
    pub fn is_feasible(&self) -> bool {
        if self.has_unassigned() {
            return false;
        }

        let mut seen = FxHashSet::default();
        for route in &self.routes {
            if !route.is_load_within_capacity(&self.problem) {
                return false;
            }

            for &node in route.customers() {
                if !seen.insert(node) {
                    return false;
                }
            }
        }

        seen.len() == self.problem.num_customers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn test_new_solution_has_all_customers_unassigned() {
        let problem = Arc::new(test_utils::create_test_problem(
            vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)],
            vec![0.0, 5.0, 5.0],
            vec![10.0, 10.0],
        ));

        let solution = WorkingSolution::new(problem);

        assert!(solution.has_unassigned());
        assert_eq!(solution.routes().len(), 2);
        assert_eq!(
            solution
                .unassigned_sorted()
                .iter()
                .map(|id| id.get())
                .collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_insert_assigns_customer() {
        let problem = Arc::new(test_utils::create_test_problem(
            vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)],
            vec![0.0, 5.0, 5.0],
            vec![10.0],
        ));

        let mut solution = WorkingSolution::new(problem);
        solution.push(RouteIdx::new(0), LocationIdx::new(1));
        solution.push(RouteIdx::new(0), LocationIdx::new(2));

        assert!(!solution.has_unassigned());
        assert!(solution.is_feasible());
        assert_eq!(solution.total_distance(), 4000);
    }

    #[test]
    fn test_feasibility_detects_overload() {
        let problem = Arc::new(test_utils::create_test_problem(
            vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)],
            vec![0.0, 6.0, 6.0],
            vec![10.0],
        ));

        let mut solution = WorkingSolution::new(problem);
        solution.push(RouteIdx::new(0), LocationIdx::new(1));
        solution.push(RouteIdx::new(0), LocationIdx::new(2));

        assert!(!solution.is_feasible());
    }
}

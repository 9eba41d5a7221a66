use serde::Serialize;

use crate::{
    problem::{
        location::LocationIdx,
        routing_problem::Demand,
        travel_cost_matrix::Cost,
        vehicle::VehicleIdx,
    },
    solver::solution::working_solution::WorkingSolution,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolutionStatus {
    Optimal,
    Feasible,
}

/// One vehicle's share of the result: the depot-bracketed stop sequence,
/// its travel distance and the demand it serves.
#[derive(Clone, Debug, Serialize)]
pub struct RouteSummary {
    pub vehicle_id: VehicleIdx,
    pub stops: Vec<LocationIdx>,
    pub distance: Cost,
    pub demand_served: Demand,
}

#[derive(Clone, Debug, Serialize)]
pub struct SolutionSummary {
    pub routes: Vec<RouteSummary>,
    pub total_distance: Cost,
    pub status: SolutionStatus,
}

/// Converts the internal route representation into the external result
/// shape. Vehicles that never left the depot are omitted.
pub fn extract_solution(solution: &WorkingSolution) -> SolutionSummary {
    let problem = solution.problem();
    let depot = problem.depot();

    let mut routes = Vec::new();
    let mut total_distance = 0;

    for route in solution.routes() {
        if route.is_empty() {
            continue;
        }

        let mut stops = Vec::with_capacity(route.len() + 2);
        stops.push(depot);
        stops.extend_from_slice(route.customers());
        stops.push(depot);

        let distance = route.distance(problem);
        total_distance += distance;

        routes.push(RouteSummary {
            vehicle_id: route.vehicle_id(),
            stops,
            distance,
            demand_served: route.load(),
        });
    }

    // The reference convention: a strictly positive objective is labeled
    // OPTIMAL. It is a quality hint, not an optimality certificate.
    let status = if total_distance > 0 {
        SolutionStatus::Optimal
    } else {
        SolutionStatus::Feasible
    };

    SolutionSummary {
        routes,
        total_distance,
        status,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_utils;

    #[test]
    fn test_routes_are_depot_bracketed() {
        let problem = Arc::new(test_utils::create_test_problem(
            vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)],
            vec![0.0, 5.0, 5.0],
            vec![10.0, 10.0],
        ));

        let solution = test_utils::create_test_solution(&problem, vec![vec![1, 2]]);
        let summary = extract_solution(&solution);

        assert_eq!(summary.routes.len(), 1);

        let route = &summary.routes[0];
        let stops: Vec<usize> = route.stops.iter().map(|id| id.get()).collect();
        assert_eq!(stops, vec![0, 1, 2, 0]);
        assert_eq!(route.distance, 4000);
        assert_eq!(route.demand_served, 10.0);
        assert_eq!(summary.total_distance, 4000);
        assert_eq!(summary.status, SolutionStatus::Optimal);
    }

    #[test]
    fn test_empty_vehicles_are_omitted() {
        let problem = Arc::new(test_utils::create_test_problem(
            vec![(0.0, 0.0), (1.0, 0.0)],
            vec![0.0, 5.0],
            vec![10.0, 10.0, 10.0],
        ));

        let solution = test_utils::create_test_solution(&problem, vec![vec![], vec![1]]);
        let summary = extract_solution(&solution);

        assert_eq!(summary.routes.len(), 1);
        assert_eq!(summary.routes[0].vehicle_id.get(), 1);
    }

    #[test]
    fn test_demand_served_excludes_depot() {
        let problem = Arc::new(test_utils::create_test_problem(
            vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)],
            vec![0.0, 3.0, 4.0],
            vec![10.0],
        ));

        let solution = test_utils::create_test_solution(&problem, vec![vec![1, 2]]);
        let summary = extract_solution(&solution);

        assert_eq!(summary.routes[0].demand_served, 7.0);
    }
}

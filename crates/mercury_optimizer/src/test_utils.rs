use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use parking_lot::Mutex;

use crate::{
    problem::{
        fleet::Fleet,
        location::{Location, LocationIdx},
        routing_problem::{Demand, RoutingProblem, RoutingProblemBuilder},
        travel_cost_matrix::{Cost, TravelCostMatrix},
        vehicle::Vehicle,
    },
    solver::{
        deadline::Clock,
        solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    },
};

pub fn create_locations(coordinates: Vec<(f64, f64)>) -> Vec<Location> {
    coordinates
        .iter()
        .map(|&(x, y)| Location::from_cartesian(x, y))
        .collect()
}

/// Location 0 is the depot; demands align with the coordinate list.
pub fn create_test_problem(
    coordinates: Vec<(f64, f64)>,
    demands: Vec<Demand>,
    capacities: Vec<f64>,
) -> RoutingProblem {
    let mut builder = RoutingProblemBuilder::default();
    builder.set_locations(create_locations(coordinates));
    builder.set_demands(demands);
    builder.set_fleet(Fleet::new(
        capacities.into_iter().map(Vehicle::new).collect(),
    ));

    builder.build().unwrap()
}

/// A problem with an explicit (possibly asymmetric) cost matrix; the
/// coordinates are dummies.
pub fn create_test_problem_with_costs(
    demands: Vec<Demand>,
    capacities: Vec<f64>,
    costs: Vec<Vec<Cost>>,
) -> RoutingProblem {
    let coordinates = (0..demands.len()).map(|i| (i as f64, 0.0)).collect();

    let mut builder = RoutingProblemBuilder::default();
    builder.set_locations(create_locations(coordinates));
    builder.set_demands(demands);
    builder.set_fleet(Fleet::new(
        capacities.into_iter().map(Vehicle::new).collect(),
    ));
    builder.set_travel_costs(TravelCostMatrix::from_costs(costs).unwrap());

    builder.build().unwrap()
}

/// Builds a working solution with the given customer order per route.
pub fn create_test_solution(
    problem: &Arc<RoutingProblem>,
    routes: Vec<Vec<usize>>,
) -> WorkingSolution {
    let mut solution = WorkingSolution::new(Arc::clone(problem));

    for (route_id, customers) in routes.iter().enumerate() {
        for &customer in customers {
            solution.push(RouteIdx::new(route_id), LocationIdx::new(customer));
        }
    }

    solution
}

/// A clock that only moves when told to, for deadline tests.
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl Default for ManualClock {
    fn default() -> Self {
        ManualClock {
            now: Mutex::new(Timestamp::UNIX_EPOCH),
        }
    }
}

impl ManualClock {
    pub fn advance(&self, duration: SignedDuration) {
        let mut now = self.now.lock();
        *now += duration;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}

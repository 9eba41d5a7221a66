use crate::problem::{
    location::LocationIdx,
    routing_problem::{Demand, RoutingProblem},
    travel_cost_matrix::Cost,
    vehicle::{Vehicle, VehicleIdx},
};

/// Slack allowed when comparing accumulated f64 loads against capacities.
const CAPACITY_EPSILON: f64 = 1e-9;

/// One vehicle's ordered customer visits. The depot is implicit at both
/// ends and never appears in `customers`.
#[derive(Clone)]
pub struct SolutionRoute {
    vehicle_id: VehicleIdx,
    customers: Vec<LocationIdx>,
    load: Demand,
}

impl SolutionRoute {
    pub fn empty(vehicle_id: VehicleIdx) -> Self {
        SolutionRoute {
            vehicle_id,
            customers: Vec::new(),
            load: 0.0,
        }
    }

    pub fn vehicle_id(&self) -> VehicleIdx {
        self.vehicle_id
    }

    pub fn vehicle<'a>(&self, problem: &'a RoutingProblem) -> &'a Vehicle {
        problem.vehicle(self.vehicle_id)
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn customers(&self) -> &[LocationIdx] {
        &self.customers
    }

    #[inline]
    pub fn location_id(&self, position: usize) -> LocationIdx {
        self.customers[position]
    }

    /// The location visited before `position`; the depot for the first stop.
    #[inline]
    pub fn previous_location_id(&self, problem: &RoutingProblem, position: usize) -> LocationIdx {
        if position == 0 {
            problem.depot()
        } else {
            self.customers[position - 1]
        }
    }

    /// The location visited after `position`; the depot for the last stop.
    #[inline]
    pub fn next_location_id(&self, problem: &RoutingProblem, position: usize) -> LocationIdx {
        if position + 1 >= self.customers.len() {
            problem.depot()
        } else {
            self.customers[position + 1]
        }
    }

    /// Cumulative demand of the customers on this route.
    pub fn load(&self) -> Demand {
        self.load
    }

    pub fn fits(&self, problem: &RoutingProblem, additional_demand: Demand) -> bool {
        self.load + additional_demand <= self.vehicle(problem).capacity() + CAPACITY_EPSILON
    }

    /// Whether the load stays within capacity after removing `removed`
    /// demand and adding `added` demand.
    pub fn fits_exchanged(&self, problem: &RoutingProblem, removed: Demand, added: Demand) -> bool {
        self.load - removed + added <= self.vehicle(problem).capacity() + CAPACITY_EPSILON
    }

    pub fn is_load_within_capacity(&self, problem: &RoutingProblem) -> bool {
        self.load <= self.vehicle(problem).capacity() + CAPACITY_EPSILON
    }

    pub fn insert(&mut self, problem: &RoutingProblem, position: usize, node: LocationIdx) {
        self.customers.insert(position, node);
        self.load += problem.demand(node);
    }

    pub fn push(&mut self, problem: &RoutingProblem, node: LocationIdx) {
        self.customers.push(node);
        self.load += problem.demand(node);
    }

    pub fn remove(&mut self, problem: &RoutingProblem, position: usize) -> LocationIdx {
        let node = self.customers.remove(position);
        self.load -= problem.demand(node);
        node
    }

    /// Swaps the customer at `position` for `node`, returning the old one.
    pub fn replace(
        &mut self,
        problem: &RoutingProblem,
        position: usize,
        node: LocationIdx,
    ) -> LocationIdx {
        let old = std::mem::replace(&mut self.customers[position], node);
        self.load += problem.demand(node) - problem.demand(old);
        old
    }

    /// Reverses the visiting order of `customers[from..=to]`. The load is
    /// unaffected.
    pub fn reverse_segment(&mut self, from: usize, to: usize) {
        self.customers[from..=to].reverse();
    }

    /// Total travel cost of the route, including the closing arc back to
    /// the depot. Empty routes cost nothing.
    pub fn distance(&self, problem: &RoutingProblem) -> Cost {
        if self.customers.is_empty() {
            return 0;
        }

        let depot = problem.depot();
        let mut distance = problem.travel_cost(depot, self.customers[0]);

        for pair in self.customers.windows(2) {
            distance += problem.travel_cost(pair[0], pair[1]);
        }

        distance += problem.travel_cost(self.customers[self.customers.len() - 1], depot);

        distance
    }
}

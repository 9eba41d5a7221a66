use crate::{
    error::SolveError,
    problem::{
        fleet::Fleet,
        location::{Location, LocationIdx},
        travel_cost_matrix::{Cost, TravelCostMatrix},
        vehicle::{Vehicle, VehicleIdx},
    },
};

pub type Demand = f64;

/// A normalized CVRP instance: locations, depot, per-node demands, fleet
/// capacities and the travel cost matrix. Immutable once built.
pub struct RoutingProblem {
    locations: Vec<Location>,
    depot: LocationIdx,
    demands: Vec<Demand>,
    fleet: Fleet,
    travel_costs: TravelCostMatrix,
}

impl RoutingProblem {
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location(&self, location_id: LocationIdx) -> &Location {
        &self.locations[location_id]
    }

    pub fn num_locations(&self) -> usize {
        self.locations.len()
    }

    pub fn depot(&self) -> LocationIdx {
        self.depot
    }

    #[inline]
    pub fn demand(&self, location_id: LocationIdx) -> Demand {
        self.demands[location_id.get()]
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn vehicle(&self, vehicle_id: VehicleIdx) -> &Vehicle {
        self.fleet.vehicle(vehicle_id)
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        self.fleet.vehicles()
    }

    #[inline(always)]
    pub fn travel_cost(&self, from: LocationIdx, to: LocationIdx) -> Cost {
        self.travel_costs.travel_cost(from, to)
    }

    pub fn travel_costs(&self) -> &TravelCostMatrix {
        &self.travel_costs
    }

    pub fn is_symmetric(&self) -> bool {
        self.travel_costs.is_symmetric()
    }

    /// Every location index except the depot, in ascending order.
    pub fn customers(&self) -> impl Iterator<Item = LocationIdx> + '_ {
        (0..self.locations.len())
            .map(LocationIdx::new)
            .filter(move |&id| id != self.depot)
    }

    pub fn num_customers(&self) -> usize {
        self.locations.len() - 1
    }

    pub fn total_demand(&self) -> Demand {
        self.customers().map(|id| self.demand(id)).sum()
    }

    pub fn max_demand(&self) -> Demand {
        self.customers()
            .map(|id| self.demand(id))
            .fold(0.0_f64, f64::max)
    }
}

#[derive(Default)]
pub struct RoutingProblemBuilder {
    locations: Option<Vec<Location>>,
    depot: Option<LocationIdx>,
    demands: Option<Vec<Demand>>,
    fleet: Option<Fleet>,
    travel_costs: Option<TravelCostMatrix>,
}

impl RoutingProblemBuilder {
    pub fn set_locations(&mut self, locations: Vec<Location>) -> &mut RoutingProblemBuilder {
        self.locations = Some(locations);
        self
    }

    pub fn set_depot(&mut self, depot: LocationIdx) -> &mut RoutingProblemBuilder {
        self.depot = Some(depot);
        self
    }

    pub fn set_demands(&mut self, demands: Vec<Demand>) -> &mut RoutingProblemBuilder {
        self.demands = Some(demands);
        self
    }

    pub fn set_fleet(&mut self, fleet: Fleet) -> &mut RoutingProblemBuilder {
        self.fleet = Some(fleet);
        self
    }

    /// Overrides the geometrically derived matrix with a precomputed one.
    pub fn set_travel_costs(&mut self, travel_costs: TravelCostMatrix) -> &mut RoutingProblemBuilder {
        self.travel_costs = Some(travel_costs);
        self
    }

    pub fn build(self) -> Result<RoutingProblem, SolveError> {
        let locations = self
            .locations
            .ok_or_else(|| SolveError::InvalidProblem("no locations given".to_owned()))?;

        if locations.len() < 2 {
            return Err(SolveError::InvalidProblem(
                "no delivery locations given".to_owned(),
            ));
        }

        let depot = self.depot.unwrap_or(LocationIdx::new(0));
        if depot.get() >= locations.len() {
            return Err(SolveError::InvalidProblem(format!(
                "depot index {depot} out of range for {} locations",
                locations.len()
            )));
        }

        let mut demands = self
            .demands
            .ok_or_else(|| SolveError::InvalidProblem("no demands given".to_owned()))?;

        if demands.len() != locations.len() {
            return Err(SolveError::InvalidProblem(format!(
                "{} demands given for {} locations",
                demands.len(),
                locations.len()
            )));
        }

        if demands.iter().any(|&demand| demand < 0.0) {
            return Err(SolveError::InvalidProblem(
                "demands must be non-negative".to_owned(),
            ));
        }

        // The depot never carries demand, whatever the caller supplied.
        demands[depot.get()] = 0.0;

        let fleet = self
            .fleet
            .ok_or_else(|| SolveError::InvalidProblem("no vehicles given".to_owned()))?;

        if fleet.is_empty() {
            return Err(SolveError::InvalidProblem("no vehicles given".to_owned()));
        }

        if fleet
            .vehicles()
            .iter()
            .any(|vehicle| vehicle.capacity() < 0.0)
        {
            return Err(SolveError::InvalidProblem(
                "vehicle capacities must be non-negative".to_owned(),
            ));
        }

        let travel_costs = self
            .travel_costs
            .unwrap_or_else(|| TravelCostMatrix::from_euclidean(&locations));

        if travel_costs.num_locations() != locations.len() {
            return Err(SolveError::InvalidProblem(format!(
                "cost matrix covers {} locations, problem has {}",
                travel_costs.num_locations(),
                locations.len()
            )));
        }

        Ok(RoutingProblem {
            locations,
            depot,
            demands,
            fleet,
            travel_costs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn test_depot_demand_is_forced_to_zero() {
        let locations = test_utils::create_locations(vec![(0.0, 0.0), (1.0, 0.0)]);

        let mut builder = RoutingProblemBuilder::default();
        builder.set_locations(locations);
        builder.set_demands(vec![42.0, 5.0]);
        builder.set_fleet(Fleet::new(vec![Vehicle::new(10.0)]));
        let problem = builder.build().unwrap();

        assert_eq!(problem.demand(LocationIdx::new(0)), 0.0);
        assert_eq!(problem.demand(LocationIdx::new(1)), 5.0);
    }

    #[test]
    fn test_rejects_depot_out_of_range() {
        let locations = test_utils::create_locations(vec![(0.0, 0.0), (1.0, 0.0)]);

        let mut builder = RoutingProblemBuilder::default();
        builder.set_locations(locations);
        builder.set_depot(LocationIdx::new(7));
        builder.set_demands(vec![0.0, 5.0]);
        builder.set_fleet(Fleet::new(vec![Vehicle::new(10.0)]));

        assert!(matches!(
            builder.build(),
            Err(SolveError::InvalidProblem(_))
        ));
    }

    #[test]
    fn test_rejects_missing_customers() {
        let locations = test_utils::create_locations(vec![(0.0, 0.0)]);

        let mut builder = RoutingProblemBuilder::default();
        builder.set_locations(locations);
        builder.set_demands(vec![0.0]);
        builder.set_fleet(Fleet::new(vec![Vehicle::new(10.0)]));

        assert!(matches!(
            builder.build(),
            Err(SolveError::InvalidProblem(_))
        ));
    }

    #[test]
    fn test_rejects_negative_demand() {
        let locations = test_utils::create_locations(vec![(0.0, 0.0), (1.0, 0.0)]);

        let mut builder = RoutingProblemBuilder::default();
        builder.set_locations(locations);
        builder.set_demands(vec![0.0, -1.0]);
        builder.set_fleet(Fleet::new(vec![Vehicle::new(10.0)]));

        assert!(matches!(
            builder.build(),
            Err(SolveError::InvalidProblem(_))
        ));
    }

    #[test]
    fn test_rejects_empty_fleet() {
        let locations = test_utils::create_locations(vec![(0.0, 0.0), (1.0, 0.0)]);

        let mut builder = RoutingProblemBuilder::default();
        builder.set_locations(locations);
        builder.set_demands(vec![0.0, 5.0]);
        builder.set_fleet(Fleet::new(vec![]));

        assert!(matches!(
            builder.build(),
            Err(SolveError::InvalidProblem(_))
        ));
    }

    #[test]
    fn test_customers_excludes_depot() {
        let problem = test_utils::create_test_problem(
            vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)],
            vec![0.0, 5.0, 5.0],
            vec![10.0],
        );

        let customers: Vec<usize> = problem.customers().map(|id| id.get()).collect();
        assert_eq!(customers, vec![1, 2]);
        assert_eq!(problem.total_demand(), 10.0);
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::SolveError,
    problem::{
        fleet::Fleet,
        location::Location,
        routing_problem::{RoutingProblem, RoutingProblemBuilder},
        travel_cost_matrix::Cost,
        vehicle::Vehicle,
    },
    solver::extract::SolutionStatus,
};

/// The request shape owned by the marshaling boundary: depot coordinates,
/// orders and per-vehicle capacities.
#[derive(Deserialize)]
#[serde(rename = "SolveRequest")]
pub struct JsonSolveRequest {
    pub warehouse: Option<[f64; 2]>,
    #[serde(default)]
    pub orders: Vec<JsonOrder>,
    #[serde(default)]
    pub staff_capacities: Vec<f64>,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct JsonOrder {
    pub id: String,
    pub location: [f64; 2],
    pub demand: f64,
}

impl JsonSolveRequest {
    pub fn warehouse_location(&self) -> [f64; 2] {
        self.warehouse.unwrap_or([0.0, 0.0])
    }

    /// Normalizes the request into a problem instance: the warehouse is
    /// location 0 with zero demand, orders follow in request order.
    pub fn build_problem(&self) -> Result<RoutingProblem, SolveError> {
        if self.orders.is_empty() {
            return Err(SolveError::MissingData("orders"));
        }

        if self.staff_capacities.is_empty() {
            return Err(SolveError::MissingData("staff_capacities"));
        }

        let warehouse = self.warehouse_location();

        let mut locations = Vec::with_capacity(self.orders.len() + 1);
        let mut demands = Vec::with_capacity(self.orders.len() + 1);

        locations.push(Location::from_cartesian(warehouse[0], warehouse[1]));
        demands.push(0.0);

        for order in &self.orders {
            locations.push(Location::from_cartesian(order.location[0], order.location[1]));
            demands.push(order.demand);
        }

        let vehicles = self
            .staff_capacities
            .iter()
            .map(|&capacity| Vehicle::new(capacity))
            .collect();

        let mut builder = RoutingProblemBuilder::default();
        builder.set_locations(locations);
        builder.set_demands(demands);
        builder.set_fleet(Fleet::new(vehicles));
        builder.build()
    }
}

/// The response is always a well-formed object, success or not.
#[derive(Serialize)]
#[serde(untagged)]
pub enum JsonSolveResponse {
    Solution(JsonSolution),
    Error { error: String },
}

#[derive(Serialize)]
pub struct JsonSolution {
    pub status: SolutionStatus,
    pub total_distance: Cost,
    pub routes: BTreeMap<String, JsonRoute>,
}

#[derive(Serialize)]
pub struct JsonRoute {
    pub route: Vec<JsonRouteStop>,
    pub distance: Cost,
    pub demand_served: f64,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonRouteStop {
    Warehouse {
        location: [f64; 2],
    },
    Order {
        #[serde(rename = "orderId")]
        order_id: String,
        location: [f64; 2],
        demand: f64,
    },
}

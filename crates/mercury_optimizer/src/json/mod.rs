pub mod types;

use std::collections::BTreeMap;

use crate::{
    error::SolveError,
    json::types::{JsonRoute, JsonRouteStop, JsonSolution, JsonSolveRequest, JsonSolveResponse},
    solver::{extract::SolutionSummary, solver::Solver, solver_params::SolverParams},
};

/// Runs one solve for a marshaled request. Every failure becomes a
/// structured `{"error": ...}` object; nothing propagates past here.
pub fn solve(request: &JsonSolveRequest, params: SolverParams) -> JsonSolveResponse {
    match run_solve(request, params) {
        Ok(solution) => JsonSolveResponse::Solution(solution),
        Err(error) => JsonSolveResponse::Error {
            error: error.to_string(),
        },
    }
}

fn run_solve(
    request: &JsonSolveRequest,
    params: SolverParams,
) -> Result<JsonSolution, SolveError> {
    let problem = request.build_problem()?;
    let solver = Solver::new(problem, params);
    let summary = solver.solve()?;

    Ok(format_solution(request, &summary))
}

/// Maps internal node indices back to the request's order identifiers.
fn format_solution(request: &JsonSolveRequest, summary: &SolutionSummary) -> JsonSolution {
    let warehouse = request.warehouse_location();

    let mut routes = BTreeMap::new();

    for route in &summary.routes {
        let stops = route
            .stops
            .iter()
            .map(|stop| {
                if stop.get() == 0 {
                    JsonRouteStop::Warehouse {
                        location: warehouse,
                    }
                } else {
                    let order = &request.orders[stop.get() - 1];
                    JsonRouteStop::Order {
                        order_id: order.id.clone(),
                        location: order.location,
                        demand: order.demand,
                    }
                }
            })
            .collect();

        routes.insert(
            format!("vehicle_{}", route.vehicle_id),
            JsonRoute {
                route: stops,
                distance: route.distance,
                demand_served: route.demand_served,
            },
        );
    }

    JsonSolution {
        status: summary.status,
        total_distance: summary.total_distance,
        routes,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        json::types::JsonOrder,
        solver::solver_params::Termination,
    };

    fn test_params() -> SolverParams {
        SolverParams {
            terminations: vec![Termination::IterationsWithoutImprovement(100)],
            ..SolverParams::default()
        }
    }

    fn order(id: &str, location: [f64; 2], demand: f64) -> JsonOrder {
        JsonOrder {
            id: id.to_owned(),
            location,
            demand,
        }
    }

    #[test]
    fn test_solve_formats_routes_with_order_ids() {
        let request = JsonSolveRequest {
            warehouse: Some([0.0, 0.0]),
            orders: vec![
                order("near", [1.0, 0.0], 5.0),
                order("far", [2.0, 0.0], 5.0),
            ],
            staff_capacities: vec![10.0],
        };

        let response = solve(&request, test_params());
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["status"], "OPTIMAL");
        assert_eq!(value["total_distance"], 4000);

        let route = &value["routes"]["vehicle_0"];
        assert_eq!(route["distance"], 4000);
        assert_eq!(route["demand_served"], 10.0);
        assert_eq!(
            route["route"],
            json!([
                { "type": "warehouse", "location": [0.0, 0.0] },
                { "type": "order", "orderId": "near", "location": [1.0, 0.0], "demand": 5.0 },
                { "type": "order", "orderId": "far", "location": [2.0, 0.0], "demand": 5.0 },
                { "type": "warehouse", "location": [0.0, 0.0] },
            ])
        );
    }

    #[test]
    fn test_missing_orders_is_reported_without_solving() {
        let request = JsonSolveRequest {
            warehouse: None,
            orders: vec![],
            staff_capacities: vec![10.0],
        };

        let response = solve(&request, test_params());
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["error"], "Missing required data: orders");
    }

    #[test]
    fn test_missing_capacities_is_reported() {
        let request = JsonSolveRequest {
            warehouse: None,
            orders: vec![order("a", [1.0, 1.0], 1.0)],
            staff_capacities: vec![],
        };

        let response = solve(&request, test_params());
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["error"], "Missing required data: staff_capacities");
    }

    #[test]
    fn test_oversized_order_reports_no_solution() {
        let request = JsonSolveRequest {
            warehouse: Some([0.0, 0.0]),
            orders: vec![order("heavy", [1.0, 0.0], 20.0)],
            staff_capacities: vec![10.0],
        };

        let response = solve(&request, test_params());
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["error"], "No solution found");
    }

    #[test]
    fn test_warehouse_defaults_to_origin() {
        let request = JsonSolveRequest {
            warehouse: None,
            orders: vec![order("a", [3.0, 4.0], 1.0)],
            staff_capacities: vec![5.0],
        };

        let response = solve(&request, test_params());
        let value = serde_json::to_value(&response).unwrap();

        let route = &value["routes"]["vehicle_0"]["route"];
        assert_eq!(route[0]["location"], json!([0.0, 0.0]));
        // depot -> (3,4) -> depot at scale 1000
        assert_eq!(value["total_distance"], 10000);
    }

    #[test]
    fn test_request_parses_from_wire_shape() {
        let raw = r#"{
            "warehouse": [1.0, 2.0],
            "orders": [
                { "id": "abc", "location": [3.0, 4.0], "demand": 2.5 }
            ],
            "staff_capacities": [4.0, 6.0]
        }"#;

        let request: JsonSolveRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.warehouse_location(), [1.0, 2.0]);
        assert_eq!(request.orders.len(), 1);
        assert_eq!(request.orders[0].demand, 2.5);
        assert_eq!(request.staff_capacities, vec![4.0, 6.0]);
    }

    #[test]
    fn test_every_order_appears_exactly_once() {
        let request = JsonSolveRequest {
            warehouse: Some([0.0, 0.0]),
            orders: vec![
                order("a", [1.0, 1.0], 2.0),
                order("b", [2.0, 1.0], 2.0),
                order("c", [1.0, 2.0], 2.0),
                order("d", [3.0, 3.0], 2.0),
            ],
            staff_capacities: vec![5.0, 5.0],
        };

        let response = solve(&request, test_params());
        let value = serde_json::to_value(&response).unwrap();

        let mut seen = Vec::new();
        for (_, route) in value["routes"].as_object().unwrap() {
            for stop in route["route"].as_array().unwrap() {
                if stop["type"] == "order" {
                    seen.push(stop["orderId"].as_str().unwrap().to_owned());
                }
            }
        }
        seen.sort();

        assert_eq!(seen, vec!["a", "b", "c", "d"]);
    }
}

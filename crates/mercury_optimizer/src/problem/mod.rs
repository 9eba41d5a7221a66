pub mod fleet;
pub mod location;
pub mod routing_problem;
pub mod travel_cost_matrix;
pub mod vehicle;

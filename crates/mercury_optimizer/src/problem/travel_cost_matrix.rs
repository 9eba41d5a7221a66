use crate::error::SolveError;
use crate::problem::location::{Location, LocationIdx};

pub type Cost = i64;

/// Metric distances are multiplied by this factor and rounded, so the search
/// accumulates route costs in exact integer arithmetic.
pub const DISTANCE_SCALE: f64 = 1000.0;

/// Complete pairwise travel costs between locations.
///
/// The matrix uses a flat structure; to find the index for a pair of
/// locations, use the formula `index = from * num_locations + to`.
pub struct TravelCostMatrix {
    costs: Vec<Cost>,
    num_locations: usize,
    is_symmetric: bool,
}

fn is_flat_matrix_symmetric(matrix: &[Cost], num_locations: usize) -> bool {
    for i in 0..num_locations {
        for j in 0..num_locations {
            if matrix[i * num_locations + j] != matrix[j * num_locations + i] {
                return false;
            }
        }
    }
    true
}

impl TravelCostMatrix {
    pub fn from_euclidean(locations: &[Location]) -> Self {
        let num_locations = locations.len();
        let mut costs: Vec<Cost> = vec![0; num_locations * num_locations];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                if i != j {
                    costs[i * num_locations + j] =
                        (from.euclidean_distance(to) * DISTANCE_SCALE).round() as Cost;
                }
            }
        }

        TravelCostMatrix {
            costs,
            num_locations,
            is_symmetric: true,
        }
    }

    /// Accepts a caller-supplied square matrix (road-network costs or
    /// otherwise), bypassing the geometric derivation.
    pub fn from_costs(costs: Vec<Vec<Cost>>) -> Result<Self, SolveError> {
        let num_locations = costs.len();

        for row in &costs {
            if row.len() != num_locations {
                return Err(SolveError::InvalidProblem(
                    "cost matrix must be square".to_owned(),
                ));
            }

            if row.iter().any(|&cost| cost < 0) {
                return Err(SolveError::InvalidProblem(
                    "cost matrix entries must be non-negative".to_owned(),
                ));
            }
        }

        let costs: Vec<Cost> = costs.into_iter().flatten().collect();
        let is_symmetric = is_flat_matrix_symmetric(&costs, num_locations);

        Ok(TravelCostMatrix {
            costs,
            num_locations,
            is_symmetric,
        })
    }

    #[inline(always)]
    fn index(&self, from: LocationIdx, to: LocationIdx) -> usize {
        from.get() * self.num_locations + to.get()
    }

    #[inline(always)]
    pub fn travel_cost(&self, from: LocationIdx, to: LocationIdx) -> Cost {
        if from == to {
            return 0;
        }

        self.costs[self.index(from, to)]
    }

    pub fn max_cost(&self) -> Cost {
        self.costs.iter().copied().max().unwrap_or(0)
    }

    pub fn is_symmetric(&self) -> bool {
        self.is_symmetric
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }
}

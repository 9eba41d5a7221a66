use crate::{
    problem::location::LocationIdx,
    solver::solution::working_solution::WorkingSolution,
};

/// Per-arc penalty counts for guided local search, stored row-major like
/// the travel cost matrix. Owned by one search run and discarded with it.
///
/// When the cost matrix is symmetric the counts are mirrored so that a
/// penalty on (i, j) also discourages (j, i).
pub struct ArcPenalties {
    counts: Vec<u32>,
    num_locations: usize,
    mirror: bool,
}

impl ArcPenalties {
    pub fn new(num_locations: usize, mirror: bool) -> Self {
        ArcPenalties {
            counts: vec![0; num_locations * num_locations],
            num_locations,
            mirror,
        }
    }

    #[inline(always)]
    fn index(&self, from: LocationIdx, to: LocationIdx) -> usize {
        from.get() * self.num_locations + to.get()
    }

    #[inline(always)]
    pub fn count(&self, from: LocationIdx, to: LocationIdx) -> u32 {
        self.counts[self.index(from, to)]
    }

    fn increment(&mut self, from: LocationIdx, to: LocationIdx) {
        let index = self.index(from, to);
        self.counts[index] = self.counts[index].saturating_add(1);

        if self.mirror && from != to {
            let index = self.index(to, from);
            self.counts[index] = self.counts[index].saturating_add(1);
        }
    }

    /// The guided-local-search escape step: among the arcs traversed by
    /// `solution`, raise the penalty of every arc whose utility
    /// `cost / (1 + count)` is maximal. Returns how many arcs were
    /// penalized.
    pub fn penalize_highest_utility(&mut self, solution: &WorkingSolution) -> usize {
        let problem = solution.problem();

        let mut max_utility = 0.0_f64;
        for (from, to) in solution_arcs(solution) {
            let utility = problem.travel_cost(from, to) as f64
                / (1.0 + self.count(from, to) as f64);
            if utility > max_utility {
                max_utility = utility;
            }
        }

        if max_utility <= 0.0 {
            return 0;
        }

        let targets: Vec<(LocationIdx, LocationIdx)> = solution_arcs(solution)
            .filter(|&(from, to)| {
                let utility = problem.travel_cost(from, to) as f64
                    / (1.0 + self.count(from, to) as f64);
                utility == max_utility
            })
            .collect();

        for &(from, to) in &targets {
            self.increment(from, to);
        }

        targets.len()
    }
}

/// Directed arcs traversed by the solution, depot arcs included. Each
/// route edge appears exactly once.
fn solution_arcs(
    solution: &WorkingSolution,
) -> impl Iterator<Item = (LocationIdx, LocationIdx)> + '_ {
    let depot = solution.problem().depot();

    solution.non_empty_routes_iter().flat_map(move |route| {
        let customers = route.customers();
        let first = std::iter::once((depot, customers[0]));
        let inner = customers.windows(2).map(|pair| (pair[0], pair[1]));
        let last = std::iter::once((customers[customers.len() - 1], depot));

        first.chain(inner).chain(last)
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        solver::solution::route_id::RouteIdx,
        test_utils,
    };

    #[test]
    fn test_penalizes_longest_arc_first() {
        let problem = Arc::new(test_utils::create_test_problem(
            vec![(0.0, 0.0), (1.0, 0.0), (5.0, 0.0)],
            vec![0.0, 1.0, 1.0],
            vec![10.0],
        ));

        let mut solution =
            crate::solver::solution::working_solution::WorkingSolution::new(Arc::clone(&problem));
        solution.push(RouteIdx::new(0), LocationIdx::new(1));
        solution.push(RouteIdx::new(0), LocationIdx::new(2));

        let mut penalties = ArcPenalties::new(problem.num_locations(), true);
        let penalized = penalties.penalize_highest_utility(&solution);

        // depot -> 1 -> 2 -> depot: the closing arc 2 -> depot (5000) is
        // the unique longest feature.
        assert_eq!(penalized, 1);
        assert_eq!(penalties.count(LocationIdx::new(2), LocationIdx::new(0)), 1);
        // mirrored because the matrix is symmetric
        assert_eq!(penalties.count(LocationIdx::new(0), LocationIdx::new(2)), 1);
        assert_eq!(penalties.count(LocationIdx::new(0), LocationIdx::new(1)), 0);
    }

    #[test]
    fn test_penalty_lowers_utility_of_repeated_arcs() {
        let problem = Arc::new(test_utils::create_test_problem(
            vec![(0.0, 0.0), (1.0, 0.0), (5.0, 0.0)],
            vec![0.0, 1.0, 1.0],
            vec![10.0],
        ));

        let mut solution =
            crate::solver::solution::working_solution::WorkingSolution::new(Arc::clone(&problem));
        solution.push(RouteIdx::new(0), LocationIdx::new(1));
        solution.push(RouteIdx::new(0), LocationIdx::new(2));

        let mut penalties = ArcPenalties::new(problem.num_locations(), true);

        // After enough rounds the 5000-cost arc's utility drops below the
        // 4000-cost arc's and penalization moves on.
        penalties.penalize_highest_utility(&solution);
        penalties.penalize_highest_utility(&solution);

        assert!(penalties.count(LocationIdx::new(1), LocationIdx::new(2)) >= 1);
    }
}

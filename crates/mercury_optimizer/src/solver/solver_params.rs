use jiff::SignedDuration;

#[derive(Clone, Debug)]
pub struct SolverParams {
    pub terminations: Vec<Termination>,

    pub search_threads: Threads,

    /// Scale factor for the guided-local-search penalty weight. Lambda is
    /// derived as `gls_alpha * initial_cost / features` at search start.
    pub gls_alpha: f64,
}

#[derive(Clone, Debug)]
pub enum Termination {
    Duration(SignedDuration),
    Iterations(usize),
    IterationsWithoutImprovement(usize),
}

#[derive(Clone, Debug)]
pub enum Threads {
    Single,
    Auto,
    Multi(usize),
}

impl Threads {
    pub fn number_of_threads(&self) -> usize {
        match self {
            Threads::Single => 1,
            Threads::Multi(num) => *num,
            Threads::Auto => std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            terminations: vec![
                Termination::Duration(SignedDuration::from_secs(30)),
                Termination::Iterations(50000),
                Termination::IterationsWithoutImprovement(1000),
            ],
            search_threads: Threads::Single,
            gls_alpha: 0.3,
        }
    }
}

impl SolverParams {
    /// The tightest configured wall-clock budget, if any.
    pub fn time_budget(&self) -> Option<SignedDuration> {
        self.terminations
            .iter()
            .filter_map(|termination| match termination {
                Termination::Duration(duration) => Some(*duration),
                _ => None,
            })
            .min()
    }
}

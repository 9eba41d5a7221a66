use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolveError {
    #[error("Missing required data: {0}")]
    MissingData(&'static str),
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),
    #[error("No solution found")]
    NoSolution,
}

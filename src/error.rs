use std::time::Duration;

use good_lp::solvers::ResolutionError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{person} has no preference for {key:?}")]
    MissingPreferenceKey { person: String, key: String },

    #[error("no feasible assignment of {people} people into {rooms} rooms")]
    InfeasibleProblem { rooms: usize, people: usize },

    #[error("solver stopped at the time limit of {limit:?} without proving optimality")]
    SolveTimedOut { limit: Duration },

    #[error("solver finished with non-optimal status {status}")]
    NotOptimal { status: String },

    #[error("solver error: {0}")]
    Solver(#[from] ResolutionError),

    #[error("{room} has occupants {existing:?}, cannot assign {attempted:?}")]
    DuplicateRoomAssignment {
        room: String,
        existing: Vec<String>,
        attempted: Vec<String>,
    },

    #[error("{person} already has a roommate assigned")]
    DuplicateRoommateAssignment { person: String },

    #[error("{room} was left without occupants")]
    EmptyRoom { room: String },

    #[error("{person} was not placed in any room")]
    UnplacedPerson { person: String },

    #[error("assigned happiness {actual} does not match solver objective {expected}")]
    ObjectiveMismatch { expected: i64, actual: i64 },

    #[error("person {name} appears more than once")]
    DuplicatePerson { name: String },

    #[error("room {name} appears more than once")]
    DuplicateRoom { name: String },

    #[error("malformed survey: {reason}")]
    MalformedSurvey { reason: String },

    #[error("{person} left {label:?} blank")]
    BlankScore { person: String, label: String },

    #[error("{person} gave {label:?} a non-integer score {value:?}")]
    InvalidScore {
        person: String,
        label: String,
        value: String,
    },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("invalid forced assignment for {room}: {reason}")]
    InvalidForcedAssignment { room: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub mod assignment;
pub mod candidates;
pub mod config;
pub mod error;
pub mod formulation;
pub mod happiness;
pub mod model;
pub mod report;
pub mod survey;

pub use assignment::{Assignment, PersonAssignment, RoomAssignment};
pub use config::{BlankPolicy, Config, ForcedAssignment};
pub use error::{Error, Result};
pub use formulation::SolveOptions;
pub use model::{Person, PreferenceDataset, Room};

use crate::assignment::Materializer;

impl PreferenceDataset {
    /// Assign every person to exactly one room, filling every room with one
    /// or two people, so that total happiness is maximal.
    pub fn solve(&self, options: &SolveOptions) -> Result<Assignment> {
        self.validate()?;

        match (self.rooms.is_empty(), self.people.is_empty()) {
            (true, true) => {
                return Ok(Assignment {
                    objective: 0,
                    rooms: Vec::new(),
                    people: Vec::new(),
                });
            }
            (true, false) | (false, true) => {
                return Err(Error::InfeasibleProblem {
                    rooms: self.rooms.len(),
                    people: self.people.len(),
                });
            }
            (false, false) => {}
        }

        // Enumerate and score every (room, pair) candidate
        let candidates = candidates::generate(self)?;

        // Solve the 0/1 program over the candidates
        let solved = formulation::solve(self, &candidates, options)?;

        // Convert the solver's choice into a validated assignment
        let mut materializer = Materializer::new(self);
        for &index in &solved.chosen {
            materializer.commit(&candidates[index])?;
        }
        let assignment = materializer.finish(solved.objective)?;

        tracing::info!(
            "Assigned {} people to {} rooms with total happiness {}",
            assignment.people.len(),
            assignment.rooms.len(),
            assignment.objective
        );
        Ok(assignment)
    }
}

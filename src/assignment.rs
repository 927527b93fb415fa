use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::candidates::Candidate;
use crate::config::ForcedAssignment;
use crate::error::{Error, Result};
use crate::model::{PersonId, PreferenceDataset, RoomId};

/// Final occupancy of one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAssignment {
    pub room: String,
    pub occupants: Vec<String>,
}

/// Final placement of one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonAssignment {
    pub person: String,
    pub room: String,
    /// `None` for people in single rooms.
    pub roommate: Option<String>,
}

/// Result of one optimization run, built once and never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub objective: i64,
    pub rooms: Vec<RoomAssignment>,
    pub people: Vec<PersonAssignment>,
}

impl Assignment {
    pub fn room(&self, name: &str) -> Option<&RoomAssignment> {
        self.rooms.iter().find(|r| r.room == name)
    }

    pub fn person(&self, name: &str) -> Option<&PersonAssignment> {
        self.people.iter().find(|p| p.person == name)
    }

    /// Append administratively reserved rooms after solving.
    ///
    /// The forced people and rooms must not already be part of the assignment.
    /// The objective is left untouched.
    pub fn with_forced(mut self, forced: &[ForcedAssignment]) -> Result<Self> {
        let mut rooms: BTreeSet<String> = self.rooms.iter().map(|r| r.room.clone()).collect();
        let mut people: BTreeSet<String> =
            self.people.iter().map(|p| p.person.clone()).collect();

        for reserved in forced {
            let invalid = |reason: String| Error::InvalidForcedAssignment {
                room: reserved.room.clone(),
                reason,
            };
            let occupants = &reserved.occupants;
            match occupants.as_slice() {
                [_] => {}
                [a, b] if a != b => {}
                [a, b] if a == b => {
                    return Err(invalid(format!("{a} listed twice")));
                }
                _ => {
                    return Err(invalid(format!(
                        "expected 1 or 2 occupants, got {}",
                        occupants.len()
                    )));
                }
            }
            if !rooms.insert(reserved.room.clone()) {
                return Err(invalid("room is already assigned".to_owned()));
            }
            for occupant in occupants {
                if !people.insert(occupant.clone()) {
                    return Err(invalid(format!("{occupant} is already assigned")));
                }
            }

            for occupant in occupants {
                let roommate = occupants.iter().find(|o| *o != occupant).cloned();
                self.people.push(PersonAssignment {
                    person: occupant.clone(),
                    room: reserved.room.clone(),
                    roommate,
                });
            }
            self.rooms.push(RoomAssignment {
                room: reserved.room.clone(),
                occupants: occupants.clone(),
            });
            tracing::info!("Forced {:?} into {}", occupants, reserved.room);
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Roommate {
    Alone,
    With(PersonId),
}

/// Commits solved candidates one at a time, refusing any second assignment
/// of a room or of a person.
#[derive(Debug)]
pub struct Materializer<'a> {
    dataset: &'a PreferenceDataset,
    occupants: Vec<Option<Vec<PersonId>>>,
    rooms_of: Vec<Option<RoomId>>,
    roommates: Vec<Option<Roommate>>,
    happiness: i64,
}

impl<'a> Materializer<'a> {
    pub fn new(dataset: &'a PreferenceDataset) -> Self {
        Self {
            dataset,
            occupants: vec![None; dataset.rooms.len()],
            rooms_of: vec![None; dataset.people.len()],
            roommates: vec![None; dataset.people.len()],
            happiness: 0,
        }
    }

    pub fn commit(&mut self, candidate: &Candidate) -> Result<()> {
        let people = candidate.occupants();

        if let Some(existing) = &self.occupants[candidate.room.0] {
            return Err(Error::DuplicateRoomAssignment {
                room: self.dataset.room(candidate.room).name.clone(),
                existing: self.names(existing),
                attempted: self.names(&people),
            });
        }
        // A person's room and roommate are recorded together, so this guard
        // also keeps anyone from being placed in a second room.
        for &person in &people {
            if self.roommates[person.0].is_some() {
                return Err(Error::DuplicateRoommateAssignment {
                    person: self.dataset.person(person).name.clone(),
                });
            }
        }

        if candidate.is_single() {
            self.roommates[candidate.first.0] = Some(Roommate::Alone);
        } else {
            self.roommates[candidate.first.0] = Some(Roommate::With(candidate.second));
            self.roommates[candidate.second.0] = Some(Roommate::With(candidate.first));
        }
        for &person in &people {
            self.rooms_of[person.0] = Some(candidate.room);
        }
        tracing::debug!(
            "Committed {:?} to {}",
            self.names(&people),
            self.dataset.room(candidate.room).name
        );
        self.occupants[candidate.room.0] = Some(people);
        self.happiness += candidate.happiness;
        Ok(())
    }

    /// Validate completeness and build the final [`Assignment`].
    ///
    /// `objective` is the solver's objective; the committed happiness must match it.
    pub fn finish(self, objective: i64) -> Result<Assignment> {
        let mut rooms = Vec::with_capacity(self.occupants.len());
        for (room, occupants) in self.dataset.room_ids().zip(&self.occupants) {
            let occupants = occupants.as_ref().ok_or_else(|| Error::EmptyRoom {
                room: self.dataset.room(room).name.clone(),
            })?;
            rooms.push(RoomAssignment {
                room: self.dataset.room(room).name.clone(),
                occupants: self.names(occupants),
            });
        }

        let mut people = Vec::with_capacity(self.rooms_of.len());
        for person in self.dataset.person_ids() {
            let unplaced = || Error::UnplacedPerson {
                person: self.dataset.person(person).name.clone(),
            };
            let room = self.rooms_of[person.0].ok_or_else(unplaced)?;
            let roommate = match self.roommates[person.0].ok_or_else(unplaced)? {
                Roommate::Alone => None,
                Roommate::With(other) => Some(self.dataset.person(other).name.clone()),
            };
            people.push(PersonAssignment {
                person: self.dataset.person(person).name.clone(),
                room: self.dataset.room(room).name.clone(),
                roommate,
            });
        }

        if self.happiness != objective {
            return Err(Error::ObjectiveMismatch {
                expected: objective,
                actual: self.happiness,
            });
        }

        Ok(Assignment {
            objective,
            rooms,
            people,
        })
    }

    fn names(&self, people: &[PersonId]) -> Vec<String> {
        people
            .iter()
            .map(|&p| self.dataset.person(p).name.clone())
            .collect()
    }
}

//! Scores a room shared by a pair of people, or held alone by one person.

use crate::error::Result;
use crate::model::{Person, Room};

/// Happiness `person` reports for living in `room` with `roommate`.
///
/// When `roommate` is `person` itself the room counts as a single and the
/// person's self-entry is used as the roommate score.
pub fn contribution(person: &Person, room: &Room, roommate: &Person) -> Result<i64> {
    let room_label = if person == roommate {
        room.single_label()
    } else {
        room.double_label()
    };
    Ok(person.preference(&room_label)? + person.preference(&roommate.name)?)
}

/// Total happiness of placing `first` and `second` in `room`.
///
/// A self-pair is scored once, a real pair is the sum of both directions.
pub fn score(room: &Room, first: &Person, second: &Person) -> Result<i64> {
    let happiness = contribution(first, room, second)?;
    if first == second {
        return Ok(happiness);
    }
    Ok(happiness + contribution(second, room, first)?)
}

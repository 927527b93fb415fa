use crate::error::Result;
use crate::happiness;
use crate::model::{PersonId, PreferenceDataset, RoomId};

/// A hypothetical occupancy: `room` holds `first` and `second`, or only
/// `first` when both handles are the same person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub room: RoomId,
    pub first: PersonId,
    pub second: PersonId,
    pub happiness: i64,
}

impl Candidate {
    pub fn is_single(&self) -> bool {
        self.first == self.second
    }

    pub fn involves(&self, person: PersonId) -> bool {
        self.first == person || self.second == person
    }

    pub fn occupants(&self) -> Vec<PersonId> {
        if self.is_single() {
            vec![self.first]
        } else {
            vec![self.first, self.second]
        }
    }
}

/// Number of candidates [`generate`] yields for `rooms` rooms and `people` people.
pub fn expected_count(rooms: usize, people: usize) -> usize {
    rooms * people * (people + 1) / 2
}

/// Every room crossed with every unordered pair of people, self-pairs included.
///
/// Pairs are ordered by dataset index so that no pair is produced twice.
pub fn generate(dataset: &PreferenceDataset) -> Result<Vec<Candidate>> {
    let people = dataset.people.len();
    let mut candidates = Vec::with_capacity(expected_count(dataset.rooms.len(), people));

    for room in dataset.room_ids() {
        for i in 0..people {
            for j in i..people {
                let (first, second) = (PersonId(i), PersonId(j));
                let happiness = happiness::score(
                    dataset.room(room),
                    dataset.person(first),
                    dataset.person(second),
                )?;
                candidates.push(Candidate {
                    room,
                    first,
                    second,
                    happiness,
                });
            }
        }
    }

    tracing::debug!(
        "Generated {} candidates for {} rooms and {} people",
        candidates.len(),
        dataset.rooms.len(),
        people
    );
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Person, Room};
    use std::collections::{BTreeMap, BTreeSet};

    fn uniform_dataset(rooms: &[&str], people: &[&str]) -> PreferenceDataset {
        let mut labels: Vec<String> = people.iter().map(|p| p.to_string()).collect();
        for room in rooms {
            labels.push(format!("{room} (single)"));
            labels.push(format!("{room} (double)"));
        }
        let preferences: BTreeMap<String, i64> = labels.into_iter().map(|l| (l, 1)).collect();
        PreferenceDataset::new(
            rooms.iter().map(|r| Room::new(*r)).collect(),
            people
                .iter()
                .map(|p| Person::new(*p, preferences.clone()))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn yields_every_unordered_pair_once_per_room() {
        let dataset = uniform_dataset(&["A", "B", "C"], &["W", "X", "Y", "Z"]);
        let candidates = generate(&dataset).unwrap();
        assert_eq!(candidates.len(), expected_count(3, 4));
        assert_eq!(candidates.len(), 30);

        let distinct: BTreeSet<_> = candidates
            .iter()
            .map(|c| (c.room, c.first, c.second))
            .collect();
        assert_eq!(distinct.len(), candidates.len());
        assert!(candidates.iter().all(|c| c.first <= c.second));
        assert_eq!(candidates.iter().filter(|c| c.is_single()).count(), 3 * 4);
    }

    #[test]
    fn singles_score_once_and_doubles_twice() {
        let dataset = uniform_dataset(&["A"], &["X", "Y"]);
        let candidates = generate(&dataset).unwrap();
        for candidate in &candidates {
            let expected = if candidate.is_single() { 2 } else { 4 };
            assert_eq!(candidate.happiness, expected);
        }
    }

    #[test]
    fn occupants_follow_occupancy_mode() {
        let single = Candidate {
            room: RoomId(0),
            first: PersonId(1),
            second: PersonId(1),
            happiness: 0,
        };
        let double = Candidate {
            second: PersonId(2),
            ..single
        };
        assert_eq!(single.occupants(), vec![PersonId(1)]);
        assert_eq!(double.occupants(), vec![PersonId(1), PersonId(2)]);
        assert!(double.involves(PersonId(2)));
        assert!(!single.involves(PersonId(2)));
    }

    #[test]
    fn empty_inputs_yield_nothing() {
        assert!(generate(&uniform_dataset(&["A"], &[])).unwrap().is_empty());
        assert!(generate(&uniform_dataset(&[], &["X"])).unwrap().is_empty());
    }
}

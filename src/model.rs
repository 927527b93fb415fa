use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::read_to_string;
use std::path::Path;

use crate::config::Config;
use crate::error::{Error, Result};

/// Suffix of the preference label scoring a room as a single.
pub const SINGLE_SUFFIX: &str = " (single)";
/// Suffix of the preference label scoring a room as a double.
pub const DOUBLE_SUFFIX: &str = " (double)";

/// Stable handle of a person: its position in [`PreferenceDataset::people`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PersonId(pub usize);

/// Stable handle of a room: its position in [`PreferenceDataset::rooms`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoomId(pub usize);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    /// Preference label (room label or person name) → score.
    pub preferences: BTreeMap<String, i64>,
}

impl Person {
    pub fn new(name: impl Into<String>, preferences: BTreeMap<String, i64>) -> Self {
        Self {
            name: name.into(),
            preferences,
        }
    }

    pub fn preference(&self, label: &str) -> Result<i64> {
        self.preferences
            .get(label)
            .copied()
            .ok_or_else(|| Error::MissingPreferenceKey {
                person: self.name.clone(),
                key: label.to_owned(),
            })
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Person {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Room {
    pub name: String,
}

impl Room {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn single_label(&self) -> String {
        format!("{}{}", self.name, SINGLE_SUFFIX)
    }

    pub fn double_label(&self) -> String {
        format!("{}{}", self.name, DOUBLE_SUFFIX)
    }
}

/// Rooms and people going into one optimization run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceDataset {
    pub rooms: Vec<Room>,
    pub people: Vec<Person>,
}

impl PreferenceDataset {
    pub fn new(rooms: Vec<Room>, people: Vec<Person>) -> Result<Self> {
        let dataset = Self { rooms, people };
        dataset.validate()?;
        Ok(dataset)
    }

    /// Read a YAML dataset and apply `config` to it.
    pub fn load_yaml(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let buf = read_to_string(path)?;
        Self::from_yaml_str(&buf, config)
    }

    pub fn from_yaml_str(yaml: &str, config: &Config) -> Result<Self> {
        let dataset: Self = serde_yaml::from_str(yaml)?;
        dataset.validate()?;
        Ok(dataset.apply_config(config))
    }

    /// Drop excluded rooms, rooms reserved by forced assignments and the
    /// people those assignments place by hand.
    pub fn apply_config(mut self, config: &Config) -> Self {
        let reserved = config.reserved_rooms();
        let forced = config.forced_people();

        self.rooms.retain(|room| {
            let keep = !reserved.contains(room.name.as_str());
            if !keep {
                tracing::debug!("Excluding room {}", room.name);
            }
            keep
        });
        self.people.retain(|person| {
            let keep = !forced.contains(person.name.as_str());
            if !keep {
                tracing::debug!("Skipping {}, placed by a forced assignment", person.name);
            }
            keep
        });
        self
    }

    /// Rejects duplicate room or person names.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for room in &self.rooms {
            if !seen.insert(room.name.as_str()) {
                return Err(Error::DuplicateRoom {
                    name: room.name.clone(),
                });
            }
        }

        let mut seen = BTreeSet::new();
        for person in &self.people {
            if !seen.insert(person.name.as_str()) {
                return Err(Error::DuplicatePerson {
                    name: person.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id.0]
    }

    pub fn person(&self, id: PersonId) -> &Person {
        &self.people[id.0]
    }

    pub fn room_ids(&self) -> impl Iterator<Item = RoomId> + use<> {
        (0..self.rooms.len()).map(RoomId)
    }

    pub fn person_ids(&self) -> impl Iterator<Item = PersonId> + use<> {
        (0..self.people.len()).map(PersonId)
    }
}

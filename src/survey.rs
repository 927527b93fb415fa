//! Loads a survey export into a [`PreferenceDataset`].
//!
//! The first column holds a timestamp and the second the respondent's name;
//! every further column is a preference label. Labels ending in
//! ` (single)`/` (double)` name rooms, the rest name people.

use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::path::Path;

use crate::config::{BlankPolicy, Config};
use crate::error::{Error, Result};
use crate::model::{DOUBLE_SUFFIX, Person, PreferenceDataset, Room, SINGLE_SUFFIX};

/// Columns before the first preference label.
const LEADING_COLUMNS: usize = 2;

pub fn load_path(path: impl AsRef<Path>, config: &Config) -> Result<PreferenceDataset> {
    let file = File::open(path)?;
    from_reader(file, config)
}

pub fn from_reader<R: io::Read>(reader: R, config: &Config) -> Result<PreferenceDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = reader.headers()?.clone();
    if header.len() <= LEADING_COLUMNS {
        return Err(Error::MalformedSurvey {
            reason: format!("header has {} columns and no preference labels", header.len()),
        });
    }
    let labels: Vec<&str> = header.iter().skip(LEADING_COLUMNS).collect();

    let rooms = rooms_from_labels(&labels);
    let forced_people = config.forced_people();

    let mut people = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1
        let line = row + 2;
        if record.len() != header.len() {
            return Err(Error::MalformedSurvey {
                reason: format!(
                    "line {line} has {} columns, expected {}",
                    record.len(),
                    header.len()
                ),
            });
        }

        let name = record.get(1).unwrap_or_default();
        if name.is_empty() {
            return Err(Error::MalformedSurvey {
                reason: format!("line {line} has no name"),
            });
        }
        if forced_people.contains(name) {
            tracing::debug!("Skipping {name}, placed by a forced assignment");
            continue;
        }

        let preferences = labels
            .iter()
            .zip(record.iter().skip(LEADING_COLUMNS))
            .map(|(label, raw)| -> Result<(String, i64)> {
                Ok((label.to_string(), parse_score(raw, name, label, config)?))
            })
            .collect::<Result<_>>()?;
        people.push(Person::new(name, preferences));
    }

    let dataset = PreferenceDataset::new(rooms, people)?.apply_config(config);
    tracing::info!(
        "Loaded survey with {} rooms and {} people",
        dataset.rooms.len(),
        dataset.people.len()
    );
    Ok(dataset)
}

/// Distinct room names in first-appearance order.
fn rooms_from_labels(labels: &[&str]) -> Vec<Room> {
    let mut seen = BTreeSet::new();
    labels
        .iter()
        .filter_map(|label| {
            label
                .strip_suffix(SINGLE_SUFFIX)
                .or_else(|| label.strip_suffix(DOUBLE_SUFFIX))
        })
        .filter(|name| seen.insert(*name))
        .map(Room::new)
        .collect()
}

/// Parse one survey cell, applying the configured [`BlankPolicy`] to blanks.
pub fn parse_score(raw: &str, person: &str, label: &str, config: &Config) -> Result<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return match config.blank_policy {
            BlankPolicy::Neutral => Ok(config.neutral_score),
            BlankPolicy::Reject => Err(Error::BlankScore {
                person: person.to_owned(),
                label: label.to_owned(),
            }),
        };
    }
    raw.parse().map_err(|_| Error::InvalidScore {
        person: person.to_owned(),
        label: label.to_owned(),
        value: raw.to_owned(),
    })
}

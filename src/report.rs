use serde::Serialize;
use std::io;
use std::path::Path;

use crate::assignment::Assignment;
use crate::error::Result;

#[derive(Serialize)]
struct ReportRow<'a> {
    #[serde(rename = "Room")]
    room: &'a str,
    #[serde(rename = "Occupants")]
    count: usize,
    #[serde(rename = "Occupant 1")]
    first: &'a str,
    #[serde(rename = "Occupant 2")]
    second: &'a str,
}

/// One row per room; the second occupant is blank for singles.
pub fn write_csv<W: io::Write>(assignment: &Assignment, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    for room in &assignment.rooms {
        writer.serialize(ReportRow {
            room: &room.room,
            count: room.occupants.len(),
            first: room.occupants.first().map(String::as_str).unwrap_or_default(),
            second: room.occupants.get(1).map(String::as_str).unwrap_or_default(),
        })?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_csv_path(assignment: &Assignment, path: impl AsRef<Path>) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(assignment, file)
}

pub fn to_yaml(assignment: &Assignment) -> Result<String> {
    Ok(serde_yaml::to_string(assignment)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::{PersonAssignment, RoomAssignment};

    fn assignment() -> Assignment {
        Assignment {
            objective: 12,
            rooms: vec![
                RoomAssignment {
                    room: "A".to_owned(),
                    occupants: vec!["Ann".to_owned(), "Ben".to_owned()],
                },
                RoomAssignment {
                    room: "B".to_owned(),
                    occupants: vec!["Cy".to_owned()],
                },
            ],
            people: vec![
                PersonAssignment {
                    person: "Ann".to_owned(),
                    room: "A".to_owned(),
                    roommate: Some("Ben".to_owned()),
                },
                PersonAssignment {
                    person: "Ben".to_owned(),
                    room: "A".to_owned(),
                    roommate: Some("Ann".to_owned()),
                },
                PersonAssignment {
                    person: "Cy".to_owned(),
                    room: "B".to_owned(),
                    roommate: None,
                },
            ],
        }
    }

    #[test]
    fn csv_has_one_row_per_room() {
        let mut buf = Vec::new();
        write_csv(&assignment(), &mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        assert_eq!(
            csv,
            "Room,Occupants,Occupant 1,Occupant 2\nA,2,Ann,Ben\nB,1,Cy,\n"
        );
    }

    #[test]
    fn yaml_reads_back_into_assignment() {
        let yaml = to_yaml(&assignment()).unwrap();
        let parsed: Assignment = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, assignment());
    }
}

//! Append-only log of marked spots.
//!
//! One record per line:
//! ```text
//! <x>,<y>,<map>|<tile x>,<tile y>|<tile x>,<tile y>|...
//! ```
//! The header is the vantage point and its map; every following field is a
//! mineable tile that was reachable from it when saved, in discovery order.
//! Fields carry no whitespace; only a trailing `\r` is tolerated. Existing
//! lines are never rewritten.

use crate::error::{RecordParseError, StoreError};
use crate::ledger::ConsumedBankLedger;
use crate::location::*;
use fnv::FnvHashMap;
use log::*;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// What to do with a record that does not parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadPolicy {
    /// Log the record and keep loading the rest of the history.
    #[default]
    Lenient,
    /// Stop at the first bad record.
    Strict,
}

/// A saved vantage point and the mineable tiles it exposed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkedSpot {
    pub location: WorldLocation,
    pub map: MapIndex,
    pub tiles: Vec<WorldLocation>,
}

impl MarkedSpot {
    pub fn new(location: WorldLocation, map: MapIndex, tiles: Vec<WorldLocation>) -> Self {
        MarkedSpot {
            location,
            map,
            tiles,
        }
    }

    /// Banks of the exposed tiles, duplicates included.
    pub fn banks(&self, bank_size: i32) -> impl Iterator<Item = BankLocation> + '_ {
        self.tiles.iter().map(move |tile| tile.bank(bank_size))
    }

    /// Mark every exposed bank as consumed. Returns how many were new.
    pub fn consume_into(&self, ledger: &mut ConsumedBankLedger, bank_size: i32) -> usize {
        self.banks(bank_size)
            .filter(|bank| ledger.add(self.map, *bank))
            .count()
    }

    /// The record line, without the trailing newline.
    pub fn to_record(&self) -> String {
        let mut record = format!("{},{}", self.location, self.map);
        for tile in &self.tiles {
            record.push('|');
            record.push_str(&tile.to_string());
        }
        record
    }

    /// Parse one record. `number_of_maps` bounds the map index.
    pub fn parse_record(line: &str, number_of_maps: u8) -> Result<MarkedSpot, RecordParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Err(RecordParseError::Empty);
        }

        let mut fields = line.split('|');
        let header: Vec<&str> = fields.next().unwrap_or_default().split(',').collect();
        if header.len() != 3 {
            return Err(RecordParseError::HeaderFields(header.len()));
        }

        let location = WorldLocation::new(parse_int(header[0])?, parse_int(header[1])?);
        let map: u8 = parse_int(header[2])?;
        if map >= number_of_maps {
            return Err(RecordParseError::MapOutOfRange {
                index: map,
                maps: number_of_maps,
            });
        }

        let tiles = fields.map(parse_tile).collect::<Result<Vec<_>, _>>()?;

        Ok(MarkedSpot {
            location,
            map,
            tiles,
        })
    }
}

fn parse_int<T: FromStr>(field: &str) -> Result<T, RecordParseError> {
    field
        .parse()
        .map_err(|_| RecordParseError::InvalidInteger(field.to_string()))
}

fn parse_tile(field: &str) -> Result<WorldLocation, RecordParseError> {
    let parts: Vec<&str> = field.split(',').collect();
    if parts.len() != 2 {
        return Err(RecordParseError::TileFields(parts.len()));
    }
    Ok(WorldLocation::new(parse_int(parts[0])?, parse_int(parts[1])?))
}

/// File backed spot log.
#[derive(Clone, Debug)]
pub struct MarkedSpotStore {
    path: PathBuf,
    number_of_maps: u8,
    policy: LoadPolicy,
}

impl MarkedSpotStore {
    pub fn new(path: impl Into<PathBuf>, number_of_maps: u8, policy: LoadPolicy) -> Self {
        MarkedSpotStore {
            path: path.into(),
            number_of_maps,
            policy,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating the file if needed.
    pub fn append(&self, spot: &MarkedSpot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut line = spot.to_record();
        line.push('\n');
        file.write_all(line.as_bytes())?;
        file.flush()?;

        debug!("Appended spot record to {}: {}", self.path.display(), spot.to_record());

        Ok(())
    }

    /// Every record in file order. A missing file is an empty history; blank
    /// lines are ignored.
    pub fn load_all(&self) -> Result<Vec<MarkedSpot>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut spots = Vec::new();
        for (index, raw) in BufReader::new(file).split(b'\n').enumerate() {
            let raw = raw?;
            let parsed = match String::from_utf8(raw) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => MarkedSpot::parse_record(&line, self.number_of_maps),
                Err(_) => Err(RecordParseError::InvalidUtf8),
            };

            match parsed {
                Ok(spot) => spots.push(spot),
                Err(reason) => match self.policy {
                    LoadPolicy::Strict => {
                        return Err(StoreError::Malformed {
                            line: index + 1,
                            reason,
                        })
                    }
                    LoadPolicy::Lenient => {
                        warn!(
                            "Skipping malformed spot record {}:{}: {}",
                            self.path.display(),
                            index + 1,
                            reason
                        );
                    }
                },
            }
        }

        Ok(spots)
    }
}

/// Vantage points per map, for the marked spot overlay.
#[derive(Clone, Debug, Default)]
pub struct MarkedSpotIndex {
    spots: FnvHashMap<MapIndex, Vec<WorldLocation>>,
}

impl MarkedSpotIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, map: MapIndex, location: WorldLocation) {
        self.spots.entry(map).or_default().push(location);
    }

    pub fn for_map(&self, map: MapIndex) -> &[WorldLocation] {
        self.spots.get(&map).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn contains(&self, map: MapIndex, location: WorldLocation) -> bool {
        self.for_map(map).contains(&location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spot() -> MarkedSpot {
        MarkedSpot::new(
            WorldLocation::new(2514, 132),
            1,
            vec![WorldLocation::new(2512, 130), WorldLocation::new(2516, 134)],
        )
    }

    #[test]
    fn test_record_format() {
        assert_eq!(spot().to_record(), "2514,132,1|2512,130|2516,134");
        let bare = MarkedSpot::new(WorldLocation::new(-3, 7), 0, Vec::new());
        assert_eq!(bare.to_record(), "-3,7,0");
    }

    #[test]
    fn test_parse_record() {
        let parsed = MarkedSpot::parse_record("2514,132,1|2512,130|2516,134\r\n", 6).unwrap();
        assert_eq!(parsed, spot());
        let bare = MarkedSpot::parse_record("-3,7,0", 6).unwrap();
        assert!(bare.tiles.is_empty());
    }

    #[test]
    fn test_parse_record_errors() {
        assert_eq!(MarkedSpot::parse_record("\r\n", 6), Err(RecordParseError::Empty));
        assert_eq!(
            MarkedSpot::parse_record("1,2|3,4", 6),
            Err(RecordParseError::HeaderFields(2))
        );
        assert_eq!(
            MarkedSpot::parse_record("1,2,0|3", 6),
            Err(RecordParseError::TileFields(1))
        );
        assert_eq!(
            MarkedSpot::parse_record("1,x,0", 6),
            Err(RecordParseError::InvalidInteger("x".to_string()))
        );
        assert_eq!(
            MarkedSpot::parse_record(" 1,2,0", 6),
            Err(RecordParseError::InvalidInteger(" 1".to_string()))
        );
        assert_eq!(
            MarkedSpot::parse_record("1,2,0| 3,4", 6),
            Err(RecordParseError::InvalidInteger(" 3".to_string()))
        );
        assert_eq!(
            MarkedSpot::parse_record("1,2,6", 6),
            Err(RecordParseError::MapOutOfRange { index: 6, maps: 6 })
        );
    }

    #[test]
    fn test_append_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = MarkedSpotStore::new(dir.path().join("spots.txt"), 6, LoadPolicy::Strict);
        let second = MarkedSpot::new(WorldLocation::new(10, 11), 0, Vec::new());

        store.append(&spot()).unwrap();
        store.append(&second).unwrap();

        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "2514,132,1|2512,130|2516,134\n10,11,0\n");
        assert_eq!(store.load_all().unwrap(), vec![spot(), second]);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = MarkedSpotStore::new(dir.path().join("none.txt"), 6, LoadPolicy::Strict);
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_lenient_load_skips_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spots.txt");
        std::fs::write(&path, "1,2,0|8,8\ngarbage\n\n3,4,9\n5,6,1|16,0\n").unwrap();

        let store = MarkedSpotStore::new(&path, 6, LoadPolicy::Lenient);
        let spots = store.load_all().unwrap();
        assert_eq!(spots.len(), 2);
        assert_eq!(spots[0].location, WorldLocation::new(1, 2));
        assert_eq!(spots[1].tiles, vec![WorldLocation::new(16, 0)]);
    }

    #[test]
    fn test_lenient_load_skips_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spots.txt");
        std::fs::write(&path, b"1,2,0|8,8\n\xff\xfe,garbage\n5,6,1|16,0\n").unwrap();

        let spots = MarkedSpotStore::new(&path, 6, LoadPolicy::Lenient)
            .load_all()
            .unwrap();
        assert_eq!(spots.len(), 2);
        assert_eq!(spots[0].tiles, vec![WorldLocation::new(8, 8)]);
        assert_eq!(spots[1].location, WorldLocation::new(5, 6));

        match MarkedSpotStore::new(&path, 6, LoadPolicy::Strict).load_all() {
            Err(StoreError::Malformed { line, reason }) => {
                assert_eq!(line, 2);
                assert_eq!(reason, RecordParseError::InvalidUtf8);
            }
            other => panic!("expected malformed record, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_load_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spots.txt");
        std::fs::write(&path, "1,2,0\n1,2\n").unwrap();

        let store = MarkedSpotStore::new(&path, 6, LoadPolicy::Strict);
        match store.load_all() {
            Err(StoreError::Malformed { line, reason }) => {
                assert_eq!(line, 2);
                assert_eq!(reason, RecordParseError::HeaderFields(2));
            }
            other => panic!("expected malformed record, got {:?}", other),
        }
    }

    #[test]
    fn test_consume_into_ledger() {
        let mut ledger = ConsumedBankLedger::new();
        let spot = MarkedSpot::new(
            WorldLocation::new(0, 0),
            3,
            vec![
                WorldLocation::new(1, 1),
                WorldLocation::new(2, 2),
                WorldLocation::new(9, 1),
            ],
        );
        assert_eq!(spot.consume_into(&mut ledger, 8), 2);
        assert!(ledger.contains(3, BankLocation::new(0, 0)));
        assert!(ledger.contains(3, BankLocation::new(1, 0)));
        assert_eq!(spot.consume_into(&mut ledger, 8), 0);
    }

    #[test]
    fn test_marked_spot_index() {
        let mut index = MarkedSpotIndex::new();
        index.push(2, WorldLocation::new(4, 4));
        assert!(index.contains(2, WorldLocation::new(4, 4)));
        assert!(!index.contains(1, WorldLocation::new(4, 4)));
        assert!(index.for_map(0).is_empty());
    }
}

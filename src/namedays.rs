use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Error, ErrorKind};

/// Read-only lookup from (day, month) to the names celebrated on that date.
///
/// The on-disk form is a JSON object keyed by `"day.month"` strings, e.g.
/// `{"24.12": ["Adam", "Ewa"]}`. Loaded once per run, immutable afterwards.
#[derive(Debug, Clone)]
pub struct NameDayTable {
    entries: HashMap<(u32, u32), Vec<String>>,
}

impl NameDayTable {
    pub fn from_file(path: &Path) -> Result<NameDayTable, Error> {
        let file = File::open(path).map_err(|err| {
            Error::new(
                ErrorKind::AssetUnavailable,
                &format!("name-day table '{}': {}", path.display(), err),
            )
        })?;
        NameDayTable::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<NameDayTable, Error> {
        let raw: HashMap<String, Vec<String>> = serde_json::from_reader(reader)?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (key, names) in raw {
            entries.insert(parse_key(&key)?, names);
        }

        Ok(NameDayTable { entries })
    }

    pub fn names(&self, day: u32, month: u32) -> Option<&[String]> {
        self.entries.get(&(day, month)).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_key(key: &str) -> Result<(u32, u32), Error> {
    let mut parts = key.splitn(2, '.');
    let day = parts.next().and_then(|p| p.trim().parse::<u32>().ok());
    let month = parts.next().and_then(|p| p.trim().parse::<u32>().ok());

    match (day, month) {
        (Some(d @ 1..=31), Some(m @ 1..=12)) => Ok((d, m)),
        _ => Err(Error::new(
            ErrorKind::InvalidArgument,
            &format!("malformed name-day key '{}'", key),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_day_dot_month_keys() {
        let table = NameDayTable::from_reader(
            r#"{"24.12": ["Adam", "Ewa"], "1.1": ["Mieszko"]}"#.as_bytes(),
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.names(24, 12),
            Some(&["Adam".to_string(), "Ewa".to_string()][..])
        );
        assert_eq!(table.names(1, 1), Some(&["Mieszko".to_string()][..]));
    }

    #[test]
    fn missing_dates_are_not_an_error() {
        let table = NameDayTable::from_reader(r#"{"24.12": ["Adam"]}"#.as_bytes()).unwrap();
        assert_eq!(table.names(25, 12), None);
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert!(NameDayTable::from_reader(r#"{"24-12": ["Adam"]}"#.as_bytes()).is_err());
        assert!(NameDayTable::from_reader(r#"{"32.12": ["Adam"]}"#.as_bytes()).is_err());
        assert!(NameDayTable::from_reader(r#"{"24.13": ["Adam"]}"#.as_bytes()).is_err());
        assert!(NameDayTable::from_reader(r#"not json"#.as_bytes()).is_err());
    }
}

// src/hitlog.rs
use std::fs::{self, OpenOptions};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::error::BoxError;

/// One target hit, as persisted to the CSV log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitRecord {
    pub sheet_name: String,
    pub scrip_name: String,
    pub target_price: f64,
    pub hit_price: f64,
    pub date: String,
    pub time: String,
}

impl HitRecord {
    pub fn now(sheet_name: String, scrip_name: String, target_price: f64, hit_price: f64) -> Self {
        let now = chrono::Local::now();
        HitRecord {
            sheet_name,
            scrip_name,
            target_price,
            hit_price,
            date: now.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M:%S").to_string(),
        }
    }
}

/// Appends one record, creating the file and its header on first use.
pub fn append_hit(path: &Path, record: &HitRecord) -> Result<(), BoxError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let write_header = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = WriterBuilder::new()
        .has_headers(write_header)
        .from_writer(file);
    writer.serialize(record)?;
    writer.flush()?;
    Ok(())
}

/// Reads the whole log. `Ok(None)` means no hits have been logged yet.
pub fn read_hits(path: &Path) -> Result<Option<Vec<HitRecord>>, BoxError> {
    if !path.exists() {
        return Ok(None);
    }
    let mut reader = ReaderBuilder::new().from_path(path)?;
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(Some(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("target_hits.csv");
        assert!(read_hits(&path).unwrap().is_none());
    }

    #[test]
    fn append_creates_dirs_and_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("target_hits.csv");

        let first = HitRecord {
            sheet_name: "Intraday".to_string(),
            scrip_name: "RELIANCE".to_string(),
            target_price: 2500.0,
            hit_price: 2510.25,
            date: "2025-01-06".to_string(),
            time: "10:31:00".to_string(),
        };
        let second = HitRecord {
            scrip_name: "TCS".to_string(),
            ..first.clone()
        };
        append_hit(&path, &first).unwrap();
        append_hit(&path, &second).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw.matches("sheet_name").count(), 1);

        let records = read_hits(&path).unwrap().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].scrip_name, "RELIANCE");
        assert_eq!(records[0].hit_price, 2510.25);
        assert_eq!(records[1].scrip_name, "TCS");
    }

    #[test]
    fn now_stamps_date_and_time() {
        let record = HitRecord::now("Intraday".to_string(), "INFY".to_string(), 1800.0, 1802.5);
        assert_eq!(record.date.len(), 10);
        assert_eq!(record.time.len(), 8);
        assert_eq!(record.target_price, 1800.0);
    }
}

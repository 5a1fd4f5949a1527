// src/io/reporting.rs

use std::path::Path;

use tracing::info;

use crate::error::DataError;
use crate::simulation::engine::RoundRecord;

/// Writes the per-round history to a CSV file.
pub fn write_round_log(path: &Path, records: &[RoundRecord]) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_path(path).map_err(|source| DataError::Csv {
        path: path.display().to_string(),
        source,
    })?;

    for record in records {
        writer.serialize(record).map_err(|source| DataError::Csv {
            path: path.display().to_string(),
            source,
        })?;
    }

    writer.flush().map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;

    info!(rows = records.len(), path = %path.display(), "round log exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32, hour: u32) -> RoundRecord {
        RoundRecord {
            day,
            hour,
            flights_departed: 2,
            kits_loaded: 310,
            kits_ordered: 0,
            total_cost: 123.4,
            penalty_count: 1,
            penalty_amount: 99.0,
            mode: "balanced".to_string(),
        }
    }

    #[test]
    fn writes_a_header_and_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rounds.csv");
        write_round_log(&path, &[record(0, 0), record(0, 1)]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("day,hour,flights_departed"));
        assert!(lines[2].starts_with("0,1,"));
    }
}

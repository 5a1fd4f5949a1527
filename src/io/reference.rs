// src/io/reference.rs

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::DataError;
use crate::model::kit::KitSet;
use crate::model::reference::{AircraftType, Airport, ReferenceData, ScheduleEntry};

/// Row layout of `airports.csv`.
#[derive(Debug, Deserialize)]
struct AirportRow {
    code: String,
    is_hub: bool,
    cap_first: u32,
    cap_business: u32,
    cap_premium_economy: u32,
    cap_economy: u32,
    proc_first: u32,
    proc_business: u32,
    proc_premium_economy: u32,
    proc_economy: u32,
    stock_first: u32,
    stock_business: u32,
    stock_premium_economy: u32,
    stock_economy: u32,
}

/// Row layout of `aircraft.csv`.
#[derive(Debug, Deserialize)]
struct AircraftRow {
    name: String,
    cap_first: u32,
    cap_business: u32,
    cap_premium_economy: u32,
    cap_economy: u32,
}

/// Row layout of `schedule.csv`. The weekday mask is 7 characters of
/// '0'/'1', Monday first (e.g. "1111100" for weekdays only).
#[derive(Debug, Deserialize)]
struct ScheduleRow {
    flight_number: String,
    origin: String,
    destination: String,
    distance_km: f64,
    departure_hour: u32,
    duration_hours: u32,
    weekdays: String,
}

/// Loads `airports.csv`, `aircraft.csv` and `schedule.csv` from `dir` and
/// cross-validates them: exactly the rows marked `is_hub` determine the hub
/// (the first one wins), and every schedule endpoint must be a known
/// airport.
pub fn load_reference_data(dir: &Path) -> Result<ReferenceData, DataError> {
    let airports = load_airports(&dir.join("airports.csv"))?;
    let aircraft = load_aircraft(&dir.join("aircraft.csv"))?;
    let schedule = load_schedule(&dir.join("schedule.csv"))?;

    let hub_code = airports
        .values()
        .find(|airport| airport.is_hub)
        .map(|airport| airport.code.clone())
        .ok_or(DataError::MissingHub)?;

    for entry in &schedule {
        for code in [&entry.origin, &entry.destination] {
            if !airports.contains_key(code.as_str()) {
                return Err(DataError::UnknownAirport { code: code.clone() });
            }
        }
    }

    info!(
        airports = airports.len(),
        aircraft = aircraft.len(),
        rotations = schedule.len(),
        hub = %hub_code,
        "reference data loaded"
    );
    Ok(ReferenceData::new(airports, aircraft, schedule, hub_code))
}

fn open_csv(path: &Path) -> Result<csv::Reader<File>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(csv::Reader::from_reader(file))
}

fn csv_error(path: &Path, source: csv::Error) -> DataError {
    DataError::Csv {
        path: path.display().to_string(),
        source,
    }
}

fn load_airports(path: &Path) -> Result<HashMap<String, Airport>, DataError> {
    let mut reader = open_csv(path)?;
    let mut airports = HashMap::new();
    for row in reader.deserialize() {
        let row: AirportRow = row.map_err(|e| csv_error(path, e))?;
        airports.insert(
            row.code.clone(),
            Airport {
                code: row.code,
                is_hub: row.is_hub,
                capacity: KitSet::new(
                    row.cap_first,
                    row.cap_business,
                    row.cap_premium_economy,
                    row.cap_economy,
                ),
                processing_hours: KitSet::new(
                    row.proc_first,
                    row.proc_business,
                    row.proc_premium_economy,
                    row.proc_economy,
                ),
                initial_stock: KitSet::new(
                    row.stock_first,
                    row.stock_business,
                    row.stock_premium_economy,
                    row.stock_economy,
                ),
            },
        );
    }
    Ok(airports)
}

fn load_aircraft(path: &Path) -> Result<HashMap<String, AircraftType>, DataError> {
    let mut reader = open_csv(path)?;
    let mut aircraft = HashMap::new();
    for row in reader.deserialize() {
        let row: AircraftRow = row.map_err(|e| csv_error(path, e))?;
        aircraft.insert(
            row.name.clone(),
            AircraftType {
                name: row.name,
                kit_capacity: KitSet::new(
                    row.cap_first,
                    row.cap_business,
                    row.cap_premium_economy,
                    row.cap_economy,
                ),
            },
        );
    }
    Ok(aircraft)
}

fn load_schedule(path: &Path) -> Result<Vec<ScheduleEntry>, DataError> {
    let mut reader = open_csv(path)?;
    let mut schedule = Vec::new();
    for row in reader.deserialize() {
        let row: ScheduleRow = row.map_err(|e| csv_error(path, e))?;
        schedule.push(ScheduleEntry {
            flight_number: row.flight_number,
            origin: row.origin,
            destination: row.destination,
            distance_km: row.distance_km,
            departure_hour: row.departure_hour,
            duration_hours: row.duration_hours,
            weekdays: parse_weekday_mask(&row.weekdays)?,
        });
    }
    Ok(schedule)
}

fn parse_weekday_mask(mask: &str) -> Result<[bool; 7], DataError> {
    let bad = || DataError::BadWeekdayMask {
        mask: mask.to_string(),
    };
    if mask.len() != 7 {
        return Err(bad());
    }
    let mut days = [false; 7];
    for (i, c) in mask.chars().enumerate() {
        days[i] = match c {
            '0' => false,
            '1' => true,
            _ => return Err(bad()),
        };
    }
    Ok(days)
}

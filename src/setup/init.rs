use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use tracing::{debug, info};

use crate::error::{PlannerError, Result};
use crate::phases::phases_types::Trip;
use crate::setup::init_types::TripInput;

/// Reads a trip JSON file and resolves its departure times.
pub fn load_trip(path: &Path) -> Result<Trip> {
    let file_content = fs::read_to_string(path)?;
    let input: TripInput = serde_json::from_str(&file_content)?;
    info!(
        "Loaded {} addresses from {}",
        input.addresses.len(),
        path.display()
    );
    trip_from_input(input, Local::now().date_naive(), &Local)
}

pub fn trip_from_input<Tz: TimeZone>(input: TripInput, today: NaiveDate, tz: &Tz) -> Result<Trip> {
    let n = input.addresses.len();
    if n == 0 {
        return Err(PlannerError::InvalidProblem("no addresses given".to_string()));
    }
    if input.start_index >= n || input.end_index >= n {
        return Err(PlannerError::InvalidProblem(format!(
            "start_index {} / end_index {} out of range for {} addresses",
            input.start_index, input.end_index, n
        )));
    }

    let leave_time = parse_departure_time(&input.leave_time, today, tz)?;
    let return_time = parse_departure_time(&input.return_time, today, tz)?;
    debug!("Leave at {}, return at {}", leave_time, return_time);

    Ok(Trip {
        locations: input.addresses,
        start: input.start_index,
        end: input.end_index,
        leave_time,
        return_time,
    })
}

/// Accepts an RFC 3339 timestamp, or `HH:MM` meaning that time on `today` in `tz`.
pub fn parse_departure_time<Tz: TimeZone>(
    raw: &str,
    today: NaiveDate,
    tz: &Tz,
) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    let time = NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| PlannerError::Config(format!("cannot read '{raw}' as RFC 3339 or HH:MM")))?;
    tz.from_local_datetime(&today.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| PlannerError::Config(format!("'{raw}' is ambiguous or skipped on {today}")))
}

use chrono::NaiveTime;

use crate::models::{TimeRangeError, TimeSlot, TIME_FORMAT};

/// Parses `"HH:MM-HH:MM"` (whitespace around either side is ignored).
///
/// Does not check ordering: a reversed range parses fine and simply divides
/// into no slots.
pub fn parse_time_range(raw: &str) -> Result<TimeSlot, TimeRangeError> {
    let (start, end) = raw
        .split_once('-')
        .ok_or_else(|| TimeRangeError::MissingSeparator(raw.to_string()))?;

    Ok(TimeSlot::new(parse_time_of_day(start)?, parse_time_of_day(end)?))
}

fn parse_time_of_day(raw: &str) -> Result<NaiveTime, TimeRangeError> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT)
        .map_err(|_| TimeRangeError::InvalidTime(raw.trim().to_string()))
}

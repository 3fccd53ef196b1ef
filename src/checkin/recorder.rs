//! Check-in record construction

use crate::algorithms::evaluate;
use crate::checkin::record::{CheckInError, CheckInRecord};
use crate::core::{GeofenceSpec, PositionSample, RangeState, UserIdentity, CHECK_IN_TIME_FORMAT};
use chrono::{DateTime, Local};
use tracing::{info, warn};

/// Builds check-in records from a confirmed in-range state.
///
/// The recorder never persists anything; the caller appends the returned
/// record to its store.
#[derive(Debug, Clone, Default)]
pub struct CheckInRecorder;

impl CheckInRecorder {
    pub fn new() -> Self {
        Self
    }

    /// Build a record stamped with the current local time
    pub fn record(
        &self,
        user: &UserIdentity,
        position: Option<&PositionSample>,
        fence: &GeofenceSpec,
        range: RangeState,
        existing: &[CheckInRecord],
    ) -> Result<CheckInRecord, CheckInError> {
        self.record_at(user, position, fence, range, existing, Local::now())
    }

    /// Build a record stamped with `now`.
    ///
    /// The id is `existing.len() + 1`, which is only unique while a single
    /// writer appends and nothing is deleted.
    pub fn record_at(
        &self,
        user: &UserIdentity,
        position: Option<&PositionSample>,
        fence: &GeofenceSpec,
        range: RangeState,
        existing: &[CheckInRecord],
        now: DateTime<Local>,
    ) -> Result<CheckInRecord, CheckInError> {
        let Some(sample) = position else {
            warn!(user = user.id, "check-in refused: no position");
            return Err(CheckInError::MissingPosition);
        };

        // The caller's state must agree with the sample it passes in
        if range != RangeState::Inside || evaluate(Some(sample), fence) != RangeState::Inside {
            warn!(user = user.id, ?range, "check-in refused: not in range");
            return Err(CheckInError::NotInRange);
        }

        let record = CheckInRecord {
            id: existing.len() as u64 + 1,
            user_id: user.id,
            time: now.format(CHECK_IN_TIME_FORMAT).to_string(),
            location: sample.coordinate,
        };
        info!(user = user.id, id = record.id, time = %record.time, "check-in recorded");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Coordinate;
    use chrono::{NaiveDateTime, TimeZone, Utc};

    fn fence() -> GeofenceSpec {
        GeofenceSpec::new(Coordinate::new(24.998527, 121.457033).unwrap(), 100.0).unwrap()
    }

    fn at_center() -> PositionSample {
        PositionSample::new(Coordinate::new(24.998527, 121.457033).unwrap(), Utc::now())
    }

    fn user() -> UserIdentity {
        UserIdentity::new(1, "Liam")
    }

    fn existing(count: u64) -> Vec<CheckInRecord> {
        (1..=count)
            .map(|id| CheckInRecord {
                id,
                user_id: 1,
                time: "2024-01-01 09:00:00".to_string(),
                location: Coordinate::new(24.998527, 121.457033).unwrap(),
            })
            .collect()
    }

    fn is_check_in_time(time: &str) -> bool {
        NaiveDateTime::parse_from_str(time, CHECK_IN_TIME_FORMAT).is_ok()
    }

    #[test]
    fn test_outside_is_rejected() {
        let recorder = CheckInRecorder::new();
        let result = recorder.record(&user(), Some(&at_center()), &fence(), RangeState::Outside, &[]);
        assert_eq!(result, Err(CheckInError::NotInRange));

        let result = recorder.record(&user(), Some(&at_center()), &fence(), RangeState::Unknown, &[]);
        assert_eq!(result, Err(CheckInError::NotInRange));
    }

    #[test]
    fn test_missing_position() {
        let recorder = CheckInRecorder::new();
        let result = recorder.record(&user(), None, &fence(), RangeState::Inside, &[]);
        assert_eq!(result, Err(CheckInError::MissingPosition));
    }

    #[test]
    fn test_stale_inside_state_is_rejected() {
        let recorder = CheckInRecorder::new();
        let far = PositionSample::new(Coordinate::new(25.1, 121.5).unwrap(), Utc::now());
        let result = recorder.record(&user(), Some(&far), &fence(), RangeState::Inside, &[]);
        assert_eq!(result, Err(CheckInError::NotInRange));
    }

    #[test]
    fn test_id_follows_existing_records() {
        let recorder = CheckInRecorder::new();
        let record = recorder
            .record(&user(), Some(&at_center()), &fence(), RangeState::Inside, &existing(2))
            .unwrap();
        assert_eq!(record.id, 3);
        assert_eq!(record.user_id, 1);
        assert_eq!(record.location, at_center().coordinate);
        assert!(is_check_in_time(&record.time), "unexpected time {}", record.time);
    }

    #[test]
    fn test_time_format() {
        let recorder = CheckInRecorder::new();
        let now = Local.with_ymd_and_hms(2024, 3, 5, 8, 7, 6).unwrap();
        let record = recorder
            .record_at(&user(), Some(&at_center()), &fence(), RangeState::Inside, &[], now)
            .unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.time, "2024-03-05 08:07:06");
        assert!(is_check_in_time(&record.time));
        assert!(!is_check_in_time("2024-02-30 08:07:06"));
    }

    #[test]
    fn test_record_serializes_like_stored_check_ins() {
        let record = existing(1).remove(0);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "userId": 1,
                "time": "2024-01-01 09:00:00",
                "location": { "lat": 24.998527, "lng": 121.457033 }
            })
        );
    }
}

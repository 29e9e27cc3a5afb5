use serde::{
    Serialize,
    Deserialize
};
use tracing::warn;

use crate::plannererror::PlannerError;
use crate::time::holiday::holiday::Holiday;
use crate::trip::trip::Trip;

/// Snapshot of a planning session, as kept in a key-value store.
///
/// Dates are ISO-8601 calendar dates (`2026-01-01`) and instants are RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredData {
    pub annual_leave: u32,
    pub trips: Vec<Trip>,
    pub holidays: Vec<Holiday>,
    pub selected_year: i32
}

impl StoredData {
    pub fn encode(&self) -> Result<String, PlannerError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes and checks a snapshot. Any field of the wrong shape, or a trip
    /// breaking its invariants, rejects the whole snapshot.
    pub fn decode(json: &str) -> Result<StoredData, PlannerError> {
        let data: StoredData = serde_json::from_str(json)?;
        for trip in data.trips.iter() {
            trip.validate()?;
        }
        Ok(data)
    }

    /// Decodes a stored snapshot, treating an absent or unreadable one as no
    /// prior state.
    pub fn load(stored: Option<&str>) -> Option<StoredData> {
        let json = stored?;
        match StoredData::decode(json) {
            Ok(data) => Some(data),
            Err(error) => {
                warn!(%error, "discarding stored planner data");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> StoredData {
        let mut trip = Trip::personal("Bali", 5).unwrap();
        trip.select_dates(NaiveDate::from_ymd_opt(2026, 3, 30).unwrap()).unwrap();
        StoredData {
            annual_leave: 18,
            trips: vec![trip],
            holidays: vec![Holiday::new(NaiveDate::from_ymd_opt(2026, 4, 3).unwrap(), "Good Friday")],
            selected_year: 2026
        }
    }

    #[test]
    fn encodes_iso_dates() {
        let json: serde_json::Value = serde_json::from_str(&sample().encode().unwrap()).unwrap();
        assert_eq!(json["trips"][0]["startDate"], "2026-03-30");
        assert_eq!(json["trips"][0]["endDate"], "2026-04-03");
        assert_eq!(json["trips"][0]["type"], "personal");
        assert_eq!(json["holidays"][0]["date"], "2026-04-03");
        assert_eq!(json["selectedYear"], 2026);
    }

    #[test]
    fn decode_restores_snapshot() {
        let data = sample();
        assert_eq!(StoredData::decode(&data.encode().unwrap()).unwrap(), data);
    }

    #[test]
    fn load_treats_missing_and_corrupt_as_absent() {
        assert_eq!(StoredData::load(None), None);
        assert_eq!(StoredData::load(Some("{not json")), None);
        assert_eq!(StoredData::load(Some(r#"{"annualLeave": 18}"#)), None);
    }

    #[test]
    fn decode_rejects_malformed_trip_date() {
        let json = r#"{
            "annualLeave": 18,
            "selectedYear": 2026,
            "holidays": [],
            "trips": [{
                "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
                "destination": "Bali",
                "days": 5,
                "startDate": "next tuesday",
                "endDate": null
            }]
        }"#;
        assert!(matches!(StoredData::decode(json), Err(PlannerError::JsonParseError(_))));
    }

    #[test]
    fn decode_rejects_half_dated_trip() {
        let json = r#"{
            "annualLeave": 18,
            "selectedYear": 2026,
            "holidays": [],
            "trips": [{
                "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
                "destination": "Bali",
                "days": 5,
                "startDate": "2026-03-30",
                "endDate": null
            }]
        }"#;
        assert!(matches!(StoredData::decode(json), Err(PlannerError::InvalidTrip(_))));
    }
}

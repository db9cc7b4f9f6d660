use std::fmt;

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Identifier of a committed point. The empty id marks a point that the store has not seen yet.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct PointId(String);

impl PointId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn unassigned() -> Self {
        Self(String::new())
    }

    pub fn is_unassigned(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<new>")
        } else {
            f.write_str(&self.0)
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct DestinationId(pub u32);

/// Offer ids are scoped to the point type that lists them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct OfferId(pub u32);

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum PointType {
    Taxi,
    #[default]
    Bus,
    Train,
    Ship,
    Drive,
    Flight,
    CheckIn,
    Sightseeing,
    Restaurant,
}

impl PointType {
    pub const ALL: [PointType; 9] = [
        PointType::Taxi,
        PointType::Bus,
        PointType::Train,
        PointType::Ship,
        PointType::Drive,
        PointType::Flight,
        PointType::CheckIn,
        PointType::Sightseeing,
        PointType::Restaurant,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PointType::Taxi => "taxi",
            PointType::Bus => "bus",
            PointType::Train => "train",
            PointType::Ship => "ship",
            PointType::Drive => "drive",
            PointType::Flight => "flight",
            PointType::CheckIn => "check-in",
            PointType::Sightseeing => "sightseeing",
            PointType::Restaurant => "restaurant",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PointType::Taxi => "Taxi",
            PointType::Bus => "Bus",
            PointType::Train => "Train",
            PointType::Ship => "Ship",
            PointType::Drive => "Drive",
            PointType::Flight => "Flight",
            PointType::CheckIn => "Check-in",
            PointType::Sightseeing => "Sightseeing",
            PointType::Restaurant => "Restaurant",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|kind| *kind == self)
            .unwrap_or_default()
    }

    /// Neighbouring type in [`PointType::ALL`], wrapping at both ends.
    pub fn step(self, delta: i32) -> Self {
        let len = Self::ALL.len() as i32;
        let next = (self.index() as i32 + delta).rem_euclid(len);
        Self::ALL[next as usize]
    }
}

impl fmt::Display for PointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One committed trip event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    #[serde(default)]
    pub id: PointId,
    #[serde(rename = "type")]
    pub kind: PointType,
    #[serde(default)]
    pub destination: Option<DestinationId>,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub base_price: u32,
    #[serde(default)]
    pub offers: Option<Vec<OfferId>>,
}

impl Point {
    /// The sentinel a creation form starts from.
    pub fn blank(now: DateTime<Utc>) -> Self {
        let now = normalize_timestamp(now);
        Self {
            id: PointId::unassigned(),
            kind: PointType::Bus,
            destination: None,
            date_from: now,
            date_to: now,
            base_price: 0,
            offers: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_unassigned()
    }

    pub fn duration(&self) -> TimeDelta {
        self.date_to - self.date_from
    }

    pub fn has_ordered_dates(&self) -> bool {
        self.date_to >= self.date_from
    }

    pub fn selected_offers(&self) -> &[OfferId] {
        self.offers.as_deref().unwrap_or_default()
    }
}

/// Drops seconds and sub-second precision; pickers never produce them.
pub fn normalize_timestamp(at: DateTime<Utc>) -> DateTime<Utc> {
    at.duration_trunc(TimeDelta::minutes(1)).unwrap_or(at)
}

/// `01D 02H 30M`, with leading zero units dropped.
pub fn format_duration(duration: TimeDelta) -> String {
    let minutes = duration.num_minutes().max(0);
    let days = minutes / (24 * 60);
    let hours = (minutes / 60) % 24;
    let mins = minutes % 60;
    if days > 0 {
        format!("{days:02}D {hours:02}H {mins:02}M")
    } else if hours > 0 {
        format!("{hours:02}H {mins:02}M")
    } else {
        format!("{mins:02}M")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 18, hour, minute, second)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn blank_point_is_new_and_truncated() {
        let point = Point::blank(at(10, 30, 42));
        assert!(point.is_new());
        assert_eq!(point.kind, PointType::Bus);
        assert_eq!(point.date_from, at(10, 30, 0));
        assert_eq!(point.date_to, point.date_from);
        assert!(point.offers.is_none());
        assert!(point.destination.is_none());
    }

    #[test]
    fn type_step_wraps_in_both_directions() {
        assert_eq!(PointType::Taxi.step(-1), PointType::Restaurant);
        assert_eq!(PointType::Restaurant.step(1), PointType::Taxi);
        assert_eq!(PointType::Bus.step(2), PointType::Ship);
    }

    #[test]
    fn durations_drop_leading_zero_units() {
        assert_eq!(format_duration(TimeDelta::minutes(25)), "25M");
        assert_eq!(format_duration(TimeDelta::minutes(90)), "01H 30M");
        assert_eq!(
            format_duration(TimeDelta::days(2) + TimeDelta::minutes(5)),
            "02D 00H 05M"
        );
        assert_eq!(format_duration(TimeDelta::minutes(-5)), "00M");
    }

    #[test]
    fn serializes_with_camel_case_and_kebab_types() {
        let point = Point {
            id: PointId::new("7"),
            kind: PointType::CheckIn,
            destination: Some(DestinationId(2)),
            date_from: at(9, 0, 0),
            date_to: at(11, 0, 0),
            base_price: 120,
            offers: Some(vec![OfferId(1)]),
        };
        let value = serde_json::to_value(&point).expect("serialize");
        assert_eq!(value["type"], "check-in");
        assert_eq!(value["basePrice"], 120);
        assert_eq!(value["offers"], serde_json::json!([1]));
        let back: Point = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, point);
    }
}

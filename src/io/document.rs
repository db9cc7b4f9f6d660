use std::collections::HashSet;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{Catalog, CatalogData, DestinationId, OfferId, Point, PointId, PointType};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to build the itinerary schema: {0}")]
    Schema(String),

    #[error("itinerary document is invalid:\n  {}", .issues.join("\n  "))]
    Invalid { issues: Vec<String> },

    #[error("itinerary document does not match the expected shape: {0}")]
    Shape(#[from] serde_json::Error),
}

/// File shape: the points plus an optional catalog. The demo catalog fills in when it is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ItineraryDocument {
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<CatalogData>,
}

/// JSON Schema every loaded document is checked against.
pub fn document_schema() -> Result<Value, DocumentError> {
    serde_json::to_value(schema_for!(ItineraryDocument))
        .map_err(|err| DocumentError::Schema(err.to_string()))
}

impl ItineraryDocument {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            catalog: None,
        }
    }

    pub fn with_catalog(mut self, catalog: CatalogData) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Validates `value` against [`document_schema`] and deserializes it. Points must also end
    /// after they start and carry distinct ids.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        Self::validate(&value)?;
        let document: Self = serde_json::from_value(value)?;
        let issues = document.point_issues();
        if issues.is_empty() {
            Ok(document)
        } else {
            Err(DocumentError::Invalid { issues })
        }
    }

    fn point_issues(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut issues = Vec::new();
        for (index, point) in self.points.iter().enumerate() {
            if !point.has_ordered_dates() {
                issues.push(format!("/points/{index}: ends before it starts"));
            }
            if !point.id.is_unassigned() && !seen.insert(&point.id) {
                issues.push(format!("/points/{index}: duplicate id \"{}\"", point.id));
            }
        }
        issues
    }

    pub fn validate(value: &Value) -> Result<(), DocumentError> {
        let schema = document_schema()?;
        let validator =
            jsonschema::validator_for(&schema).map_err(|err| DocumentError::Schema(err.to_string()))?;
        let issues: Vec<String> = validator
            .iter_errors(value)
            .map(|error| {
                let pointer = error.instance_path.to_string();
                let prefix = if pointer.is_empty() {
                    "<root>".to_string()
                } else {
                    pointer
                };
                format!("{prefix}: {error}")
            })
            .collect();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(DocumentError::Invalid { issues })
        }
    }

    pub fn catalog(&self) -> Catalog {
        match &self.catalog {
            Some(data) => Catalog::new(data.clone()),
            None => Catalog::demo(),
        }
    }

    /// Itinerary shipped with the binary, built on [`Catalog::demo`].
    pub fn demo() -> Self {
        let start = Utc
            .with_ymd_and_hms(2024, 3, 18, 10, 30, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let point = |id: &str,
                     kind: PointType,
                     destination: u32,
                     offset: TimeDelta,
                     length: TimeDelta,
                     price: u32,
                     offers: Option<Vec<u32>>| Point {
            id: PointId::new(id),
            kind,
            destination: Some(DestinationId(destination)),
            date_from: start + offset,
            date_to: start + offset + length,
            base_price: price,
            offers: offers.map(|ids| ids.into_iter().map(OfferId).collect()),
        };
        Self::new(vec![
            point(
                "1",
                PointType::Taxi,
                1,
                TimeDelta::zero(),
                TimeDelta::minutes(30),
                20,
                Some(vec![2]),
            ),
            point(
                "2",
                PointType::Flight,
                2,
                TimeDelta::hours(2),
                TimeDelta::hours(1) + TimeDelta::minutes(35),
                160,
                Some(vec![1, 3]),
            ),
            point(
                "3",
                PointType::Drive,
                3,
                TimeDelta::hours(5),
                TimeDelta::hours(2),
                90,
                Some(Vec::new()),
            ),
            point(
                "4",
                PointType::CheckIn,
                3,
                TimeDelta::hours(8),
                TimeDelta::days(2),
                600,
                Some(vec![2]),
            ),
            point(
                "5",
                PointType::Sightseeing,
                3,
                TimeDelta::days(1) + TimeDelta::hours(1),
                TimeDelta::hours(4),
                50,
                None,
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn demo_document_validates() {
        let value = serde_json::to_value(ItineraryDocument::demo()).unwrap();
        let parsed = ItineraryDocument::from_value(value).unwrap();
        assert_eq!(parsed, ItineraryDocument::demo());
        assert!(parsed.points.iter().all(Point::has_ordered_dates));
    }

    #[test]
    fn negative_price_is_reported_with_its_pointer() {
        let doc = json!({
            "points": [{
                "id": "1",
                "type": "taxi",
                "dateFrom": "2024-03-18T10:30:00Z",
                "dateTo": "2024-03-18T11:00:00Z",
                "basePrice": -5
            }]
        });
        let issues = match ItineraryDocument::from_value(doc) {
            Err(DocumentError::Invalid { issues }) => issues,
            other => panic!("expected schema issues, got {other:?}"),
        };
        assert!(issues.iter().any(|issue| issue.starts_with("/points/0/basePrice")));
    }

    #[test]
    fn unknown_point_type_is_rejected() {
        let doc = json!({
            "points": [{
                "type": "rocket",
                "dateFrom": "2024-03-18T10:30:00Z",
                "dateTo": "2024-03-18T11:00:00Z",
                "basePrice": 1
            }]
        });
        assert!(matches!(
            ItineraryDocument::from_value(doc),
            Err(DocumentError::Invalid { .. })
        ));
    }

    #[test]
    fn missing_catalog_falls_back_to_demo() {
        let doc = ItineraryDocument::new(Vec::new());
        assert_eq!(doc.catalog().to_data(), Catalog::demo().to_data());
    }

    #[test]
    fn schema_describes_points() {
        let schema = document_schema().unwrap();
        assert!(schema.pointer("/properties/points").is_some());
    }

    #[test]
    fn repeated_ids_are_reported() {
        let mut document = ItineraryDocument::demo();
        let copy = document.points[0].clone();
        document.points.push(copy);
        let value = serde_json::to_value(&document).unwrap();
        let issues = match ItineraryDocument::from_value(value) {
            Err(DocumentError::Invalid { issues }) => issues,
            other => panic!("expected point issues, got {other:?}"),
        };
        assert_eq!(issues, ["/points/5: duplicate id \"1\""]);
    }

    #[test]
    fn points_ending_before_they_start_are_reported() {
        let doc = json!({
            "points": [{
                "id": "1",
                "type": "taxi",
                "dateFrom": "2024-03-18T11:00:00Z",
                "dateTo": "2024-03-18T10:30:00Z",
                "basePrice": 5
            }]
        });
        let err = ItineraryDocument::from_value(doc).unwrap_err();
        assert!(err.to_string().contains("/points/0: ends before it starts"));
    }
}

//! In-memory store behind the presenters' change boundary.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{ChangeRequest, Point, PointId, UpdateType, UserAction};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("no point with id {0}")]
    UnknownPoint(PointId),

    #[error("point {id} ends before it starts")]
    InvalidDates { id: PointId },

    #[error("a point with id {0} already exists")]
    DuplicatePoint(PointId),
}

/// An accepted change, carrying the point as stored (with its assigned id on creation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEvent {
    pub action: UserAction,
    pub scope: UpdateType,
    pub point: Point,
}

#[derive(Debug, Clone, Default)]
pub struct PointsModel {
    points: Vec<Point>,
}

impl PointsModel {
    /// Loads `points`, assigning ids to the unassigned ones. Every point must have ordered dates
    /// and assigned ids must be unique.
    pub fn new(points: Vec<Point>) -> Result<Self, ModelError> {
        let mut seen = HashSet::new();
        for point in &points {
            if !point.has_ordered_dates() {
                return Err(ModelError::InvalidDates {
                    id: point.id.clone(),
                });
            }
            if !point.id.is_unassigned() && !seen.insert(&point.id) {
                return Err(ModelError::DuplicatePoint(point.id.clone()));
            }
        }
        let mut model = Self { points };
        for index in 0..model.points.len() {
            if model.points[index].id.is_unassigned() {
                model.points[index].id = model.next_id();
            }
        }
        Ok(model)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, id: &PointId) -> Option<&Point> {
        self.points.iter().find(|point| &point.id == id)
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn apply(&mut self, request: ChangeRequest) -> Result<ModelEvent, ModelError> {
        let ChangeRequest {
            action,
            scope,
            mut point,
        } = request;
        if action != UserAction::Delete && !point.has_ordered_dates() {
            return Err(ModelError::InvalidDates { id: point.id });
        }
        match action {
            UserAction::Create => {
                if point.id.is_unassigned() {
                    point.id = self.next_id();
                } else if self.get(&point.id).is_some() {
                    return Err(ModelError::DuplicatePoint(point.id));
                }
                self.points.push(point.clone());
            }
            UserAction::Update => {
                let slot = self
                    .points
                    .iter_mut()
                    .find(|slot| slot.id == point.id)
                    .ok_or_else(|| ModelError::UnknownPoint(point.id.clone()))?;
                *slot = point.clone();
            }
            UserAction::Delete => {
                let index = self
                    .points
                    .iter()
                    .position(|slot| slot.id == point.id)
                    .ok_or_else(|| ModelError::UnknownPoint(point.id.clone()))?;
                self.points.remove(index);
            }
        }
        info!(?action, ?scope, id = %point.id, "change applied");
        Ok(ModelEvent {
            action,
            scope,
            point,
        })
    }

    /// One past the largest numeric id in use.
    fn next_id(&self) -> PointId {
        let next = self
            .points
            .iter()
            .filter_map(|point| point.id.as_str().parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1);
        debug!(next, "assigned point id");
        PointId::new(next.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PointType;
    use chrono::{TimeDelta, TimeZone, Utc};

    fn point(id: &str, price: u32) -> Point {
        let from = Utc
            .with_ymd_and_hms(2024, 3, 18, 10, 0, 0)
            .single()
            .expect("valid timestamp");
        Point {
            id: PointId::new(id),
            kind: PointType::Flight,
            destination: None,
            date_from: from,
            date_to: from + TimeDelta::hours(2),
            base_price: price,
            offers: None,
        }
    }

    #[test]
    fn new_assigns_ids_to_unassigned_points() {
        let model = PointsModel::new(vec![point("7", 1), point("", 2)]).expect("points load");
        let ids: Vec<_> = model.points().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["7", "8"]);
    }

    #[test]
    fn create_assigns_the_next_id() {
        let mut model =
            PointsModel::new(vec![point("3", 10), point("x", 20)]).expect("points load");
        let event = model
            .apply(ChangeRequest::new(
                UserAction::Create,
                UpdateType::Minor,
                point("", 30),
            ))
            .expect("created");
        assert_eq!(event.point.id, PointId::new("4"));
        assert_eq!(model.len(), 3);
    }

    #[test]
    fn update_replaces_wholesale() {
        let mut model = PointsModel::new(vec![point("1", 10)]).expect("points load");
        let mut changed = point("1", 99);
        changed.kind = PointType::Ship;
        model
            .apply(ChangeRequest::new(
                UserAction::Update,
                UpdateType::Minor,
                changed.clone(),
            ))
            .expect("updated");
        assert_eq!(model.get(&PointId::new("1")), Some(&changed));
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut model = PointsModel::default();
        let err = model
            .apply(ChangeRequest::new(
                UserAction::Delete,
                UpdateType::Patch,
                point("5", 0),
            ))
            .unwrap_err();
        assert_eq!(err, ModelError::UnknownPoint(PointId::new("5")));
        assert_eq!(err.to_string(), "no point with id 5");
    }

    #[test]
    fn reversed_dates_are_refused() {
        let mut model = PointsModel::new(vec![point("1", 10)]).expect("points load");
        let mut reversed = point("1", 10);
        reversed.date_to = reversed.date_from - TimeDelta::minutes(1);
        let err = model
            .apply(ChangeRequest::new(
                UserAction::Update,
                UpdateType::Minor,
                reversed,
            ))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidDates { .. }));
    }

    #[test]
    fn delete_keeps_the_remaining_order() {
        let mut model =
            PointsModel::new(vec![point("1", 1), point("2", 2), point("3", 3)]).expect("points load");
        model
            .apply(ChangeRequest::new(
                UserAction::Delete,
                UpdateType::Patch,
                point("2", 2),
            ))
            .expect("deleted");
        let ids: Vec<_> = model.points().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn repeated_ids_are_refused_at_load() {
        let err = PointsModel::new(vec![point("1", 1), point("2", 2), point("1", 3)]).unwrap_err();
        assert_eq!(err, ModelError::DuplicatePoint(PointId::new("1")));
        assert_eq!(err.to_string(), "a point with id 1 already exists");
    }

    #[test]
    fn unassigned_ids_never_collide_with_later_ones() {
        let model = PointsModel::new(vec![point("", 1), point("1", 2)]).expect("points load");
        let ids: Vec<_> = model.points().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
    }

    #[test]
    fn reversed_dates_are_refused_at_load() {
        let mut reversed = point("2", 2);
        reversed.date_to = reversed.date_from - TimeDelta::hours(1);
        let err = PointsModel::new(vec![point("1", 1), reversed]).unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidDates {
                id: PointId::new("2")
            }
        );
    }
}

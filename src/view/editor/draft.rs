use crate::domain::{Catalog, Point};

use super::strategy::FieldChange;

/// Edit buffer: a working copy of a point plus the flags the form derives from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub point: Point,
    pub has_offers_section: bool,
    pub has_destination_section: bool,
    pub is_new_point: bool,
}

impl Draft {
    pub fn from_point(point: &Point) -> Self {
        Self {
            point: point.clone(),
            has_offers_section: point.offers.is_some(),
            has_destination_section: point.destination.is_some(),
            is_new_point: point.is_new(),
        }
    }

    /// The committed shape of the draft, without the derived flags.
    pub fn to_point(&self) -> Point {
        self.point.clone()
    }

    pub fn into_point(self) -> Point {
        self.point
    }

    pub fn apply(&mut self, change: &FieldChange, catalog: &Catalog) {
        let point = &mut self.point;
        match change {
            FieldChange::Type(kind) => {
                point.kind = *kind;
                // offer ids are scoped per type, so a selection never carries over
                self.has_offers_section = !catalog.offers_for(*kind).is_empty();
                point.offers = self.has_offers_section.then(Vec::new);
            }
            FieldChange::Destination(id) => {
                point.destination = Some(*id);
                self.has_destination_section = true;
            }
            FieldChange::Price(price) => point.base_price = *price,
            FieldChange::OfferToggled { offer, checked } => {
                let offers = point.offers.get_or_insert_with(Vec::new);
                if *checked {
                    if !offers.contains(offer) {
                        offers.push(*offer);
                    }
                } else {
                    offers.retain(|id| id != offer);
                }
            }
            FieldChange::DateFrom(date) => {
                point.date_from = *date;
                if point.date_to < *date {
                    point.date_to = *date;
                }
            }
            FieldChange::DateTo(date) => point.date_to = (*date).max(point.date_from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DestinationId, OfferId, PointId, PointType};
    use chrono::{TimeDelta, TimeZone, Utc};

    fn committed() -> Point {
        let from = Utc
            .with_ymd_and_hms(2024, 3, 18, 10, 0, 0)
            .single()
            .expect("valid timestamp");
        Point {
            id: PointId::new("1"),
            kind: PointType::Flight,
            destination: None,
            date_from: from,
            date_to: from + TimeDelta::hours(2),
            base_price: 300,
            offers: Some(vec![OfferId(1), OfferId(3)]),
        }
    }

    #[test]
    fn derives_flags_from_point() {
        let draft = Draft::from_point(&committed());
        assert!(draft.has_offers_section);
        assert!(!draft.has_destination_section);
        assert!(!draft.is_new_point);
        assert!(Draft::from_point(&Point::blank(Utc::now())).is_new_point);
    }

    #[test]
    fn to_point_is_inverse_of_from_point() {
        let point = committed();
        assert_eq!(Draft::from_point(&point).to_point(), point);
    }

    #[test]
    fn type_change_resets_offers_for_new_type() {
        let catalog = Catalog::demo();
        let mut draft = Draft::from_point(&committed());
        draft.apply(&FieldChange::Type(PointType::Sightseeing), &catalog);
        assert!(!draft.has_offers_section);
        assert_eq!(draft.point.offers, None);
        draft.apply(&FieldChange::Type(PointType::Taxi), &catalog);
        assert!(draft.has_offers_section);
        assert_eq!(draft.point.offers, Some(Vec::new()));
    }

    #[test]
    fn offer_toggle_appends_and_removes() {
        let catalog = Catalog::demo();
        let mut draft = Draft::from_point(&committed());
        draft.apply(
            &FieldChange::OfferToggled {
                offer: OfferId(2),
                checked: true,
            },
            &catalog,
        );
        draft.apply(
            &FieldChange::OfferToggled {
                offer: OfferId(1),
                checked: false,
            },
            &catalog,
        );
        assert_eq!(draft.point.offers, Some(vec![OfferId(3), OfferId(2)]));
    }

    #[test]
    fn moving_from_past_to_drags_to_along() {
        let catalog = Catalog::demo();
        let mut draft = Draft::from_point(&committed());
        let later = draft.point.date_to + TimeDelta::hours(5);
        draft.apply(&FieldChange::DateFrom(later), &catalog);
        assert_eq!(draft.point.date_to, later);
        draft.apply(&FieldChange::DateTo(later - TimeDelta::hours(1)), &catalog);
        assert!(draft.point.has_ordered_dates());
    }

    #[test]
    fn destination_change_opens_section() {
        let catalog = Catalog::demo();
        let mut draft = Draft::from_point(&committed());
        draft.apply(&FieldChange::Destination(DestinationId(3)), &catalog);
        assert!(draft.has_destination_section);
        assert_eq!(draft.point.destination, Some(DestinationId(3)));
    }
}

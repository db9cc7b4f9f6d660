use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::point::{DestinationId, OfferId, Point, PointType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Picture {
    pub src: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Destination {
    pub id: DestinationId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pictures: Vec<Picture>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Offer {
    pub id: OfferId,
    pub title: String,
    pub price: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OffersByType {
    #[serde(rename = "type")]
    pub kind: PointType,
    pub offers: Vec<Offer>,
}

/// Serialized form of a [`Catalog`], as it appears in itinerary documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogData {
    #[serde(default)]
    pub destinations: Vec<Destination>,
    #[serde(default)]
    pub offers: Vec<OffersByType>,
}

/// Lookup tables for destinations and the offers each point type supports.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    destinations: IndexMap<DestinationId, Destination>,
    offers: IndexMap<PointType, Vec<Offer>>,
}

impl Catalog {
    pub fn new(data: CatalogData) -> Self {
        let destinations = data
            .destinations
            .into_iter()
            .map(|destination| (destination.id, destination))
            .collect();
        let mut offers: IndexMap<PointType, Vec<Offer>> = IndexMap::new();
        for group in data.offers {
            offers.entry(group.kind).or_default().extend(group.offers);
        }
        Self {
            destinations,
            offers,
        }
    }

    pub fn destination(&self, id: DestinationId) -> Option<&Destination> {
        self.destinations.get(&id)
    }

    /// Case-insensitive match on the trimmed name.
    pub fn destination_by_name(&self, name: &str) -> Option<&Destination> {
        let needle = name.trim();
        if needle.is_empty() {
            return None;
        }
        self.destinations
            .values()
            .find(|destination| destination.name.eq_ignore_ascii_case(needle))
    }

    pub fn destination_name(&self, id: Option<DestinationId>) -> Option<&str> {
        id.and_then(|id| self.destination(id))
            .map(|destination| destination.name.as_str())
    }

    pub fn destinations(&self) -> impl Iterator<Item = &Destination> {
        self.destinations.values()
    }

    pub fn offers_for(&self, kind: PointType) -> &[Offer] {
        self.offers.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn offer(&self, kind: PointType, id: OfferId) -> Option<&Offer> {
        self.offers_for(kind).iter().find(|offer| offer.id == id)
    }

    /// Base price plus every selected offer that resolves for the point's type.
    pub fn total_price(&self, point: &Point) -> u64 {
        let extras: u64 = point
            .selected_offers()
            .iter()
            .filter_map(|id| self.offer(point.kind, *id))
            .map(|offer| u64::from(offer.price))
            .sum();
        u64::from(point.base_price) + extras
    }

    pub fn to_data(&self) -> CatalogData {
        CatalogData {
            destinations: self.destinations.values().cloned().collect(),
            offers: self
                .offers
                .iter()
                .map(|(kind, offers)| OffersByType {
                    kind: *kind,
                    offers: offers.clone(),
                })
                .collect(),
        }
    }

    /// Small built-in catalog used when a document ships none.
    pub fn demo() -> Self {
        let destination = |id: u32, name: &str, description: &str| Destination {
            id: DestinationId(id),
            name: name.to_string(),
            description: description.to_string(),
            pictures: vec![Picture {
                src: format!("img/photos/{id}.jpg"),
                description: format!("{name} at dawn"),
            }],
        };
        let offer = |id: u32, title: &str, price: u32| Offer {
            id: OfferId(id),
            title: title.to_string(),
            price,
        };
        let group = |kind: PointType, offers: Vec<Offer>| OffersByType { kind, offers };
        Self::new(CatalogData {
            destinations: vec![
                destination(
                    1,
                    "Amsterdam",
                    "Amsterdam, a city of canals, narrow houses and bicycles everywhere.",
                ),
                destination(
                    2,
                    "Geneva",
                    "Geneva, a city in Switzerland on the shore of the lake with the same name.",
                ),
                destination(
                    3,
                    "Chamonix",
                    "Chamonix, a resort at the foot of Mont Blanc, the highest summit of the Alps.",
                ),
            ],
            offers: vec![
                group(
                    PointType::Taxi,
                    vec![
                        offer(1, "Upgrade to a business class", 120),
                        offer(2, "Choose the radio station", 60),
                    ],
                ),
                group(
                    PointType::Bus,
                    vec![
                        offer(1, "Infotainment system", 50),
                        offer(2, "Order meal", 100),
                        offer(3, "Choose seats", 5),
                    ],
                ),
                group(
                    PointType::Train,
                    vec![
                        offer(1, "Book a taxi at the arrival point", 110),
                        offer(2, "Order a breakfast", 80),
                    ],
                ),
                group(
                    PointType::Ship,
                    vec![
                        offer(1, "Choose meal", 130),
                        offer(2, "Upgrade to comfort class", 170),
                    ],
                ),
                group(
                    PointType::Drive,
                    vec![offer(1, "With automatic transmission", 110)],
                ),
                group(
                    PointType::Flight,
                    vec![
                        offer(1, "Choose meal", 120),
                        offer(2, "Choose seats", 90),
                        offer(3, "Upgrade to comfort class", 120),
                        offer(4, "Upgrade to business class", 170),
                    ],
                ),
                group(
                    PointType::CheckIn,
                    vec![
                        offer(1, "Choose the time of check-in", 70),
                        offer(2, "Add breakfast", 110),
                    ],
                ),
                group(
                    PointType::Restaurant,
                    vec![offer(1, "Choose live music", 150)],
                ),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PointId;
    use chrono::Utc;

    #[test]
    fn finds_destinations_by_name_ignoring_case() {
        let catalog = Catalog::demo();
        let found = catalog.destination_by_name("  geneva ").expect("known city");
        assert_eq!(found.id, DestinationId(2));
        assert!(catalog.destination_by_name("Atlantis").is_none());
        assert!(catalog.destination_by_name("   ").is_none());
    }

    #[test]
    fn sightseeing_has_no_offers() {
        let catalog = Catalog::demo();
        assert!(catalog.offers_for(PointType::Sightseeing).is_empty());
        assert_eq!(catalog.offers_for(PointType::Flight).len(), 4);
    }

    #[test]
    fn total_price_skips_unknown_offers() {
        let catalog = Catalog::demo();
        let mut point = Point::blank(Utc::now());
        point.id = PointId::new("1");
        point.kind = PointType::Taxi;
        point.base_price = 20;
        point.offers = Some(vec![OfferId(2), OfferId(99)]);
        assert_eq!(catalog.total_price(&point), 80);
    }

    #[test]
    fn data_round_trips_through_catalog() {
        let catalog = Catalog::demo();
        let data = catalog.to_data();
        let rebuilt = Catalog::new(data.clone());
        assert_eq!(rebuilt.to_data(), data);
    }
}

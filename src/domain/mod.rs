mod catalog;
mod change;
mod point;
mod sort;
mod summary;

pub use catalog::{Catalog, CatalogData, Destination, Offer, OffersByType, Picture};
pub use change::{ChangeRequest, UpdateType, UserAction};
pub use point::{
    DestinationId, OfferId, Point, PointId, PointType, format_duration, normalize_timestamp,
};
pub use sort::SortKind;
pub use summary::TripSummary;

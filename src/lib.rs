#![deny(rust_2018_idioms)]
//! Terminal itinerary editor: trip points shown as cards, one inline edit form open at a time.

mod app;
pub mod domain;
pub mod io;
pub mod model;
mod presentation;
pub mod presenter;
pub mod render;
pub mod view;

pub use app::{Tripdeck, UiOptions};
pub use domain::{Catalog, ChangeRequest, Point, PointId, PointType, UpdateType, UserAction};
pub use io::{
    DocumentError, DocumentFormat, ItineraryDocument, OutputDestination, OutputOptions, emit,
    load_document, parse_document_str, parse_itinerary,
};
pub use model::{ModelError, ModelEvent, PointsModel};
pub use view::{DateFormatError, check_date_format};

pub mod prelude {
    pub use super::{ItineraryDocument, Point, Tripdeck, UiOptions};
}

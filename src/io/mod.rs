//! Loading and emitting itinerary documents.

mod document;
mod format;
mod input;
mod output;

pub use document::{DocumentError, ItineraryDocument, document_schema};
pub use format::DocumentFormat;
pub use input::{load_document, parse_document_str, parse_itinerary};
pub use output::{OutputDestination, OutputOptions, emit};

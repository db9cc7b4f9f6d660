//! Terminal painter for the render tree.

mod body;
mod elements;
mod footer;
mod header;
mod view;

pub use view::{UiContext, draw};

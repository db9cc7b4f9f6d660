//! Retained element tree and the generic mount/replace/unmount primitives views are rendered with.

mod document;
mod markup;
mod tree;
mod view;

pub use document::{Document, KeySubscription};
pub use markup::{Control, Element, Markup};
pub use tree::{Listener, NodeId, RenderTree};
pub use view::{RenderPosition, View, remove, render, render_at, replace, update_element};

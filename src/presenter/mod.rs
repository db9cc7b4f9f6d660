//! Presenters own views, switch them between modes and turn user intent into change requests.

mod list;
mod new_point;
mod point;

use std::rc::Rc;

use crate::domain::{ChangeRequest, Point};

pub use list::ListPresenter;
pub use new_point::NewPointPresenter;
pub use point::{Mode, PointPresenter};

/// Downstream change boundary. Fire-and-forget: nothing is returned to the presenter.
pub type ChangeHandler = Rc<dyn Fn(ChangeRequest)>;

/// Notifications the point views hand back to their presenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointMessage {
    OpenEditor,
    Submit(Point),
    Close,
    Delete(Point),
}

/// What a presenter did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Handled,
    /// The card asked for its editor. The owner must reset every other presenter before calling
    /// [`PointPresenter::open_editor`].
    EditRequested,
}

/// Form buttons reachable from anywhere in the form through shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Submit,
    Close,
    Delete,
}

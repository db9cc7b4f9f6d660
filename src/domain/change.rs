use super::point::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAction {
    Create,
    Update,
    Delete,
}

/// How much of the surrounding UI has to refresh once a change lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateType {
    /// Rebuild everything, including the sort control.
    Major,
    /// Rebuild the list in its current order.
    Minor,
    /// Redraw the single affected card in place.
    Patch,
}

/// Message a presenter sends upward to request a data mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRequest {
    pub action: UserAction,
    pub scope: UpdateType,
    pub point: Point,
}

impl ChangeRequest {
    pub fn new(action: UserAction, scope: UpdateType, point: Point) -> Self {
        Self {
            action,
            scope,
            point,
        }
    }
}

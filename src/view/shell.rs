use crate::{
    domain::SortKind,
    render::{Control, Element, Markup, NodeId, View},
};

/// Container element the point cards are rendered into.
#[derive(Debug, Default)]
pub struct TripListView {
    element: Option<NodeId>,
}

impl TripListView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl View for TripListView {
    fn template(&self) -> Markup {
        Markup::new("trip-events__list")
    }

    fn element_id(&self) -> Option<NodeId> {
        self.element
    }

    fn set_element_id(&mut self, id: Option<NodeId>) {
        self.element = id;
    }
}

#[derive(Debug, Default)]
pub struct EmptyListView {
    element: Option<NodeId>,
}

impl EmptyListView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl View for EmptyListView {
    fn template(&self) -> Markup {
        Markup::new("trip-events__msg")
            .with(Element::Heading(
                "Press Ctrl+N to create your first point".to_string(),
            ))
    }

    fn element_id(&self) -> Option<NodeId> {
        self.element
    }

    fn set_element_id(&mut self, id: Option<NodeId>) {
        self.element = id;
    }
}

#[derive(Debug)]
pub struct SortView {
    current: SortKind,
    element: Option<NodeId>,
}

impl SortView {
    pub fn new(current: SortKind) -> Self {
        Self {
            current,
            element: None,
        }
    }

    pub fn current(&self) -> SortKind {
        self.current
    }
}

impl View for SortView {
    fn template(&self) -> Markup {
        let options = SortKind::ALL
            .iter()
            .map(|kind| kind.label().to_string())
            .collect();
        let selected = SortKind::ALL
            .iter()
            .position(|kind| *kind == self.current)
            .unwrap_or(0);
        Markup::new("trip-sort").with(Element::Choice {
            control: Control::Sort(self.current),
            label: "Sort".to_string(),
            options,
            selected,
        })
    }

    fn element_id(&self) -> Option<NodeId> {
        self.element
    }

    fn set_element_id(&mut self, id: Option<NodeId>) {
        self.element = id;
    }
}

use crate::domain::{OfferId, SortKind};

/// Interactive spots inside an element. Focus and listeners are keyed by these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Control {
    OpenEditor,
    Type,
    Destination,
    DateFrom,
    DateTo,
    Price,
    Offer(OfferId),
    Save,
    Reset,
    Rollup,
    Sort(SortKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Heading(String),
    Text(String),
    Muted(String),
    Input {
        control: Control,
        label: String,
        value: String,
    },
    Choice {
        control: Control,
        label: String,
        options: Vec<String>,
        selected: usize,
    },
    Checkbox {
        control: Control,
        label: String,
        checked: bool,
    },
    Button {
        control: Control,
        label: String,
    },
    Picture {
        src: String,
        description: String,
    },
}

impl Element {
    pub fn control(&self) -> Option<Control> {
        match self {
            Element::Input { control, .. }
            | Element::Choice { control, .. }
            | Element::Checkbox { control, .. }
            | Element::Button { control, .. } => Some(*control),
            _ => None,
        }
    }
}

/// Rendered content of one element: a class name plus a flat run of typed elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    pub class: &'static str,
    pub elements: Vec<Element>,
}

impl Markup {
    pub fn new(class: &'static str) -> Self {
        Self {
            class,
            elements: Vec::new(),
        }
    }

    pub fn with(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Controls in document (tab) order.
    pub fn controls(&self) -> Vec<Control> {
        self.elements.iter().filter_map(Element::control).collect()
    }

    pub fn has_control(&self, control: Control) -> bool {
        self.elements
            .iter()
            .any(|element| element.control() == Some(control))
    }

    pub fn value(&self, control: Control) -> Option<&str> {
        self.elements.iter().find_map(|element| match element {
            Element::Input {
                control: found,
                value,
                ..
            } if *found == control => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn checked(&self, control: Control) -> Option<bool> {
        self.elements.iter().find_map(|element| match element {
            Element::Checkbox {
                control: found,
                checked,
                ..
            } if *found == control => Some(*checked),
            _ => None,
        })
    }

    pub(super) fn set_value(&mut self, control: Control, new_value: &str) -> bool {
        for element in &mut self.elements {
            if let Element::Input { control: found, value, .. } = element
                && *found == control
            {
                value.clear();
                value.push_str(new_value);
                return true;
            }
        }
        false
    }

    pub(super) fn set_checked(&mut self, control: Control, state: bool) -> bool {
        for element in &mut self.elements {
            if let Element::Checkbox { control: found, checked, .. } = element
                && *found == control
            {
                *checked = state;
                return true;
            }
        }
        false
    }
}

use chrono::{DateTime, Utc};

use crate::domain::{DestinationId, OfferId, PointType};

/// A single mutation of the draft, as produced by one form event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Type(PointType),
    Destination(DestinationId),
    Price(u32),
    OfferToggled { offer: OfferId, checked: bool },
    DateFrom(DateTime<Utc>),
    DateTo(DateTime<Utc>),
}

/// `Full` rebuilds the element, its listeners and both pickers; `Partial` only touches the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStrategy {
    Full,
    Partial,
}

impl FieldChange {
    /// Type and destination change which sections exist. Everything else is edited through a
    /// live control (text input, checkbox, picker) that a rebuild would destroy mid-interaction.
    pub fn strategy(&self) -> RenderStrategy {
        match self {
            FieldChange::Type(_) => RenderStrategy::Full,
            FieldChange::Destination(_) => RenderStrategy::Full,
            FieldChange::Price(_) => RenderStrategy::Partial,
            FieldChange::OfferToggled { .. } => RenderStrategy::Partial,
            FieldChange::DateFrom(_) => RenderStrategy::Partial,
            FieldChange::DateTo(_) => RenderStrategy::Partial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_section_changing_fields_rebuild() {
        let now = Utc::now();
        let table = [
            (FieldChange::Type(PointType::Taxi), RenderStrategy::Full),
            (
                FieldChange::Destination(DestinationId(1)),
                RenderStrategy::Full,
            ),
            (FieldChange::Price(10), RenderStrategy::Partial),
            (
                FieldChange::OfferToggled {
                    offer: OfferId(1),
                    checked: true,
                },
                RenderStrategy::Partial,
            ),
            (FieldChange::DateFrom(now), RenderStrategy::Partial),
            (FieldChange::DateTo(now), RenderStrategy::Partial),
        ];
        for (change, expected) in table {
            assert_eq!(change.strategy(), expected, "{change:?}");
        }
    }
}

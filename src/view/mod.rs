//! Views: the read-only card, the stateful edit form and the list shell around them.

mod card;
mod editor;
mod picker;
mod shell;

use std::{fmt, rc::Rc};

use tracing::warn;

use crate::domain::Catalog;

pub use card::PointView;
pub use editor::{Draft, EditPointView, FieldChange, RenderStrategy};
pub use picker::{
    DEFAULT_DATE_FORMAT, DateFormatError, DatePart, DatePicker, DatePickerFactory, PickerConfig,
    PickerOption, StepPicker, StepPickerFactory, check_date_format,
};
pub use shell::{EmptyListView, SortView, TripListView};

/// Collaborators every point view needs; cheap to clone.
#[derive(Clone)]
pub struct ViewServices {
    pub catalog: Rc<Catalog>,
    pub pickers: Rc<dyn DatePickerFactory>,
    pub date_format: Rc<str>,
}

impl ViewServices {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Rc::new(catalog),
            pickers: Rc::new(StepPickerFactory),
            date_format: Rc::from(DEFAULT_DATE_FORMAT),
        }
    }

    pub fn with_pickers(mut self, pickers: Rc<dyn DatePickerFactory>) -> Self {
        self.pickers = pickers;
        self
    }

    /// Formats chrono cannot render are ignored and the current one is kept.
    pub fn with_date_format(mut self, format: impl AsRef<str>) -> Self {
        let format = format.as_ref();
        match check_date_format(format) {
            Ok(()) => self.date_format = Rc::from(format),
            Err(err) => warn!(error = %err, kept = %self.date_format, "date format ignored"),
        }
        self
    }
}

impl fmt::Debug for ViewServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewServices")
            .field("date_format", &self.date_format)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Catalog, ChangeRequest},
        io::ItineraryDocument,
        presenter::ListPresenter,
        render::RenderTree,
    };

    #[test]
    fn unusable_date_format_keeps_the_current_one() {
        let services = ViewServices::new(Catalog::demo())
            .with_date_format("%Y-%m-%d %H:%M")
            .with_date_format("%Q");
        assert_eq!(services.date_format.as_ref(), "%Y-%m-%d %H:%M");
    }

    #[test]
    fn list_renders_after_a_rejected_date_format() {
        let demo = ItineraryDocument::demo();
        let services = ViewServices::new(demo.catalog()).with_date_format("%Q");
        let mut tree = RenderTree::new();
        let mut list = ListPresenter::new(tree.root(), services, Rc::new(|_: ChangeRequest| {}));
        list.init(&mut tree, &demo.points);
        assert_eq!(list.presenters().count(), demo.points.len());
    }
}

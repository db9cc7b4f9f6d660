use anyhow::Result;
use tracing::info;

use crate::{
    domain::{Catalog, Point},
    io::ItineraryDocument,
    model::PointsModel,
};

use super::{options::UiOptions, runtime::App};

/// Entry point: edit a list of points in the terminal and get the final list back.
#[derive(Debug)]
pub struct Tripdeck {
    points: Vec<Point>,
    catalog: Option<Catalog>,
    title: Option<String>,
    options: UiOptions,
}

impl Tripdeck {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            catalog: None,
            title: None,
            options: UiOptions::default(),
        }
    }

    pub fn from_document(document: ItineraryDocument) -> Self {
        let catalog = document.catalog();
        Self::new(document.points).with_catalog(catalog)
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs the UI until the user quits and returns the points as stored at that moment.
    pub fn run(self) -> Result<Vec<Point>> {
        let Tripdeck {
            points,
            catalog,
            title,
            options,
        } = self;
        options.validate()?;
        let model = PointsModel::new(points)?;
        info!(points = model.len(), "starting editor");
        let mut app = App::new(
            model,
            catalog.unwrap_or_else(Catalog::demo),
            title.unwrap_or_else(|| "Trip".to_string()),
            options,
        );
        app.run()?;
        let points = app.into_points();
        info!(points = points.len(), "editor closed");
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_refuses_an_unrenderable_date_format() {
        let err = Tripdeck::from_document(ItineraryDocument::demo())
            .with_options(UiOptions::default().with_date_format("%Q"))
            .run()
            .unwrap_err();
        assert!(err.to_string().contains("invalid date format"));
    }

    #[test]
    fn run_refuses_duplicate_ids() {
        let mut points = ItineraryDocument::demo().points;
        points.push(points[0].clone());
        let err = Tripdeck::new(points).run().unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}

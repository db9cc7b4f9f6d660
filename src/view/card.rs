use crossterm::event::{KeyCode, KeyEvent};

use crate::{
    domain::{Point, format_duration},
    render::{Control, Element, Listener, Markup, NodeId, RenderTree, View},
};

use super::ViewServices;

type OpenEditorHandler<M> = Box<dyn Fn() -> M>;

/// Read-only card for one point. Its only event is "open editor".
pub struct PointView<M> {
    point: Point,
    services: ViewServices,
    element: Option<NodeId>,
    open_editor: Option<OpenEditorHandler<M>>,
}

impl<M> PointView<M> {
    pub fn new(point: Point, services: ViewServices) -> Self {
        Self {
            point,
            services,
            element: None,
            open_editor: None,
        }
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn set_click_open_editor_handler(
        &mut self,
        tree: &mut RenderTree,
        handler: impl Fn() -> M + 'static,
    ) {
        self.open_editor = Some(Box::new(handler));
        let id = self.element(tree);
        tree.add_listener(id, Listener::OpenEditor);
    }

    pub fn handle_key(&self, tree: &RenderTree, key: &KeyEvent) -> Option<M> {
        match key.code {
            KeyCode::Enter => self.click_open_editor(tree),
            _ => None,
        }
    }

    pub fn click_open_editor(&self, tree: &RenderTree) -> Option<M> {
        let id = self.element?;
        if !tree.has_listener(id, Listener::OpenEditor) {
            return None;
        }
        self.open_editor.as_ref().map(|handler| handler())
    }
}

impl<M> View for PointView<M> {
    fn template(&self) -> Markup {
        let point = &self.point;
        let catalog = &self.services.catalog;
        let destination = catalog
            .destination_name(point.destination)
            .unwrap_or("unknown destination");
        let mut markup = Markup::new("trip-events__item")
            .with(Element::Heading(format!(
                "{}  {} {}",
                point.date_from.format("%b %d").to_string().to_uppercase(),
                point.kind.label(),
                destination
            )))
            .with(Element::Text(format!(
                "{} — {}  ({})",
                point.date_from.format("%H:%M"),
                point.date_to.format("%H:%M"),
                format_duration(point.duration())
            )))
            .with(Element::Text(format!("€ {}", catalog.total_price(point))));

        let offers: Vec<_> = point
            .selected_offers()
            .iter()
            .filter_map(|id| catalog.offer(point.kind, *id))
            .collect();
        if !offers.is_empty() {
            markup.push(Element::Muted("Offers:".to_string()));
            for offer in offers {
                markup.push(Element::Muted(format!(
                    "  {} +€ {}",
                    offer.title, offer.price
                )));
            }
        }
        markup.with(Element::Button {
            control: Control::OpenEditor,
            label: "Open event ▾".to_string(),
        })
    }

    fn element_id(&self) -> Option<NodeId> {
        self.element
    }

    fn set_element_id(&mut self, id: Option<NodeId>) {
        self.element = id;
    }

    fn on_create(&mut self, tree: &mut RenderTree, id: NodeId) {
        if self.open_editor.is_some() {
            tree.add_listener(id, Listener::OpenEditor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Catalog, DestinationId, OfferId, PointId, PointType};
    use chrono::{TimeDelta, TimeZone, Utc};
    use crossterm::event::KeyModifiers;

    fn point() -> Point {
        let from = Utc
            .with_ymd_and_hms(2024, 3, 18, 10, 30, 0)
            .single()
            .expect("valid timestamp");
        Point {
            id: PointId::new("1"),
            kind: PointType::Taxi,
            destination: Some(DestinationId(1)),
            date_from: from,
            date_to: from + TimeDelta::minutes(30),
            base_price: 20,
            offers: Some(vec![OfferId(2), OfferId(42)]),
        }
    }

    #[test]
    fn template_lists_resolvable_offers_only() {
        let view: PointView<()> = PointView::new(point(), ViewServices::new(Catalog::demo()));
        let markup = view.template();
        assert_eq!(
            markup.elements[0],
            Element::Heading("MAR 18  Taxi Amsterdam".to_string())
        );
        assert_eq!(
            markup.elements[1],
            Element::Text("10:30 — 11:00  (30M)".to_string())
        );
        let muted: Vec<_> = markup
            .elements
            .iter()
            .filter(|element| matches!(element, Element::Muted(_)))
            .collect();
        assert_eq!(muted.len(), 2);
        assert_eq!(markup.elements[2], Element::Text("€ 80".to_string()));
    }

    #[test]
    fn enter_emits_only_with_registered_handler() {
        let mut tree = RenderTree::new();
        let mut view = PointView::new(point(), ViewServices::new(Catalog::demo()));
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        view.element(&mut tree);
        assert_eq!(view.handle_key(&tree, &enter), None);

        view.set_click_open_editor_handler(&mut tree, || "open");
        assert_eq!(view.handle_key(&tree, &enter), Some("open"));
    }
}

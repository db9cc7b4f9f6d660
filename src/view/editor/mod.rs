//! Stateful edit form for one point.
//!
//! Every form event is turned into a [`FieldChange`] and applied to the [`Draft`]. The change's
//! [`RenderStrategy`] decides whether the element is rebuilt (re-running [`View::on_create`],
//! which reattaches listeners and recreates both date pickers) or left alone while the live
//! control already shows the new value.

mod draft;
mod strategy;

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use regex::Regex;
use tracing::{debug, trace};

use crate::{
    domain::{OfferId, Point, PointType, normalize_timestamp},
    render::{Control, Element, Listener, Markup, NodeId, RenderTree, View, update_element},
};

use super::{
    ViewServices,
    picker::{DatePicker, PickerConfig, PickerOption},
};

pub use draft::Draft;
pub use strategy::{FieldChange, RenderStrategy};

static PRICE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("price pattern compiles"));

type PointHandler<M> = Box<dyn Fn(Point) -> M>;
type ClickHandler<M> = Box<dyn Fn() -> M>;

struct Callbacks<M> {
    form_submit: Option<PointHandler<M>>,
    close_click: Option<ClickHandler<M>>,
    delete_click: Option<PointHandler<M>>,
}

impl<M> Default for Callbacks<M> {
    fn default() -> Self {
        Self {
            form_submit: None,
            close_click: None,
            delete_click: None,
        }
    }
}

pub struct EditPointView<M> {
    draft: Draft,
    services: ViewServices,
    element: Option<NodeId>,
    from_picker: Option<Box<dyn DatePicker>>,
    to_picker: Option<Box<dyn DatePicker>>,
    callbacks: Callbacks<M>,
}

impl<M> EditPointView<M> {
    pub fn new(point: &Point, services: ViewServices) -> Self {
        Self {
            draft: Draft::from_point(point),
            services,
            element: None,
            from_picker: None,
            to_picker: None,
            callbacks: Callbacks::default(),
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn has_pickers(&self) -> bool {
        self.from_picker.is_some() || self.to_picker.is_some()
    }

    /// Throws the draft away and rebuilds the form from `point`.
    pub fn reset(&mut self, tree: &mut RenderTree, point: &Point) {
        self.draft = Draft::from_point(point);
        update_element(tree, self);
    }

    pub fn set_form_submit_handler(
        &mut self,
        tree: &mut RenderTree,
        handler: impl Fn(Point) -> M + 'static,
    ) {
        self.callbacks.form_submit = Some(Box::new(handler));
        let id = self.element(tree);
        tree.add_listener(id, Listener::Submit);
    }

    pub fn set_close_click_handler(
        &mut self,
        tree: &mut RenderTree,
        handler: impl Fn() -> M + 'static,
    ) {
        self.callbacks.close_click = Some(Box::new(handler));
        let id = self.element(tree);
        tree.add_listener(id, Listener::Close);
    }

    pub fn set_delete_click_handler(
        &mut self,
        tree: &mut RenderTree,
        handler: impl Fn(Point) -> M + 'static,
    ) {
        self.callbacks.delete_click = Some(Box::new(handler));
        let id = self.element(tree);
        tree.add_listener(id, Listener::Delete);
    }

    /// Moves focus onto this form, keeping the control that already had it.
    pub fn focus(&self, tree: &mut RenderTree) {
        let Some(id) = self.element else {
            return;
        };
        let control = tree.focused_control(id).unwrap_or(Control::Type);
        tree.focus(id, control);
    }

    pub fn handle_key(&mut self, tree: &mut RenderTree, key: &KeyEvent) -> Option<M> {
        let id = self.element?;
        let control = tree.focused_control(id).unwrap_or(Control::Type);
        match key.code {
            KeyCode::Tab => {
                self.step_focus(tree, id, control, 1);
                return None;
            }
            KeyCode::BackTab => {
                self.step_focus(tree, id, control, -1);
                return None;
            }
            _ => {}
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }

        match control {
            Control::Type => {
                let delta = match key.code {
                    KeyCode::Left | KeyCode::Up => -1,
                    KeyCode::Right | KeyCode::Down => 1,
                    _ => return None,
                };
                self.handle_type_change(tree, self.draft.point.kind.step(delta));
                None
            }
            Control::Destination => {
                let mut value = input_value(tree, id, Control::Destination);
                match key.code {
                    KeyCode::Char(ch) => value.push(ch),
                    KeyCode::Backspace => {
                        value.pop();
                    }
                    KeyCode::Enter => {
                        self.handle_destination_change(tree, &value);
                        return None;
                    }
                    _ => return None,
                }
                tree.set_value(id, Control::Destination, &value);
                None
            }
            Control::DateFrom => {
                let dates = self.from_picker.as_mut()?.handle_key(key)?;
                self.handle_from_date_change(tree, &dates);
                None
            }
            Control::DateTo => {
                let dates = self.to_picker.as_mut()?.handle_key(key)?;
                self.handle_to_date_change(tree, &dates);
                None
            }
            Control::Price => {
                let mut value = input_value(tree, id, Control::Price);
                match key.code {
                    KeyCode::Char(ch) => value.push(ch),
                    KeyCode::Backspace => {
                        value.pop();
                    }
                    KeyCode::Delete => value = "0".to_string(),
                    _ => return None,
                }
                self.handle_price_input(tree, &value);
                None
            }
            Control::Offer(offer) => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter => {
                    self.handle_offer_toggle(tree, offer);
                    None
                }
                _ => None,
            },
            Control::Save if key.code == KeyCode::Enter => self.submit(tree),
            Control::Reset if key.code == KeyCode::Enter => self.delete(tree),
            Control::Rollup if key.code == KeyCode::Enter => self.close(tree),
            _ => None,
        }
    }

    /// Type radio `change` event.
    pub fn handle_type_change(&mut self, tree: &mut RenderTree, kind: PointType) {
        if !self.listening(tree, Listener::TypeChange) || kind == self.draft.point.kind {
            return;
        }
        self.apply_change(tree, FieldChange::Type(kind));
    }

    /// Destination input `change` event. Unknown names revert the input.
    pub fn handle_destination_change(&mut self, tree: &mut RenderTree, name: &str) -> bool {
        let Some(id) = self.element else {
            return false;
        };
        if !tree.has_listener(id, Listener::DestinationChange) {
            return false;
        }
        let resolved = self
            .services
            .catalog
            .destination_by_name(name)
            .map(|destination| destination.id);
        match resolved {
            Some(destination) => {
                self.apply_change(tree, FieldChange::Destination(destination));
                true
            }
            None => {
                trace!(name, "unknown destination rejected");
                let current = self
                    .services
                    .catalog
                    .destination_name(self.draft.point.destination)
                    .unwrap_or_default()
                    .to_string();
                tree.set_value(id, Control::Destination, &current);
                false
            }
        }
    }

    /// Price input `input` event carrying the whole input value. Anything but digits reverts the
    /// input to the last accepted price.
    pub fn handle_price_input(&mut self, tree: &mut RenderTree, raw: &str) -> bool {
        let Some(id) = self.element else {
            return false;
        };
        if !tree.has_listener(id, Listener::PriceInput) {
            return false;
        }
        let parsed = PRICE_PATTERN
            .is_match(raw)
            .then(|| raw.parse::<u32>().ok())
            .flatten();
        match parsed {
            Some(price) => {
                tree.set_value(id, Control::Price, raw);
                self.apply_change(tree, FieldChange::Price(price));
                true
            }
            None => {
                trace!(raw, "price input rejected");
                let last = self.draft.point.base_price.to_string();
                tree.set_value(id, Control::Price, &last);
                false
            }
        }
    }

    /// Offer checkbox `change` event.
    pub fn handle_offer_toggle(&mut self, tree: &mut RenderTree, offer: OfferId) {
        let Some(id) = self.element else {
            return;
        };
        if !tree.has_listener(id, Listener::OffersChange) {
            return;
        }
        let control = Control::Offer(offer);
        let Some(checked) = tree.markup(id).and_then(|markup| markup.checked(control)) else {
            return;
        };
        tree.set_checked(id, control, !checked);
        self.apply_change(
            tree,
            FieldChange::OfferToggled {
                offer,
                checked: !checked,
            },
        );
    }

    fn handle_from_date_change(&mut self, tree: &mut RenderTree, dates: &[DateTime<Utc>]) {
        let Some(date) = dates.first().copied().map(normalize_timestamp) else {
            return;
        };
        self.apply_change(tree, FieldChange::DateFrom(date));
        if let Some(picker) = self.to_picker.as_mut() {
            picker.set(PickerOption::MinDate(date));
        }
        self.sync_picker_inputs(tree);
    }

    fn handle_to_date_change(&mut self, tree: &mut RenderTree, dates: &[DateTime<Utc>]) {
        let Some(date) = dates.first().copied().map(normalize_timestamp) else {
            return;
        };
        self.apply_change(tree, FieldChange::DateTo(date));
        self.sync_picker_inputs(tree);
    }

    /// Save button. The date ordering check is the only gate.
    pub fn submit(&self, tree: &RenderTree) -> Option<M> {
        if !self.listening(tree, Listener::Submit) {
            return None;
        }
        if !self.draft.point.has_ordered_dates() {
            debug!(id = %self.draft.point.id, "submit refused: dates out of order");
            return None;
        }
        let handler = self.callbacks.form_submit.as_ref()?;
        Some(handler(self.draft.to_point()))
    }

    /// Rollup button; absent on creation forms.
    pub fn close(&self, tree: &RenderTree) -> Option<M> {
        if !self.listening(tree, Listener::Close) || !self.shows(tree, Control::Rollup) {
            return None;
        }
        self.callbacks.close_click.as_ref().map(|handler| handler())
    }

    /// Delete button, labelled "Cancel" on creation forms.
    pub fn delete(&self, tree: &RenderTree) -> Option<M> {
        if !self.listening(tree, Listener::Delete) || !self.shows(tree, Control::Reset) {
            return None;
        }
        let handler = self.callbacks.delete_click.as_ref()?;
        Some(handler(self.draft.to_point()))
    }

    fn apply_change(&mut self, tree: &mut RenderTree, change: FieldChange) {
        let strategy = change.strategy();
        self.draft.apply(&change, &self.services.catalog);
        debug!(?change, ?strategy, "draft updated");
        if strategy == RenderStrategy::Full {
            update_element(tree, self);
        }
    }

    fn sync_picker_inputs(&self, tree: &mut RenderTree) {
        let Some(id) = self.element else {
            return;
        };
        if let Some(picker) = &self.from_picker {
            tree.set_value(id, Control::DateFrom, &picker.input_value());
        }
        if let Some(picker) = &self.to_picker {
            tree.set_value(id, Control::DateTo, &picker.input_value());
        }
    }

    fn step_focus(&self, tree: &mut RenderTree, id: NodeId, current: Control, delta: i32) {
        let Some(controls) = tree.markup(id).map(Markup::controls) else {
            return;
        };
        if controls.is_empty() {
            return;
        }
        let len = controls.len() as i32;
        let index = controls
            .iter()
            .position(|control| *control == current)
            .unwrap_or(0) as i32;
        let next = controls[(index + delta).rem_euclid(len) as usize];
        tree.focus(id, next);
    }

    fn listening(&self, tree: &RenderTree, listener: Listener) -> bool {
        self.element
            .is_some_and(|id| tree.has_listener(id, listener))
    }

    fn shows(&self, tree: &RenderTree, control: Control) -> bool {
        self.element
            .and_then(|id| tree.markup(id))
            .is_some_and(|markup| markup.has_control(control))
    }

    fn set_inner_handlers(&mut self, tree: &mut RenderTree, id: NodeId) {
        tree.add_listener(id, Listener::TypeChange);
        tree.add_listener(id, Listener::DestinationChange);
        tree.add_listener(id, Listener::PriceInput);
        if self.draft.has_offers_section {
            tree.add_listener(id, Listener::OffersChange);
        }
        self.set_date_pickers();
    }

    fn set_date_pickers(&mut self) {
        let point = &self.draft.point;
        let config = |default_date, min_date| PickerConfig {
            enable_time: true,
            date_format: self.services.date_format.to_string(),
            default_date,
            min_date,
        };
        let from = self.services.pickers.create(config(point.date_from, None));
        let to = self
            .services
            .pickers
            .create(config(point.date_to, Some(point.date_from)));
        self.from_picker = Some(from);
        self.to_picker = Some(to);
    }

    fn release_date_pickers(&mut self) {
        for mut picker in [self.from_picker.take(), self.to_picker.take()]
            .into_iter()
            .flatten()
        {
            picker.destroy();
        }
    }

    fn restore_handlers(&self, tree: &mut RenderTree, id: NodeId) {
        if self.callbacks.form_submit.is_some() {
            tree.add_listener(id, Listener::Submit);
        }
        if self.callbacks.close_click.is_some() {
            tree.add_listener(id, Listener::Close);
        }
        if self.callbacks.delete_click.is_some() {
            tree.add_listener(id, Listener::Delete);
        }
    }
}

impl<M> View for EditPointView<M> {
    fn template(&self) -> Markup {
        let Draft {
            point,
            has_offers_section,
            has_destination_section,
            is_new_point,
        } = &self.draft;
        let catalog = &self.services.catalog;
        let format = self.services.date_format.as_ref();

        let destination_name = catalog.destination_name(point.destination).unwrap_or_default();
        let known = catalog
            .destinations()
            .map(|destination| destination.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let mut markup = Markup::new("event--edit")
            .with(Element::Choice {
                control: Control::Type,
                label: "Type".to_string(),
                options: PointType::ALL
                    .iter()
                    .map(|kind| kind.label().to_string())
                    .collect(),
                selected: point.kind.index(),
            })
            .with(Element::Input {
                control: Control::Destination,
                label: point.kind.label().to_string(),
                value: destination_name.to_string(),
            })
            .with(Element::Muted(format!("Destinations: {known}")))
            .with(Element::Input {
                control: Control::DateFrom,
                label: "From".to_string(),
                value: point.date_from.format(format).to_string(),
            })
            .with(Element::Input {
                control: Control::DateTo,
                label: "To".to_string(),
                value: point.date_to.format(format).to_string(),
            })
            .with(Element::Input {
                control: Control::Price,
                label: "€".to_string(),
                value: point.base_price.to_string(),
            })
            .with(Element::Button {
                control: Control::Save,
                label: "Save".to_string(),
            });

        if *is_new_point {
            markup.push(Element::Button {
                control: Control::Reset,
                label: "Cancel".to_string(),
            });
        } else {
            markup.push(Element::Button {
                control: Control::Reset,
                label: "Delete".to_string(),
            });
            markup.push(Element::Button {
                control: Control::Rollup,
                label: "Close ▴".to_string(),
            });
        }

        if *has_offers_section {
            markup.push(Element::Heading("Offers".to_string()));
            for offer in catalog.offers_for(point.kind) {
                markup.push(Element::Checkbox {
                    control: Control::Offer(offer.id),
                    label: format!("{} +€ {}", offer.title, offer.price),
                    checked: point.selected_offers().contains(&offer.id),
                });
            }
        }

        if *has_destination_section
            && let Some(destination) = point.destination.and_then(|id| catalog.destination(id))
        {
            markup.push(Element::Heading("Destination".to_string()));
            markup.push(Element::Text(destination.description.clone()));
            for picture in &destination.pictures {
                markup.push(Element::Picture {
                    src: picture.src.clone(),
                    description: picture.description.clone(),
                });
            }
        }
        markup
    }

    fn element_id(&self) -> Option<NodeId> {
        self.element
    }

    fn set_element_id(&mut self, id: Option<NodeId>) {
        self.element = id;
    }

    fn on_create(&mut self, tree: &mut RenderTree, id: NodeId) {
        self.set_inner_handlers(tree, id);
        self.restore_handlers(tree, id);
    }

    fn on_remove(&mut self, _tree: &mut RenderTree) {
        self.release_date_pickers();
    }
}

fn input_value(tree: &RenderTree, id: NodeId, control: Control) -> String {
    tree.markup(id)
        .and_then(|markup| markup.value(control))
        .unwrap_or_default()
        .to_string()
}

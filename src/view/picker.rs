//! Date-picker capability used by the edit form, plus the terminal implementation.

use std::fmt;

use chrono::{
    DateTime, Months, TimeDelta, Utc,
    format::{Item, StrftimeItems},
};
use crossterm::event::{KeyCode, KeyEvent};
use thiserror::Error;
use tracing::trace;

use crate::domain::normalize_timestamp;

pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%y %H:%M";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid date format {format:?}: chrono cannot render it")]
pub struct DateFormatError {
    pub format: String,
}

/// Rejects strftime strings chrono would fail on while formatting.
pub fn check_date_format(format: &str) -> Result<(), DateFormatError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(DateFormatError {
            format: format.to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerConfig {
    pub enable_time: bool,
    pub date_format: String,
    pub default_date: DateTime<Utc>,
    pub min_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerOption {
    MinDate(DateTime<Utc>),
    DefaultDate(DateTime<Utc>),
}

/// An external "pick a date, notify on change" widget.
///
/// The change notification is the return value of [`DatePicker::handle_key`]: the selected dates
/// after the interaction, or `None` when the selection did not change.
pub trait DatePicker {
    fn handle_key(&mut self, key: &KeyEvent) -> Option<Vec<DateTime<Utc>>>;
    fn set(&mut self, option: PickerOption);
    fn selected_dates(&self) -> Vec<DateTime<Utc>>;
    /// Text the widget shows in its input.
    fn input_value(&self) -> String;
    fn destroy(&mut self);
}

pub trait DatePickerFactory {
    fn create(&self, config: PickerConfig) -> Box<dyn DatePicker>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Day,
    Month,
    Year,
    Hour,
    Minute,
}

impl DatePart {
    fn step(self, delta: i32, enable_time: bool) -> Self {
        let parts: &[DatePart] = if enable_time {
            &[
                DatePart::Day,
                DatePart::Month,
                DatePart::Year,
                DatePart::Hour,
                DatePart::Minute,
            ]
        } else {
            &[DatePart::Day, DatePart::Month, DatePart::Year]
        };
        let index = parts.iter().position(|part| *part == self).unwrap_or(0) as i32;
        let next = (index + delta).rem_euclid(parts.len() as i32);
        parts[next as usize]
    }
}

/// Keyboard picker: Left/Right choose the date part, Up/Down adjust it.
pub struct StepPicker {
    config: PickerConfig,
    selected: DateTime<Utc>,
    part: DatePart,
    destroyed: bool,
}

impl fmt::Debug for StepPicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepPicker")
            .field("selected", &self.selected)
            .field("part", &self.part)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl StepPicker {
    pub fn new(config: PickerConfig) -> Self {
        let mut selected = normalize_timestamp(config.default_date);
        if let Some(min) = config.min_date
            && selected < min
        {
            selected = min;
        }
        Self {
            config,
            selected,
            part: DatePart::Day,
            destroyed: false,
        }
    }

    pub fn part(&self) -> DatePart {
        self.part
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn shifted(&self, delta: i32) -> Option<DateTime<Utc>> {
        let months = |count: u32| Months::new(count);
        match self.part {
            DatePart::Day => self
                .selected
                .checked_add_signed(TimeDelta::days(i64::from(delta))),
            DatePart::Month if delta >= 0 => self.selected.checked_add_months(months(1)),
            DatePart::Month => self.selected.checked_sub_months(months(1)),
            DatePart::Year if delta >= 0 => self.selected.checked_add_months(months(12)),
            DatePart::Year => self.selected.checked_sub_months(months(12)),
            DatePart::Hour => self
                .selected
                .checked_add_signed(TimeDelta::hours(i64::from(delta))),
            DatePart::Minute => self
                .selected
                .checked_add_signed(TimeDelta::minutes(i64::from(delta) * 5)),
        }
    }

    fn select(&mut self, candidate: DateTime<Utc>) -> Option<Vec<DateTime<Utc>>> {
        let mut candidate = normalize_timestamp(candidate);
        if let Some(min) = self.config.min_date
            && candidate < min
        {
            candidate = min;
        }
        if candidate == self.selected {
            return None;
        }
        self.selected = candidate;
        Some(vec![candidate])
    }
}

impl DatePicker for StepPicker {
    fn handle_key(&mut self, key: &KeyEvent) -> Option<Vec<DateTime<Utc>>> {
        if self.destroyed {
            return None;
        }
        match key.code {
            KeyCode::Left => {
                self.part = self.part.step(-1, self.config.enable_time);
                None
            }
            KeyCode::Right => {
                self.part = self.part.step(1, self.config.enable_time);
                None
            }
            KeyCode::Up => self.shifted(1).and_then(|date| self.select(date)),
            KeyCode::Down => self.shifted(-1).and_then(|date| self.select(date)),
            _ => None,
        }
    }

    fn set(&mut self, option: PickerOption) {
        match option {
            PickerOption::MinDate(min) => {
                self.config.min_date = Some(min);
                if self.selected < min {
                    self.selected = min;
                }
            }
            PickerOption::DefaultDate(date) => {
                self.config.default_date = date;
                self.selected = normalize_timestamp(date);
            }
        }
    }

    fn selected_dates(&self) -> Vec<DateTime<Utc>> {
        vec![self.selected]
    }

    fn input_value(&self) -> String {
        self.selected.format(&self.config.date_format).to_string()
    }

    fn destroy(&mut self) {
        trace!(selected = %self.selected, "date picker destroyed");
        self.destroyed = true;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StepPickerFactory;

impl DatePickerFactory for StepPickerFactory {
    fn create(&self, config: PickerConfig) -> Box<dyn DatePicker> {
        trace!(default = %config.default_date, "date picker created");
        Box::new(StepPicker::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crossterm::event::KeyModifiers;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn config(default_date: DateTime<Utc>, min_date: Option<DateTime<Utc>>) -> PickerConfig {
        PickerConfig {
            enable_time: true,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            default_date,
            min_date,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn date_formats_are_checked_before_use() {
        assert!(check_date_format(DEFAULT_DATE_FORMAT).is_ok());
        assert!(check_date_format("%Y-%m-%d %H:%M").is_ok());
        let err = check_date_format("%Q").unwrap_err();
        assert_eq!(err.format, "%Q");
        assert!(check_date_format("%d/%m %").is_err());
    }

    #[test]
    fn up_advances_selected_part_and_notifies() {
        let mut picker = StepPicker::new(config(at(18, 10), None));
        assert_eq!(picker.handle_key(&key(KeyCode::Up)), Some(vec![at(19, 10)]));
        picker.handle_key(&key(KeyCode::Right));
        picker.handle_key(&key(KeyCode::Right));
        picker.handle_key(&key(KeyCode::Right));
        assert_eq!(picker.part(), DatePart::Hour);
        assert_eq!(picker.handle_key(&key(KeyCode::Down)), Some(vec![at(19, 9)]));
        assert_eq!(picker.input_value(), "19/03/24 09:00");
    }

    #[test]
    fn min_date_clamps_without_notifying() {
        let mut picker = StepPicker::new(config(at(18, 10), Some(at(18, 10))));
        assert_eq!(picker.handle_key(&key(KeyCode::Down)), None);
        picker.set(PickerOption::MinDate(at(20, 8)));
        assert_eq!(picker.selected_dates(), vec![at(20, 8)]);
    }

    #[test]
    fn time_parts_are_skipped_without_enable_time() {
        let mut picker = StepPicker::new(PickerConfig {
            enable_time: false,
            ..config(at(18, 10), None)
        });
        picker.handle_key(&key(KeyCode::Left));
        assert_eq!(picker.part(), DatePart::Year);
    }

    #[test]
    fn destroyed_picker_ignores_keys() {
        let mut picker = StepPicker::new(config(at(18, 10), None));
        picker.destroy();
        assert!(picker.is_destroyed());
        assert_eq!(picker.handle_key(&key(KeyCode::Up)), None);
    }
}

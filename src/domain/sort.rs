use std::cmp::Reverse;

use super::{catalog::Catalog, point::Point};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SortKind {
    #[default]
    Day,
    Time,
    Price,
}

impl SortKind {
    pub const ALL: [SortKind; 3] = [SortKind::Day, SortKind::Time, SortKind::Price];

    pub fn label(self) -> &'static str {
        match self {
            SortKind::Day => "Day",
            SortKind::Time => "Time",
            SortKind::Price => "Price",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortKind::Day => SortKind::Time,
            SortKind::Time => SortKind::Price,
            SortKind::Price => SortKind::Day,
        }
    }

    /// Stable sort: points that compare equal keep their store order.
    pub fn apply(self, points: &mut [Point], catalog: &Catalog) {
        match self {
            SortKind::Day => points.sort_by_key(|point| point.date_from),
            SortKind::Time => points.sort_by_key(|point| Reverse(point.duration())),
            SortKind::Price => points.sort_by_key(|point| Reverse(catalog.total_price(point))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PointId, PointType};
    use chrono::{TimeDelta, TimeZone, Utc};

    fn point(id: &str, start_hour: u32, hours: i64, price: u32) -> Point {
        let from = Utc
            .with_ymd_and_hms(2024, 3, 18, start_hour, 0, 0)
            .single()
            .expect("valid timestamp");
        Point {
            id: PointId::new(id),
            kind: PointType::Sightseeing,
            destination: None,
            date_from: from,
            date_to: from + TimeDelta::hours(hours),
            base_price: price,
            offers: None,
        }
    }

    fn ids(points: &[Point]) -> Vec<&str> {
        points.iter().map(|point| point.id.as_str()).collect()
    }

    #[test]
    fn sorts_by_day_time_and_price() {
        let catalog = Catalog::demo();
        let mut points = vec![
            point("a", 12, 1, 50),
            point("b", 8, 3, 10),
            point("c", 10, 2, 90),
        ];
        SortKind::Day.apply(&mut points, &catalog);
        assert_eq!(ids(&points), ["b", "c", "a"]);
        SortKind::Time.apply(&mut points, &catalog);
        assert_eq!(ids(&points), ["b", "c", "a"]);
        SortKind::Price.apply(&mut points, &catalog);
        assert_eq!(ids(&points), ["c", "a", "b"]);
    }

    #[test]
    fn next_cycles_through_every_kind() {
        let mut kind = SortKind::default();
        for expected in [SortKind::Time, SortKind::Price, SortKind::Day] {
            kind = kind.next();
            assert_eq!(kind, expected);
        }
    }
}

use super::{catalog::Catalog, point::Point};

/// Header line data: the route, the overall date span and the total cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripSummary {
    pub route: String,
    pub dates: String,
    pub total: u64,
}

impl TripSummary {
    pub fn from_points(points: &[Point], catalog: &Catalog) -> Option<Self> {
        let mut ordered: Vec<&Point> = points.iter().collect();
        ordered.sort_by_key(|point| point.date_from);
        let first = ordered.first()?;
        let last = ordered.last()?;

        let names: Vec<&str> = ordered
            .iter()
            .filter_map(|point| catalog.destination_name(point.destination))
            .collect();
        let route = match names.as_slice() {
            [] => String::new(),
            [_, _, _, _, ..] => format!("{} — … — {}", names[0], names[names.len() - 1]),
            _ => names.join(" — "),
        };
        let dates = format!(
            "{} — {}",
            first.date_from.format("%-d %b"),
            last.date_to.format("%-d %b")
        );
        let total = points.iter().map(|point| catalog.total_price(point)).sum();
        Some(Self {
            route,
            dates,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DestinationId, PointId, PointType};
    use chrono::{TimeDelta, TimeZone, Utc};

    fn point(id: &str, day: u32, destination: u32) -> Point {
        let from = Utc
            .with_ymd_and_hms(2024, 3, day, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        Point {
            id: PointId::new(id),
            kind: PointType::Sightseeing,
            destination: Some(DestinationId(destination)),
            date_from: from,
            date_to: from + TimeDelta::hours(2),
            base_price: 100,
            offers: None,
        }
    }

    #[test]
    fn empty_list_has_no_summary() {
        assert!(TripSummary::from_points(&[], &Catalog::demo()).is_none());
    }

    #[test]
    fn summarizes_route_in_date_order() {
        let points = vec![point("b", 20, 2), point("a", 18, 1), point("c", 21, 3)];
        let summary = TripSummary::from_points(&points, &Catalog::demo()).expect("summary");
        assert_eq!(summary.route, "Amsterdam — Geneva — Chamonix");
        assert_eq!(summary.dates, "18 Mar — 21 Mar");
        assert_eq!(summary.total, 300);
    }

    #[test]
    fn long_routes_are_abbreviated() {
        let points = vec![
            point("a", 18, 1),
            point("b", 19, 2),
            point("c", 20, 3),
            point("d", 21, 1),
        ];
        let summary = TripSummary::from_points(&points, &Catalog::demo()).expect("summary");
        assert_eq!(summary.route, "Amsterdam — … — Amsterdam");
    }
}

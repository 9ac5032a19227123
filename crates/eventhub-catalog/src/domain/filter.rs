//! Search and facet filtering over a set of visible events.

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::event::{Event, EventCategory};

/// Criteria combined with AND. Absent or blank criteria impose no
/// constraint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Case-insensitive substring of title, description, or location.
    #[serde(deserialize_with = "blank_as_none")]
    pub search: Option<String>,
    /// Earliest event date, inclusive.
    #[serde(deserialize_with = "blank_as_none")]
    pub start_date: Option<NaiveDate>,
    /// Latest event date, inclusive.
    #[serde(deserialize_with = "blank_as_none")]
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive substring of the location.
    #[serde(deserialize_with = "blank_as_none")]
    pub location: Option<String>,
    /// Lowest price, inclusive.
    #[serde(deserialize_with = "blank_as_none")]
    pub min_price: Option<f64>,
    /// Highest price, inclusive.
    #[serde(deserialize_with = "blank_as_none")]
    pub max_price: Option<f64>,
    #[serde(deserialize_with = "blank_as_none")]
    pub category: Option<EventCategory>,
}

impl FilterCriteria {
    /// Returns `true` if `event` satisfies every present criterion.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        let search = self.search.as_deref().map(str::to_lowercase);
        let search_match = search.is_none_or(|needle| {
            [&event.title, &event.description, &event.location]
                .into_iter()
                .any(|haystack| haystack.to_lowercase().contains(&needle))
        });

        let date_match = self.start_date.is_none_or(|start| event.date >= start)
            && self.end_date.is_none_or(|end| event.date <= end);

        let location_match = self.location.as_deref().is_none_or(|needle| {
            event
                .location
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });

        let price_match = self.min_price.is_none_or(|min| event.price >= min)
            && self.max_price.is_none_or(|max| event.price <= max);

        let category_match = self.category.is_none_or(|category| event.category == category);

        search_match && date_match && location_match && price_match && category_match
    }
}

/// The events of `events` matching `criteria`, in input order.
#[must_use]
pub fn filter_events(events: &[Event], criteria: &FilterCriteria) -> Vec<Event> {
    events
        .iter()
        .filter(|event| criteria.matches(event))
        .cloned()
        .collect()
}

/// Treats a missing value, an empty string, or whitespace as "no criterion",
/// and parses anything else with `FromStr`.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::fixtures::tech_meet;

    fn sample() -> Vec<Event> {
        let mut concert = tech_meet("evt-2");
        concert.title = "Sunburn Arena".to_owned();
        concert.description = "Electronic music under the stars, all night long.".to_owned();
        concert.location = "Goa Beachfront".to_owned();
        concert.category = EventCategory::Concert;
        concert.price = 2500.0;
        concert.date = NaiveDate::from_ymd_opt(2026, 12, 28).unwrap();

        vec![tech_meet("evt-1"), concert]
    }

    #[test]
    fn test_empty_criteria_returns_input_unchanged() {
        let events = sample();

        let filtered = filter_events(&events, &FilterCriteria::default());

        assert_eq!(filtered, events);
    }

    #[test]
    fn test_search_matches_description_or_location_case_insensitively() {
        let events = sample();

        let by_description = FilterCriteria {
            search: Some("ELECTRONIC".to_owned()),
            ..FilterCriteria::default()
        };
        let by_location = FilterCriteria {
            search: Some("bengaluru".to_owned()),
            ..FilterCriteria::default()
        };

        assert_eq!(filter_events(&events, &by_description)[0].id, "evt-2");
        assert_eq!(filter_events(&events, &by_location)[0].id, "evt-1");
    }

    #[test]
    fn test_date_and_price_bounds_are_inclusive() {
        // Arrange
        let events = sample();
        let criteria = FilterCriteria {
            start_date: NaiveDate::from_ymd_opt(2026, 3, 14),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 14),
            min_price: Some(500.0),
            max_price: Some(500.0),
            ..FilterCriteria::default()
        };

        // Act
        let filtered = filter_events(&events, &criteria);

        // Assert
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "evt-1");
    }

    #[test]
    fn test_criteria_are_and_combined() {
        let events = sample();
        let criteria = FilterCriteria {
            category: Some(EventCategory::Concert),
            location: Some("bengaluru".to_owned()),
            ..FilterCriteria::default()
        };

        assert!(filter_events(&events, &criteria).is_empty());
    }

    #[test]
    fn test_blank_query_values_deserialize_as_absent() {
        let criteria: FilterCriteria = serde_json::from_value(serde_json::json!({
            "search": "",
            "start_date": "  ",
            "min_price": "",
            "category": "concert",
        }))
        .unwrap();

        assert_eq!(
            criteria,
            FilterCriteria {
                category: Some(EventCategory::Concert),
                ..FilterCriteria::default()
            }
        );
    }

    #[test]
    fn test_unparseable_bound_is_rejected() {
        let result: Result<FilterCriteria, _> =
            serde_json::from_value(serde_json::json!({ "max_price": "cheap" }));

        assert!(result.is_err());
    }
}

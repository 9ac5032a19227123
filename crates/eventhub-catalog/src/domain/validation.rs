//! Content rules for submitted events.

use chrono::NaiveDate;
use eventhub_core::error::DomainError;

use super::event::{Event, EventDraft, EventPatch};

const MIN_TITLE_LEN: usize = 5;
const MIN_DESCRIPTION_LEN: usize = 20;
const MIN_LOCATION_LEN: usize = 5;
const MAX_PRICE: f64 = 1_000_000.0;
const MAX_CAPACITY: u32 = 100_000;

/// Checks a new submission. The event date must be after `today`.
///
/// # Errors
///
/// Returns `DomainError::Validation` listing every violated rule.
pub fn validate_draft(draft: &EventDraft, today: NaiveDate) -> Result<(), DomainError> {
    let mut issues = Vec::new();
    check_title(&draft.title, &mut issues);
    check_description(&draft.description, &mut issues);
    check_location(&draft.location, &mut issues);
    check_price(draft.price, &mut issues);
    check_capacity(draft.capacity, &mut issues);
    check_image_url(&draft.image_url, &mut issues);
    check_date(draft.date, today, &mut issues);
    into_result(issues)
}

/// Checks the fields an edit sets against `current`. The date rule applies
/// only when the edit moves the date, and capacity may not fall below the
/// seats `current` has already sold.
///
/// # Errors
///
/// Returns `DomainError::Validation` listing every violated rule.
pub fn validate_patch(
    current: &Event,
    patch: &EventPatch,
    today: NaiveDate,
) -> Result<(), DomainError> {
    let mut issues = Vec::new();
    if let Some(title) = &patch.title {
        check_title(title, &mut issues);
    }
    if let Some(description) = &patch.description {
        check_description(description, &mut issues);
    }
    if let Some(location) = &patch.location {
        check_location(location, &mut issues);
    }
    if let Some(price) = patch.price {
        check_price(price, &mut issues);
    }
    if let Some(capacity) = patch.capacity {
        check_capacity(capacity, &mut issues);
        check_sold_seats(current, capacity, &mut issues);
    }
    if let Some(image_url) = &patch.image_url {
        check_image_url(image_url, &mut issues);
    }
    if let Some(date) = patch.date.filter(|date| *date != current.date) {
        check_date(date, today, &mut issues);
    }
    into_result(issues)
}

fn check_title(title: &str, issues: &mut Vec<String>) {
    if title.trim().chars().count() < MIN_TITLE_LEN {
        issues.push(format!("title must be at least {MIN_TITLE_LEN} characters"));
    }
}

fn check_description(description: &str, issues: &mut Vec<String>) {
    if description.trim().chars().count() < MIN_DESCRIPTION_LEN {
        issues.push(format!(
            "description must be at least {MIN_DESCRIPTION_LEN} characters"
        ));
    }
}

fn check_location(location: &str, issues: &mut Vec<String>) {
    if location.trim().chars().count() < MIN_LOCATION_LEN {
        issues.push(format!("location must be at least {MIN_LOCATION_LEN} characters"));
    }
}

fn check_price(price: f64, issues: &mut Vec<String>) {
    if !price.is_finite() || !(0.0..=MAX_PRICE).contains(&price) {
        issues.push(format!("price must be between 0 and {MAX_PRICE}"));
    }
}

fn check_capacity(capacity: u32, issues: &mut Vec<String>) {
    if !(1..=MAX_CAPACITY).contains(&capacity) {
        issues.push(format!("capacity must be between 1 and {MAX_CAPACITY}"));
    }
}

fn check_sold_seats(current: &Event, capacity: u32, issues: &mut Vec<String>) {
    let sold = current.capacity.saturating_sub(current.tickets_available);
    if capacity < sold {
        issues.push(format!("capacity cannot drop below the {sold} tickets already sold"));
    }
}

fn check_image_url(image_url: &str, issues: &mut Vec<String>) {
    let has_host = image_url
        .strip_prefix("https://")
        .or_else(|| image_url.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty());
    if !has_host {
        issues.push("image_url must be an http(s) URL".to_owned());
    }
}

fn check_date(date: NaiveDate, today: NaiveDate, issues: &mut Vec<String>) {
    if date <= today {
        issues.push("event date must be in the future".to_owned());
    }
}

fn into_result(issues: Vec<String>) -> Result<(), DomainError> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(issues.join("; ")))
    }
}

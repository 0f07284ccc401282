//! Turns raw listing parameters into a store filter and pagination options.

use crate::{
    dto::products::{ListingFilter, ListingOptions, SortField},
    error::ValidationError,
    routes::params::{ListingQuery, QueryValue},
};

pub const DEFAULT_LIMIT: u64 = 10;
pub const DEFAULT_PAGE: u64 = 1;
pub const MAX_LIMIT: u64 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct ListingRequest {
    pub filter: ListingFilter,
    pub options: ListingOptions,
}

/// Validates `query` field by field; the first failing rule is reported.
pub fn process(query: &ListingQuery) -> Result<ListingRequest, ValidationError> {
    let limit = parse_number(query.limit.as_ref(), ValidationError::Limit, |n| {
        (1.0..=MAX_LIMIT as f64).contains(&n)
    })?;
    let page = parse_number(query.page.as_ref(), ValidationError::Page, |n| n >= 1.0)?;
    let category = parse_category(query.category.as_ref())?;
    let stock = parse_number(query.stock.as_ref(), ValidationError::Stock, |n| n >= 0.0)?;
    let sort = parse_sort(query.sort.as_ref())?;

    let filter = ListingFilter {
        category,
        stock_greater_than: stock.map(|s| s - 1.0),
    };
    // Truncation never leaves the validated range: limit ends in [1, 100], page ≥ 1.
    let options = ListingOptions {
        page: page.map_or(DEFAULT_PAGE, |p| p.trunc() as u64),
        limit: limit.map_or(DEFAULT_LIMIT, |l| l.trunc() as u64),
        sort,
    };

    Ok(ListingRequest { filter, options })
}

fn parse_number(
    value: Option<&QueryValue>,
    error: ValidationError,
    accept: impl Fn(f64) -> bool,
) -> Result<Option<f64>, ValidationError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let text = match value {
        QueryValue::Text(text) => Some(text.as_str()),
        // A one-element list reads as its element; longer lists are not numbers.
        QueryValue::List(values) if values.len() == 1 => Some(values[0].as_str()),
        QueryValue::List(_) => None,
    };
    match text.and_then(coerce_number) {
        Some(n) if accept(n) => Ok(Some(n)),
        _ => Err(error),
    }
}

/// Numeric reading of a query value: blank is zero, `Infinity` and
/// `0x`/`0o`/`0b` integers are accepted, otherwise a decimal literal.
fn coerce_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }
    match text {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    if let Some(n) = coerce_radix(text) {
        return Some(n);
    }

    let unsigned = text.trim_start_matches(['+', '-']);
    // Rust also parses `inf`/`nan` spellings that are not numbers here.
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| !n.is_nan())
}

fn coerce_radix(text: &str) -> Option<f64> {
    let prefix = text.get(..2)?.to_ascii_lowercase();
    let radix = match prefix.as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };
    u64::from_str_radix(&text[2..], radix).ok().map(|n| n as f64)
}

fn parse_category(value: Option<&QueryValue>) -> Result<Option<String>, ValidationError> {
    match value {
        None => Ok(None),
        Some(QueryValue::Text(category)) => Ok(Some(category.clone())),
        Some(QueryValue::List(_)) => Err(ValidationError::Category),
    }
}

fn parse_sort(value: Option<&QueryValue>) -> Result<Option<SortField>, ValidationError> {
    match value.map(QueryValue::as_text) {
        None => Ok(None),
        Some(Some("asc")) => Ok(Some(SortField::PriceAscending)),
        Some(Some("desc")) => Ok(Some(SortField::PriceDescending)),
        Some(_) => Err(ValidationError::Sort),
    }
}

//! Row pipeline: filter by name, stable sort, then cut out one page.
//!
//! Everything here is pure. The mutable side (selection, edit slot, the
//! member collection itself) lives in `state`.

pub mod edit;
pub mod selection;
pub mod state;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::members::Member;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Name,
    Email,
    Role,
}

impl SortField {
    pub const ALL: [SortField; 3] = [SortField::Name, SortField::Email, SortField::Role];

    pub fn value<'a>(&self, member: &'a Member) -> &'a str {
        match self {
            SortField::Name => &member.name,
            SortField::Email => &member.email,
            SortField::Role => &member.role,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::Email => "Email",
            SortField::Role => "Role",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown sort field '{0}' (expected name, email or role)")]
pub struct ParseSortFieldError(String);

impl FromStr for SortField {
    type Err = ParseSortFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortField::Name),
            "email" => Ok(SortField::Email),
            "role" => Ok(SortField::Role),
            _ => Err(ParseSortFieldError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Rows per page. `All` shows every match on page 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    Rows(usize),
    All,
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::Rows(5)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::Rows(n) => write!(f, "{}", n),
            PageSize::All => write!(f, "All"),
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid page size '{0}' (expected a number or 'all')")]
pub struct ParsePageSizeError(String);

impl FromStr for PageSize {
    type Err = ParsePageSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(PageSize::All);
        }
        s.parse::<usize>()
            .map(PageSize::Rows)
            .map_err(|_| ParsePageSizeError(s.to_string()))
    }
}

/// Everything the pipeline needs besides the rows themselves
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    pub filter: String,
    pub sort_field: SortField,
    pub direction: SortDirection,
    pub page: usize,
    pub page_size: PageSize,
}

/// One page of output plus the number of rows that matched the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    pub rows: Vec<&'a Member>,
    pub total: usize,
}

/// Rows whose name contains `filter`, ignoring case. Input order is kept.
pub fn filter<'a>(rows: &'a [Member], filter: &str) -> Vec<&'a Member> {
    if filter.is_empty() {
        return rows.iter().collect();
    }
    let needle = filter.to_lowercase();
    rows.iter()
        .filter(|m| m.name.to_lowercase().contains(&needle))
        .collect()
}

/// Sort by one field, case-insensitively.
///
/// Each row is tagged with its incoming position and that position breaks
/// ties, so equal keys keep their relative order in both directions no matter
/// which sort routine runs underneath.
pub fn stable_sort<'a>(
    rows: Vec<&'a Member>,
    field: SortField,
    direction: SortDirection,
) -> Vec<&'a Member> {
    let mut decorated: Vec<(usize, String, &Member)> = rows
        .into_iter()
        .enumerate()
        .map(|(i, m)| (i, field.value(m).to_lowercase(), m))
        .collect();

    decorated.sort_unstable_by(|(ia, ka, _), (ib, kb, _)| {
        let by_key = match direction {
            SortDirection::Ascending => ka.cmp(kb),
            SortDirection::Descending => kb.cmp(ka),
        };
        match by_key {
            Ordering::Equal => ia.cmp(ib),
            other => other,
        }
    });

    decorated.into_iter().map(|(_, _, m)| m).collect()
}

/// Start offset of `page`, or None when the page lies past the end.
fn page_start(page: usize, page_size: PageSize, total: usize) -> Option<(usize, usize)> {
    let (start, len) = match page_size {
        PageSize::All if page == 0 => (0, total),
        PageSize::All => return None,
        PageSize::Rows(n) => (page.checked_mul(n)?, n),
    };
    if start >= total || len == 0 {
        return None;
    }
    Some((start, len.min(total - start)))
}

/// Cut `[page*size, page*size + size)` out of `rows`, clipped to its length.
pub fn paginate<'a>(rows: &[&'a Member], page: usize, page_size: PageSize) -> Vec<&'a Member> {
    match page_start(page, page_size, rows.len()) {
        Some((start, len)) => rows[start..start + len].to_vec(),
        None => Vec::new(),
    }
}

/// Filter, sort and paginate in one go.
pub fn process<'a>(rows: &'a [Member], query: &Query) -> Page<'a> {
    let matched = filter(rows, &query.filter);
    let total = matched.len();
    let sorted = stable_sort(matched, query.sort_field, query.direction);
    Page {
        rows: paginate(&sorted, query.page, query.page_size),
        total,
    }
}

/// Number of pages needed for `total` rows. Always at least one.
pub fn page_count(total: usize, page_size: PageSize) -> usize {
    match page_size {
        PageSize::Rows(n) if n > 0 => total.div_ceil(n).max(1),
        _ => 1,
    }
}

/// Filler rows that keep a short trailing page as tall as a full one.
/// The first page never pads, and no page gets more than one page of filler.
pub fn empty_rows(total: usize, page: usize, page_size: PageSize) -> usize {
    match page_size {
        PageSize::Rows(n) if page > 0 => page
            .saturating_add(1)
            .saturating_mul(n)
            .saturating_sub(total)
            .min(n),
        _ => 0,
    }
}

/// "start–end of total" for the footer (1-based, inclusive)
pub fn range_label(total: usize, page: usize, page_size: PageSize) -> String {
    match page_start(page, page_size, total) {
        Some((start, len)) => format!("{}–{} of {}", start + 1, start + len, total),
        None => format!("0–0 of {}", total),
    }
}

//! Query and page data for the ticket list.

use serde::{Deserialize, Serialize};

use crate::domain::ticket::{Ticket, TicketCategory, TicketStatus};
use crate::filter::TicketFilter;
use crate::pagination::Paginated;

/// Query parameters accepted by the index page.
///
/// Kept as raw strings so that empty or unknown values fall back to "all"
/// instead of failing the whole request.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct IndexQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
}

impl IndexQuery {
    /// Builds the filter; a missing `page` means page 1.
    ///
    /// The filter form never submits `page`, so changing any filter lands on
    /// the first page.
    pub fn to_filter(&self) -> TicketFilter {
        let mut filter = TicketFilter::new();

        if let Some(search) = self.search.as_deref() {
            filter.set_search_query(search);
        }
        filter.set_category(parse_choice(self.category.as_deref()));
        filter.set_status(parse_choice(self.status.as_deref()));

        let page = self
            .page
            .as_deref()
            .and_then(|page| page.trim().parse::<usize>().ok())
            .unwrap_or(1);
        filter.go_to_page(page);

        filter
    }
}

fn parse_choice<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    let parsed = value.parse().ok();
    if parsed.is_none() {
        log::warn!("Ignoring unknown filter value {value}");
    }
    parsed
}

/// Filter values echoed into pagination links, without the page.
#[derive(Debug, Serialize)]
struct FilterQuery<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    search: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'static str>,
}

/// Encodes the active filters as a query string, e.g. `search=bug&status=New`.
pub fn filter_query_string(filter: &TicketFilter) -> String {
    let query = FilterQuery {
        search: filter.search_query(),
        category: filter.category().map(TicketCategory::as_str),
        status: filter.status().map(TicketStatus::as_str),
    };
    serde_html_form::to_string(&query).unwrap_or_default()
}

/// Data required to render the main index template.
pub struct IndexPageData {
    pub tickets: Paginated<Ticket>,
    pub filter: TicketFilter,
    /// Collection size before filtering.
    pub total_unfiltered: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_unknown_values_mean_all() {
        let query = IndexQuery {
            search: None,
            category: Some("".into()),
            status: Some("Closed".into()),
            page: Some("abc".into()),
        };
        let filter = query.to_filter();
        assert_eq!(filter.search_query(), "");
        assert!(!filter.is_active());
        assert_eq!(filter.category(), None);
        assert_eq!(filter.status(), None);
        assert_eq!(filter.current_page(), 1);
    }

    #[test]
    fn search_is_taken_as_typed() {
        let query = IndexQuery {
            search: Some(" bug ".into()),
            ..IndexQuery::default()
        };
        let filter = query.to_filter();
        assert_eq!(filter.search_query(), " bug ");
        assert!(filter.is_active());

        let blank = IndexQuery {
            search: Some("   ".into()),
            ..IndexQuery::default()
        };
        assert!(blank.to_filter().is_active());
    }

    #[test]
    fn page_is_kept_when_given() {
        let query = IndexQuery {
            status: Some("Under Review".into()),
            page: Some("3".into()),
            ..IndexQuery::default()
        };
        let filter = query.to_filter();
        assert_eq!(filter.status(), Some(TicketStatus::UnderReview));
        assert_eq!(filter.current_page(), 3);
    }

    #[test]
    fn filter_query_string_skips_inactive_filters() {
        let filter = TicketFilter::new()
            .search("login bug")
            .with_status(TicketStatus::UnderReview);
        assert_eq!(
            filter_query_string(&filter),
            "search=login+bug&status=Under+Review"
        );
        assert_eq!(filter_query_string(&TicketFilter::new()), "");
    }
}

//! In-memory ticket filtering.
//!
//! The API returns the whole ticket collection; narrowing and paging happen
//! here. Filters are applied in a fixed order (category, status, search) and
//! combine with logical AND.

use serde::Serialize;

use crate::domain::ticket::{Ticket, TicketCategory, TicketStatus};
use crate::pagination::Paginated;

/// Filter state of the ticket list.
///
/// Every setter that changes what is shown moves the list back to page 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TicketFilter {
    search_query: String,
    category: Option<TicketCategory>,
    status: Option<TicketStatus>,
    current_page: usize,
}

impl TicketFilter {
    pub fn new() -> Self {
        Self {
            current_page: 1,
            ..Self::default()
        }
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn category(&self) -> Option<TicketCategory> {
        self.category
    }

    pub fn status(&self) -> Option<TicketStatus> {
        self.status
    }

    pub fn current_page(&self) -> usize {
        self.current_page.max(1)
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.current_page = 1;
    }

    pub fn set_category(&mut self, category: Option<TicketCategory>) {
        self.category = category;
        self.current_page = 1;
    }

    pub fn set_status(&mut self, status: Option<TicketStatus>) {
        self.status = status;
        self.current_page = 1;
    }

    /// Moves to `page`. Clamping to the available range happens on [`Self::paginate`].
    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    /// Builder form of [`Self::set_search_query`].
    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.set_search_query(query);
        self
    }

    /// Builder form of [`Self::set_category`].
    pub fn with_category(mut self, category: TicketCategory) -> Self {
        self.set_category(Some(category));
        self
    }

    /// Builder form of [`Self::set_status`].
    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.set_status(Some(status));
        self
    }

    /// Builder form of [`Self::go_to_page`].
    pub fn page(mut self, page: usize) -> Self {
        self.go_to_page(page);
        self
    }

    /// `true` when at least one predicate narrows the list.
    pub fn is_active(&self) -> bool {
        self.category.is_some() || self.status.is_some() || !self.search_query.is_empty()
    }

    /// Keeps the tickets that satisfy every active predicate, in input order.
    ///
    /// The query is matched as typed: surrounding spaces are part of it.
    pub fn apply(&self, tickets: Vec<Ticket>) -> Vec<Ticket> {
        let needle = self.search_query.to_lowercase();
        tickets
            .into_iter()
            .filter(|ticket| self.matches(ticket, &needle))
            .collect()
    }

    /// Filters `tickets` and slices out the current page.
    pub fn paginate(&self, tickets: Vec<Ticket>, per_page: usize) -> Paginated<Ticket> {
        Paginated::from_slice(self.apply(tickets), self.current_page(), per_page)
    }

    // Category, then status, then search: each step only narrows the previous one.
    fn matches(&self, ticket: &Ticket, needle: &str) -> bool {
        self.category.is_none_or(|category| ticket.category == category)
            && self.status.is_none_or(|status| ticket.status == status)
            && (needle.is_empty() || ticket.matches_search(needle))
    }
}

/// Tickets held by the list view together with the filter applied to them.
#[derive(Debug, Clone, Default)]
pub struct TicketListView {
    tickets: Vec<Ticket>,
    filter: TicketFilter,
}

impl TicketListView {
    pub fn new(filter: TicketFilter) -> Self {
        Self {
            tickets: Vec::new(),
            filter,
        }
    }

    pub fn filter(&self) -> &TicketFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut TicketFilter {
        &mut self.filter
    }

    /// Replaces the collection after a fetch; the page goes back to 1.
    pub fn replace_tickets(&mut self, tickets: Vec<Ticket>) {
        self.tickets = tickets;
        self.filter.go_to_page(1);
    }

    pub fn into_page(self, per_page: usize) -> Paginated<Ticket> {
        self.filter.paginate(self.tickets, per_page)
    }
}

//! Filtering, sorting and pagination of in-memory ticket lists.
//!
//! Filters are small trait objects composed with AND. Nothing here holds
//! state or performs I/O; callers re-run the query whenever an input changes.

use jiff::Timestamp;

use crate::types::{Code, CodeVocabulary, FILTER_ALL, PriorityCode, StatusCode, Ticket};

pub mod paginate;
pub mod sort;

pub use paginate::{Page, paginate};
pub use sort::{SortField, sort_tickets_by};

/// Trait for ticket filters
pub trait TicketFilter: Send + Sync {
    fn matches(&self, ticket: &Ticket) -> bool;
}

/// Case-insensitive substring match.
///
/// Uses `unicase` for correct Unicode case folding. An empty needle matches everything.
fn contains_case_insensitive(haystack: &str, needle_folded: &str) -> bool {
    if needle_folded.is_empty() {
        return true;
    }
    unicase::UniCase::new(haystack)
        .to_folded_case()
        .contains(needle_folded)
}

/// Which fields free-text search looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// Title only.
    #[default]
    Title,
    /// Title, description, department name and label names.
    Rich,
}

/// Filter tickets by a free-text search term
pub struct SearchFilter {
    needle: String,
    scope: SearchScope,
}

impl SearchFilter {
    pub fn new(term: &str, scope: SearchScope) -> Self {
        Self {
            needle: unicase::UniCase::new(term.trim()).to_folded_case(),
            scope,
        }
    }
}

impl TicketFilter for SearchFilter {
    fn matches(&self, ticket: &Ticket) -> bool {
        if contains_case_insensitive(&ticket.title, &self.needle) {
            return true;
        }
        if self.scope == SearchScope::Title {
            return false;
        }

        let description_match = ticket
            .description
            .as_deref()
            .is_some_and(|d| contains_case_insensitive(d, &self.needle));

        let department_match = ticket
            .department_name()
            .is_some_and(|d| contains_case_insensitive(d, &self.needle));

        let label_match = ticket
            .labels
            .iter()
            .any(|l| contains_case_insensitive(&l.name, &self.needle));

        description_match || department_match || label_match
    }
}

/// Filter tickets by exact status code
pub struct StatusFilter {
    target_status: StatusCode,
}

impl StatusFilter {
    pub fn new(status: StatusCode) -> Self {
        Self {
            target_status: status,
        }
    }
}

impl TicketFilter for StatusFilter {
    fn matches(&self, ticket: &Ticket) -> bool {
        ticket.status == self.target_status
    }
}

/// Filter tickets by exact priority code
pub struct PriorityFilter {
    target_priority: PriorityCode,
}

impl PriorityFilter {
    pub fn new(priority: PriorityCode) -> Self {
        Self {
            target_priority: priority,
        }
    }
}

impl TicketFilter for PriorityFilter {
    fn matches(&self, ticket: &Ticket) -> bool {
        ticket.priority == self.target_priority
    }
}

/// Interpret a filter value from a select box.
///
/// `None`, an empty string and the sentinel `"all"` mean "no filter".
/// Other values go through the same vocabulary as stored ticket codes.
pub fn parse_selection<T: CodeVocabulary>(value: Option<&str>) -> Option<Code<T>> {
    let value = value?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(FILTER_ALL) {
        return None;
    }
    Some(Code::canonical(value))
}

/// The user-facing filter inputs of a ticket list view.
#[derive(Debug, Clone, Default)]
pub struct TicketPredicate {
    pub search_term: Option<String>,
    pub status_filter: Option<String>,
    pub priority_filter: Option<String>,
    pub scope: SearchScope,
}

impl TicketPredicate {
    /// Build the AND-composed filter list for these inputs.
    pub fn filters(&self) -> Vec<Box<dyn TicketFilter>> {
        let mut filters: Vec<Box<dyn TicketFilter>> = Vec::new();

        if let Some(term) = self.search_term.as_deref()
            && !term.trim().is_empty()
        {
            filters.push(Box::new(SearchFilter::new(term, self.scope)));
        }
        if let Some(status) = parse_selection(self.status_filter.as_deref()) {
            filters.push(Box::new(StatusFilter::new(status)));
        }
        if let Some(priority) = parse_selection(self.priority_filter.as_deref()) {
            filters.push(Box::new(PriorityFilter::new(priority)));
        }

        filters
    }
}

/// An executed query configuration that can be applied to ticket data.
pub struct TicketQuery {
    filters: Vec<Box<dyn TicketFilter>>,
    sort_by: Option<SortField>,
}

impl TicketQuery {
    /// Filter and (optionally) sort, borrowing from `tickets`.
    ///
    /// `now` is only consulted when sorting by SLA risk.
    pub fn apply<'a>(&self, tickets: &'a [Ticket], now: Timestamp) -> Vec<&'a Ticket> {
        let mut filtered: Vec<&Ticket> = tickets
            .iter()
            .filter(|t| self.filters.iter().all(|f| f.matches(t)))
            .collect();

        if let Some(field) = self.sort_by {
            sort_tickets_by(&mut filtered, field, now);
        }

        filtered
    }
}

/// Query builder for filtering and sorting tickets
pub struct TicketQueryBuilder {
    filters: Vec<Box<dyn TicketFilter>>,
    sort_by: Option<SortField>,
}

impl TicketQueryBuilder {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            sort_by: None,
        }
    }

    /// Add a filter to the query (AND composition)
    pub fn with_filter(mut self, filter: Box<dyn TicketFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add every filter implied by a list view's inputs
    pub fn with_predicate(mut self, predicate: &TicketPredicate) -> Self {
        self.filters.extend(predicate.filters());
        self
    }

    /// Set the sort field; without one, input order is preserved
    pub fn with_sort(mut self, sort_by: SortField) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    pub fn build(self) -> TicketQuery {
        TicketQuery {
            filters: self.filters,
            sort_by: self.sort_by,
        }
    }
}

impl Default for TicketQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply the predicate's filters (AND) and return the requested page.
///
/// Input order is preserved. Page and page size follow [`paginate`].
pub fn filter_and_paginate<'a>(
    tickets: &'a [Ticket],
    predicate: &TicketPredicate,
    page: usize,
    page_size: usize,
) -> Page<&'a Ticket> {
    let filters = predicate.filters();
    let filtered: Vec<&Ticket> = tickets
        .iter()
        .filter(|t| filters.iter().all(|f| f.matches(t)))
        .collect();
    paginate(filtered, page, page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DepartmentRef, LabelRef, TicketPriority, TicketStatus};

    fn make_ticket(
        number: u64,
        title: &str,
        status: TicketStatus,
        priority: TicketPriority,
    ) -> Ticket {
        Ticket {
            id: format!("t-{number}"),
            number,
            title: title.to_string(),
            status: Code::Known(status),
            priority: Code::Known(priority),
            ..Default::default()
        }
    }

    fn numbers(page: &Page<&Ticket>) -> Vec<u64> {
        page.items.iter().map(|t| t.number).collect()
    }

    fn sample() -> Vec<Ticket> {
        vec![
            make_ticket(1, "Printer jammed", TicketStatus::Open, TicketPriority::Low),
            make_ticket(2, "VPN down", TicketStatus::InProgress, TicketPriority::Critical),
            make_ticket(3, "printer toner", TicketStatus::Open, TicketPriority::High),
            make_ticket(4, "Password reset", TicketStatus::Closed, TicketPriority::Low),
        ]
    }

    #[test]
    fn test_empty_input() {
        let page = filter_and_paginate(&[], &TicketPredicate::default(), 1, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn test_third_page_of_twenty_five() {
        let tickets: Vec<Ticket> = (0..25)
            .map(|i| make_ticket(i, "t", TicketStatus::Open, TicketPriority::Low))
            .collect();
        let page = filter_and_paginate(&tickets, &TicketPredicate::default(), 3, 10);
        assert_eq!(numbers(&page), vec![20, 21, 22, 23, 24]);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next);
        assert!(page.has_prev);

        let clamped = filter_and_paginate(&tickets, &TicketPredicate::default(), 99, 10);
        assert_eq!(numbers(&clamped), numbers(&page));
    }

    #[test]
    fn test_search_is_case_insensitive_on_title() {
        let tickets = sample();
        let predicate = TicketPredicate {
            search_term: Some("PRINTER".to_string()),
            ..Default::default()
        };
        let page = filter_and_paginate(&tickets, &predicate, 1, 10);
        assert_eq!(numbers(&page), vec![1, 3]);
    }

    #[test]
    fn test_blank_search_matches_all() {
        let tickets = sample();
        let predicate = TicketPredicate {
            search_term: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_and_paginate(&tickets, &predicate, 1, 10).total_items, 4);
    }

    #[test]
    fn test_all_sentinel_passes_everything() {
        let tickets = sample();
        let predicate = TicketPredicate {
            status_filter: Some("all".to_string()),
            priority_filter: Some("ALL".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_and_paginate(&tickets, &predicate, 1, 10).total_items, 4);
    }

    #[test]
    fn test_filters_compose_with_and() {
        let tickets = sample();
        let predicate = TicketPredicate {
            search_term: Some("printer".to_string()),
            status_filter: Some("open".to_string()),
            priority_filter: Some("high".to_string()),
            ..Default::default()
        };
        assert_eq!(numbers(&filter_and_paginate(&tickets, &predicate, 1, 10)), vec![3]);
    }

    #[test]
    fn test_unknown_status_filter_matches_unknown_codes_only() {
        let mut tickets = sample();
        tickets[0].status = Code::Unknown("on_hold".to_string());
        let predicate = TicketPredicate {
            status_filter: Some("on_hold".to_string()),
            ..Default::default()
        };
        assert_eq!(numbers(&filter_and_paginate(&tickets, &predicate, 1, 10)), vec![1]);
    }

    #[test]
    fn test_selection_uses_stored_code_vocabulary() {
        let mut tickets = sample();
        tickets[0].status = Code::canonical("Waiting on vendor");
        tickets[1].status = Code::Known(TicketStatus::InProgress);

        for value in ["Waiting on vendor", "waiting-on-vendor", "WAITING_ON_VENDOR"] {
            let predicate = TicketPredicate {
                status_filter: Some(value.to_string()),
                ..Default::default()
            };
            assert_eq!(numbers(&filter_and_paginate(&tickets, &predicate, 1, 10)), vec![1]);
        }

        let alias = TicketPredicate {
            status_filter: Some("pending".to_string()),
            ..Default::default()
        };
        let pending = numbers(&filter_and_paginate(&tickets, &alias, 1, 10));
        assert!(pending.contains(&2));
        assert!(!pending.contains(&1));
    }

    #[test]
    fn test_priority_selection_accepts_aliases() {
        assert_eq!(
            parse_selection::<TicketPriority>(Some("Urgent")),
            Some(Code::Known(TicketPriority::Critical))
        );
        assert_eq!(
            parse_selection::<TicketPriority>(Some("P 9")),
            Some(Code::Unknown("p_9".to_string()))
        );
    }

    #[test]
    fn test_rich_scope_searches_description_department_and_labels() {
        let mut tickets = sample();
        tickets[1].description = Some("Remote staff cannot connect".to_string());
        tickets[2].department = Some(DepartmentRef {
            id: "d1".to_string(),
            name: "Facilities".to_string(),
        });
        tickets[3].labels.push(LabelRef {
            id: "l1".to_string(),
            name: "remote-work".to_string(),
            color: None,
        });

        let title_only = TicketPredicate {
            search_term: Some("remote".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_and_paginate(&tickets, &title_only, 1, 10).total_items, 0);

        let rich = TicketPredicate {
            scope: SearchScope::Rich,
            ..title_only.clone()
        };
        assert_eq!(numbers(&filter_and_paginate(&tickets, &rich, 1, 10)), vec![2, 4]);

        let department = TicketPredicate {
            search_term: Some("facil".to_string()),
            scope: SearchScope::Rich,
            ..Default::default()
        };
        assert_eq!(numbers(&filter_and_paginate(&tickets, &department, 1, 10)), vec![3]);
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection::<TicketStatus>(None), None);
        assert_eq!(parse_selection::<TicketStatus>(Some("")), None);
        assert_eq!(parse_selection::<TicketStatus>(Some("All")), None);
        assert_eq!(
            parse_selection::<TicketStatus>(Some("in progress")),
            Some(Code::Known(TicketStatus::InProgress))
        );
    }

    #[test]
    fn test_query_builder_sorts() {
        let tickets = sample();
        let now: Timestamp = "2024-01-01T00:00:00Z".parse().unwrap();
        let query = TicketQueryBuilder::new()
            .with_predicate(&TicketPredicate {
                status_filter: Some("open".to_string()),
                ..Default::default()
            })
            .with_sort(SortField::Priority)
            .build();
        let result: Vec<u64> = query.apply(&tickets, now).iter().map(|t| t.number).collect();
        assert_eq!(result, vec![3, 1]);
    }
}

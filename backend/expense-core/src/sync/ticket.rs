use models::CategoryFilter;

/// Tag carried by every in-flight fetch.
///
/// Records the filter the request was issued for and a sequence number that
/// increases with every issued request, so completions can be checked for
/// staleness when they arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    filter: CategoryFilter,
    sequence: u64,
}

impl RequestTicket {
    pub(crate) fn new(filter: CategoryFilter, sequence: u64) -> Self {
        Self { filter, sequence }
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

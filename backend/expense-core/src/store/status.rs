/// Lifecycle of one logical operation.
///
/// `Idle → Loading → {Succeeded, Failed}`; a new invocation from either terminal
/// state goes back through `Loading`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed(String),
}

impl RequestStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestStatus::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RequestStatus::Failed(_))
    }
}

/// Logical operations whose status the store tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListFetch,
    SummaryFetch,
    Create,
    Delete,
}

impl Operation {
    /// Summary failures are diagnostic only; everything else reaches the banner.
    pub fn surfaces_banner(&self) -> bool {
        !matches!(self, Operation::SummaryFetch)
    }
}

/// What happened to a fetch result when it reached the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Result written into the store.
    Applied,
    /// Result dropped: issued for a filter that is no longer active, or
    /// overtaken by a newer completion.
    Discarded,
    /// Failure recorded in the store; cached data left in place.
    Failed,
}

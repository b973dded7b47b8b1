//! Caller identity handed over by an outer authentication layer.

/// Id of the authenticated caller.
///
/// Inserted as a request extension by whatever authenticates requests in
/// front of this service. Requests without it create anonymous links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

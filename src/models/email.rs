use serde::Serialize;

/// Result of an email check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailCheckResult {
    /// As returned by the API, or the caller's argument unchanged if absent.
    pub email: String,
    pub domain: String,
    /// The domain is known to hand out throwaway addresses.
    pub is_disposable: bool,
}

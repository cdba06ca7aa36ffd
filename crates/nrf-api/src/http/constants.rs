//! Shared HTTP constants (headers, problem URIs).

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

pub(crate) const PROBLEM_INTERNAL: &str = "https://nrf.dev/problems/internal";
pub(crate) const PROBLEM_BAD_REQUEST: &str = "https://nrf.dev/problems/bad-request";
pub(crate) const PROBLEM_NOT_FOUND: &str = "https://nrf.dev/problems/not-found";
pub(crate) const PROBLEM_SERVICE_UNAVAILABLE: &str = "https://nrf.dev/problems/service-unavailable";

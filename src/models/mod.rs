//! Typed results returned by the resource services.

mod email;
mod ip;

pub use email::EmailCheckResult;
pub use ip::{IpCheckResult, IpClassification, IpGeo, IpNetwork, IpSignals};

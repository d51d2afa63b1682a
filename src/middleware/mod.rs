/// Middleware module
///
/// Custom middleware and request guards for authentication and metrics.

mod authentication;
mod hit_counter;

pub use authentication::AuthenticatedUser;
pub use hit_counter::{FileserverHits, HitCounter};

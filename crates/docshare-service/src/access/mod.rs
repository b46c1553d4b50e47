//! Access evaluation for same-app and cross-app requests.

pub mod evaluator;
pub mod service;

pub use evaluator::evaluate_grants;
pub use service::AccessService;

//! Documents held by the hosted platform.

pub mod model;

pub use model::DocumentRecord;

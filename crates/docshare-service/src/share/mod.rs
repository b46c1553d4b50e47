//! Share registry: grant lifecycle, statistics, bulk import and export.

pub mod export;
pub mod import;
pub mod service;
pub mod stats;

pub use export::ShareExport;
pub use import::{ImportRecord, ImportReport};
pub use service::{CreateShareRequest, CreatedShare, LinkAccess, ShareOptions, ShareService};
pub use stats::ShareStats;

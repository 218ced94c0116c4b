pub mod compensator;
pub mod purchase_ledger;
pub mod transform;
pub mod wager_catalog;
pub mod wager_locks;

pub use compensator::{Compensator, CompensatorLimits};
pub use purchase_ledger::PurchaseLedger;
pub use wager_catalog::WagerCatalog;

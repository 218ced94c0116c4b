pub mod ops;
pub mod purchases;
pub mod wagers;

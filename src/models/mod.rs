pub mod dto;
pub mod purchase;
pub mod wager;

pub use dto::{BuyWagerRequest, ListWagersRequest, PlaceWagerRequest, PurchaseView, WagerView};
pub use purchase::{NewPurchase, Purchase};
pub use wager::{NewWager, Wager};

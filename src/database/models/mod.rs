pub mod couple;
pub mod expense;
pub mod settlement;
pub mod user;

pub use couple::Couple;
pub use expense::Expense;
pub use settlement::{Settlement, SettlementExpense, SettlementSummary};
pub use user::User;

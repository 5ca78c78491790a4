pub mod calculator;

pub use calculator::{calculate_proposal, SettlementProposal};

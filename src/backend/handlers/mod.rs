pub mod auth;
pub mod couples;
pub mod expenses;
pub mod settlements;

pub mod balance;
pub mod decimal;
pub mod errors;
pub mod expense;
pub mod flow;
pub mod order;
pub mod pricing;
pub mod session;
pub mod technician;

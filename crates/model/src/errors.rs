use bson::oid::ObjectId;
use thiserror::Error;

use crate::{decimal::Decimal, expense::ExpenseStatus};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Common error: {0}")]
    Eyre(#[from] eyre::Error),
    #[error("Technician not found: {0}")]
    TechnicianNotFound(ObjectId),
    #[error("Service order not found: {0}")]
    OrderNotFound(ObjectId),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(ObjectId),
    #[error("Expense {id} is {from:?} and cannot become {to:?}")]
    InvalidExpenseState {
        id: ObjectId,
        from: ExpenseStatus,
        to: ExpenseStatus,
    },
    #[error("Balance {0} is not payable")]
    NonPositiveBalance(Decimal),
    #[error("Stale balance for technician {technician_id}: expected {expected} records, settled {settled}")]
    StaleBalance {
        technician_id: ObjectId,
        expected: u64,
        settled: u64,
    },
    #[error("Mongo error: {0}")]
    MongoError(#[from] mongodb::error::Error),
}

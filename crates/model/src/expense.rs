use bson::oid::ObjectId;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::{decimal::Decimal, errors::LedgerError};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseCategory {
    Fuel,
    Parts,
    Meals,
    Tolls,
    Other,
}

/// Who paid at the point of sale. Only technician-funded expenses are
/// reimbursable.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOrigin {
    Company,
    Technician,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseStatus {
    Pending,
    Approved,
    Rejected,
    /// Terminal: the value was swept into a paid balance and must never be
    /// counted again.
    Authorized,
}

impl ExpenseStatus {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, ExpenseStatus::Pending)
    }
}

/// A technician-submitted cost with evidence, subject to approval before it
/// can enter a payable balance.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TechnicianExpense {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub company_id: ObjectId,
    pub technician_id: ObjectId,
    pub amount: Decimal,
    pub description: String,
    pub category: ExpenseCategory,
    #[serde(default)]
    pub attachment: Option<String>,
    pub origin: PaymentOrigin,
    pub status: ExpenseStatus,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl TechnicianExpense {
    pub fn new(
        company_id: ObjectId,
        technician_id: ObjectId,
        amount: Decimal,
        description: String,
        category: ExpenseCategory,
        origin: PaymentOrigin,
        attachment: Option<String>,
    ) -> TechnicianExpense {
        TechnicianExpense {
            id: ObjectId::new(),
            company_id,
            technician_id,
            amount,
            description,
            category,
            attachment,
            origin,
            status: ExpenseStatus::Pending,
            created_at: Local::now().with_timezone(&Utc),
        }
    }

    /// Payable once approved, while technician-funded and not yet swept into
    /// a closing.
    pub fn is_payable(&self) -> bool {
        self.origin == PaymentOrigin::Technician && self.status == ExpenseStatus::Approved
    }

    pub fn approve(&mut self) -> Result<(), LedgerError> {
        self.transition(ExpenseStatus::Pending, ExpenseStatus::Approved)
    }

    pub fn reject(&mut self) -> Result<(), LedgerError> {
        self.transition(ExpenseStatus::Pending, ExpenseStatus::Rejected)
    }

    pub fn authorize(&mut self) -> Result<(), LedgerError> {
        self.transition(ExpenseStatus::Approved, ExpenseStatus::Authorized)
    }

    fn transition(&mut self, from: ExpenseStatus, to: ExpenseStatus) -> Result<(), LedgerError> {
        if self.status != from {
            return Err(LedgerError::InvalidExpenseState {
                id: self.id,
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(origin: PaymentOrigin) -> TechnicianExpense {
        TechnicianExpense::new(
            ObjectId::new(),
            ObjectId::new(),
            Decimal::from(35.90),
            "diesel".to_string(),
            ExpenseCategory::Fuel,
            origin,
            None,
        )
    }

    #[test]
    fn test_approval_flow() {
        let mut expense = expense(PaymentOrigin::Technician);
        assert!(!expense.is_payable());

        expense.approve().unwrap();
        assert_eq!(ExpenseStatus::Approved, expense.status);
        assert!(expense.is_payable());

        expense.authorize().unwrap();
        assert_eq!(ExpenseStatus::Authorized, expense.status);
        assert!(!expense.is_payable());
    }

    #[test]
    fn test_rejection_is_terminal() {
        let mut expense = expense(PaymentOrigin::Technician);
        expense.reject().unwrap();

        assert!(matches!(
            expense.approve(),
            Err(LedgerError::InvalidExpenseState { .. })
        ));
        assert!(matches!(
            expense.authorize(),
            Err(LedgerError::InvalidExpenseState { .. })
        ));
    }

    #[test]
    fn test_double_processing_guard() {
        let mut expense = expense(PaymentOrigin::Technician);
        expense.approve().unwrap();
        expense.authorize().unwrap();

        // already swept into a balance, any further decision must fail
        assert!(matches!(
            expense.approve(),
            Err(LedgerError::InvalidExpenseState { .. })
        ));
        assert!(matches!(
            expense.reject(),
            Err(LedgerError::InvalidExpenseState { .. })
        ));
        assert!(matches!(
            expense.authorize(),
            Err(LedgerError::InvalidExpenseState { .. })
        ));
    }

    #[test]
    fn test_company_funded_never_payable() {
        let mut expense = expense(PaymentOrigin::Company);
        expense.approve().unwrap();
        assert!(!expense.is_payable());
    }
}

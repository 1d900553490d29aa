use bson::oid::ObjectId;
use model::{
    decimal::Decimal,
    errors::LedgerError,
    expense::{ExpenseCategory, ExpenseStatus, PaymentOrigin, TechnicianExpense},
    session::Session,
};
use storage::expense::ExpenseStore;

#[derive(Clone)]
pub struct Expenses {
    store: ExpenseStore,
}

impl Expenses {
    pub(crate) fn new(store: ExpenseStore) -> Self {
        Expenses { store }
    }

    /// Technician submits a cost. Always enters pending review, regardless of
    /// who paid.
    #[allow(clippy::too_many_arguments)]
    pub async fn submit(
        &self,
        session: &mut Session,
        technician_id: ObjectId,
        amount: Decimal,
        description: String,
        category: ExpenseCategory,
        origin: PaymentOrigin,
        attachment: Option<String>,
    ) -> Result<TechnicianExpense, LedgerError> {
        let expense = TechnicianExpense::new(
            session.company(),
            technician_id,
            amount,
            description,
            category,
            origin,
            attachment,
        );
        self.store.insert(session, expense.clone()).await?;
        Ok(expense)
    }

    pub async fn get(
        &self,
        session: &mut Session,
        id: ObjectId,
    ) -> Result<TechnicianExpense, LedgerError> {
        self.store
            .get(session, id)
            .await?
            .ok_or(LedgerError::ExpenseNotFound(id))
    }

    pub async fn by_status(
        &self,
        session: &mut Session,
        technician_id: ObjectId,
        status: ExpenseStatus,
    ) -> Result<Vec<TechnicianExpense>, LedgerError> {
        Ok(self
            .store
            .find_by_status(session, technician_id, status)
            .await?)
    }

    pub(crate) async fn payable(
        &self,
        session: &mut Session,
        technician_id: ObjectId,
    ) -> Result<Vec<TechnicianExpense>, LedgerError> {
        Ok(self.store.find_payable(session, technician_id).await?)
    }

    pub(crate) async fn set_status(
        &self,
        session: &mut Session,
        id: ObjectId,
        from: ExpenseStatus,
        to: ExpenseStatus,
    ) -> Result<bool, LedgerError> {
        Ok(self.store.set_status(session, id, from, to).await?)
    }

    pub(crate) async fn mark_authorized(
        &self,
        session: &mut Session,
        ids: &[ObjectId],
    ) -> Result<u64, LedgerError> {
        Ok(self.store.mark_authorized(session, ids).await?)
    }
}

use std::sync::Arc;

use bson::{doc, oid::ObjectId, to_bson};
use eyre::Error;
use model::{
    expense::{ExpenseStatus, PaymentOrigin, TechnicianExpense},
    session::Session,
};
use mongodb::{Collection, IndexModel};

const COLLECTION: &str = "technician_expenses";

#[derive(Clone)]
pub struct ExpenseStore {
    expenses: Arc<Collection<TechnicianExpense>>,
}

impl ExpenseStore {
    pub(crate) async fn new(db: &mongodb::Database) -> Result<Self, Error> {
        let expenses: Collection<TechnicianExpense> = db.collection(COLLECTION);
        expenses
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "technician_id": 1, "status": 1 })
                    .build(),
            )
            .await?;
        Ok(ExpenseStore {
            expenses: Arc::new(expenses),
        })
    }

    pub async fn insert(
        &self,
        session: &mut Session,
        expense: TechnicianExpense,
    ) -> Result<(), Error> {
        self.expenses
            .insert_one(expense)
            .session(&mut *session)
            .await?;
        Ok(())
    }

    pub async fn get(
        &self,
        session: &mut Session,
        id: ObjectId,
    ) -> Result<Option<TechnicianExpense>, Error> {
        Ok(self
            .expenses
            .find_one(doc! { "_id": id })
            .session(&mut *session)
            .await?)
    }

    /// Approved, technician-funded expenses not yet swept into a closing.
    pub async fn find_payable(
        &self,
        session: &mut Session,
        technician_id: ObjectId,
    ) -> Result<Vec<TechnicianExpense>, Error> {
        let mut cursor = self
            .expenses
            .find(doc! {
                "technician_id": technician_id,
                "origin": to_bson(&PaymentOrigin::Technician)?,
                "status": to_bson(&ExpenseStatus::Approved)?,
            })
            .sort(doc! { "created_at": 1 })
            .session(&mut *session)
            .await?;
        let mut expenses = Vec::new();
        while let Some(expense) = cursor.next(&mut *session).await {
            expenses.push(expense?);
        }
        Ok(expenses)
    }

    pub async fn find_by_status(
        &self,
        session: &mut Session,
        technician_id: ObjectId,
        status: ExpenseStatus,
    ) -> Result<Vec<TechnicianExpense>, Error> {
        let mut cursor = self
            .expenses
            .find(doc! {
                "technician_id": technician_id,
                "status": to_bson(&status)?,
            })
            .sort(doc! { "created_at": -1 })
            .session(&mut *session)
            .await?;
        let mut expenses = Vec::new();
        while let Some(expense) = cursor.next(&mut *session).await {
            expenses.push(expense?);
        }
        Ok(expenses)
    }

    /// Conditional status flip; returns false if the expense was not in the
    /// expected state anymore, which callers surface as an invalid state.
    pub async fn set_status(
        &self,
        session: &mut Session,
        id: ObjectId,
        from: ExpenseStatus,
        to: ExpenseStatus,
    ) -> Result<bool, Error> {
        let result = self
            .expenses
            .update_one(
                doc! { "_id": id, "status": to_bson(&from)? },
                doc! { "$set": { "status": to_bson(&to)? } },
            )
            .session(&mut *session)
            .await?;
        Ok(result.modified_count == 1)
    }

    /// Conditional batch sweep of approved expenses into the authorized
    /// terminal state; returns how many were swept.
    pub async fn mark_authorized(
        &self,
        session: &mut Session,
        ids: &[ObjectId],
    ) -> Result<u64, Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = self
            .expenses
            .update_many(
                doc! {
                    "_id": { "$in": ids.to_vec() },
                    "status": to_bson(&ExpenseStatus::Approved)?,
                },
                doc! { "$set": { "status": to_bson(&ExpenseStatus::Authorized)? } },
            )
            .session(&mut *session)
            .await?;
        Ok(result.modified_count)
    }
}

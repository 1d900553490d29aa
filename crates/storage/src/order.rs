use std::sync::Arc;

use bson::{doc, oid::ObjectId, to_bson};
use eyre::{eyre, Error};
use model::{
    order::{OrderStatus, ServiceOrder},
    session::Session,
};
use mongodb::{Collection, IndexModel};

const COLLECTION: &str = "service_orders";

#[derive(Clone)]
pub struct OrderStore {
    orders: Arc<Collection<ServiceOrder>>,
}

impl OrderStore {
    pub(crate) async fn new(db: &mongodb::Database) -> Result<Self, Error> {
        let orders: Collection<ServiceOrder> = db.collection(COLLECTION);
        orders
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "technician_id": 1, "status": 1, "paid_to_technician": 1 })
                    .build(),
            )
            .await?;
        Ok(OrderStore {
            orders: Arc::new(orders),
        })
    }

    pub async fn insert(&self, session: &mut Session, order: ServiceOrder) -> Result<(), Error> {
        self.orders.insert_one(order).session(&mut *session).await?;
        Ok(())
    }

    pub async fn get(
        &self,
        session: &mut Session,
        id: ObjectId,
    ) -> Result<Option<ServiceOrder>, Error> {
        Ok(self
            .orders
            .find_one(doc! { "_id": id })
            .session(&mut *session)
            .await?)
    }

    /// Completed orders whose commission has not been paid out yet.
    pub async fn find_commissionable(
        &self,
        session: &mut Session,
        technician_id: ObjectId,
    ) -> Result<Vec<ServiceOrder>, Error> {
        let mut cursor = self
            .orders
            .find(doc! {
                "technician_id": technician_id,
                "status": to_bson(&OrderStatus::Completed)?,
                "paid_to_technician": false,
            })
            .sort(doc! { "created_at": 1 })
            .session(&mut *session)
            .await?;
        let mut orders = Vec::new();
        while let Some(order) = cursor.next(&mut *session).await {
            orders.push(order?);
        }
        Ok(orders)
    }

    pub async fn set_status(
        &self,
        session: &mut Session,
        id: ObjectId,
        status: OrderStatus,
    ) -> Result<(), Error> {
        let result = self
            .orders
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "status": to_bson(&status)? } },
            )
            .session(&mut *session)
            .await?;
        if result.matched_count != 1 {
            return Err(eyre!("Failed to update order status:{}", id));
        }
        Ok(())
    }

    /// Conditional batch update: only orders still unpaid are touched, so a
    /// racing closing settles each order at most once. Returns how many were
    /// actually flipped.
    pub async fn mark_paid_to_technician(
        &self,
        session: &mut Session,
        ids: &[ObjectId],
    ) -> Result<u64, Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = self
            .orders
            .update_many(
                doc! { "_id": { "$in": ids.to_vec() }, "paid_to_technician": false },
                doc! { "$set": { "paid_to_technician": true } },
            )
            .session(&mut *session)
            .await?;
        Ok(result.modified_count)
    }
}

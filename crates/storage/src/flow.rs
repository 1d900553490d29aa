use std::sync::Arc;

use bson::{doc, oid::ObjectId, to_bson};
use eyre::Error;
use model::{
    flow::{FlowEntry, FlowStatus},
    session::Session,
};
use mongodb::{Collection, IndexModel};

const COLLECTION: &str = "financial_flows";

#[derive(Clone)]
pub struct FlowStore {
    flows: Arc<Collection<FlowEntry>>,
}

impl FlowStore {
    pub(crate) async fn new(db: &mongodb::Database) -> Result<Self, Error> {
        let flows: Collection<FlowEntry> = db.collection(COLLECTION);
        flows
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "technician_id": 1, "status": 1 })
                    .build(),
            )
            .await?;
        Ok(FlowStore {
            flows: Arc::new(flows),
        })
    }

    pub async fn insert(&self, session: &mut Session, entry: FlowEntry) -> Result<(), Error> {
        self.flows.insert_one(entry).session(&mut *session).await?;
        Ok(())
    }

    /// Live entries of every kind. Processed lines are history and never
    /// feed a balance again.
    pub async fn find_pending(
        &self,
        session: &mut Session,
        technician_id: ObjectId,
    ) -> Result<Vec<FlowEntry>, Error> {
        let mut cursor = self
            .flows
            .find(doc! {
                "technician_id": technician_id,
                "status": to_bson(&FlowStatus::Pending)?,
            })
            .sort(doc! { "date_time": 1 })
            .session(&mut *session)
            .await?;
        let mut entries = Vec::new();
        while let Some(entry) = cursor.next(&mut *session).await {
            entries.push(entry?);
        }
        Ok(entries)
    }

    /// Conditional batch update over still-pending entries; returns how many
    /// were settled.
    pub async fn mark_processed(
        &self,
        session: &mut Session,
        ids: &[ObjectId],
    ) -> Result<u64, Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = self
            .flows
            .update_many(
                doc! {
                    "_id": { "$in": ids.to_vec() },
                    "status": to_bson(&FlowStatus::Pending)?,
                },
                doc! { "$set": { "status": to_bson(&FlowStatus::Processed)? } },
            )
            .session(&mut *session)
            .await?;
        Ok(result.modified_count)
    }

    pub async fn list(
        &self,
        session: &mut Session,
        company_id: ObjectId,
        limit: i64,
        offset: u64,
    ) -> Result<Vec<FlowEntry>, Error> {
        let mut cursor = self
            .flows
            .find(doc! { "company_id": company_id })
            .sort(doc! { "date_time": -1 })
            .skip(offset)
            .limit(limit)
            .session(&mut *session)
            .await?;
        let mut entries = Vec::with_capacity(limit as usize);
        while let Some(entry) = cursor.next(&mut *session).await {
            entries.push(entry?);
        }
        Ok(entries)
    }
}

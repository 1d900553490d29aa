use std::sync::Arc;

use bson::{doc, oid::ObjectId};
use eyre::{eyre, Error};
use log::info;
use model::{decimal::Decimal, session::Session, technician::Technician};
use mongodb::{Collection, IndexModel};

const COLLECTION: &str = "technicians";

#[derive(Clone)]
pub struct TechnicianStore {
    technicians: Arc<Collection<Technician>>,
}

impl TechnicianStore {
    pub(crate) async fn new(db: &mongodb::Database) -> Result<Self, Error> {
        let technicians: Collection<Technician> = db.collection(COLLECTION);
        technicians
            .create_index(IndexModel::builder().keys(doc! { "company_id": 1 }).build())
            .await?;
        Ok(TechnicianStore {
            technicians: Arc::new(technicians),
        })
    }

    pub async fn insert(&self, session: &mut Session, technician: Technician) -> Result<(), Error> {
        self.technicians
            .insert_one(technician)
            .session(&mut *session)
            .await?;
        Ok(())
    }

    pub async fn get(
        &self,
        session: &mut Session,
        id: ObjectId,
    ) -> Result<Option<Technician>, Error> {
        Ok(self
            .technicians
            .find_one(doc! { "_id": id })
            .session(&mut *session)
            .await?)
    }

    pub async fn find_by_company(
        &self,
        session: &mut Session,
        company_id: ObjectId,
    ) -> Result<Vec<Technician>, Error> {
        let mut cursor = self
            .technicians
            .find(doc! { "company_id": company_id })
            .sort(doc! { "name": 1 })
            .session(&mut *session)
            .await?;
        let mut technicians = Vec::new();
        while let Some(technician) = cursor.next(&mut *session).await {
            technicians.push(technician?);
        }
        Ok(technicians)
    }

    pub async fn update_commission_rate(
        &self,
        session: &mut Session,
        id: ObjectId,
        rate: Decimal,
    ) -> Result<(), Error> {
        info!("Set commission rate for {}: {}", id, rate);
        let result = self
            .technicians
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "commission_rate": rate.inner() } },
            )
            .session(&mut *session)
            .await?;
        if result.matched_count != 1 {
            return Err(eyre!("Failed to update commission rate:{}", id));
        }
        Ok(())
    }
}

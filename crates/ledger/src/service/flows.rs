use bson::oid::ObjectId;
use log::info;
use model::{
    decimal::Decimal, errors::LedgerError, flow::FlowEntry, session::Session,
};
use storage::flow::FlowStore;

#[derive(Clone)]
pub struct Flows {
    store: FlowStore,
}

impl Flows {
    pub(crate) fn new(store: FlowStore) -> Self {
        Flows { store }
    }

    /// Records money handed out ahead of the closing. Enters the ledger
    /// pending and is deducted from the next payable balance.
    pub async fn record_advance(
        &self,
        session: &mut Session,
        technician_id: ObjectId,
        value: Decimal,
        description: String,
    ) -> Result<FlowEntry, LedgerError> {
        let entry = FlowEntry::advance(session.company(), technician_id, value, description);
        info!("Advance for {}: {}", technician_id, value);
        self.store.insert(session, entry.clone()).await?;
        Ok(entry)
    }

    pub async fn record_bonus(
        &self,
        session: &mut Session,
        technician_id: ObjectId,
        value: Decimal,
        description: String,
    ) -> Result<FlowEntry, LedgerError> {
        let entry = FlowEntry::bonus(session.company(), technician_id, value, description);
        info!("Bonus for {}: {}", technician_id, value);
        self.store.insert(session, entry.clone()).await?;
        Ok(entry)
    }

    pub async fn history(
        &self,
        session: &mut Session,
        limit: i64,
        offset: u64,
    ) -> Result<Vec<FlowEntry>, LedgerError> {
        let company_id = session.company();
        Ok(self.store.list(session, company_id, limit, offset).await?)
    }

    pub(crate) async fn pending(
        &self,
        session: &mut Session,
        technician_id: ObjectId,
    ) -> Result<Vec<FlowEntry>, LedgerError> {
        Ok(self.store.find_pending(session, technician_id).await?)
    }

    pub(crate) async fn mark_processed(
        &self,
        session: &mut Session,
        ids: &[ObjectId],
    ) -> Result<u64, LedgerError> {
        Ok(self.store.mark_processed(session, ids).await?)
    }

    pub(crate) async fn insert(
        &self,
        session: &mut Session,
        entry: FlowEntry,
    ) -> Result<(), LedgerError> {
        Ok(self.store.insert(session, entry).await?)
    }
}

use bson::oid::ObjectId;
use eyre::eyre;
use log::info;
use model::{
    decimal::Decimal,
    errors::LedgerError,
    order::{OrderStatus, ServiceOrder},
    session::Session,
};
use storage::order::OrderStore;

#[derive(Clone)]
pub struct Orders {
    store: OrderStore,
}

impl Orders {
    pub(crate) fn new(store: OrderStore) -> Self {
        Orders { store }
    }

    pub async fn create(
        &self,
        session: &mut Session,
        technician_id: ObjectId,
        client_name: String,
        description: String,
        total: Decimal,
    ) -> Result<ServiceOrder, LedgerError> {
        let order = ServiceOrder::new(
            session.company(),
            technician_id,
            client_name,
            description,
            total,
        );
        self.store.insert(session, order.clone()).await?;
        Ok(order)
    }

    pub async fn get(
        &self,
        session: &mut Session,
        id: ObjectId,
    ) -> Result<ServiceOrder, LedgerError> {
        self.store
            .get(session, id)
            .await?
            .ok_or(LedgerError::OrderNotFound(id))
    }

    pub async fn schedule(&self, session: &mut Session, id: ObjectId) -> Result<(), LedgerError> {
        self.advance_status(session, id, OrderStatus::Scheduled).await
    }

    pub async fn start(&self, session: &mut Session, id: ObjectId) -> Result<(), LedgerError> {
        self.advance_status(session, id, OrderStatus::InProgress).await
    }

    /// Completing an order is what makes it commission-eligible.
    pub async fn complete(&self, session: &mut Session, id: ObjectId) -> Result<(), LedgerError> {
        self.advance_status(session, id, OrderStatus::Completed).await
    }

    pub async fn cancel(&self, session: &mut Session, id: ObjectId) -> Result<(), LedgerError> {
        self.advance_status(session, id, OrderStatus::Canceled).await
    }

    async fn advance_status(
        &self,
        session: &mut Session,
        id: ObjectId,
        status: OrderStatus,
    ) -> Result<(), LedgerError> {
        let order = self.get(session, id).await?;
        if order.status.is_terminal() {
            return Err(LedgerError::Eyre(eyre!(
                "Order {} is already {:?}",
                id,
                order.status
            )));
        }
        info!("Order {}: {:?} -> {:?}", id, order.status, status);
        self.store.set_status(session, id, status).await?;
        Ok(())
    }

    pub(crate) async fn commissionable(
        &self,
        session: &mut Session,
        technician_id: ObjectId,
    ) -> Result<Vec<ServiceOrder>, LedgerError> {
        Ok(self
            .store
            .find_commissionable(session, technician_id)
            .await?)
    }

    pub(crate) async fn mark_paid(
        &self,
        session: &mut Session,
        ids: &[ObjectId],
    ) -> Result<u64, LedgerError> {
        Ok(self.store.mark_paid_to_technician(session, ids).await?)
    }
}

use bson::oid::ObjectId;
use model::{
    decimal::Decimal, errors::LedgerError, session::Session, technician::Technician,
};
use storage::technician::TechnicianStore;

#[derive(Clone)]
pub struct Technicians {
    store: TechnicianStore,
}

impl Technicians {
    pub(crate) fn new(store: TechnicianStore) -> Self {
        Technicians { store }
    }

    pub async fn create(
        &self,
        session: &mut Session,
        name: String,
        commission_rate: Decimal,
        base_pay: Decimal,
    ) -> Result<Technician, LedgerError> {
        let technician = Technician::new(session.company(), name, commission_rate, base_pay);
        self.store.insert(session, technician.clone()).await?;
        Ok(technician)
    }

    pub async fn get(
        &self,
        session: &mut Session,
        id: ObjectId,
    ) -> Result<Technician, LedgerError> {
        self.store
            .get(session, id)
            .await?
            .ok_or(LedgerError::TechnicianNotFound(id))
    }

    pub async fn list(&self, session: &mut Session) -> Result<Vec<Technician>, LedgerError> {
        let company_id = session.company();
        Ok(self.store.find_by_company(session, company_id).await?)
    }

    pub async fn set_commission_rate(
        &self,
        session: &mut Session,
        id: ObjectId,
        rate: Decimal,
    ) -> Result<(), LedgerError> {
        self.get(session, id).await?;
        self.store.update_commission_rate(session, id, rate).await?;
        Ok(())
    }
}

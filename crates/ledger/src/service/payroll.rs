use bson::oid::ObjectId;
use model::{balance::TechnicianBalance, errors::LedgerError, session::Session};

use super::{expenses::Expenses, flows::Flows, orders::Orders, technicians::Technicians};

/// Read side of the reconciliation: assembles the derived balance snapshot
/// from the three independent queries. Pure aggregation lives on the model.
#[derive(Clone)]
pub struct Payroll {
    technicians: Technicians,
    orders: Orders,
    flows: Flows,
    expenses: Expenses,
}

impl Payroll {
    pub(crate) fn new(
        technicians: Technicians,
        orders: Orders,
        flows: Flows,
        expenses: Expenses,
    ) -> Self {
        Payroll {
            technicians,
            orders,
            flows,
            expenses,
        }
    }

    /// All-or-nothing read: any failing query propagates and no partial
    /// balance is returned. The snapshot is never cached; callers recompute
    /// after every closing or approval.
    pub async fn balance(
        &self,
        session: &mut Session,
        technician_id: ObjectId,
    ) -> Result<TechnicianBalance, LedgerError> {
        let technician = self.technicians.get(session, technician_id).await?;
        let orders = self.orders.commissionable(session, technician_id).await?;
        let entries = self.flows.pending(session, technician_id).await?;
        let expenses = self.expenses.payable(session, technician_id).await?;

        Ok(TechnicianBalance::aggregate(
            &technician,
            &orders,
            &entries,
            &expenses,
        ))
    }
}

use bson::oid::ObjectId;

use crate::{
    decimal::Decimal,
    expense::TechnicianExpense,
    flow::{FlowEntry, FlowKind},
    order::ServiceOrder,
    technician::Technician,
};

/// Derived snapshot of what a technician is currently owed. Never persisted:
/// built fresh on every read and recomputed after any closing or approval.
#[derive(Debug, Clone)]
pub struct TechnicianBalance {
    pub technician_id: ObjectId,
    pub name: String,
    pub total_commission: Decimal,
    pub total_reimbursements: Decimal,
    pub total_advances: Decimal,
    pub total_bonus: Decimal,
    pub final_balance: Decimal,
    pub os_count: usize,
    /// Completed, not-yet-paid orders that contributed commission.
    pub order_ids: Vec<ObjectId>,
    /// Every pending ledger entry, settled as a block on closing.
    pub entry_ids: Vec<ObjectId>,
    /// Approved reimbursable expenses swept into this balance.
    pub expense_ids: Vec<ObjectId>,
}

impl TechnicianBalance {
    /// Pure aggregation over already-loaded rows. Commission accumulates from
    /// raw order totals and is rounded once on the sum, never per order.
    pub fn aggregate(
        technician: &Technician,
        orders: &[ServiceOrder],
        entries: &[FlowEntry],
        expenses: &[TechnicianExpense],
    ) -> TechnicianBalance {
        let mut total_commission = Decimal::zero();
        let mut order_ids = Vec::new();
        for order in orders.iter().filter(|order| order.is_commissionable()) {
            total_commission += technician.commission_for(order.total);
            order_ids.push(order.id);
        }
        let total_commission = total_commission.round2();

        let mut total_advances = Decimal::zero();
        let mut total_bonus = Decimal::zero();
        let mut entry_ids = Vec::new();
        for entry in entries.iter().filter(|entry| entry.is_pending()) {
            match entry.kind {
                FlowKind::Advance => total_advances += entry.value,
                FlowKind::Bonus => total_bonus += entry.value,
                // inflow/outflow lines left pending carry no weight in the
                // sums but are still settled together with the closing
                _ => {}
            }
            entry_ids.push(entry.id);
        }

        let mut total_reimbursements = Decimal::zero();
        let mut expense_ids = Vec::new();
        for expense in expenses.iter().filter(|expense| expense.is_payable()) {
            total_reimbursements += expense.amount;
            expense_ids.push(expense.id);
        }

        let final_balance =
            total_commission + total_bonus + total_reimbursements - total_advances;

        TechnicianBalance {
            technician_id: technician.id,
            name: technician.name.clone(),
            total_commission,
            total_reimbursements,
            total_advances,
            total_bonus,
            final_balance,
            os_count: order_ids.len(),
            order_ids,
            entry_ids,
            expense_ids,
        }
    }

    /// A closing is only allowed for a strictly positive balance.
    pub fn is_payable(&self) -> bool {
        self.final_balance.is_positive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        expense::{ExpenseCategory, PaymentOrigin},
        flow::FlowStatus,
        order::OrderStatus,
    };

    fn technician(rate: i64) -> Technician {
        Technician::new(
            ObjectId::new(),
            "Carlos".to_string(),
            Decimal::int(rate),
            Decimal::zero(),
        )
    }

    fn completed_order(technician: &Technician, total: Decimal) -> ServiceOrder {
        let mut order = ServiceOrder::new(
            technician.company_id,
            technician.id,
            "client".to_string(),
            "drain cleaning".to_string(),
            total,
        );
        order.status = OrderStatus::Completed;
        order
    }

    fn payable_expense(technician: &Technician, amount: Decimal) -> TechnicianExpense {
        let mut expense = TechnicianExpense::new(
            technician.company_id,
            technician.id,
            amount,
            "diesel".to_string(),
            ExpenseCategory::Fuel,
            PaymentOrigin::Technician,
            None,
        );
        expense.approve().unwrap();
        expense
    }

    #[test]
    fn test_empty_inputs_yield_zero_balance() {
        let technician = technician(30);
        let balance = TechnicianBalance::aggregate(&technician, &[], &[], &[]);

        assert_eq!(Decimal::zero(), balance.final_balance);
        assert_eq!(0, balance.os_count);
        assert!(balance.order_ids.is_empty());
        assert!(balance.entry_ids.is_empty());
        assert!(balance.expense_ids.is_empty());
        assert!(!balance.is_payable());
    }

    #[test]
    fn test_commission_over_completed_unpaid_orders() {
        let technician = technician(30);
        let orders = vec![
            completed_order(&technician, Decimal::int(500)),
            completed_order(&technician, Decimal::int(300)),
        ];
        let balance = TechnicianBalance::aggregate(&technician, &orders, &[], &[]);

        assert_eq!(Decimal::int(240), balance.total_commission);
        assert_eq!(Decimal::int(240), balance.final_balance);
        assert_eq!(2, balance.os_count);
    }

    #[test]
    fn test_paid_and_open_orders_are_excluded() {
        let technician = technician(30);
        let mut paid = completed_order(&technician, Decimal::int(500));
        paid.paid_to_technician = true;
        let mut open = completed_order(&technician, Decimal::int(400));
        open.status = OrderStatus::InProgress;
        let counted = completed_order(&technician, Decimal::int(300));

        let orders = vec![paid.clone(), open, counted.clone()];
        let balance = TechnicianBalance::aggregate(&technician, &orders, &[], &[]);

        assert_eq!(vec![counted.id], balance.order_ids);
        assert!(!balance.order_ids.contains(&paid.id));
        assert_eq!(Decimal::int(90), balance.total_commission);
    }

    #[test]
    fn test_commission_rounds_on_aggregate_not_per_order() {
        let technician = technician(10);
        let orders = vec![
            completed_order(&technician, Decimal::from(10.05)),
            completed_order(&technician, Decimal::from(20.07)),
        ];
        let balance = TechnicianBalance::aggregate(&technician, &orders, &[], &[]);

        // 1.005 + 2.007 = 3.012 -> 3.01; per-order rounding would give 3.02
        assert_eq!(Decimal::from(3.01), balance.total_commission);
    }

    #[test]
    fn test_pending_entries_partitioned_and_all_swept() {
        let technician = technician(0);
        let advance = FlowEntry::advance(
            technician.company_id,
            technician.id,
            Decimal::int(100),
            "fuel advance".to_string(),
        );
        let bonus = FlowEntry::bonus(
            technician.company_id,
            technician.id,
            Decimal::int(40),
            "weekend shift".to_string(),
        );
        // an inflow left pending sums into nothing but is still settled
        let mut stray = FlowEntry::advance(
            technician.company_id,
            technician.id,
            Decimal::int(999),
            "stray".to_string(),
        );
        stray.kind = FlowKind::Inflow;
        let mut processed = FlowEntry::advance(
            technician.company_id,
            technician.id,
            Decimal::int(70),
            "old advance".to_string(),
        );
        processed.status = FlowStatus::Processed;

        let entries = vec![advance.clone(), bonus.clone(), stray.clone(), processed];
        let balance = TechnicianBalance::aggregate(&technician, &[], &entries, &[]);

        assert_eq!(Decimal::int(100), balance.total_advances);
        assert_eq!(Decimal::int(40), balance.total_bonus);
        assert_eq!(vec![advance.id, bonus.id, stray.id], balance.entry_ids);
        assert_eq!(Decimal::int(-60), balance.final_balance);
    }

    #[test]
    fn test_reimbursements_only_from_payable_expenses() {
        let technician = technician(0);
        let payable = payable_expense(&technician, Decimal::from(35.90));

        let mut company_funded = payable_expense(&technician, Decimal::int(100));
        company_funded.origin = PaymentOrigin::Company;

        let mut authorized = payable_expense(&technician, Decimal::int(100));
        authorized.authorize().unwrap();

        let pending = TechnicianExpense::new(
            technician.company_id,
            technician.id,
            Decimal::int(100),
            "parts".to_string(),
            ExpenseCategory::Parts,
            PaymentOrigin::Technician,
            None,
        );

        let expenses = vec![payable.clone(), company_funded, authorized, pending];
        let balance = TechnicianBalance::aggregate(&technician, &[], &[], &expenses);

        assert_eq!(Decimal::from(35.90), balance.total_reimbursements);
        assert_eq!(vec![payable.id], balance.expense_ids);
    }

    #[test]
    fn test_negative_balance_is_preserved_and_blocks_closing() {
        let technician = technician(30);
        let orders = vec![completed_order(&technician, Decimal::int(100))];
        let advance = FlowEntry::advance(
            technician.company_id,
            technician.id,
            Decimal::int(200),
            "advance".to_string(),
        );

        let balance =
            TechnicianBalance::aggregate(&technician, &orders, &[advance], &[]);

        assert_eq!(Decimal::int(-170), balance.final_balance);
        assert!(!balance.is_payable());
    }

    #[test]
    fn test_recomputation_after_closing_is_zero() {
        let technician = technician(30);
        let mut orders = vec![
            completed_order(&technician, Decimal::int(500)),
            completed_order(&technician, Decimal::int(300)),
        ];
        let mut advance = FlowEntry::advance(
            technician.company_id,
            technician.id,
            Decimal::int(50),
            "advance".to_string(),
        );
        let mut expense = payable_expense(&technician, Decimal::int(20));

        let first =
            TechnicianBalance::aggregate(&technician, &orders, &[advance.clone()], &[expense.clone()]);
        assert_eq!(Decimal::int(210), first.final_balance);

        // what a closing does to the contributing records
        for order in orders.iter_mut() {
            order.paid_to_technician = true;
        }
        advance.status = FlowStatus::Processed;
        expense.authorize().unwrap();

        let second =
            TechnicianBalance::aggregate(&technician, &orders, &[advance], &[expense]);
        assert_eq!(Decimal::zero(), second.final_balance);
        assert!(second.order_ids.is_empty());
        assert!(second.entry_ids.is_empty());
        assert!(second.expense_ids.is_empty());
    }
}

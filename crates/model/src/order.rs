use bson::oid::ObjectId;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Decimal;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Quote,
    Scheduled,
    InProgress,
    Completed,
    Canceled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Canceled)
    }
}

/// A service order (quote/receipt/contract) for one client, executed by one
/// technician.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServiceOrder {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub company_id: ObjectId,
    pub technician_id: ObjectId,
    pub client_name: String,
    pub description: String,
    pub total: Decimal,
    pub status: OrderStatus,
    // flips to true exactly once, when a closing pays the commission out
    #[serde(default)]
    pub paid_to_technician: bool,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl ServiceOrder {
    pub fn new(
        company_id: ObjectId,
        technician_id: ObjectId,
        client_name: String,
        description: String,
        total: Decimal,
    ) -> ServiceOrder {
        ServiceOrder {
            id: ObjectId::new(),
            company_id,
            technician_id,
            client_name,
            description,
            total,
            status: OrderStatus::Quote,
            paid_to_technician: false,
            created_at: Local::now().with_timezone(&Utc),
        }
    }

    /// An order earns commission while it is completed and the commission has
    /// not been paid out yet.
    pub fn is_commissionable(&self) -> bool {
        self.status == OrderStatus::Completed && !self.paid_to_technician
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> ServiceOrder {
        ServiceOrder::new(
            ObjectId::new(),
            ObjectId::new(),
            "client".to_string(),
            "septic tank cleaning".to_string(),
            Decimal::int(500),
        )
    }

    #[test]
    fn test_commissionable() {
        let mut order = order();
        assert!(!order.is_commissionable());

        order.status = OrderStatus::Completed;
        assert!(order.is_commissionable());

        order.paid_to_technician = true;
        assert!(!order.is_commissionable());
    }
}

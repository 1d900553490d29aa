use bson::oid::ObjectId;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Decimal;

/// A field technician. Commission is a percent of the value of every
/// completed service order assigned to them.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Technician {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub company_id: ObjectId,
    pub name: String,
    // a missing rate means "no commission", it never fails a read
    #[serde(default)]
    pub commission_rate: Decimal,
    #[serde(default)]
    pub base_pay: Decimal,
    #[serde(default)]
    pub payout_key: Option<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Technician {
    pub fn new(
        company_id: ObjectId,
        name: String,
        commission_rate: Decimal,
        base_pay: Decimal,
    ) -> Technician {
        Technician {
            id: ObjectId::new(),
            company_id,
            name,
            commission_rate,
            base_pay,
            payout_key: None,
            created_at: Local::now().with_timezone(&Utc),
        }
    }

    /// Raw commission share of an order total. Not rounded: rounding happens
    /// once on the aggregated balance.
    pub fn commission_for(&self, total: Decimal) -> Decimal {
        total * self.commission_rate / Decimal::int(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commission_for() {
        let mut technician = Technician::new(
            ObjectId::new(),
            "Carlos".to_string(),
            Decimal::int(30),
            Decimal::zero(),
        );
        assert_eq!(Decimal::int(45), technician.commission_for(Decimal::int(150)));

        technician.commission_rate = Decimal::zero();
        assert_eq!(Decimal::zero(), technician.commission_for(Decimal::int(150)));
    }
}

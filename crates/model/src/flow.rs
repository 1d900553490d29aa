use bson::oid::ObjectId;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Decimal;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Inflow,
    Outflow,
    /// Money handed to the technician ahead of the closing, deducted from the
    /// payable balance.
    Advance,
    /// Extra pay on top of commission.
    Bonus,
    /// Month-end summary record. Written already processed, never read back
    /// into a balance.
    Closing,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum FlowStatus {
    Pending,
    Processed,
}

/// One line of the per-technician financial ledger.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FlowEntry {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub company_id: ObjectId,
    pub technician_id: ObjectId,
    pub kind: FlowKind,
    pub value: Decimal,
    pub status: FlowStatus,
    pub description: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub date_time: DateTime<Utc>,
}

impl FlowEntry {
    fn new(
        company_id: ObjectId,
        technician_id: ObjectId,
        kind: FlowKind,
        value: Decimal,
        status: FlowStatus,
        description: String,
    ) -> FlowEntry {
        FlowEntry {
            id: ObjectId::new(),
            company_id,
            technician_id,
            kind,
            value,
            status,
            description,
            date_time: Local::now().with_timezone(&Utc),
        }
    }

    pub fn advance(
        company_id: ObjectId,
        technician_id: ObjectId,
        value: Decimal,
        description: String,
    ) -> FlowEntry {
        FlowEntry::new(
            company_id,
            technician_id,
            FlowKind::Advance,
            value,
            FlowStatus::Pending,
            description,
        )
    }

    pub fn bonus(
        company_id: ObjectId,
        technician_id: ObjectId,
        value: Decimal,
        description: String,
    ) -> FlowEntry {
        FlowEntry::new(
            company_id,
            technician_id,
            FlowKind::Bonus,
            value,
            FlowStatus::Pending,
            description,
        )
    }

    pub fn closing(
        company_id: ObjectId,
        technician_id: ObjectId,
        value: Decimal,
        os_count: usize,
    ) -> FlowEntry {
        FlowEntry::new(
            company_id,
            technician_id,
            FlowKind::Closing,
            value,
            FlowStatus::Processed,
            format!("Month-end closing: {} service orders settled", os_count),
        )
    }

    pub fn is_pending(&self) -> bool {
        self.status == FlowStatus::Pending
    }
}

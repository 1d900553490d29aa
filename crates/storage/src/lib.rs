pub mod expense;
pub mod flow;
pub mod order;
pub mod session;
pub mod technician;

use eyre::Result;
use expense::ExpenseStore;
use flow::FlowStore;
use order::OrderStore;
use session::Db;
use technician::TechnicianStore;

const DB_NAME: &str = "flowdrain_db";

#[derive(Clone)]
pub struct Storage {
    pub db: Db,
    pub technicians: TechnicianStore,
    pub orders: OrderStore,
    pub flows: FlowStore,
    pub expenses: ExpenseStore,
}

impl Storage {
    pub async fn new(uri: &str) -> Result<Self> {
        let db = Db::new(uri, DB_NAME).await?;
        let technicians = TechnicianStore::new(&db).await?;
        let orders = OrderStore::new(&db).await?;
        let flows = FlowStore::new(&db).await?;
        let expenses = ExpenseStore::new(&db).await?;

        Ok(Storage {
            db,
            technicians,
            orders,
            flows,
            expenses,
        })
    }
}

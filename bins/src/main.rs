use std::env;
use std::str::FromStr;

use bson::oid::ObjectId;
use dotenv::dotenv;
use eyre::Context;
use log::info;

/// Prints a reconciliation report: the outstanding balance of every
/// technician of the company given by COMPANY_ID.
#[tokio::main]
async fn main() -> eyre::Result<()> {
    if let Err(err) = dotenv() {
        info!("Failed to load .env file: {}", err);
    }
    pretty_env_logger::init();
    color_eyre::install()?;

    info!("connecting to mongo");
    let mongo_url = env::var("MONGO_URL").context("Failed to get MONGO_URL from env")?;
    let storage = storage::Storage::new(&mongo_url)
        .await
        .context("Failed to create storage")?;
    let ledger = ledger::Ledger::new(storage);

    let company_id = env::var("COMPANY_ID").context("Failed to get COMPANY_ID from env")?;
    let company_id = ObjectId::from_str(&company_id).context("COMPANY_ID is not an object id")?;

    let mut session = ledger.db.start_session(company_id).await?;
    let technicians = ledger.technicians.list(&mut session).await?;
    info!("reconciling {} technicians", technicians.len());

    for technician in technicians {
        let balance = ledger.balance(&mut session, technician.id).await?;
        println!(
            "{}: commission {} + bonus {} + reimbursements {} - advances {} = {} ({} orders{})",
            balance.name,
            balance.total_commission,
            balance.total_bonus,
            balance.total_reimbursements,
            balance.total_advances,
            balance.final_balance,
            balance.os_count,
            if balance.is_payable() { "" } else { ", not payable" },
        );
    }

    Ok(())
}

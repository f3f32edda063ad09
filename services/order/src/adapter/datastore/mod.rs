mod in_mem;
mod sql_db;

use std::boxed::Box;
use std::sync::Arc;

use ecommerce_common::confidentiality::AbstractConfidentiality;
use ecommerce_common::config::AppDataStoreCfg;
use ecommerce_common::logging::{app_log_event, AppLogContext, AppLogLevel};

pub use in_mem::{
    AppInMemDstoreTxn, AppInMemFetchedSingleRow, AppInMemFetchedSingleTable, AppInMemoryDStore,
};
pub use sql_db::AppMariaDbStore;

pub(crate) fn build_context(
    logctx: Arc<AppLogContext>,
    cfg: &Vec<AppDataStoreCfg>,
    confidential: Arc<Box<dyn AbstractConfidentiality>>,
) -> (Option<AppInMemoryDStore>, Option<Vec<AppMariaDbStore>>) {
    let mut inmem = None;
    let mut sqldb = None;
    for c in cfg {
        match c {
            AppDataStoreCfg::InMemory(d) => {
                inmem = Some(AppInMemoryDStore::new(d));
            }
            AppDataStoreCfg::DbServer(d) => {
                let lst = sqldb.get_or_insert_with(Vec::new);
                match AppMariaDbStore::try_build(d, confidential.clone()) {
                    Ok(item) => {
                        lst.push(item);
                    }
                    Err(e) => {
                        app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
                    }
                }
            }
        }
    }
    (inmem, sqldb)
}

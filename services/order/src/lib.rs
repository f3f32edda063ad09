use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use uuid::{Builder, NoContext, Timestamp, Uuid};

use ecommerce_common::confidentiality::AbstractConfidentiality;
use ecommerce_common::config::{AppCfgHardLimit, AppConfig};
use ecommerce_common::logging::AppLogContext;

pub mod api;
pub mod constant;
pub mod error;
pub mod model;
pub mod notification;
pub mod repository;
pub mod usecase;

mod adapter;
pub use adapter::{datastore, storage};

use constant::hard_limit;
use error::AppError;
use notification::{AppOrderNotifyQueue, LogOnlyNotifySender};
use storage::AbsObjStorage;

pub struct AppDataStoreContext {
    pub in_mem: Option<Arc<datastore::AppInMemoryDStore>>,
    pub sql_dbs: Option<Vec<Arc<datastore::AppMariaDbStore>>>,
}

// global state shared by all tasks
pub struct AppSharedState {
    _cfg: Arc<AppConfig>,
    _log: Arc<AppLogContext>,
    dstore: Arc<AppDataStoreContext>,
    _notify: AppOrderNotifyQueue,
    _obj_storage: Arc<Box<dyn AbsObjStorage>>,
}

impl AppSharedState {
    /// has to be called within tokio runtime, the notification consumer
    /// is spawned as background task
    pub fn new(
        cfg: AppConfig,
        log: AppLogContext,
        confidential: Box<dyn AbstractConfidentiality>,
    ) -> DefaultResult<Self, AppError> {
        let confidential = Arc::new(confidential);
        let log = Arc::new(log);
        let (in_mem, sql_dbs) =
            datastore::build_context(log.clone(), &cfg.api_server.data_store, confidential);
        let ds_ctx = Arc::new(AppDataStoreContext {
            in_mem: in_mem.map(Arc::new),
            sql_dbs: sql_dbs.map(|m| m.into_iter().map(Arc::new).collect()),
        });
        let sender = Box::new(LogOnlyNotifySender::new(log.clone()));
        let notify =
            notification::build_context(&cfg.api_server.notification, log.clone(), sender)?;
        let objstore = storage::build_context(&cfg.basepath, &cfg.api_server.obj_storage);
        Ok(Self {
            _cfg: Arc::new(cfg),
            _log: log,
            dstore: ds_ctx,
            _notify: notify,
            _obj_storage: Arc::new(objstore),
        })
    } // end of fn new

    pub fn config(&self) -> &Arc<AppConfig> {
        &self._cfg
    }

    pub fn log_context(&self) -> &Arc<AppLogContext> {
        &self._log
    }

    pub fn datastore(&self) -> Arc<AppDataStoreContext> {
        self.dstore.clone()
    }

    pub fn notify_queue(&self) -> AppOrderNotifyQueue {
        self._notify.clone()
    }

    pub fn obj_storage(&self) -> Arc<Box<dyn AbsObjStorage>> {
        self._obj_storage.clone()
    }
} // end of impl AppSharedState

impl Clone for AppSharedState {
    fn clone(&self) -> Self {
        Self {
            _cfg: self._cfg.clone(),
            _log: self._log.clone(),
            dstore: self.dstore.clone(),
            _notify: self._notify.clone(),
            _obj_storage: self._obj_storage.clone(),
        }
    }
}

pub fn app_cfg_hard_limit() -> AppCfgHardLimit {
    AppCfgHardLimit {
        nitems_per_inmem_table: hard_limit::MAX_ITEMS_STORED_PER_MODEL,
        num_db_conns: hard_limit::MAX_DB_CONNECTIONS,
        seconds_db_idle: hard_limit::MAX_SECONDS_DB_IDLE,
        seconds_txn_timeout: hard_limit::MAX_SECONDS_TXN_TIMEOUT,
        notify_queue_capacity: hard_limit::MAX_NOTIFY_QUEUE_CAPACITY,
    }
}

pub(crate) fn generate_custom_uid(machine_code: u8) -> Uuid {
    // UUIDv8 keeps a few bits for node identity, the rest is timestamp
    // followed by random bytes, so IDs stay unique across instances
    let (secs, nano) = Timestamp::now(NoContext).to_unix();
    let millis = (secs * 1000).saturating_add((nano as u64) / 1_000_000);
    let mut node_id = rand::random::<[u8; 10]>();
    node_id[0] = machine_code;
    let builder = Builder::from_unix_timestamp_millis(millis, &node_id);
    builder.into_uuid()
}

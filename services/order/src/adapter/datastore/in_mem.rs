use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use ecommerce_common::config::AppInMemoryDbCfg;
use ecommerce_common::error::AppErrorCode;

use crate::error::AppError;

// simple implementation of in-memory data storage

// application callers are responsible to maintain the structure
// of each row in each table. Each element of a row is stringified
// regardless of its original types (integer, decimal, date-time)
type InnerRow = Vec<String>;
type InnerTable = HashMap<String, InnerRow>;
type AllTable = HashMap<String, InnerTable>;
pub type AppInMemFetchedSingleRow = InnerRow;
pub type AppInMemFetchedSingleTable = InnerTable;

pub struct AppInMemoryDStore {
    max_items_per_table: u32,
    table_map: Arc<AsyncMutex<AllTable>>,
}

/// Exclusive session on the whole store. Writes are staged on a working
/// copy and become visible to others only on commit, dropping the session
/// without commit discards them.
pub struct AppInMemDstoreTxn {
    max_items_per_table: u32,
    guard: OwnedMutexGuard<AllTable>,
    staged: AllTable,
}

impl AppInMemoryDStore {
    pub fn new(cfg: &AppInMemoryDbCfg) -> Self {
        Self {
            max_items_per_table: cfg.max_items,
            table_map: Arc::new(AsyncMutex::new(HashMap::new())),
        }
    }

    pub async fn create_table(&self, label: &str) -> DefaultResult<(), AppError> {
        let mut guard = self.table_map.lock().await;
        if !guard.contains_key(label) {
            guard.insert(label.to_string(), HashMap::new());
        }
        Ok(())
    }

    /// waits until all other sessions finish, transactions are therefore
    /// serialized
    pub async fn begin(&self) -> AppInMemDstoreTxn {
        let guard = self.table_map.clone().lock_owned().await;
        let staged = guard.clone();
        AppInMemDstoreTxn {
            guard,
            staged,
            max_items_per_table: self.max_items_per_table,
        }
    }
} // end of impl AppInMemoryDStore

impl AppInMemDstoreTxn {
    fn table(&self, label: &str) -> DefaultResult<&InnerTable, AppError> {
        self.staged.get(label).ok_or(AppError {
            code: AppErrorCode::DataTableNotExist,
            detail: Some(label.to_string()),
        })
    }

    fn table_mut(&mut self, label: &str) -> DefaultResult<&mut InnerTable, AppError> {
        self.staged.get_mut(label).ok_or(AppError {
            code: AppErrorCode::DataTableNotExist,
            detail: Some(label.to_string()),
        })
    }

    pub fn fetch_one(
        &self,
        label: &str,
        key: &str,
    ) -> DefaultResult<Option<AppInMemFetchedSingleRow>, AppError> {
        let table = self.table(label)?;
        Ok(table.get(key).cloned())
    }

    pub fn filter<F>(&self, label: &str, pred: F) -> DefaultResult<Vec<(String, InnerRow)>, AppError>
    where
        F: Fn(&str, &InnerRow) -> bool,
    {
        let table = self.table(label)?;
        let out = table
            .iter()
            .filter(|(k, v)| pred(k.as_str(), v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(out)
    }

    pub fn save(
        &mut self,
        label: &str,
        data: AppInMemFetchedSingleTable,
    ) -> DefaultResult<usize, AppError> {
        let limit = self.max_items_per_table as usize;
        let table = self.table_mut(label)?;
        let num_saved = data
            .into_iter()
            .map(|(k, v)| {
                table.insert(k, v);
            })
            .count();
        if table.len() > limit {
            let msg = format!("{}, table:{}, limit:{}", module_path!(), label, limit);
            Err(AppError {
                detail: Some(msg),
                code: AppErrorCode::ExceedingMaxLimit,
            })
        } else {
            Ok(num_saved)
        }
    }

    pub fn delete(&mut self, label: &str, keys: &[String]) -> DefaultResult<usize, AppError> {
        let table = self.table_mut(label)?;
        let num_deleted = keys.iter().filter_map(|k| table.remove(k)).count();
        Ok(num_deleted)
    }

    pub fn commit(self) {
        let (mut guard, staged) = (self.guard, self.staged);
        *guard = staged;
    }
} // end of impl AppInMemDstoreTxn

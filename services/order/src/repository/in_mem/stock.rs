use std::collections::HashMap;
use std::result::Result as DefaultResult;

use async_trait::async_trait;

use ecommerce_common::error::AppErrorCode;

use super::{parse_column, InMemDStoreTxn};
use crate::datastore::AppInMemDstoreTxn;
use crate::error::AppError;
use crate::model::ProductStockModel;
use crate::repository::AbsStockTxnRepo;

pub(super) struct StockTable;

impl StockTable {
    pub(super) const LABEL: &'static str = "product_stock";

    fn pkey(store_id: u32, product_id: u64) -> String {
        format!("{store_id}-{product_id}")
    }

    pub(super) fn save(
        txn: &mut AppInMemDstoreTxn,
        items: Vec<ProductStockModel>,
    ) -> DefaultResult<usize, AppError> {
        let iter = items.into_iter().map(|s| {
            let key = Self::pkey(s.store_id, s.product_id);
            (key, vec![s.quantity.to_string()])
        });
        txn.save(Self::LABEL, HashMap::from_iter(iter))
    }

    pub(super) fn fetch(
        txn: &AppInMemDstoreTxn,
        store_id: u32,
        product_id: u64,
    ) -> DefaultResult<Option<ProductStockModel>, AppError> {
        let key = Self::pkey(store_id, product_id);
        let found = txn.fetch_one(Self::LABEL, key.as_str())?;
        if let Some(row) = found {
            let quantity = parse_column::<u32>(&row, 0, Self::LABEL)?;
            Ok(Some(ProductStockModel {
                store_id,
                product_id,
                quantity,
            }))
        } else {
            Ok(None)
        }
    }
} // end of impl StockTable

// The whole in-memory store is locked by the session, which covers the
// row-level lock required between reading and deducting stock
#[async_trait]
impl AbsStockTxnRepo for InMemDStoreTxn {
    async fn fetch_stock(&mut self, store_id: u32, product_id: u64) -> DefaultResult<u32, AppError> {
        let found = StockTable::fetch(&self.inner, store_id, product_id)?;
        Ok(found.map(|s| s.quantity).unwrap_or(0))
    }

    async fn deduct_stock(
        &mut self,
        store_id: u32,
        product_id: u64,
        amount: u32,
    ) -> DefaultResult<(), AppError> {
        let mut stock = StockTable::fetch(&self.inner, store_id, product_id)?.unwrap_or(
            ProductStockModel {
                store_id,
                product_id,
                quantity: 0,
            },
        );
        stock.try_deduct(amount).map_err(|e| AppError {
            code: AppErrorCode::StockShortage,
            detail: Some(format!(
                "store:{}, product:{}, required:{}, available:{}",
                store_id, e.product_id, e.required, e.available
            )),
        })?;
        let _ = StockTable::save(&mut self.inner, vec![stock])?;
        Ok(())
    }

    async fn restore_stock(
        &mut self,
        store_id: u32,
        product_id: u64,
        amount: u32,
    ) -> DefaultResult<(), AppError> {
        let mut stock = StockTable::fetch(&self.inner, store_id, product_id)?.unwrap_or(
            ProductStockModel {
                store_id,
                product_id,
                quantity: 0,
            },
        );
        stock.restore(amount);
        let _ = StockTable::save(&mut self.inner, vec![stock])?;
        Ok(())
    }
}

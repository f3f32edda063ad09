use std::collections::HashMap;
use std::result::Result as DefaultResult;

use async_trait::async_trait;

use ecommerce_common::error::AppErrorCode;

use super::product::ProductTable;
use super::{parse_column, split_key, InMemDStoreTxn};
use crate::datastore::AppInMemDstoreTxn;
use crate::error::AppError;
use crate::model::{CartLineModel, CartModel};
use crate::repository::AbsCartTxnRepo;

pub(super) struct CartLineTable;

impl CartLineTable {
    pub(super) const LABEL: &'static str = "cart_line";

    fn pkey(usr_id: u32, store_id: u32, product_id: u64) -> String {
        format!("{usr_id}-{store_id}-{product_id}")
    }

    pub(super) fn save(
        txn: &mut AppInMemDstoreTxn,
        cart: &CartModel,
    ) -> DefaultResult<usize, AppError> {
        let iter = cart.lines.iter().map(|line| {
            let key = Self::pkey(cart.usr_id, cart.store_id, line.product_id);
            (key, vec![line.quantity.to_string()])
        });
        txn.save(Self::LABEL, HashMap::from_iter(iter))
    }

    /// product ID and requested quantity of each line, sorted by product
    pub(super) fn fetch(
        txn: &AppInMemDstoreTxn,
        usr_id: u32,
        store_id: u32,
    ) -> DefaultResult<Vec<(u64, u32)>, AppError> {
        let prefix = format!("{usr_id}-{store_id}-");
        let rows = txn.filter(Self::LABEL, |k, _v| k.starts_with(prefix.as_str()))?;
        let mut out = rows
            .into_iter()
            .map(|(key, row)| {
                let [_usr, _store, pid] = split_key::<3>(key.as_str(), Self::LABEL)?;
                let product_id = pid.parse::<u64>().map_err(|e| AppError {
                    code: AppErrorCode::DataCorruption,
                    detail: Some(format!("table:{}, key:{}, reason:{}", Self::LABEL, key, e)),
                })?;
                let qty = parse_column::<u32>(&row, 0, Self::LABEL)?;
                Ok((product_id, qty))
            })
            .collect::<DefaultResult<Vec<_>, AppError>>()?;
        out.sort_by_key(|(pid, _)| *pid);
        Ok(out)
    }

    pub(super) fn discard(
        txn: &mut AppInMemDstoreTxn,
        usr_id: u32,
        store_id: u32,
    ) -> DefaultResult<usize, AppError> {
        let keys = Self::fetch(txn, usr_id, store_id)?
            .into_iter()
            .map(|(pid, _)| Self::pkey(usr_id, store_id, pid))
            .collect::<Vec<_>>();
        txn.delete(Self::LABEL, &keys)
    }
} // end of impl CartLineTable

#[async_trait]
impl AbsCartTxnRepo for InMemDStoreTxn {
    async fn fetch_cart(
        &mut self,
        usr_id: u32,
        store_id: u32,
    ) -> DefaultResult<Option<CartModel>, AppError> {
        let saved = CartLineTable::fetch(&self.inner, usr_id, store_id)?;
        if saved.is_empty() {
            return Ok(None);
        }
        let lines = saved
            .into_iter()
            .map(|(product_id, quantity)| {
                let unit_price = ProductTable::fetch_price(&self.inner, product_id)?.ok_or(
                    AppError {
                        code: AppErrorCode::ProductNotExist,
                        detail: Some(format!("product-id:{product_id}")),
                    },
                )?;
                Ok(CartLineModel {
                    product_id,
                    quantity,
                    unit_price,
                })
            })
            .collect::<DefaultResult<Vec<_>, AppError>>()?;
        Ok(Some(CartModel {
            usr_id,
            store_id,
            lines,
        }))
    }

    async fn discard_cart(&mut self, usr_id: u32, store_id: u32) -> DefaultResult<(), AppError> {
        let _num_deleted = CartLineTable::discard(&mut self.inner, usr_id, store_id)?;
        Ok(())
    }
}

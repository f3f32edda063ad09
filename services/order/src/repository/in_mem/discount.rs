use std::collections::HashMap;
use std::result::Result as DefaultResult;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use ecommerce_common::error::AppErrorCode;

use super::{opt_to_column, parse_column, parse_opt_column, parse_time_column, InMemDStoreTxn};
use crate::datastore::{AppInMemDstoreTxn, AppInMemFetchedSingleRow};
use crate::error::AppError;
use crate::model::{DiscountKind, DiscountModel, DiscountValueType};
use crate::repository::AbsDiscountTxnRepo;

pub(super) struct DiscountTable;

impl DiscountTable {
    pub(super) const LABEL: &'static str = "discount";

    pub(super) fn save(
        txn: &mut AppInMemDstoreTxn,
        items: Vec<DiscountModel>,
    ) -> DefaultResult<usize, AppError> {
        let iter = items.into_iter().map(|d| {
            let row = vec![
                d.code,
                d.description,
                d.kind.as_str().to_string(),
                d.value_type.as_str().to_string(),
                opt_to_column(&d.amount),
                opt_to_column(&d.min_purchase),
                opt_to_column(&d.product_id),
                opt_to_column(&d.store_id),
                d.start.to_rfc3339(),
                d.end.to_rfc3339(),
                d.is_deleted.to_string(),
            ];
            (d.id.to_string(), row)
        });
        txn.save(Self::LABEL, HashMap::from_iter(iter))
    }

    fn decode(key: &str, row: &AppInMemFetchedSingleRow) -> DefaultResult<DiscountModel, AppError> {
        let label = Self::LABEL;
        let id = key.parse::<u32>().map_err(|e| AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(format!("table:{label}, key:{key}, reason:{e}")),
        })?;
        Ok(DiscountModel {
            id,
            code: parse_column(row, 0, label)?,
            description: parse_column(row, 1, label)?,
            kind: parse_column::<String>(row, 2, label)?.parse::<DiscountKind>()?,
            value_type: parse_column::<String>(row, 3, label)?.parse::<DiscountValueType>()?,
            amount: parse_opt_column(row, 4, label)?,
            min_purchase: parse_opt_column(row, 5, label)?,
            product_id: parse_opt_column(row, 6, label)?,
            store_id: parse_opt_column(row, 7, label)?,
            start: parse_time_column(row, 8, label)?,
            end: parse_time_column(row, 9, label)?,
            is_deleted: parse_column(row, 10, label)?,
        })
    }
} // end of impl DiscountTable

#[async_trait]
impl AbsDiscountTxnRepo for InMemDStoreTxn {
    async fn find_applicable_discount(
        &mut self,
        code: &str,
        store_id: u32,
        now: DateTime<FixedOffset>,
    ) -> DefaultResult<Option<DiscountModel>, AppError> {
        let code = code.trim().to_lowercase();
        let rows = self.inner.filter(DiscountTable::LABEL, |_k, row| {
            row.first().map_or(false, |c| c.to_lowercase() == code)
        })?;
        let mut candidates = rows
            .iter()
            .map(|(k, row)| DiscountTable::decode(k.as_str(), row))
            .collect::<DefaultResult<Vec<_>, AppError>>()?;
        candidates.retain(|d| d.is_applicable(store_id, now));
        candidates.sort_by_key(|d| d.id);
        Ok(candidates.into_iter().next())
    }
}

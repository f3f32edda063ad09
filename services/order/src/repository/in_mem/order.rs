use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use ecommerce_common::error::AppErrorCode;

use super::{
    create_all_tables, opt_to_column, parse_column, parse_opt_column, parse_time_column,
    split_key, InMemDStoreTxn,
};
use crate::datastore::{AppInMemDstoreTxn, AppInMemFetchedSingleRow, AppInMemoryDStore};
use crate::error::AppError;
use crate::model::{OrderDiscountRefModel, OrderLineModel, OrderModel, OrderPageModel};
use crate::repository::{AbsCartTxnRepo, AbsOrderReadRepo, AbsOrderTxnRepo, AbsStockTxnRepo};

pub(super) struct OrderTopLvlTable;
pub(super) struct OrderLineTable;

impl OrderTopLvlTable {
    pub(super) const LABEL: &'static str = "order_toplvl_meta";

    pub(super) fn save(txn: &mut AppInMemDstoreTxn, o: &OrderModel) -> DefaultResult<usize, AppError> {
        let (discount_id, discount_code) = match o.discount.as_ref() {
            Some(d) => (d.discount_id.to_string(), d.code.clone()),
            None => (String::new(), String::new()),
        };
        let row = vec![
            o.usr_id.to_string(),
            o.store_id.to_string(),
            o.address_id.to_string(),
            o.payment_method_id.to_string(),
            o.destination.clone(),
            o.status.as_str().to_string(),
            o.subtotal.to_string(),
            o.shipping_cost.to_string(),
            o.discount_amount.to_string(),
            o.total_price.to_string(),
            discount_id,
            discount_code,
            opt_to_column(&o.payment_proof),
            o.created_at.to_rfc3339(),
            o.updated_at.to_rfc3339(),
        ];
        let data = HashMap::from([(o.id.clone(), row)]);
        txn.save(Self::LABEL, data)
    }

    pub(super) fn ids_by_owner(
        txn: &AppInMemDstoreTxn,
        usr_id: u32,
    ) -> DefaultResult<Vec<String>, AppError> {
        let owner = usr_id.to_string();
        let rows = txn.filter(Self::LABEL, |_k, row| {
            row.first().map_or(false, |v| v == &owner)
        })?;
        Ok(rows.into_iter().map(|(k, _)| k).collect())
    }

    fn decode(
        oid: &str,
        row: &AppInMemFetchedSingleRow,
        lines: Vec<OrderLineModel>,
    ) -> DefaultResult<OrderModel, AppError> {
        let label = Self::LABEL;
        let discount_id = parse_opt_column::<u32>(row, 10, label)?;
        let discount = discount_id
            .map(|discount_id| {
                let code = parse_column::<String>(row, 11, label)?;
                Ok::<_, AppError>(OrderDiscountRefModel { discount_id, code })
            })
            .transpose()?;
        Ok(OrderModel {
            id: oid.to_string(),
            usr_id: parse_column(row, 0, label)?,
            store_id: parse_column(row, 1, label)?,
            address_id: parse_column(row, 2, label)?,
            payment_method_id: parse_column(row, 3, label)?,
            destination: parse_column(row, 4, label)?,
            status: parse_column::<String>(row, 5, label)?.parse()?,
            lines,
            subtotal: parse_column(row, 6, label)?,
            shipping_cost: parse_column(row, 7, label)?,
            discount_amount: parse_column(row, 8, label)?,
            total_price: parse_column(row, 9, label)?,
            discount,
            payment_proof: parse_opt_column(row, 12, label)?,
            created_at: parse_time_column(row, 13, label)?,
            updated_at: parse_time_column(row, 14, label)?,
        })
    }

    /// order with all its lines, `None` if not exists or not owned by the user
    pub(super) fn fetch(
        txn: &AppInMemDstoreTxn,
        usr_id: u32,
        oid: &str,
    ) -> DefaultResult<Option<OrderModel>, AppError> {
        let row = match txn.fetch_one(Self::LABEL, oid)? {
            Some(r) => r,
            None => return Ok(None),
        };
        let owner = parse_column::<u32>(&row, 0, Self::LABEL)?;
        if owner != usr_id {
            return Ok(None);
        }
        let lines = OrderLineTable::fetch(txn, oid)?;
        Self::decode(oid, &row, lines).map(Some)
    }
} // end of impl OrderTopLvlTable

impl OrderLineTable {
    pub(super) const LABEL: &'static str = "order_line";

    pub(super) fn save(txn: &mut AppInMemDstoreTxn, o: &OrderModel) -> DefaultResult<usize, AppError> {
        let iter = o.lines.iter().map(|l| {
            let key = format!("{}-{}", o.id, l.product_id);
            let row = vec![l.quantity.to_string(), l.unit_price.to_string()];
            (key, row)
        });
        txn.save(Self::LABEL, HashMap::from_iter(iter))
    }

    fn fetch(txn: &AppInMemDstoreTxn, oid: &str) -> DefaultResult<Vec<OrderLineModel>, AppError> {
        let prefix = format!("{oid}-");
        let rows = txn.filter(Self::LABEL, |k, _v| k.starts_with(prefix.as_str()))?;
        let mut out = rows
            .into_iter()
            .map(|(key, row)| {
                let [_oid, pid] = split_key::<2>(key.as_str(), Self::LABEL)?;
                let product_id = pid.parse::<u64>().map_err(|e| AppError {
                    code: AppErrorCode::DataCorruption,
                    detail: Some(format!("table:{}, key:{}, reason:{}", Self::LABEL, key, e)),
                })?;
                Ok(OrderLineModel {
                    product_id,
                    quantity: parse_column(&row, 0, Self::LABEL)?,
                    unit_price: parse_column::<Decimal>(&row, 1, Self::LABEL)?,
                })
            })
            .collect::<DefaultResult<Vec<_>, AppError>>()?;
        out.sort_by_key(|l| l.product_id);
        Ok(out)
    }
} // end of impl OrderLineTable

#[async_trait]
impl AbsOrderTxnRepo for InMemDStoreTxn {
    async fn create_order(&mut self, order: &OrderModel) -> DefaultResult<(), AppError> {
        if self.inner.fetch_one(OrderTopLvlTable::LABEL, order.id.as_str())?.is_some() {
            return Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("duplicate-order-id:{}", order.id)),
            });
        }
        let _ = OrderTopLvlTable::save(&mut self.inner, order)?;
        let _ = OrderLineTable::save(&mut self.inner, order)?;
        for line in order.lines.iter() {
            self.deduct_stock(order.store_id, line.product_id, line.quantity)
                .await?;
        }
        self.discard_cart(order.usr_id, order.store_id).await
    }

    async fn fetch_order(
        &mut self,
        usr_id: u32,
        oid: &str,
    ) -> DefaultResult<Option<OrderModel>, AppError> {
        OrderTopLvlTable::fetch(&self.inner, usr_id, oid)
    }

    async fn update_order(&mut self, order: &OrderModel) -> DefaultResult<(), AppError> {
        if self.inner.fetch_one(OrderTopLvlTable::LABEL, order.id.as_str())?.is_none() {
            return Err(AppError {
                code: AppErrorCode::OrderNotExist,
                detail: Some(order.id.clone()),
            });
        }
        let _ = OrderTopLvlTable::save(&mut self.inner, order)?;
        Ok(())
    }
} // end of impl AbsOrderTxnRepo

pub struct InMemOrderReadRepo {
    dstore: Arc<AppInMemoryDStore>,
}

impl InMemOrderReadRepo {
    pub async fn build(m: Arc<AppInMemoryDStore>) -> DefaultResult<Self, AppError> {
        create_all_tables(&m).await?;
        Ok(Self { dstore: m })
    }
}

#[async_trait]
impl AbsOrderReadRepo for InMemOrderReadRepo {
    async fn fetch_detail(
        &self,
        usr_id: u32,
        oid: &str,
    ) -> DefaultResult<Option<OrderModel>, AppError> {
        let txn = self.dstore.begin().await;
        OrderTopLvlTable::fetch(&txn, usr_id, oid)
    }

    async fn fetch_page(
        &self,
        usr_id: u32,
        page: u32,
        page_size: u32,
    ) -> DefaultResult<OrderPageModel, AppError> {
        let txn = self.dstore.begin().await;
        let ids = OrderTopLvlTable::ids_by_owner(&txn, usr_id)?;
        let mut orders = Vec::with_capacity(ids.len());
        for oid in ids.iter() {
            if let Some(o) = OrderTopLvlTable::fetch(&txn, usr_id, oid.as_str())? {
                orders.push(o);
            }
        }
        // newest first
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        let total = orders.len() as u64;
        let skip = (page.max(1) as usize - 1).saturating_mul(page_size as usize);
        let orders = orders
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .collect();
        Ok(OrderPageModel {
            total,
            page,
            page_size,
            orders,
        })
    }
} // end of impl InMemOrderReadRepo

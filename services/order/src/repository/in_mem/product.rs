use std::collections::HashMap;
use std::result::Result as DefaultResult;

use rust_decimal::Decimal;

use super::parse_column;
use crate::datastore::AppInMemDstoreTxn;
use crate::error::AppError;
use crate::model::ProductModel;

pub(super) struct ProductTable;

impl ProductTable {
    pub(super) const LABEL: &'static str = "product";

    pub(super) fn save(
        txn: &mut AppInMemDstoreTxn,
        items: Vec<ProductModel>,
    ) -> DefaultResult<usize, AppError> {
        let iter = items
            .into_iter()
            .map(|p| (p.id.to_string(), vec![p.name, p.price.to_string()]));
        txn.save(Self::LABEL, HashMap::from_iter(iter))
    }

    pub(super) fn fetch_price(
        txn: &AppInMemDstoreTxn,
        product_id: u64,
    ) -> DefaultResult<Option<Decimal>, AppError> {
        let key = product_id.to_string();
        txn.fetch_one(Self::LABEL, key.as_str())?
            .map(|row| parse_column::<Decimal>(&row, 1, Self::LABEL))
            .transpose()
    }
}

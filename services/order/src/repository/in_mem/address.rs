use std::collections::HashMap;
use std::result::Result as DefaultResult;

use async_trait::async_trait;

use super::{parse_column, InMemDStoreTxn};
use crate::datastore::AppInMemDstoreTxn;
use crate::error::AppError;
use crate::model::UserAddressModel;
use crate::repository::AbsAddressTxnRepo;

pub(super) struct AddressTable;

impl AddressTable {
    pub(super) const LABEL: &'static str = "user_address";

    pub(super) fn save(
        txn: &mut AppInMemDstoreTxn,
        items: Vec<UserAddressModel>,
    ) -> DefaultResult<usize, AppError> {
        let iter = items.into_iter().map(|a| {
            let row = vec![
                a.usr_id.to_string(),
                a.recipient,
                a.phone,
                a.street,
                a.detail,
                a.subdistrict,
                a.district,
                a.city,
                a.province,
                a.postal_code,
            ];
            (a.id.to_string(), row)
        });
        txn.save(Self::LABEL, HashMap::from_iter(iter))
    }
}

#[async_trait]
impl AbsAddressTxnRepo for InMemDStoreTxn {
    async fn find_user_address(
        &mut self,
        address_id: u64,
        usr_id: u32,
    ) -> DefaultResult<Option<UserAddressModel>, AppError> {
        let label = AddressTable::LABEL;
        let key = address_id.to_string();
        let row = match self.inner.fetch_one(label, key.as_str())? {
            Some(r) => r,
            None => return Ok(None),
        };
        let owner = parse_column::<u32>(&row, 0, label)?;
        if owner != usr_id {
            return Ok(None);
        }
        let mut cols = (1..10)
            .map(|idx| parse_column::<String>(&row, idx, label))
            .collect::<DefaultResult<Vec<_>, AppError>>()?
            .into_iter();
        let mut next_col = || cols.next().unwrap_or_default();
        Ok(Some(UserAddressModel {
            id: address_id,
            usr_id,
            recipient: next_col(),
            phone: next_col(),
            street: next_col(),
            detail: next_col(),
            subdistrict: next_col(),
            district: next_col(),
            city: next_col(),
            province: next_col(),
            postal_code: next_col(),
        }))
    }
}

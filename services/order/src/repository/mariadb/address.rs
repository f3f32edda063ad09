use std::result::Result as DefaultResult;

use async_trait::async_trait;
use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::{Arguments, Row};

use super::{arg_error, fetch_optional_row, MariaDbDStoreTxn};
use crate::error::AppError;
use crate::model::UserAddressModel;
use crate::repository::AbsAddressTxnRepo;

struct FetchAddressArg(u64, u32);
struct AddressRow(MySqlRow);

impl TryFrom<FetchAddressArg> for (String, MySqlArguments) {
    type Error = AppError;
    fn try_from(value: FetchAddressArg) -> DefaultResult<Self, Self::Error> {
        let patt = "SELECT `id`,`usr_id`,`recipient`,`phone`,`street`,`detail`,`subdistrict`,\
                    `district`,`city`,`province`,`postal_code` FROM `user_address` \
                    WHERE `id`=? AND `usr_id`=?";
        let mut args = MySqlArguments::default();
        args.add(value.0).map_err(arg_error)?;
        args.add(value.1).map_err(arg_error)?;
        Ok((patt.to_string(), args))
    }
}

impl TryFrom<AddressRow> for UserAddressModel {
    type Error = AppError;
    fn try_from(value: AddressRow) -> DefaultResult<Self, Self::Error> {
        let row = value.0;
        Ok(UserAddressModel {
            id: row.try_get::<u64, usize>(0)?,
            usr_id: row.try_get::<u32, usize>(1)?,
            recipient: row.try_get::<String, usize>(2)?,
            phone: row.try_get::<String, usize>(3)?,
            street: row.try_get::<String, usize>(4)?,
            detail: row.try_get::<String, usize>(5)?,
            subdistrict: row.try_get::<String, usize>(6)?,
            district: row.try_get::<String, usize>(7)?,
            city: row.try_get::<String, usize>(8)?,
            province: row.try_get::<String, usize>(9)?,
            postal_code: row.try_get::<String, usize>(10)?,
        })
    }
}

#[async_trait]
impl AbsAddressTxnRepo for MariaDbDStoreTxn {
    async fn find_user_address(
        &mut self,
        address_id: u64,
        usr_id: u32,
    ) -> DefaultResult<Option<UserAddressModel>, AppError> {
        let (sql_patt, args): (String, MySqlArguments) =
            FetchAddressArg(address_id, usr_id).try_into()?;
        let found = fetch_optional_row(&mut self.tx, sql_patt, args).await?;
        found
            .map(|r| UserAddressModel::try_from(AddressRow(r)))
            .transpose()
    }
}

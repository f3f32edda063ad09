use std::result::Result as DefaultResult;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::{Arguments, Row};

use super::{arg_error, fetch_all_rows, from_db_time, to_db_time, MariaDbDStoreTxn};
use crate::error::AppError;
use crate::model::{DiscountKind, DiscountModel, DiscountValueType};
use crate::repository::AbsDiscountTxnRepo;

struct FetchByCodeArg<'a>(&'a str, u32, DateTime<FixedOffset>);
struct DiscountRow(MySqlRow);

impl<'a> TryFrom<FetchByCodeArg<'a>> for (String, MySqlArguments) {
    type Error = AppError;
    fn try_from(value: FetchByCodeArg<'a>) -> DefaultResult<Self, Self::Error> {
        let col_seq = "`id`,`code`,`description`,`kind`,`value_type`,`amount`,`min_purchase`,\
                       `product_id`,`store_id`,`start_time`,`end_time`,`is_deleted`";
        let patt = format!(
            "SELECT {col_seq} FROM `discount` WHERE LOWER(`code`)=LOWER(?) \
             AND `is_deleted`=FALSE AND `start_time`<=? AND `end_time`>=? \
             AND (`store_id` IS NULL OR `store_id`=?) ORDER BY `id` ASC"
        );
        let now = to_db_time(&value.2);
        let mut args = MySqlArguments::default();
        args.add(value.0.to_string()).map_err(arg_error)?;
        args.add(now).map_err(arg_error)?;
        args.add(now).map_err(arg_error)?;
        args.add(value.1).map_err(arg_error)?;
        Ok((patt, args))
    }
}

impl TryFrom<DiscountRow> for DiscountModel {
    type Error = AppError;
    fn try_from(value: DiscountRow) -> DefaultResult<Self, Self::Error> {
        let row = value.0;
        let kind = row.try_get::<String, usize>(3)?.parse::<DiscountKind>()?;
        let value_type = row
            .try_get::<String, usize>(4)?
            .parse::<DiscountValueType>()?;
        Ok(DiscountModel {
            id: row.try_get::<u32, usize>(0)?,
            code: row.try_get::<String, usize>(1)?,
            description: row.try_get::<String, usize>(2)?,
            kind,
            value_type,
            amount: row.try_get::<Option<Decimal>, usize>(5)?,
            min_purchase: row.try_get::<Option<Decimal>, usize>(6)?,
            product_id: row.try_get::<Option<u64>, usize>(7)?,
            store_id: row.try_get::<Option<u32>, usize>(8)?,
            start: from_db_time(&row, 9)?,
            end: from_db_time(&row, 10)?,
            is_deleted: row.try_get::<bool, usize>(11)?,
        })
    }
}

#[async_trait]
impl AbsDiscountTxnRepo for MariaDbDStoreTxn {
    async fn find_applicable_discount(
        &mut self,
        code: &str,
        store_id: u32,
        now: DateTime<FixedOffset>,
    ) -> DefaultResult<Option<DiscountModel>, AppError> {
        let code = code.trim();
        let (sql_patt, args): (String, MySqlArguments) =
            FetchByCodeArg(code, store_id, now).try_into()?;
        let rows = fetch_all_rows(&mut self.tx, sql_patt, args).await?;
        // time comparison in database has lower precision, the model
        // decides the final applicability
        for row in rows {
            let d = DiscountModel::try_from(DiscountRow(row))?;
            if d.is_applicable(store_id, now) {
                return Ok(Some(d));
            }
        }
        Ok(None)
    }
}

mod address;
mod cart;
mod discount;
mod order;
mod stock;

use std::boxed::Box;
use std::io::ErrorKind;
use std::ops::DerefMut;
use std::result::Result as DefaultResult;
use std::sync::Arc;
use std::vec::IntoIter;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use sqlx::error::{BoxDynError, Error};
use sqlx::mysql::{MySqlArguments, MySqlQueryResult, MySqlRow};
use sqlx::{MySql, Row, Transaction};

use ecommerce_common::error::AppErrorCode;

use crate::datastore::AppMariaDbStore;
use crate::error::AppError;
use crate::repository::{AbsDStoreTxn, AbsUnitOfWork};

pub(super) use order::MariaDbOrderReadRepo;

const OID_BYTE_LENGTH: usize = 16;

impl From<Error> for AppError {
    fn from(value: Error) -> Self {
        let (code, detail) = match value {
            Error::Configuration(e) => (
                AppErrorCode::InvalidInput,
                e.to_string() + " invalid-db-config",
            ),
            Error::Io(e) => (
                AppErrorCode::IOerror(e.kind()),
                e.to_string() + " io-err-mariadb",
            ),
            Error::Database(e) => (AppErrorCode::RemoteDbServerFailure, e.to_string()),
            Error::Protocol(errmsg) => (AppErrorCode::IOerror(ErrorKind::InvalidData), errmsg),
            Error::Decode(e) => (AppErrorCode::DataCorruption, e.to_string()),
            Error::ColumnDecode { index, source } => (
                AppErrorCode::DataCorruption,
                source.to_string() + ", when decoding column at idx " + index.as_str(),
            ),
            Error::Tls(e) => (
                AppErrorCode::IOerror(ErrorKind::NotConnected),
                e.to_string(),
            ),
            Error::TypeNotFound { type_name } => {
                (AppErrorCode::InvalidInput, type_name + " wrong-col-typ")
            }
            Error::ColumnNotFound(col_name) => (
                AppErrorCode::IOerror(ErrorKind::NotFound),
                col_name + "no-col",
            ),
            Error::RowNotFound => (
                AppErrorCode::IOerror(ErrorKind::NotFound),
                "no-row".to_string(),
            ),
            Error::ColumnIndexOutOfBounds { index, len } => (
                AppErrorCode::InvalidInput,
                format!("req-idx:{}, limit:{}", index, len),
            ),
            Error::PoolTimedOut => (AppErrorCode::DatabaseServerBusy, "no-conn-avail".to_string()),
            Error::PoolClosed => (AppErrorCode::Unknown, "pool-closed".to_string()),
            Error::WorkerCrashed => (
                AppErrorCode::Unknown,
                "low-level-db-worker-crashed".to_string(),
            ),
            _others => (
                AppErrorCode::Unknown,
                "internal-implementation-issue".to_string(),
            ),
        };
        Self {
            code,
            detail: Some(detail),
        }
    } // end of fn from
} // end of impl AppError

fn arg_error(e: BoxDynError) -> AppError {
    AppError {
        code: AppErrorCode::InvalidInput,
        detail: Some(e.to_string() + ", sql-arg-encode"),
    }
}

/*
* - size of order-id has to match database schema
* - In mariaDB, the BINARY column are right-padded with number of zero octets (0x0)
    to fill the length og declared binary column, this struct ensures any given hex
    string can be converted to correct binary format to database server.
* */
struct OidBytes([u8; OID_BYTE_LENGTH]);

impl<'a> TryFrom<&'a str> for OidBytes {
    type Error = AppError;
    fn try_from(value: &'a str) -> DefaultResult<Self, Self::Error> {
        if value.len() <= (OID_BYTE_LENGTH * 2) {
            let iter = hex_to_octet_iter(value)?;
            let mut dst = [0; OID_BYTE_LENGTH];
            dst.iter_mut().zip(iter).for_each(|(d, s)| *d = s);
            let num_rotate = OID_BYTE_LENGTH - (value.len() >> 1);
            dst.rotate_right(num_rotate);
            Ok(OidBytes(dst))
        } else {
            let detail = format!("size-not-fit: {value}");
            Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(detail),
            })
        }
    }
}
impl OidBytes {
    fn as_column(&self) -> Vec<u8> {
        self.0.to_vec()
    }
    fn to_app_oid(row: &MySqlRow, idx: usize) -> DefaultResult<String, AppError> {
        let raw = row.try_get::<Vec<u8>, usize>(idx)?;
        if raw.len() != OID_BYTE_LENGTH {
            let detail = format!("fetched-id-len: {}", raw.len());
            Err(AppError {
                code: AppErrorCode::DataCorruption,
                detail: Some(detail),
            })
        } else {
            let mut padded = true;
            let out = raw
                .into_iter()
                .filter_map(|b| {
                    if b != 0 {
                        padded = false;
                    }
                    if padded {
                        None
                    } else {
                        Some(format!("{:02x}", b))
                    }
                })
                .collect();
            Ok(out)
        }
    }
}

fn hex_to_octet_iter(src: &str) -> DefaultResult<IntoIter<u8>, AppError> {
    if src.len() % 2 != 0 {
        let detail = format!("not-hex-string: {src}");
        return Err(AppError {
            code: AppErrorCode::InvalidInput,
            detail: Some(detail),
        });
    }
    let octets = (0..src.len())
        .step_by(2)
        .map(|idx| {
            let hx = src.get(idx..idx + 2).ok_or(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("no-chars-at-idx: {idx}")),
            })?;
            u8::from_str_radix(hx, 16).map_err(|_e| AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("parse-char-at-idx: {hx} , {idx}")),
            })
        })
        .collect::<DefaultResult<Vec<u8>, AppError>>()?;
    Ok(octets.into_iter())
} // end of fn hex_to_octet_iter

#[test]
fn verify_hex_to_oidbytes() {
    let OidBytes(actual) = OidBytes::try_from("800EFF41").unwrap();
    let expect = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x80, 0x0E, 0xFF, 0x41];
    assert_eq!(actual, expect);
    let OidBytes(actual) = OidBytes::try_from("0902900390049005a004a005a006a007").unwrap();
    let expect = [
        0x09, 0x02, 0x90, 0x03, 0x90, 0x04, 0x90, 0x05, 0xa0, 0x04, 0xa0, 0x05, 0xa0, 0x06, 0xa0,
        0x07,
    ];
    assert_eq!(actual, expect);
    let result = OidBytes::try_from("ec0902900390049005a004a005a006a007");
    assert!(result.is_err());
    if let Err(e) = result {
        assert_eq!(e.code, AppErrorCode::InvalidInput);
    }
    let result = OidBytes::try_from("80eZ");
    assert!(result.is_err());
}

// all time columns are stored in UTC without timezone
fn to_db_time(t: &DateTime<FixedOffset>) -> NaiveDateTime {
    t.naive_utc()
}

fn from_db_time(row: &MySqlRow, idx: usize) -> DefaultResult<DateTime<FixedOffset>, AppError> {
    let raw = row.try_get::<NaiveDateTime, usize>(idx)?;
    let t = DateTime::<Utc>::from_naive_utc_and_offset(raw, Utc);
    Ok(t.fixed_offset())
}

async fn run_query_once(
    tx: &mut Transaction<'static, MySql>,
    sql_patt: String,
    args: MySqlArguments,
    maybe_num_batch: Option<usize>,
) -> DefaultResult<MySqlQueryResult, AppError> {
    let query = sqlx::query_with(sql_patt.as_str(), args);
    let exec = tx.deref_mut();
    let resultset = query.execute(exec).await?;
    if let Some(num_batch) = maybe_num_batch {
        let num_affected = resultset.rows_affected() as usize;
        if num_affected == num_batch {
            Ok(resultset)
        } else {
            let detail = format!(
                "num_affected, actual:{}, expect:{}",
                num_affected, num_batch
            );
            Err(AppError {
                code: AppErrorCode::DataCorruption,
                detail: Some(detail),
            })
        }
    } else {
        Ok(resultset)
    }
}

async fn fetch_optional_row(
    tx: &mut Transaction<'static, MySql>,
    sql_patt: String,
    args: MySqlArguments,
) -> DefaultResult<Option<MySqlRow>, AppError> {
    let query = sqlx::query_with(sql_patt.as_str(), args);
    let exec = tx.deref_mut();
    let row = query.fetch_optional(exec).await?;
    Ok(row)
}

async fn fetch_all_rows(
    tx: &mut Transaction<'static, MySql>,
    sql_patt: String,
    args: MySqlArguments,
) -> DefaultResult<Vec<MySqlRow>, AppError> {
    let query = sqlx::query_with(sql_patt.as_str(), args);
    let exec = tx.deref_mut();
    let rows = query.fetch_all(exec).await?;
    Ok(rows)
}

fn pick_primary_db(dbs: &[Arc<AppMariaDbStore>]) -> DefaultResult<Arc<AppMariaDbStore>, AppError> {
    dbs.first().cloned().ok_or(AppError {
        code: AppErrorCode::MissingDataStore,
        detail: Some("mariadb".to_string()),
    })
}

pub(super) struct MariaDbUnitOfWork {
    db: Arc<AppMariaDbStore>,
}

/// Every statement runs in the same database transaction. Dropping the
/// handle without commit rolls the transaction back.
pub struct MariaDbDStoreTxn {
    tx: Transaction<'static, MySql>,
}

impl MariaDbUnitOfWork {
    pub(super) fn try_build(dbs: &[Arc<AppMariaDbStore>]) -> DefaultResult<Self, AppError> {
        let db = pick_primary_db(dbs)?;
        Ok(Self { db })
    }
}

#[async_trait]
impl AbsUnitOfWork for MariaDbUnitOfWork {
    async fn begin(&self) -> DefaultResult<Box<dyn AbsDStoreTxn>, AppError> {
        let tx = self.db.begin().await?;
        Ok(Box::new(MariaDbDStoreTxn { tx }))
    }
}

#[async_trait]
impl AbsDStoreTxn for MariaDbDStoreTxn {
    async fn commit(self: Box<Self>) -> DefaultResult<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
    async fn rollback(self: Box<Self>) -> DefaultResult<(), AppError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

#[cfg(feature = "mariadb")]
use std::time::Duration;

#[cfg(feature = "mariadb")]
use serde::Deserialize;
#[cfg(feature = "mariadb")]
use sqlx::mysql::MySqlConnectOptions;
#[cfg(feature = "mariadb")]
use sqlx::pool::{PoolConnection, PoolOptions};
#[cfg(feature = "mariadb")]
use sqlx::{MySql, Pool, Transaction};

use ecommerce_common::confidentiality::AbstractConfidentiality;
use ecommerce_common::config::AppDbServerCfg;
#[cfg(feature = "mariadb")]
use ecommerce_common::config::AppDbServerType;
use ecommerce_common::error::AppErrorCode;

use crate::error::AppError;

#[cfg(feature = "mariadb")]
#[allow(non_snake_case)]
#[derive(Deserialize)]
struct DbSecret {
    HOST: String,
    PORT: u16,
    USER: String,
    PASSWORD: String,
}

#[cfg(feature = "mariadb")]
pub struct AppMariaDbStore {
    pub alias: String,
    pool: Pool<MySql>,
}
#[cfg(not(feature = "mariadb"))]
pub struct AppMariaDbStore {}

#[cfg(feature = "mariadb")]
impl AppMariaDbStore {
    pub fn try_build(
        cfg: &AppDbServerCfg,
        confidential: Arc<Box<dyn AbstractConfidentiality>>,
    ) -> DefaultResult<Self, AppError> {
        if !matches!(cfg.srv_type, AppDbServerType::MariaDB) {
            let detail = format!("db-cfg-server-type: {:?}", cfg.srv_type);
            return Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(detail),
            });
        }
        let serial = confidential.try_get_payload(cfg.confidentiality_path.as_str())?;
        let secret = serde_json::from_str::<DbSecret>(serial.as_str()).map_err(|e| {
            let detail = e.to_string() + ", secret-parsing-error, source: AppMariaDbStore";
            AppError {
                code: AppErrorCode::InvalidJsonFormat,
                detail: Some(detail),
            }
        })?;
        let conn_opts = MySqlConnectOptions::new()
            .host(secret.HOST.as_str())
            .port(secret.PORT)
            .username(secret.USER.as_str())
            .password(secret.PASSWORD.as_str())
            .database(cfg.db_name.as_str());
        let pol_opts = PoolOptions::<MySql>::new()
            .max_connections(cfg.max_conns)
            .idle_timeout(Some(Duration::new(cfg.idle_timeout_secs as u64, 0)))
            .acquire_timeout(Duration::new(cfg.acquire_timeout_secs as u64, 0))
            .min_connections(0);
        let pool = pol_opts.connect_lazy_with(conn_opts);
        Ok(Self {
            pool,
            alias: cfg.alias.clone(),
        })
    }

    pub async fn acquire(&self) -> DefaultResult<PoolConnection<MySql>, AppError> {
        let conn = self.pool.acquire().await?;
        Ok(conn)
    }

    /// the transaction owns its pooled connection, dropping it without
    /// commit rolls back all statements executed in it
    pub async fn begin(&self) -> DefaultResult<Transaction<'static, MySql>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(tx)
    }
} // end of impl AppMariaDbStore

#[cfg(not(feature = "mariadb"))]
impl AppMariaDbStore {
    pub fn try_build(
        cfg: &AppDbServerCfg,
        _confidential: Arc<Box<dyn AbstractConfidentiality>>,
    ) -> DefaultResult<Self, AppError> {
        let detail = format!(
            "sql-db, type:{:?}, alias:{}",
            cfg.srv_type,
            cfg.alias.as_str()
        );
        Err(AppError {
            code: AppErrorCode::FeatureDisabled,
            detail: Some(detail),
        })
    }
}

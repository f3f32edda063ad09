mod local_fs;

use std::boxed::Box;
use std::result::Result as DefaultResult;

use async_trait::async_trait;

use ecommerce_common::config::{AppBasepathCfg, AppObjStorageCfg};

use crate::error::AppError;

pub use local_fs::LocalFsObjStorage;

#[async_trait]
pub trait AbsObjStorage: Sync + Send {
    /// store the content under the folder, return URL referencing it
    async fn upload(&self, folder: &str, content: Vec<u8>) -> DefaultResult<String, AppError>;
}

pub(crate) fn build_context(
    basepath: &AppBasepathCfg,
    cfg: &AppObjStorageCfg,
) -> Box<dyn AbsObjStorage> {
    match cfg {
        AppObjStorageCfg::LocalFs { dir, url_prefix } => {
            let fullpath = basepath.service.clone() + dir;
            Box::new(LocalFsObjStorage::new(fullpath, url_prefix.clone()))
        }
    }
}

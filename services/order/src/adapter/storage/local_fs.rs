use std::path::PathBuf;
use std::result::Result as DefaultResult;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use ecommerce_common::error::AppErrorCode;

use super::AbsObjStorage;
use crate::constant::app_meta;
use crate::error::AppError;
use crate::generate_custom_uid;

pub struct LocalFsObjStorage {
    basedir: PathBuf,
    url_prefix: String,
}

impl LocalFsObjStorage {
    pub fn new(basedir: String, url_prefix: String) -> Self {
        let url_prefix = url_prefix.trim_end_matches('/').to_string();
        Self {
            basedir: PathBuf::from(basedir),
            url_prefix,
        }
    }
}

#[async_trait]
impl AbsObjStorage for LocalFsObjStorage {
    async fn upload(&self, folder: &str, content: Vec<u8>) -> DefaultResult<String, AppError> {
        if content.is_empty() {
            return Err(AppError {
                code: AppErrorCode::EmptyInputData,
                detail: Some(format!("upload-folder:{folder}")),
            });
        }
        let dir = self.basedir.join(folder);
        fs::create_dir_all(&dir).await?;
        let fname = generate_custom_uid(app_meta::MACHINE_CODE)
            .as_simple()
            .to_string();
        let mut file = fs::File::create(dir.join(fname.as_str())).await?;
        file.write_all(content.as_slice()).await?;
        file.flush().await?;
        Ok(format!("{}/{}/{}", self.url_prefix, folder, fname))
    }
}

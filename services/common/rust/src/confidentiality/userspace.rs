use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::result::Result as DefaultResult;
use std::sync::RwLock;

use serde_json::Value as JsnVal;

use super::AbstractConfidentiality;
use crate::error::{AppConfidentialityError, AppErrorCode};

const SOURCE_SIZE_LIMIT_NBYTES: u64 = 8196;

/// Secrets kept in a JSON file on local filesystem, each payload is
/// addressed by slash-separated key path e.g. `databases/order/HOST`
pub struct UserSpaceConfidentiality {
    src_fullpath: String,
    // only database credentials go through here so far, the cache stays small
    cached: RwLock<HashMap<String, String>>,
}

impl UserSpaceConfidentiality {
    pub fn build(fullpath: String) -> Self {
        Self {
            cached: RwLock::new(HashMap::new()),
            src_fullpath: fullpath,
        }
    }

    fn load_source(&self) -> DefaultResult<JsnVal, AppConfidentialityError> {
        let map_io_err = |e: std::io::Error| AppConfidentialityError {
            code: AppErrorCode::IOerror(e.kind()),
            detail: e.to_string(),
        };
        let mut file = File::open(self.src_fullpath.as_str()).map_err(map_io_err)?;
        let actual_sz = file.metadata().map_err(map_io_err)?.len();
        if actual_sz >= SOURCE_SIZE_LIMIT_NBYTES {
            return Err(AppConfidentialityError {
                code: AppErrorCode::ExceedingMaxLimit,
                detail: format!("source-file, size:{actual_sz}"),
            });
        }
        let mut rawbuf = Vec::new();
        let _sz = file.read_to_end(&mut rawbuf).map_err(map_io_err)?;
        serde_json::from_slice::<JsnVal>(&rawbuf).map_err(|e| AppConfidentialityError {
            code: AppErrorCode::InvalidJsonFormat,
            detail: e.to_string(),
        })
    }

    fn search_payload<'a>(
        toplvl: &'a JsnVal,
        id_: &str,
    ) -> DefaultResult<&'a JsnVal, AppConfidentialityError> {
        let mut curr_lvl = toplvl;
        for tok in id_.split('/') {
            let nxt = match curr_lvl {
                JsnVal::Object(o) => o.get(tok).ok_or(format!("json-object,id:{}", id_)),
                JsnVal::Array(a) => match tok.parse::<usize>() {
                    Ok(idx) => a.get(idx).ok_or(format!("json-array,id:{}", id_)),
                    Err(e) => Err(format!("path-error,id:{},detail:{}", id_, e)),
                },
                _others => Err(format!("json-scalar,id:{}", id_)),
            };
            curr_lvl = nxt.map_err(|detail| AppConfidentialityError {
                detail,
                code: AppErrorCode::NoConfidentialityCfg,
            })?;
        }
        Ok(curr_lvl)
    }

    fn lock_error(e: impl ToString) -> AppConfidentialityError {
        AppConfidentialityError {
            detail: e.to_string() + ", source: UserSpaceConfidentiality",
            code: AppErrorCode::AcquireLockFailure,
        }
    }
} // end of impl UserSpaceConfidentiality

impl AbstractConfidentiality for UserSpaceConfidentiality {
    fn try_get_payload(&self, id_: &str) -> DefaultResult<String, AppConfidentialityError> {
        {
            let rguard = self.cached.read().map_err(Self::lock_error)?;
            if let Some(v) = rguard.get(id_) {
                return Ok(v.clone());
            }
        }
        let toplvl = self.load_source()?;
        let found = Self::search_payload(&toplvl, id_)?;
        let found = serde_json::to_string(found).map_err(|e| AppConfidentialityError {
            code: AppErrorCode::DataCorruption,
            detail: e.to_string(),
        })?;
        let mut wguard = self.cached.write().map_err(Self::lock_error)?;
        let _old = wguard.insert(id_.to_string(), found.clone());
        Ok(found)
    }
}

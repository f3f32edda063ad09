use ecommerce_common::error::AppErrorCode;

use order_placement::storage::{AbsObjStorage, LocalFsObjStorage};

fn ut_storage(label: &str) -> (LocalFsObjStorage, std::path::PathBuf) {
    let basedir = std::env::temp_dir().join(format!("order-placement-ut-{label}"));
    let obj = LocalFsObjStorage::new(
        basedir.to_string_lossy().to_string(),
        "http://localhost:8012/files/".to_string(),
    );
    (obj, basedir)
}

#[tokio::test]
async fn upload_ok() {
    let (storage, basedir) = ut_storage("upload-ok");
    let content = b"pretend-jpeg-bytes".to_vec();
    let url = storage.upload("payment_proofs", content.clone()).await.unwrap();
    let prefix = "http://localhost:8012/files/payment_proofs/";
    assert!(url.starts_with(prefix));
    let fname = url.trim_start_matches(prefix);
    assert_eq!(fname.len(), 32);
    let saved = tokio::fs::read(basedir.join("payment_proofs").join(fname))
        .await
        .unwrap();
    assert_eq!(saved, content);
}

#[tokio::test]
async fn upload_empty_content() {
    let (storage, _basedir) = ut_storage("upload-empty");
    let result = storage.upload("payment_proofs", Vec::new()).await;
    let e = result.unwrap_err();
    assert_eq!(e.code, AppErrorCode::EmptyInputData);
}

pub mod datastore;
pub mod storage;

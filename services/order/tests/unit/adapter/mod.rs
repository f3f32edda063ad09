mod datastore;
mod storage;

pub mod app_meta {
    pub const LABEL: &str = "order-placement";
    // node identity embedded in generated order IDs
    pub const MACHINE_CODE: u8 = 1;
}

pub mod hard_limit {
    pub const MAX_ITEMS_STORED_PER_MODEL: u32 = 2200;
    pub const MAX_DB_CONNECTIONS: u32 = 10000;
    pub const MAX_SECONDS_DB_IDLE: u16 = 600;
    pub const MAX_SECONDS_TXN_TIMEOUT: u16 = 120;
    pub const MAX_NOTIFY_QUEUE_CAPACITY: u32 = 8192;
}

pub const OBJ_STORAGE_PROOF_FOLDER: &str = "payment_proofs";

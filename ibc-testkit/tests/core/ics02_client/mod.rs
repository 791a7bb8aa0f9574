pub mod create_client;
pub mod provide_counterparty;
pub mod update_client;

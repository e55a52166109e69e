pub mod alert_service;
pub mod db_init;

pub mod ip_api;
pub mod retry;
pub mod sheets_audit_log;
pub mod static_key;

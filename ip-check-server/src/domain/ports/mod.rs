pub mod audit_log;
pub mod credentials;
pub mod geolocation;

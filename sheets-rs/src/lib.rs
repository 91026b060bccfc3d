pub mod auth;
pub mod client;
pub mod credentials;
pub mod errors;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod types;
pub mod utils;

pub use client::Sheets;
pub use credentials::ServiceAccountKey;
pub use errors::SheetsError;

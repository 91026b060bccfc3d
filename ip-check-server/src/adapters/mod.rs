pub mod app_state;
pub mod auth_middleware;
pub mod http;
pub mod payload;
pub mod routes;

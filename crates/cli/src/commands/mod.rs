pub mod auth;
pub mod configure;
pub mod data;
pub mod helpers;
pub mod routes;

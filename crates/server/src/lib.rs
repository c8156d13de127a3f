pub mod analysis;
pub mod clients;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;

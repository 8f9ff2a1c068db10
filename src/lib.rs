#![warn(missing_docs)]
//! Pricewatch watches a single asset's price and raises a rate-limited push
//! notification when it drops by more than a runtime-adjustable threshold
//! within a trailing window.

pub mod config;
pub mod engine;
pub mod http_client;
pub mod http_server;
pub mod models;
pub mod notification;
pub mod persistence;
pub mod providers;
pub mod supervisor;

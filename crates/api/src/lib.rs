//! HTTP API: server wiring, routing, and request/response mapping for the
//! supply-chain registry.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;

// Library root: the scheduling engine plus the shells the binary wires up.

pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod parser;
pub mod schedule;
pub mod store;
pub mod web;

//! Configuration and domain types shared by every layer

pub mod config;
pub mod models;

//! Infrastructure layer (adapters/implementations).

pub mod agent;
pub mod app_config;
pub mod cli;
pub mod db;
pub mod diff;
pub mod hash;

//! BOM Scanner
//!
//! CLI front end of the scan pipeline: configuration, the TME catalog
//! client, the inventory file and KiCad BOM import.

pub mod cli;
pub mod config;
pub mod error;
pub mod inventory;
pub mod kicad_import;
pub mod profile;
pub mod report;
pub mod session;
pub mod tme;

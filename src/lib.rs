// src/lib.rs

//! Shelfwatch Library
//!
//! Reads an inventory spreadsheet, finds stock whose expiry date falls in a
//! look-ahead window, and emails the list to whoever manages the shelf.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;

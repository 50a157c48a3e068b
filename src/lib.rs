//! Bank accounts kept in a flat text file, driven by a numbered console menu.
//!
//! - `account`: a single account record.
//! - `storage`: reading and rewriting the accounts file.
//! - `bank`: the account repository, validation and every account operation.
//! - `menu`: the interactive loop.

pub mod account;
pub mod bank;
pub mod config;
pub mod error;
pub mod menu;
pub mod storage;

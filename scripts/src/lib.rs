//! Scripts for deploying and wiring the Murmuration governance contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod cli;
pub mod client;
mod commands;
pub mod config;
pub mod constants;
pub mod errors;
pub mod ledger;
pub mod michelson;
pub mod orchestrator;
pub mod report;
pub mod retry;
pub mod storage;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_helpers;

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! # Bayesball
//!
//! Command-line front end for the Bayes Ball d-separation algorithm.
//!
//! The network model and algorithms live in `bayesball-network`, re-exported
//! here as [`network`]. This crate adds configuration, edit-operation parsing,
//! and text/JSON rendering.

pub use bayesball_network as network;

pub mod cli;
pub mod commands;
pub mod config;
pub mod edit;
pub mod error;
pub mod json;

pub use error::{Error, Result};

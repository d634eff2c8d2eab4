#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! # Bayesball Network
//!
//! Bayesian-network structure, DAG validation, and the Bayes Ball
//! d-separation traversal.
//!
//! - [`Network`] owns the states, edges, and observation flags.
//! - [`codec`] maps a network to and from its compact model string.
//! - [`is_acyclic`] certifies the edge set is a DAG.
//! - [`bayes_ball`] lists, in discovery order, the moves that reach every
//!   state dependent on a source given the observed states.
//!
//! Everything here is synchronous and single-owner; results are fresh values
//! that never alias the network.

pub mod acyclic;
pub mod codec;
pub mod error;
pub mod model;
pub mod traversal;

pub use acyclic::{cyclic_components, is_acyclic};
pub use error::{NetworkError, NetworkResult};
pub use model::{Adjacency, Network, StateIndex, StateRecord};
pub use traversal::{Traversal, VisitRecord, bayes_ball};

//! Structural edit operations accepted on the command line.
//!
//! Syntax, one op per `--op`:
//!
//! | Op                   | Effect                                 |
//! |----------------------|----------------------------------------|
//! | `add-state`          | add an unobserved state                |
//! | `add-state=observed` | add an observed state                  |
//! | `remove-state=I`     | remove state `I` and its edges         |
//! | `add-edge=S>T`       | add edge `S -> T`                      |
//! | `remove-edge=S>T`    | remove edge `S -> T`                   |
//! | `reverse-edge=S>T`   | replace `S -> T` with `T -> S`         |
//! | `toggle=I`           | flip the observation flag of state `I` |

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::fmt;
use std::str::FromStr;

use bayesball_network::{Network, StateIndex};
use tracing::info;

use crate::error::Error;

/// A single structural edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    AddState { observed: bool },
    RemoveState(StateIndex),
    AddEdge(StateIndex, StateIndex),
    RemoveEdge(StateIndex, StateIndex),
    ReverseEdge(StateIndex, StateIndex),
    Toggle(StateIndex),
}

impl EditOp {
    /// Apply the edit. Returns whether the network changed.
    pub fn apply(self, network: &mut Network) -> bool {
        let applied = match self {
            Self::AddState { observed } => {
                network.add_state(observed);
                true
            }
            Self::RemoveState(index) => network.remove_state(index),
            Self::AddEdge(source, target) => network.add_edge(source, target),
            Self::RemoveEdge(source, target) => network.remove_edge(source, target),
            Self::ReverseEdge(source, target) => network.reverse_edge(source, target),
            Self::Toggle(index) => network.toggle_observed(index).is_some(),
        };
        if !applied {
            info!(op = %self, "edit had no effect");
        }
        applied
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddState { observed: false } => write!(f, "add-state"),
            Self::AddState { observed: true } => write!(f, "add-state=observed"),
            Self::RemoveState(index) => write!(f, "remove-state={index}"),
            Self::AddEdge(s, t) => write!(f, "add-edge={s}>{t}"),
            Self::RemoveEdge(s, t) => write!(f, "remove-edge={s}>{t}"),
            Self::ReverseEdge(s, t) => write!(f, "reverse-edge={s}>{t}"),
            Self::Toggle(index) => write!(f, "toggle={index}"),
        }
    }
}

impl FromStr for EditOp {
    type Err = Error;

    fn from_str(op: &str) -> Result<Self, Self::Err> {
        let (name, argument) = match op.split_once('=') {
            Some((name, argument)) => (name, Some(argument)),
            None => (op, None),
        };

        match (name, argument) {
            ("add-state", None) => Ok(Self::AddState { observed: false }),
            ("add-state", Some("observed")) => Ok(Self::AddState { observed: true }),
            ("remove-state", Some(arg)) => parse_index(op, arg).map(Self::RemoveState),
            ("toggle", Some(arg)) => parse_index(op, arg).map(Self::Toggle),
            ("add-edge", Some(arg)) => parse_edge(op, arg).map(|(s, t)| Self::AddEdge(s, t)),
            ("remove-edge", Some(arg)) => parse_edge(op, arg).map(|(s, t)| Self::RemoveEdge(s, t)),
            ("reverse-edge", Some(arg)) => {
                parse_edge(op, arg).map(|(s, t)| Self::ReverseEdge(s, t))
            }
            _ => Err(Error::invalid_edit(op, "unknown operation")),
        }
    }
}

fn parse_index(op: &str, raw: &str) -> Result<StateIndex, Error> {
    raw.trim()
        .parse()
        .map_err(|e| Error::invalid_edit(op, format!("state index '{raw}': {e}")))
}

fn parse_edge(op: &str, raw: &str) -> Result<(StateIndex, StateIndex), Error> {
    let (source, target) = raw
        .split_once('>')
        .ok_or_else(|| Error::invalid_edit(op, "expected SOURCE>TARGET"))?;
    Ok((parse_index(op, source)?, parse_index(op, target)?))
}

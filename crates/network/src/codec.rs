//! Compact model string.
//!
//! Each state is written as one `;`-terminated segment, in index order:
//!
//! ```text
//! OFC1,2;   live, unobserved, children 1 and 2
//! OTC;      live, observed, no children
//! ;         tombstone
//! ```
//!
//! Parent lists are derived from the child lists and are not written. The
//! string is meant to travel verbatim as the `model` query parameter of a
//! share link.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{NetworkError, NetworkResult};
use crate::model::{Network, StateIndex};

/// Whole-string grammar accepted by [`decode`].
pub const MODEL_STRING_PATTERN: &str = r"^(?:;|(?:O|O[FT])(?:C|C(?:\d+,)*\d+);)+$";

static MODEL_STRING: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(MODEL_STRING_PATTERN));

/// Encode a network. Never fails.
///
/// # Examples
///
/// ```
/// use bayesball_network::{Network, codec};
///
/// let mut network = Network::new();
/// let a = network.add_state(false);
/// let b = network.add_state(true);
/// network.add_edge(a, b);
/// assert_eq!(codec::encode(&network), "OFC1;OTC;");
/// ```
#[must_use]
pub fn encode(network: &Network) -> String {
    network.to_string()
}

/// Decode a model string into a fresh network.
///
/// Edges naming a state outside the decoded address space, a tombstone, or
/// the source itself are dropped, the same as [`Network::add_edge`] would.
///
/// # Errors
///
/// Returns [`NetworkError::InvalidEncoding`] when the input does not match
/// [`MODEL_STRING_PATTERN`] or an index does not fit a `usize`.
pub fn decode(input: &str) -> NetworkResult<Network> {
    let pattern = MODEL_STRING
        .as_ref()
        .map_err(|e| NetworkError::invalid_encoding(format!("model pattern unavailable: {e}")))?;
    if !pattern.is_match(input) {
        warn!(input, "rejected model string");
        return Err(NetworkError::invalid_encoding(format!(
            "'{input}' does not match {MODEL_STRING_PATTERN}"
        )));
    }

    let segments = input
        .strip_suffix(';')
        .unwrap_or(input)
        .split(';')
        .map(parse_segment)
        .collect::<NetworkResult<Vec<_>>>()?;

    let mut network = Network::new();
    for segment in &segments {
        match segment {
            Some((observed, _)) => {
                network.add_state(*observed);
            }
            None => network.push_vacant(),
        }
    }
    for (source, segment) in segments.iter().enumerate() {
        if let Some((_, children)) = segment {
            for target in children {
                network.add_edge(source, *target);
            }
        }
    }

    debug!(
        states = network.number_of_states(),
        edges = network.edge_count(),
        "decoded model string"
    );
    Ok(network)
}

/// Build the shareable link for a network: `<base>?model=<encoded>`.
#[must_use]
pub fn share_link(base_url: &str, network: &Network) -> String {
    format!("{base_url}?model={network}")
}

/// Parse one already-validated segment. `None` marks a tombstone.
fn parse_segment(segment: &str) -> NetworkResult<Option<(bool, Vec<StateIndex>)>> {
    if segment.is_empty() {
        return Ok(None);
    }

    let body = segment
        .strip_prefix('O')
        .ok_or_else(|| NetworkError::invalid_encoding(format!("segment '{segment}' lacks 'O'")))?;
    let (flag, children) = body
        .split_once('C')
        .ok_or_else(|| NetworkError::invalid_encoding(format!("segment '{segment}' lacks 'C'")))?;

    let children = if children.is_empty() {
        Vec::new()
    } else {
        children
            .split(',')
            .map(|child| {
                child.parse::<StateIndex>().map_err(|e| {
                    NetworkError::invalid_encoding(format!("state index '{child}': {e}"))
                })
            })
            .collect::<NetworkResult<Vec<_>>>()?
    };

    Ok(Some((flag == "T", children)))
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, observed) in self.observation_vector().into_iter().enumerate() {
            if let Some(observed) = observed {
                let flag = if observed { 'T' } else { 'F' };
                let children = self
                    .children(index)
                    .map(|set| set.iter().join(","))
                    .unwrap_or_default();
                write!(f, "O{flag}C{children}")?;
            }
            f.write_str(";")?;
        }
        Ok(())
    }
}

impl FromStr for Network {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

impl Network {
    /// Replace this network with the decoded contents of `input`.
    ///
    /// On error the network is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Propagates the [`decode`] error.
    pub fn load_model_string(&mut self, input: &str) -> NetworkResult<()> {
        *self = decode(input)?;
        Ok(())
    }

    /// Encode this network; shorthand for [`encode`].
    #[must_use]
    pub fn to_model_string(&self) -> String {
        encode(self)
    }
}

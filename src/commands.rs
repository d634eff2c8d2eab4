//! CLI command handlers.
//!
//! Every handler takes the decoded network and returns the rendered output;
//! printing is left to `main`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use bayesball_network::{
    Network, NetworkError, StateIndex, VisitRecord, bayes_ball, codec, cyclic_components,
    is_acyclic,
};
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::Commands;
use crate::config::{Config, OutputFormat};
use crate::edit::EditOp;
use crate::error::Result;
use crate::json::JsonSuccess;

/// One row of `show` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateView {
    pub index: StateIndex,
    /// `None` for a removed state.
    pub observed: Option<bool>,
    pub parents: Vec<StateIndex>,
    pub children: Vec<StateIndex>,
}

#[derive(Debug, Serialize)]
struct ShowOutput {
    model: String,
    states: Vec<StateView>,
}

#[derive(Debug, Serialize)]
struct CheckOutput {
    acyclic: bool,
    states: usize,
    edges: usize,
}

#[derive(Debug, Serialize)]
struct RunOutput {
    source: StateIndex,
    visits: Vec<VisitRecord>,
    reached: Vec<StateIndex>,
}

#[derive(Debug, Serialize)]
struct EditOutput {
    model: String,
    applied: usize,
    skipped: usize,
}

#[derive(Debug, Serialize)]
struct LinkOutput {
    link: String,
}

/// Execute a CLI command against a model string.
///
/// This is the main command dispatcher that routes to the appropriate handler.
///
/// # Errors
///
/// Returns error if the model string is invalid, the network is not a DAG
/// (`check`, `run`), the source state does not exist (`run`), or JSON
/// rendering fails.
pub fn execute_command(
    command: Commands,
    model: &str,
    format: OutputFormat,
    config: &Config,
) -> Result<String> {
    let network = codec::decode(model)?;
    debug!(
        states = network.number_of_states(),
        edges = network.edge_count(),
        "model loaded"
    );

    match command {
        Commands::Show => cmd_show(&network, format),
        Commands::Check => cmd_check(&network, format),
        Commands::Run { source } => cmd_run(&network, source, format),
        Commands::Edit { ops } => cmd_edit(network, &ops, format),
        Commands::Link => cmd_link(&network, &config.share_base_url, format),
    }
}

/// Tabulate every slot of the network.
#[must_use]
pub fn state_views(network: &Network) -> Vec<StateView> {
    network
        .observation_vector()
        .into_iter()
        .enumerate()
        .map(|(index, observed)| StateView {
            index,
            observed,
            parents: network
                .parents(index)
                .map(|set| set.iter().copied().collect())
                .unwrap_or_default(),
            children: network
                .children(index)
                .map(|set| set.iter().copied().collect())
                .unwrap_or_default(),
        })
        .collect()
}

fn cmd_show(network: &Network, format: OutputFormat) -> Result<String> {
    let output = ShowOutput {
        model: network.to_model_string(),
        states: state_views(network),
    };
    render(format, &output, |output| {
        output
            .states
            .iter()
            .map(|view| match view.observed {
                None => format!("{}: removed", view.index),
                Some(observed) => format!(
                    "{}: {} parents=[{}] children=[{}]",
                    view.index,
                    if observed { "observed" } else { "unobserved" },
                    view.parents.iter().join(", "),
                    view.children.iter().join(", "),
                ),
            })
            .join("\n")
    })
}

fn cmd_check(network: &Network, format: OutputFormat) -> Result<String> {
    if !is_acyclic(network) {
        return Err(NetworkError::not_acyclic(cyclic_components(network)).into());
    }
    let output = CheckOutput {
        acyclic: true,
        states: network.live_state_count(),
        edges: network.edge_count(),
    };
    render(format, &output, |output| {
        format!(
            "ok: {} states, {} edges, no directed cycles",
            output.states, output.edges
        )
    })
}

fn cmd_run(network: &Network, source: StateIndex, format: OutputFormat) -> Result<String> {
    let traversal = bayes_ball(network, source)?;
    info!(source, visits = traversal.visits().len(), "bayes ball complete");

    let output = RunOutput {
        source,
        reached: traversal.reached_states().into_iter().collect(),
        visits: traversal.into_visits(),
    };
    render(format, &output, |output| {
        let steps = output
            .visits
            .iter()
            .enumerate()
            .map(|(step, visit)| format!("{:>3}. {visit}", step.saturating_add(1)));
        let reached = format!("reached: {}", output.reached.iter().join(", "));
        steps.chain(std::iter::once(reached)).join("\n")
    })
}

fn cmd_edit(mut network: Network, ops: &[EditOp], format: OutputFormat) -> Result<String> {
    let applied = ops.iter().filter(|op| op.apply(&mut network)).count();
    let output = EditOutput {
        model: network.to_model_string(),
        applied,
        skipped: ops.len().saturating_sub(applied),
    };
    render(format, &output, |output| output.model.clone())
}

fn cmd_link(network: &Network, base_url: &str, format: OutputFormat) -> Result<String> {
    let output = LinkOutput {
        link: codec::share_link(base_url, network),
    };
    render(format, &output, |output| output.link.clone())
}

fn render<T: Serialize>(
    format: OutputFormat,
    output: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text(output)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&JsonSuccess::new(output))?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const STOCK_MODEL: &str = "OFC2;OFC2;OFC3,4;OFC;OFC;";

    fn run_text(command: Commands, model: &str) -> Result<String> {
        execute_command(command, model, OutputFormat::Text, &Config::default())
    }

    #[test]
    fn test_show_lists_every_slot() -> Result<()> {
        let output = run_text(Commands::Show, "OTC2;;OFC;")?;
        assert_eq!(
            output,
            "0: observed parents=[] children=[2]\n1: removed\n2: unobserved parents=[0] children=[]"
        );
        Ok(())
    }

    #[test]
    fn test_check_rejects_cycle() {
        let result = run_text(Commands::Check, "OFC1;OFC0;");
        assert!(matches!(
            result,
            Err(Error::Network(NetworkError::NotAcyclic { .. }))
        ));
    }

    #[test]
    fn test_check_accepts_stock_model() -> Result<()> {
        let output = run_text(Commands::Check, STOCK_MODEL)?;
        assert_eq!(output, "ok: 5 states, 4 edges, no directed cycles");
        Ok(())
    }

    #[test]
    fn test_run_prints_steps_and_reached_set() -> Result<()> {
        let output = run_text(Commands::Run { source: 0 }, "OFC1;OFC2;OFC;")?;
        assert_eq!(
            output,
            "  1. start -> 0\n  2. 0 -> 1 (down)\n  3. 1 -> 2 (down)\nreached: 0, 1, 2"
        );
        Ok(())
    }

    #[test]
    fn test_edit_applies_ops_in_order() -> Result<()> {
        let ops = vec![
            EditOp::AddState { observed: true },
            EditOp::AddEdge(0, 5),
            EditOp::RemoveState(1),
            EditOp::Toggle(2),
        ];
        let output = run_text(Commands::Edit { ops }, STOCK_MODEL)?;
        assert_eq!(output, "OFC2,5;;OTC3,4;OFC;OFC;OTC;");
        Ok(())
    }

    #[test]
    fn test_edit_counts_reverse_on_two_cycle_as_applied() -> Result<()> {
        let ops = vec![EditOp::ReverseEdge(0, 1), EditOp::ReverseEdge(0, 1)];
        let output = execute_command(
            Commands::Edit { ops },
            "OFC1;OFC0;",
            OutputFormat::Json,
            &Config::default(),
        )?;
        let value: serde_json::Value = serde_json::from_str(&output)?;
        assert_eq!(value.get("model"), Some(&serde_json::json!("OFC;OFC0;")));
        assert_eq!(value.get("applied"), Some(&serde_json::json!(1)));
        assert_eq!(value.get("skipped"), Some(&serde_json::json!(1)));
        Ok(())
    }

    #[test]
    fn test_link_uses_configured_base() -> Result<()> {
        let config = Config {
            share_base_url: "https://bba.example/app".to_string(),
            ..Config::default()
        };
        let output = execute_command(Commands::Link, "OFC;", OutputFormat::Text, &config)?;
        assert_eq!(output, "https://bba.example/app?model=OFC;");
        Ok(())
    }

    #[test]
    fn test_json_run_output() -> Result<()> {
        let output = execute_command(
            Commands::Run { source: 0 },
            "OFC1;OFC;",
            OutputFormat::Json,
            &Config::default(),
        )?;
        let value: serde_json::Value = serde_json::from_str(&output)?;
        assert_eq!(value.get("success"), Some(&serde_json::json!(true)));
        assert_eq!(value.get("reached"), Some(&serde_json::json!([0, 1])));
        assert_eq!(
            value.pointer("/visits/0/from"),
            Some(&serde_json::Value::Null)
        );
        Ok(())
    }

    #[test]
    fn test_invalid_model_string_is_rejected() {
        let result = run_text(Commands::Show, "hello");
        assert!(matches!(
            result,
            Err(Error::Network(NetworkError::InvalidEncoding { .. }))
        ));
    }
}

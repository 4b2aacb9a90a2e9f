use crate::workspace::{emit, Workspace};
use nightshift_score::{format_session_score, score_inputs, ScoreInputs};
use tracing::warn;

/// Explicit rubric inputs from the command line; each replaces the derived value.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputOverrides {
    pub features: Option<u32>,
    pub tests: Option<u32>,
    pub cli_commands: Option<u32>,
    pub api_endpoints: Option<u32>,
    pub health_delta: Option<f64>,
}

impl InputOverrides {
    pub fn apply(&self, mut inputs: ScoreInputs) -> ScoreInputs {
        if let Some(v) = self.features {
            inputs.features = v;
        }
        if let Some(v) = self.tests {
            inputs.tests = v;
        }
        if let Some(v) = self.cli_commands {
            inputs.cli_commands = v;
        }
        if let Some(v) = self.api_endpoints {
            inputs.api_endpoints = v;
        }
        if let Some(v) = self.health_delta {
            inputs.health_delta = v;
        }
        inputs
    }
}

/// `nightshift score <session>`
pub fn execute(
    ws: &Workspace,
    session: u32,
    overrides: InputOverrides,
    json: bool,
) -> anyhow::Result<()> {
    if !ws.records.iter().any(|r| r.number == session) {
        warn!("session {session} is not in the log; scoring from overrides only");
    }
    let inputs = overrides.apply(ws.aggregator.score_inputs(&ws.records, session));
    let score = score_inputs(session, &inputs);
    emit(json, &score, || format_session_score(&score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_fields() {
        let derived = ScoreInputs {
            features: 1,
            tests: 10,
            cli_commands: 2,
            api_endpoints: 0,
            health_delta: -1.0,
        };
        let overrides = InputOverrides {
            tests: Some(140),
            health_delta: Some(4.0),
            ..Default::default()
        };
        let merged = overrides.apply(derived);
        assert_eq!(merged.features, 1);
        assert_eq!(merged.tests, 140);
        assert_eq!(merged.health_delta, 4.0);
    }
}

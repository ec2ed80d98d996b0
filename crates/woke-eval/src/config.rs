use serde::{Deserialize, Serialize};

/// Evaluator settings.
///
/// Missing fields take their default when deserialized, so hosts can supply
/// a partial JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Also write every printed line to stdout as it is produced.
    pub echo: bool,
    /// Deepest allowed chain of nested function calls.
    pub max_call_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            echo: false,
            max_call_depth: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EvalConfig = serde_json::from_str(r#"{ "echo": true }"#).unwrap();
        assert!(config.echo);
        assert_eq!(config.max_call_depth, EvalConfig::default().max_call_depth);
    }
}

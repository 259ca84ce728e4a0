use serde::Deserialize;
use serde::Serialize;

/// Control decision returned by every wrapper step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    /// Use the returned text as the final output.
    Allow,
    /// Refuse; the returned text is the refusal message.
    Block,
    /// Use the returned (rewritten) text as the final output.
    Modify,
    /// Ask the model again if the call budget allows.
    Requery,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "ALLOW",
            Self::Block => "BLOCK",
            Self::Modify => "MODIFY",
            Self::Requery => "REQUERY",
        }
    }

    /// ALLOW, BLOCK, and MODIFY end the request loop.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Requery)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one wrapper step: the action plus the text to use.
///
/// `output` is ignored by the orchestrator when the action is REQUERY.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub output: String,
}

impl Decision {
    pub fn allow(output: &str) -> Self {
        Self {
            action: Action::Allow,
            output: output.to_string(),
        }
    }

    pub fn block(message: &str) -> Self {
        Self {
            action: Action::Block,
            output: message.to_string(),
        }
    }

    pub fn requery() -> Self {
        Self {
            action: Action::Requery,
            output: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_requery_is_non_terminal() {
        assert!(Action::Allow.is_terminal());
        assert!(Action::Block.is_terminal());
        assert!(Action::Modify.is_terminal());
        assert!(!Action::Requery.is_terminal());
    }

    #[test]
    fn serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Action::Requery).unwrap(), "\"REQUERY\"");
        let parsed: Action = serde_json::from_str("\"MODIFY\"").unwrap();
        assert_eq!(parsed, Action::Modify);
        assert_eq!(Action::Block.to_string(), "BLOCK");
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    /// Applies to every PR.
    Global,
    /// Applies to one PR only.
    Pr,
}

impl std::fmt::Display for RuleScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            RuleScope::Global => "global",
            RuleScope::Pr => "pr",
        };
        write!(f, "{value}")
    }
}

/// A reviewer instruction, optionally scoped to a PR and a file glob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRule {
    pub id: String,
    pub scope: RuleScope,
    pub pr_id: Option<String>,
    pub glob: Option<String>,
    pub text: String,
    pub enabled: bool,
}

/// A rule that applies to the current changeset, with its matched files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedRule {
    pub id: String,
    pub scope: RuleScope,
    pub pr_id: Option<String>,
    pub glob: Option<String>,
    pub text: String,
    #[serde(default)]
    pub matched_files: Vec<String>,
    #[serde(default)]
    pub has_matches: bool,
}

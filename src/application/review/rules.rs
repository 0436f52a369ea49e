use crate::domain::{ResolvedRule, ReviewRule, RuleScope};
use globset::{GlobBuilder, GlobSetBuilder};

/// Resolve which rules apply to a changeset.
///
/// Disabled rules and rules scoped to a different PR are skipped; rules with
/// a glob apply only when at least one changed path matches.
pub fn resolve_rules(
    rules: &[ReviewRule],
    pr_id: Option<&str>,
    diff_paths: &[String],
) -> Vec<ResolvedRule> {
    let mut resolved = Vec::new();

    for rule in rules {
        if !rule.enabled {
            continue;
        }

        match rule.scope {
            RuleScope::Global => {}
            RuleScope::Pr => {
                if rule.pr_id.as_deref() != pr_id {
                    continue;
                }
            }
        }

        let mut matched_files = Vec::new();
        if let Some(glob) = rule
            .glob
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            let glob = match GlobBuilder::new(glob).literal_separator(true).build() {
                Ok(glob) => glob,
                Err(err) => {
                    log::warn!("Skipping rule {} due to invalid glob: {}", rule.id, err);
                    continue;
                }
            };
            let mut set_builder = GlobSetBuilder::new();
            set_builder.add(glob);
            let set = match set_builder.build() {
                Ok(set) => set,
                Err(err) => {
                    log::warn!("Skipping rule {} due to invalid glob set: {}", rule.id, err);
                    continue;
                }
            };
            matched_files = diff_paths
                .iter()
                .filter(|path| set.is_match(path))
                .cloned()
                .collect();
            if matched_files.is_empty() {
                continue;
            }
        }

        resolved.push(ResolvedRule {
            id: rule.id.clone(),
            scope: rule.scope.clone(),
            pr_id: rule.pr_id.clone(),
            glob: rule.glob.clone(),
            text: rule.text.clone(),
            has_matches: !matched_files.is_empty(),
            matched_files,
        });
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str, scope: RuleScope, pr_id: Option<&str>, glob: Option<&str>) -> ReviewRule {
        ReviewRule {
            id: id.to_string(),
            scope,
            pr_id: pr_id.map(|r| r.to_string()),
            glob: glob.map(|g| g.to_string()),
            text: format!("rule {id}"),
            enabled: true,
        }
    }

    #[test]
    fn resolves_global_and_pr_scoped_rules() {
        let rules = vec![
            rule("g1", RuleScope::Global, None, None),
            rule("p1", RuleScope::Pr, Some("pr-1"), None),
            rule("p2", RuleScope::Pr, Some("pr-2"), None),
        ];
        let resolved = resolve_rules(&rules, Some("pr-1"), &[]);
        let ids: Vec<_> = resolved.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["g1", "p1"]);
    }

    #[test]
    fn filters_by_glob_matches() {
        let rules = vec![rule("g1", RuleScope::Global, None, Some("src/**/*.rs"))];
        let resolved = resolve_rules(
            &rules,
            None,
            &["src/main.rs".to_string(), "README.md".to_string()],
        );
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].matched_files, vec!["src/main.rs".to_string()]);
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let mut r = rule("g1", RuleScope::Global, None, None);
        r.enabled = false;
        assert!(resolve_rules(&[r], None, &[]).is_empty());
    }
}

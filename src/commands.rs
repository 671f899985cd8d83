//! Plans for the artifact subcommands.
//!
//! Artifact transfer itself lives outside this binary; each command renders
//! the steps it would take with its resolved options.

use falcoctl::config::{DeleteArgs, InstallArgs, SearchArgs};

const NO_REGISTRY: &str = "(no registry configured)";

/// Steps for `install`.
pub fn install_plan(args: &InstallArgs) -> Vec<String> {
    let registry = args.registry_url.as_deref().unwrap_or(NO_REGISTRY);
    let mode = if args.dry_run { "dry-run" } else { "install" };

    vec![
        format!("registry: {registry}"),
        format!("artifact tag: {}", args.tag),
        format!("namespace: {}", args.namespace),
        format!("mode: {mode}"),
    ]
}

/// Steps for `search`.
pub fn search_plan(args: &SearchArgs) -> Vec<String> {
    let registry = args.registry_url.as_deref().unwrap_or(NO_REGISTRY);

    vec![
        format!("registry: {registry}"),
        format!("limit: {}", args.limit),
    ]
}

/// Steps for `delete`.
pub fn delete_plan(args: &DeleteArgs) -> Vec<String> {
    let confirm = if args.force { "skipped" } else { "required" };

    vec![
        format!("namespace: {}", args.namespace),
        format!("confirmation: {confirm}"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_plan_shows_missing_registry() {
        let args = InstallArgs {
            registry_url: None,
            namespace: "falco".to_string(),
            tag: "latest".to_string(),
            dry_run: true,
        };

        let plan = install_plan(&args);

        assert_eq!(plan[0], "registry: (no registry configured)");
        assert_eq!(plan[3], "mode: dry-run");
    }

    #[test]
    fn search_plan_includes_registry_and_limit() {
        let args = SearchArgs {
            registry_url: Some("https://example.test".to_string()),
            limit: 5,
        };

        assert_eq!(
            search_plan(&args),
            vec!["registry: https://example.test", "limit: 5"]
        );
    }

    #[test]
    fn delete_plan_reflects_force() {
        let args = DeleteArgs {
            namespace: "ops".to_string(),
            force: true,
        };

        assert_eq!(
            delete_plan(&args),
            vec!["namespace: ops", "confirmation: skipped"]
        );
    }
}

//! Integration tests for modvet.
//!
//! These tests run whole vet passes through the driver against in-memory
//! and recorded toolchain fixtures.

use modvet::toolchain::{FixtureCall, FixtureToolchain};
use modvet::types::{ManifestDirectives, ModuleRef, Replace, ResolvedModule};
use modvet::{Config, ModvetError, RuleId, Severity, VetReport, Vetter};
use std::path::PathBuf;
use std::sync::Arc;

/// Get the path to the test fixtures directory.
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn manifest_of(module: &ResolvedModule) -> String {
    match &module.version {
        Some(version) => format!("{}@{version}/go.mod", module.path),
        None => "go.mod".to_string(),
    }
}

/// A current project: `example.com/hello` plus `dependencies`, each with an
/// empty manifest, and the given `go mod graph` lines.
fn project(dependencies: &[(&str, &str)], graph: &[&str]) -> FixtureToolchain {
    let mut modules = vec![ResolvedModule::main("example.com/hello")];
    modules.extend(
        dependencies
            .iter()
            .map(|(path, version)| ResolvedModule::dependency(*path, *version)),
    );

    let mut fixture = FixtureToolchain::new(Vec::new()).with_requirements(graph);
    for mut module in modules {
        let location = manifest_of(&module);
        module.manifest_location = Some(location.clone());
        fixture = fixture.with_manifest(location, ManifestDirectives::default());
        fixture.modules.push(module);
    }
    fixture
}

async fn vet(fixture: FixtureToolchain, config: Config) -> (VetReport, modvet::Result<()>) {
    let fixture = Arc::new(fixture);
    let vetter = Vetter::with_clients(config, fixture.clone(), fixture);
    let mut report = VetReport::new();
    let result = vetter.run(&mut report).await;
    (report, result)
}

mod conflict_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_v0_and_v1_requirements_conflict() {
        let fixture = project(
            &[("example.com/a", "v1.2.0"), ("example.com/b", "v1.0.0")],
            &[
                "example.com/hello example.com/a@v1.2.0",
                "example.com/hello example.com/b@v1.0.0",
                "example.com/b@v1.0.0 example.com/a@v0.1.0",
                "example.com/b@v1.0.0 example.com/a@v1.0.0",
            ],
        );
        let (report, result) = vet(fixture, Config::default()).await;
        result.unwrap();

        let outcome = report.outcome(RuleId::ConflictingRequires).unwrap();
        assert!(outcome.flagged);
        assert_eq!(outcome.findings.len(), 1);
        assert_eq!(
            outcome.findings[0].modules,
            vec![
                ModuleRef::new("example.com/a", "v0.1.0"),
                ModuleRef::new("example.com/a", "v1.2.0"),
            ]
        );
    }

    #[tokio::test]
    async fn test_incompatible_majors_conflict() {
        let fixture = project(
            &[("example.com/b", "v3.0.0+incompatible")],
            &[
                "example.com/hello example.com/b@v3.0.0+incompatible",
                "example.com/hello example.com/b@v2.0.0+incompatible",
            ],
        );
        let (report, result) = vet(fixture, Config::default()).await;
        result.unwrap();

        let outcome = report.outcome(RuleId::ConflictingRequires).unwrap();
        assert!(outcome.flagged);
        assert_eq!(outcome.findings[0].modules.len(), 2);
    }

    #[tokio::test]
    async fn test_single_v1_tier_is_clean() {
        let fixture = project(
            &[("example.com/c", "v1.1.0")],
            &[
                "example.com/hello example.com/c@v1.1.0",
                "example.com/hello example.com/c@v1.0.0",
            ],
        );
        let (report, result) = vet(fixture, Config::default()).await;
        result.unwrap();

        assert!(!report.outcome(RuleId::ConflictingRequires).unwrap().flagged);
        assert!(!report.flagged());
    }

    #[tokio::test]
    async fn test_malformed_required_version_aborts() {
        let fixture = project(
            &[("example.com/c", "v1.1.0")],
            &["example.com/hello example.com/c@not-a-version"],
        );
        let (report, result) = vet(fixture, Config::default()).await;

        let err = result.unwrap_err();
        assert!(err.is_malformed_data(), "{err}");
        assert_eq!(err.rule(), Some(RuleId::ConflictingRequires));
        assert!(err.to_string().starts_with("conflicting-requires: "), "{err}");
        assert!(err.to_string().contains("not-a-version"));
        assert_eq!(report.aborted(), Some(err.to_string().as_str()));
        assert!(report.outcome(RuleId::ConflictingRequires).is_none());
        // Earlier rules still reported.
        assert!(report.outcome(RuleId::MultipleMajor).is_some());
    }
}

mod excluded_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn excluding(version: &str) -> FixtureToolchain {
        project(
            &[("example.com/d", "v1.2.0"), ("example.com/e", "v1.0.0")],
            &[
                "example.com/hello example.com/d@v1.2.0",
                "example.com/hello example.com/e@v1.0.0",
            ],
        )
        .with_manifest(
            "example.com/e@v1.0.0/go.mod",
            ManifestDirectives {
                exclude: vec![ModuleRef::new("example.com/d", version)],
                ..ManifestDirectives::default()
            },
        )
    }

    #[tokio::test]
    async fn test_selected_version_excluded() {
        let (report, result) = vet(excluding("v1.2.0"), Config::default()).await;
        result.unwrap();

        let outcome = report.outcome(RuleId::ExcludedVersion).unwrap();
        assert!(outcome.flagged);
        assert_eq!(outcome.findings.len(), 1);
        assert!(outcome.findings[0].message.contains("example.com/d v1.2.0"));
    }

    #[tokio::test]
    async fn test_other_version_excluded() {
        let (report, result) = vet(excluding("v1.1.0"), Config::default()).await;
        result.unwrap();

        assert!(!report.outcome(RuleId::ExcludedVersion).unwrap().flagged);
    }

    #[tokio::test]
    async fn test_manifest_read_failure_aborts_rule() {
        let fixture = excluding("v1.2.0").failing(FixtureCall::ReadManifest);
        let (report, result) = vet(fixture, Config::default()).await;

        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("excluded-version: "), "{err}");
        assert!(report.outcome(RuleId::ExcludedVersion).is_none());
        assert!(report.outcome(RuleId::ConflictingRequires).is_some());
    }
}

mod replace_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn with_replace(replace: Vec<Replace>) -> FixtureToolchain {
        project(&[], &[]).with_manifest(
            "go.mod",
            ManifestDirectives {
                replace,
                ..ManifestDirectives::default()
            },
        )
    }

    #[tokio::test]
    async fn test_replace_directive_flagged() {
        let fixture = with_replace(vec![Replace {
            old: ModuleRef::unversioned("example.com/x"),
            new: ModuleRef::unversioned("../x"),
        }]);
        let (report, result) = vet(fixture, Config::default()).await;
        result.unwrap();

        let outcome = report.outcome(RuleId::Replace).unwrap();
        assert!(outcome.flagged);
        assert_eq!(outcome.findings.len(), 1);
        assert!(outcome.findings[0].message.contains("example.com/x => ../x"));
    }

    #[tokio::test]
    async fn test_no_replace_directives() {
        let (report, result) = vet(with_replace(Vec::new()), Config::default()).await;
        result.unwrap();

        assert!(!report.outcome(RuleId::Replace).unwrap().flagged);
    }
}

mod driver_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_stale_manifest_aborts_with_only_first_outcome() {
        let (report, result) = vet(project(&[], &[]).stale(), Config::default()).await;

        assert!(matches!(result, Err(ModvetError::StaleManifest { .. })));
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].rule, RuleId::ManifestStale);
        assert!(report.outcomes[0].flagged);
    }

    #[tokio::test]
    async fn test_outside_project_is_environment_error() {
        let (report, result) = vet(project(&[], &[]).outside_project(), Config::default()).await;

        let err = result.unwrap_err();
        assert!(err.is_environment());
        assert!(report.outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_rule_has_no_outcome() {
        let mut config = Config::default();
        config.checks.pseudo_version = false;
        config.checks.upgrades = false;

        let fixture = project(
            &[("golang.org/x/text", "v0.0.0-20170915032832-14c0d48ead0c")],
            &["example.com/hello golang.org/x/text@v0.0.0-20170915032832-14c0d48ead0c"],
        );
        let (report, result) = vet(fixture, config).await;
        result.unwrap();

        assert!(report.outcome(RuleId::PseudoVersion).is_none());
        assert!(report.outcome(RuleId::Upgrades).is_none());
        assert_eq!(report.outcomes.len(), RuleId::ALL.len() - 2);
        assert!(!report.flagged());
    }

    #[tokio::test]
    async fn test_graph_failure_after_staleness_check() {
        let fixture = project(&[], &[]).failing(FixtureCall::RequirementGraph);
        let (report, result) = vet(fixture, Config::default()).await;

        assert!(matches!(result, Err(ModvetError::Resolution { .. })));
        let ran: Vec<_> = report.outcomes.iter().map(|o| o.rule).collect();
        assert_eq!(ran, vec![RuleId::ManifestStale]);
    }

    #[tokio::test]
    async fn test_upgrades_reported() {
        let mut fixture = project(&[("golang.org/x/text", "v0.3.0")], &[]);
        fixture.modules[1].available_update = Some("v0.14.0".to_string());
        let (report, result) = vet(fixture, Config::default()).await;
        result.unwrap();

        let outcome = report.outcome(RuleId::Upgrades).unwrap();
        assert!(outcome.flagged);
        assert_eq!(outcome.findings[0].severity, Severity::Info);
    }

    #[tokio::test]
    async fn test_severity_override_applies() {
        let config = Config::from_yaml(
            r#"
policies:
  severity_overrides:
    MV008: critical
"#,
        )
        .unwrap();
        let fixture = project(&[], &[]).with_manifest(
            "go.mod",
            ManifestDirectives {
                replace: vec![Replace {
                    old: ModuleRef::unversioned("example.com/x"),
                    new: ModuleRef::new("example.com/y", "v1.0.0"),
                }],
                ..ManifestDirectives::default()
            },
        );
        let (report, result) = vet(fixture, config).await;
        result.unwrap();

        let outcome = report.outcome(RuleId::Replace).unwrap();
        assert_eq!(outcome.findings[0].severity, Severity::Critical);
        assert!(report.has_errors());
    }
}

mod fixture_file_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_clean_fixture_passes() {
        let fixture = FixtureToolchain::from_file(&fixtures_path().join("clean.json")).unwrap();
        let (report, result) = vet(fixture, Config::default()).await;
        result.unwrap();

        assert_eq!(report.outcomes.len(), RuleId::ALL.len());
        assert!(!report.flagged());
        assert_eq!(report.modules.len(), 3);
    }

    #[tokio::test]
    async fn test_flagged_fixture() {
        let fixture = FixtureToolchain::from_file(&fixtures_path().join("flagged.json")).unwrap();
        let (report, result) = vet(fixture, Config::default()).await;
        result.unwrap();

        assert_eq!(
            report.flagged_rules(),
            vec![
                RuleId::ConflictingRequires,
                RuleId::Prerelease,
                RuleId::PseudoVersion,
                RuleId::Replace,
            ]
        );
    }

    #[tokio::test]
    async fn test_graph_from_fixture() {
        let fixture = Arc::new(FixtureToolchain::from_file(&fixtures_path().join("clean.json")).unwrap());
        let vetter = Vetter::with_clients(Config::default(), fixture.clone(), fixture);
        let graph = vetter.requirement_graph().await.unwrap();

        assert_eq!(graph.edge_count(), 3);
        assert!(!graph.get_node("rsc.io/sampler@v1.3.0").unwrap().selected);

        let dot = modvet::graph::export_graph(&graph, modvet::GraphFormat::Dot).unwrap();
        assert!(dot.contains("\"example.com/hello\" -> \"rsc.io/quote@v1.5.2\""));
    }
}

mod config_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_example_config_round_trips() {
        let config = Config::from_yaml(&Config::example_yaml()).unwrap();
        config.validate().unwrap();
        assert_eq!(config.toolchain.go_binary, "go");
    }

    #[test]
    fn test_config_file_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modvet.yaml");
        std::fs::write(&path, "checks:\n  upgrades: false\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(!config.checks.is_enabled(RuleId::Upgrades));
    }
}

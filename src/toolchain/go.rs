//! [`ResolverClient`] and [`ManifestAccessor`] over the `go` command.
//!
//! | Operation | Command |
//! |-----------|---------|
//! | inside project | `go env GOMOD` |
//! | build list | `go list -mod=readonly -json [-u] -m all` |
//! | requirement graph | `go mod graph` |
//! | manifest current | `go list -mod=readonly ./...`, then `go list -mod=mod -modfile=<copy> ./...` |
//! | read manifest | `go mod edit -json <go.mod>` |
//!
//! Output parsing lives in free functions so it can be tested without a
//! Go installation.

use super::{ManifestAccessor, ResolverClient};
use crate::config::ToolchainOptions;
use crate::error::{ModvetError, Result};
use crate::types::{ManifestDirectives, ModuleRef, Replace, Require, RequirementEdge, ResolvedModule};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::process::Command;

#[cfg(windows)]
const NULL_DEVICE: &str = "NUL";
#[cfg(not(windows))]
const NULL_DEVICE: &str = "/dev/null";

/// Pseudo-modules in `go mod graph` output that pin language versions.
const LANGUAGE_MARKERS: [&str; 2] = ["go", "toolchain"];

/// Client backed by a `go` binary.
#[derive(Debug, Clone)]
pub struct GoToolchain {
    binary: String,
    working_dir: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl Default for GoToolchain {
    fn default() -> Self {
        Self::new("go")
    }
}

impl GoToolchain {
    /// Use the given `go` binary in the current directory with no time limit.
    #[must_use]
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            working_dir: None,
            timeout: None,
        }
    }

    /// Build a client from the `toolchain` config section.
    #[must_use]
    pub fn from_config(options: &ToolchainOptions) -> Self {
        let mut client = Self::new(options.go_binary.clone());
        client.working_dir.clone_from(&options.working_dir);
        client.timeout = options
            .timeout_secs
            .filter(|&s| s > 0)
            .map(Duration::from_secs);
        client
    }

    /// Run every command from `dir`.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Bound every command by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.binary, args.join(" "))
    }

    /// Run one command to completion, whatever its exit status.
    async fn run(&self, args: &[&str]) -> Result<Output> {
        let command = self.describe(args);

        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            if !dir.is_dir() {
                return Err(crate::err!(NotInProject { dir: dir.clone() }));
            }
            cmd.current_dir(dir);
        }

        tracing::debug!(command = %command, "Running toolchain command");

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| {
                    crate::err!(Timeout {
                        command: command.clone(),
                        limit,
                        rule: None,
                    })
                })?,
            None => cmd.output().await,
        };

        let output = output.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                crate::err!(ToolchainUnavailable {
                    binary: self.binary.clone(),
                    message: e.to_string(),
                })
            } else {
                ModvetError::resolution(format!("failed to run '{command}': {e}"), file!(), line!())
            }
        })?;

        tracing::trace!(
            command = %command,
            status = %output.status,
            stdout_bytes = output.stdout.len(),
            "Toolchain command finished"
        );
        Ok(output)
    }

    /// Run one command and return its stdout, failing on a non-zero exit.
    async fn run_checked(&self, args: &[&str]) -> Result<Vec<u8>> {
        let output = self.run(args).await?;
        if !output.status.success() {
            return Err(ModvetError::resolution(
                format!(
                    "'{}' failed: {}",
                    self.describe(args),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
                file!(),
                line!(),
            ));
        }
        Ok(output.stdout)
    }

    /// Copy the main manifest and its checksums into a scratch directory.
    ///
    /// Returns the directory, which is removed on drop, and the path of the
    /// copied `go.mod`.
    async fn scratch_manifest(&self) -> Result<(TempDir, PathBuf)> {
        let stdout = self.run_checked(&["env", "GOMOD"]).await?;
        let gomod = String::from_utf8_lossy(&stdout).trim().to_string();
        if !gomod_is_set(&gomod) {
            let dir = self.working_dir.clone().unwrap_or_else(|| PathBuf::from("."));
            return Err(crate::err!(NotInProject { dir }));
        }
        let gomod = PathBuf::from(gomod);

        let scratch = tempfile::Builder::new()
            .prefix("modvet-")
            .tempdir()
            .map_err(|e| ModvetError::io(std::env::temp_dir(), e, file!(), line!()))?;
        let modfile = scratch.path().join("go.mod");
        copy_file(&gomod, &modfile).await?;

        let gosum = gomod.with_file_name("go.sum");
        if gosum.is_file() {
            copy_file(&gosum, &scratch.path().join("go.sum")).await?;
        }

        tracing::trace!(from = %gomod.display(), to = %modfile.display(), "Copied manifest to scratch directory");
        Ok((scratch, modfile))
    }
}

async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    tokio::fs::copy(from, to)
        .await
        .map(|_| ())
        .map_err(|e| ModvetError::io(from, e, file!(), line!()))
}

#[async_trait]
impl ResolverClient for GoToolchain {
    async fn resolve_build_list(&self, include_upgrades: bool) -> Result<Vec<ResolvedModule>> {
        let args: &[&str] = if include_upgrades {
            &["list", "-mod=readonly", "-json", "-u", "-m", "all"]
        } else {
            &["list", "-mod=readonly", "-json", "-m", "all"]
        };
        let stdout = self.run_checked(args).await?;
        parse_build_list(&stdout)
    }

    async fn resolve_requirement_graph(&self) -> Result<Vec<RequirementEdge>> {
        let stdout = self.run_checked(&["mod", "graph"]).await?;
        parse_mod_graph(&String::from_utf8_lossy(&stdout))
    }

    async fn check_manifest_current(&self) -> Result<bool> {
        let readonly = self.run(&["list", "-mod=readonly", "./..."]).await?;
        if readonly.status.success() {
            return Ok(true);
        }

        // go may rewrite the copy; the real manifest stays untouched.
        let (_scratch, modfile) = self.scratch_manifest().await?;
        let modfile = format!("-modfile={}", modfile.display());
        let unconstrained = self.run(&["list", "-mod=mod", &modfile, "./..."]).await?;
        if unconstrained.status.success() {
            tracing::debug!(
                stderr = %String::from_utf8_lossy(&readonly.stderr).trim(),
                "Read-only listing failed but listing against an updatable copy succeeded"
            );
            return Ok(false);
        }

        Err(ModvetError::resolution(
            format!(
                "'go list' failed with -mod=readonly and with -mod=mod: {} / {}",
                String::from_utf8_lossy(&readonly.stderr).trim(),
                String::from_utf8_lossy(&unconstrained.stderr).trim()
            ),
            file!(),
            line!(),
        ))
    }

    async fn is_inside_project(&self) -> Result<bool> {
        let stdout = self.run_checked(&["env", "GOMOD"]).await?;
        Ok(gomod_is_set(&String::from_utf8_lossy(&stdout)))
    }
}

#[async_trait]
impl ManifestAccessor for GoToolchain {
    async fn read_manifest(&self, location: &str) -> Result<ManifestDirectives> {
        let stdout = self.run_checked(&["mod", "edit", "-json", location]).await?;
        parse_mod_edit(&stdout).map_err(|e| match e {
            ModvetError::Resolution { message, rule, src_path, src_line } => ModvetError::Resolution {
                message: format!("{location}: {message}"),
                rule,
                src_path,
                src_line,
            },
            other => other,
        })
    }
}

// ============================================================================
// Wire formats
// ============================================================================

/// One object of the `go list -json -m` stream.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoListModule {
    path: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    replace: Option<Box<GoListModule>>,
    #[serde(default)]
    update: Option<Box<GoListModule>>,
    #[serde(default)]
    main: bool,
    #[serde(default)]
    indirect: bool,
    #[serde(default)]
    go_mod: String,
    #[serde(default)]
    error: Option<GoListError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoListError {
    err: String,
}

impl GoListModule {
    fn into_resolved(self) -> Result<ResolvedModule> {
        if let Some(error) = self.error {
            return Err(ModvetError::resolution(
                format!("error loading module '{}': {}", self.path, error.err),
                file!(),
                line!(),
            ));
        }

        let replaced_by = self.replace.as_deref().map(|r| ModuleRef {
            path: r.path.clone(),
            version: non_empty(&r.version),
        });
        let version = replaced_by
            .as_ref()
            .and_then(|r| r.version.clone())
            .or_else(|| non_empty(&self.version));
        let manifest_location = non_empty(&self.go_mod)
            .or_else(|| self.replace.as_deref().and_then(|r| non_empty(&r.go_mod)));

        Ok(ResolvedModule {
            path: self.path,
            version,
            is_main: self.main,
            is_indirect: self.indirect,
            replaced_by,
            available_update: self.update.and_then(|u| non_empty(&u.version)),
            manifest_location,
        })
    }
}

/// Output of `go mod edit -json`. Lists may be `null`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoModFile {
    module: Option<GoModModule>,
    require: Option<Vec<GoModRequire>>,
    exclude: Option<Vec<GoModModule>>,
    replace: Option<Vec<GoModReplace>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoModModule {
    path: String,
    #[serde(default)]
    version: String,
}

impl From<GoModModule> for ModuleRef {
    fn from(m: GoModModule) -> Self {
        Self {
            version: non_empty(&m.version),
            path: m.path,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoModRequire {
    path: String,
    version: String,
    #[serde(default)]
    indirect: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoModReplace {
    old: GoModModule,
    new: GoModModule,
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Whether `go env GOMOD` output names a manifest.
#[must_use]
pub fn gomod_is_set(output: &str) -> bool {
    let value = output.trim();
    !value.is_empty() && value != NULL_DEVICE
}

/// Parse the concatenated JSON stream of `go list -json -m all`.
///
/// # Errors
///
/// Returns a resolution error if the stream is not valid JSON or any
/// module carries an `Error` field.
pub fn parse_build_list(stdout: &[u8]) -> Result<Vec<ResolvedModule>> {
    serde_json::Deserializer::from_slice(stdout)
        .into_iter::<GoListModule>()
        .map(|item| {
            let module = item.map_err(|e| {
                ModvetError::resolution(format!("unable to parse 'go list' output: {e}"), file!(), line!())
            })?;
            module.into_resolved()
        })
        .collect()
}

/// Parse `go mod graph` output into requirement edges.
///
/// # Errors
///
/// Returns `MalformedEdge` for any line that is not two `@`-encoded
/// fields.
pub fn parse_mod_graph(stdout: &str) -> Result<Vec<RequirementEdge>> {
    let mut edges = Vec::new();
    for line in stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [from, to] = fields.as_slice() else {
            return Err(crate::err!(MalformedEdge { edge: line.to_string(), rule: None }));
        };

        let from = ModuleRef::parse(from)?;
        let edge = RequirementEdge::parse(to)?;
        if LANGUAGE_MARKERS.contains(&from.path.as_str())
            || LANGUAGE_MARKERS.contains(&edge.path.as_str())
        {
            continue;
        }
        edges.push(edge.required_by(from));
    }
    Ok(edges)
}

/// Parse `go mod edit -json` output.
///
/// # Errors
///
/// Returns a resolution error if the output is not the expected JSON.
pub fn parse_mod_edit(stdout: &[u8]) -> Result<ManifestDirectives> {
    let file: GoModFile = serde_json::from_slice(stdout).map_err(|e| {
        ModvetError::resolution(format!("unable to parse 'go mod edit -json' output: {e}"), file!(), line!())
    })?;

    Ok(ManifestDirectives {
        module: file.module.map(ModuleRef::from),
        require: file
            .require
            .unwrap_or_default()
            .into_iter()
            .map(|r| Require {
                path: r.path,
                version: r.version,
                indirect: r.indirect,
            })
            .collect(),
        exclude: file
            .exclude
            .unwrap_or_default()
            .into_iter()
            .map(ModuleRef::from)
            .collect(),
        replace: file
            .replace
            .unwrap_or_default()
            .into_iter()
            .map(|r| Replace {
                old: r.old.into(),
                new: r.new.into(),
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const GO_LIST: &str = r#"{
	"Path": "example.com/hello",
	"Main": true,
	"Dir": "/src/hello",
	"GoMod": "/src/hello/go.mod",
	"GoVersion": "1.21"
}
{
	"Path": "golang.org/x/text",
	"Version": "v0.3.0",
	"Update": {
		"Path": "golang.org/x/text",
		"Version": "v0.14.0"
	},
	"Indirect": true,
	"GoMod": "/pkg/mod/cache/download/golang.org/x/text/@v/v0.3.0.mod"
}
{
	"Path": "rsc.io/quote",
	"Version": "v1.5.2",
	"Replace": {
		"Path": "github.com/fork/quote",
		"Version": "v1.5.3-0.20200101000000-abcdef123456",
		"GoMod": "/pkg/mod/cache/download/github.com/fork/quote/@v/v1.5.3.mod"
	}
}
{
	"Path": "rsc.io/sampler",
	"Version": "v1.3.0",
	"Replace": {
		"Path": "../sampler",
		"GoMod": "/src/sampler/go.mod"
	}
}
"#;

    #[test]
    fn test_parse_build_list() {
        let modules = parse_build_list(GO_LIST.as_bytes()).unwrap();
        assert_eq!(modules.len(), 4);

        let main = &modules[0];
        assert!(main.is_main);
        assert_eq!(main.version, None);
        assert_eq!(main.manifest_location.as_deref(), Some("/src/hello/go.mod"));

        let text = &modules[1];
        assert!(text.is_indirect);
        assert_eq!(text.available_update.as_deref(), Some("v0.14.0"));
    }

    #[test]
    fn test_parse_build_list_applies_replacements() {
        let modules = parse_build_list(GO_LIST.as_bytes()).unwrap();

        let quote = &modules[2];
        assert_eq!(quote.version.as_deref(), Some("v1.5.3-0.20200101000000-abcdef123456"));
        assert_eq!(
            quote.replaced_by,
            Some(ModuleRef::new("github.com/fork/quote", "v1.5.3-0.20200101000000-abcdef123456"))
        );
        assert_eq!(
            quote.manifest_location.as_deref(),
            Some("/pkg/mod/cache/download/github.com/fork/quote/@v/v1.5.3.mod")
        );

        // Directory replacements keep the original version.
        let sampler = &modules[3];
        assert_eq!(sampler.version.as_deref(), Some("v1.3.0"));
        assert_eq!(sampler.replaced_by, Some(ModuleRef::unversioned("../sampler")));
    }

    #[test]
    fn test_parse_build_list_module_error() {
        let out = br#"{"Path": "example.com/broken", "Version": "v1.0.0", "Error": {"Err": "module not found"}}"#;
        let err = parse_build_list(out).unwrap_err();
        assert!(matches!(err, ModvetError::Resolution { .. }));
        assert!(err.to_string().contains("module not found"));
    }

    #[test]
    fn test_parse_build_list_invalid_json() {
        assert!(parse_build_list(b"{\"Path\": ").is_err());
        assert!(parse_build_list(b"").unwrap().is_empty());
    }

    #[test]
    fn test_parse_mod_graph() {
        let out = "example.com/hello go@1.21\n\
                   example.com/hello golang.org/x/text@v0.3.0\n\
                   example.com/hello rsc.io/quote@v1.5.2\n\
                   rsc.io/quote@v1.5.2 rsc.io/sampler@v1.3.0\n\
                   go@1.21 toolchain@go1.21\n\n";
        let edges = parse_mod_graph(out).unwrap();

        let encoded: Vec<_> = edges.iter().map(RequirementEdge::encoded).collect();
        assert_eq!(
            encoded,
            vec!["golang.org/x/text@v0.3.0", "rsc.io/quote@v1.5.2", "rsc.io/sampler@v1.3.0"]
        );
        assert_eq!(edges[2].required_by, Some(ModuleRef::new("rsc.io/quote", "v1.5.2")));
        assert_eq!(edges[0].required_by, Some(ModuleRef::unversioned("example.com/hello")));
    }

    #[test]
    fn test_parse_mod_graph_rejects_bad_lines() {
        for bad in [
            "example.com/hello",
            "a b c@v1.0.0",
            "example.com/hello rsc.io/quote",
            "example.com/hello rsc.io/quote@v1@v2",
        ] {
            let err = parse_mod_graph(bad).unwrap_err();
            assert!(matches!(err, ModvetError::MalformedEdge { .. }), "{bad}: {err}");
        }
    }

    #[test]
    fn test_parse_mod_edit() {
        let out = br#"{
	"Module": {"Path": "example.com/dep"},
	"Go": "1.21",
	"Require": [
		{"Path": "rsc.io/quote", "Version": "v1.5.2"},
		{"Path": "golang.org/x/text", "Version": "v0.3.0", "Indirect": true}
	],
	"Exclude": [
		{"Path": "rsc.io/sampler", "Version": "v1.99.99"}
	],
	"Replace": [
		{"Old": {"Path": "rsc.io/quote"}, "New": {"Path": "../quote"}}
	]
}"#;
        let directives = parse_mod_edit(out).unwrap();

        assert_eq!(directives.module, Some(ModuleRef::unversioned("example.com/dep")));
        assert_eq!(directives.require.len(), 2);
        assert!(directives.require[1].indirect);
        assert_eq!(directives.exclude, vec![ModuleRef::new("rsc.io/sampler", "v1.99.99")]);
        assert_eq!(directives.replace[0].to_string(), "rsc.io/quote => ../quote");
    }

    #[test]
    fn test_parse_mod_edit_null_lists() {
        let out = br#"{"Module": {"Path": "example.com/dep"}, "Require": null, "Exclude": null, "Replace": null}"#;
        let directives = parse_mod_edit(out).unwrap();
        assert!(directives.require.is_empty());
        assert!(directives.exclude.is_empty());
        assert!(directives.replace.is_empty());
    }

    #[test]
    fn test_gomod_is_set() {
        assert!(gomod_is_set("/src/hello/go.mod\n"));
        assert!(!gomod_is_set(""));
        assert!(!gomod_is_set("  \n"));
        assert!(!gomod_is_set(&format!("{NULL_DEVICE}\n")));
    }

    #[test]
    fn test_from_config() {
        let options = ToolchainOptions {
            go_binary: "/usr/local/go/bin/go".to_string(),
            working_dir: Some(PathBuf::from("/tmp")),
            timeout_secs: Some(0),
        };
        let client = GoToolchain::from_config(&options);
        assert_eq!(client.binary, "/usr/local/go/bin/go");
        assert_eq!(client.timeout, None);
        assert_eq!(client.describe(&["mod", "graph"]), "/usr/local/go/bin/go mod graph");
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let client = GoToolchain::new("/nonexistent/modvet-test-go");
        let err = client.is_inside_project().await.unwrap_err();
        assert!(err.is_environment(), "{err}");
        assert!(matches!(err, ModvetError::ToolchainUnavailable { .. }));
    }

    /// Write an executable `go` stand-in running `body` under `/bin/sh`.
    #[cfg(unix)]
    fn scripted_go(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("go");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// A project whose `go.mod` a build would rewrite, under a toolchain
    /// that refuses implicit updates. `modfile_exit` is the exit status of
    /// the listing against the copied manifest.
    #[cfg(unix)]
    fn stale_project(modfile_exit: u8) -> (tempfile::TempDir, GoToolchain) {
        let project = tempfile::TempDir::new().unwrap();
        std::fs::write(project.path().join("go.mod"), "module example.com/hello\n").unwrap();
        std::fs::write(project.path().join("go.sum"), "").unwrap();

        let go = scripted_go(
            project.path(),
            &format!(
                r#"case "$*" in
  "env GOMOD") echo "{gomod}" ;;
  "list -mod=readonly ./...") echo "go: updates to go.mod needed" >&2; exit 1 ;;
  "list -mod=mod -modfile="*)
    modfile="${{3#-modfile=}}"
    [ -f "$modfile" ] && [ -f "${{modfile%.mod}}.sum" ] || exit 3
    echo "require example.com/dep v1.0.0" >> "$modfile"
    [ {modfile_exit} -eq 0 ] || echo "go: example.com/dep: no matching versions" >&2
    exit {modfile_exit} ;;
  *) exit 2 ;;
esac"#,
                gomod = project.path().join("go.mod").display(),
            ),
        );

        let client = GoToolchain::new(go.display().to_string()).with_working_dir(project.path());
        (project, client)
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stale_manifest_detected_without_rewriting_it() {
        let (project, client) = stale_project(0);

        assert!(!client.check_manifest_current().await.unwrap());
        let manifest = std::fs::read_to_string(project.path().join("go.mod")).unwrap();
        assert_eq!(manifest, "module example.com/hello\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_manifest_check_fails_when_both_listings_fail() {
        let (_project, client) = stale_project(1);

        let err = client.check_manifest_current().await.unwrap_err();
        assert!(matches!(err, ModvetError::Resolution { .. }), "{err}");
        assert!(err.to_string().contains("no matching versions"), "{err}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_current_manifest_skips_second_listing() {
        let bin = tempfile::TempDir::new().unwrap();
        let go = scripted_go(
            bin.path(),
            r#"[ "$*" = "list -mod=readonly ./..." ] || exit 2"#,
        );

        let client = GoToolchain::new(go.display().to_string());
        assert!(client.check_manifest_current().await.unwrap());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_command_times_out() {
        let bin = tempfile::TempDir::new().unwrap();
        let go = scripted_go(bin.path(), "exec sleep 5");

        let client = GoToolchain::new(go.display().to_string()).with_timeout(Duration::from_millis(300));
        let err = client.is_inside_project().await.unwrap_err();

        match &err {
            ModvetError::Timeout { command, limit, .. } => {
                assert!(command.ends_with("go env GOMOD"));
                assert_eq!(*limit, Duration::from_millis(300));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("timed out after 300ms"), "{err}");
    }

    #[tokio::test]
    async fn test_missing_working_dir() {
        let client = GoToolchain::default().with_working_dir("/nonexistent/modvet-test-dir");
        let err = client.is_inside_project().await.unwrap_err();
        assert!(matches!(err, ModvetError::NotInProject { .. }));
    }
}

//! Builds the server command line and spawns it over stdio.

use std::io;
use std::path::Path;
use std::process::Stdio;

use serde::Serialize;
use serde_json::{Value, json};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::info;

/// What the host's transport client needs to attach to the backend: the
/// argv to run and the options forwarded verbatim at initialize time.
#[derive(Debug, Clone, Serialize)]
pub struct LaunchDescriptor {
    pub cmd: Vec<String>,
    #[serde(rename = "initializationOptions")]
    pub initialization_options: Value,
}

impl LaunchDescriptor {
    /// Builds the backend invocation: `deno run -A <server> --stdio`.
    /// `-A` grants the server full permissions; it needs filesystem and
    /// network access for analysis and stub downloads.
    pub fn new(runtime_exe: &Path, server_path: &Path, initialization_options: Value) -> Self {
        let cmd = vec![
            runtime_exe.to_string_lossy().into_owned(),
            "run".to_string(),
            "-A".to_string(),
            server_path.to_string_lossy().into_owned(),
            "--stdio".to_string(),
        ];
        Self {
            cmd,
            initialization_options,
        }
    }

    /// The only transport kind this launcher produces.
    pub fn transport_kind(&self) -> &'static str {
        "stdio"
    }
}

/// A running backend with its stdio exposed as one bidirectional channel.
/// Protocol framing on the channel belongs to the host's client; nothing
/// here reads or writes LSP messages.
pub struct StdioTransport {
    child: Child,
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
}

impl StdioTransport {
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    pub async fn wait(&mut self) -> io::Result<std::process::ExitStatus> {
        self.child.wait().await
    }

    pub fn into_parts(self) -> (Child, ChildStdin, ChildStdout) {
        (self.child, self.stdin, self.stdout)
    }
}

/// Spawns the descriptor's command with piped stdio. One spawn per call;
/// nothing here restarts a backend that exits.
pub fn start(descriptor: &LaunchDescriptor) -> io::Result<StdioTransport> {
    let (program, args) = descriptor
        .cmd
        .split_first()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()?;

    info!("Spawned language server: {:?} (pid {:?})", descriptor.cmd, child.id());

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| io::Error::other("child stdin not captured"))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("child stdout not captured"))?;

    Ok(StdioTransport {
        child,
        stdin,
        stdout,
    })
}

/// The initialization options basedpyright expects. The keys are the
/// backend's contract; nothing on this side interprets them.
pub fn default_initialization_options() -> Value {
    json!({
        "completionDisableFilterText": true,
        "disableAutomaticTypingAcquisition": false,
        "locale": "en",
        "maxTsServerMemory": 0,
        "npmLocation": "",
        "plugins": [],
        "preferences": {
            "allowIncompleteCompletions": true,
            "allowRenameOfImportPath": true,
            "allowTextChangesInNewFiles": true,
            "autoImportFileExcludePatterns": [],
            "disableSuggestions": false,
            "displayPartsForJSDoc": true,
            "excludeLibrarySymbolsInNavTo": true,
            "generateReturnInDocTemplate": true,
            "importModuleSpecifierEnding": "auto",
            "importModuleSpecifierPreference": "shortest",
            "includeAutomaticOptionalChainCompletions": true,
            "includeCompletionsForImportStatements": true,
            "includeCompletionsForModuleExports": true,
            "includeCompletionsWithClassMemberSnippets": true,
            "includeCompletionsWithInsertText": true,
            "includeCompletionsWithObjectLiteralMethodSnippets": true,
            "includeCompletionsWithSnippetText": true,
            "includePackageJsonAutoImports": "auto",
            "interactiveInlayHints": true,
            "jsxAttributeCompletionStyle": "auto",
            "lazyConfiguredProjectsFromExternalProject": false,
            "organizeImportsAccentCollation": true,
            "organizeImportsCaseFirst": false,
            "organizeImportsCollation": "ordinal",
            "organizeImportsCollationLocale": "en",
            "organizeImportsIgnoreCase": "auto",
            "organizeImportsNumericCollation": false,
            "providePrefixAndSuffixTextForRename": true,
            "provideRefactorNotApplicableReason": true,
            "quotePreference": "auto",
            "useLabelDetailsInCompletionEntries": true
        },
        "tsserver": {
            "fallbackPath": "",
            "logDirectory": "",
            "logVerbosity": "off",
            "path": "",
            "trace": "off",
            "useSyntaxServer": "auto"
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    #[test]
    fn descriptor_builds_the_run_command() {
        let descriptor = LaunchDescriptor::new(
            Path::new("/usr/bin/deno"),
            Path::new("/storage/0.0.1/language-server/node_modules/basedpyright/langserver.index.js"),
            json!({"locale": "en"}),
        );

        assert_eq!(
            descriptor.cmd,
            vec![
                "/usr/bin/deno",
                "run",
                "-A",
                "/storage/0.0.1/language-server/node_modules/basedpyright/langserver.index.js",
                "--stdio",
            ]
        );
        assert_eq!(descriptor.transport_kind(), "stdio");
    }

    #[test]
    fn initialization_options_pass_through_verbatim() {
        let options = json!({"anything": {"the": ["backend", "owns"]}});
        let descriptor = LaunchDescriptor::new(
            Path::new("deno"),
            Path::new("server.js"),
            options.clone(),
        );

        assert_eq!(descriptor.initialization_options, options);
    }

    #[test]
    fn descriptor_serializes_for_the_host_client() {
        let descriptor = LaunchDescriptor::new(
            Path::new("deno"),
            Path::new("server.js"),
            json!({"locale": "en"}),
        );

        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value["cmd"][0], "deno");
        assert_eq!(value["initializationOptions"]["locale"], "en");
    }

    #[test]
    fn default_options_carry_the_backend_contract_keys() {
        let options = default_initialization_options();

        assert_eq!(options["completionDisableFilterText"], json!(true));
        assert_eq!(options["locale"], json!("en"));
        assert_eq!(options["preferences"]["quotePreference"], json!("auto"));
        assert_eq!(options["tsserver"]["useSyntaxServer"], json!("auto"));
    }

    #[test]
    fn empty_command_fails_to_start() {
        let descriptor = LaunchDescriptor {
            cmd: Vec::new(),
            initialization_options: Value::Null,
        };

        assert!(start(&descriptor).is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn transport_wires_both_directions_of_the_child_stdio() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        // `cat` with no arguments echoes stdin to stdout, which is enough
        // to prove the channel is wired bidirectionally.
        let descriptor = LaunchDescriptor {
            cmd: vec!["cat".to_string()],
            initialization_options: Value::Null,
        };

        let transport = start(&descriptor).unwrap();
        let (mut child, mut stdin, mut stdout) = transport.into_parts();

        stdin.write_all(b"Content-Length: 2\r\n\r\n{}").await.unwrap();
        drop(stdin);

        let mut echoed = Vec::new();
        stdout.read_to_end(&mut echoed).await.unwrap();
        assert_eq!(echoed, b"Content-Length: 2\r\n\r\n{}");

        assert!(child.wait().await.unwrap().success());
    }

    #[tokio::test]
    async fn spawn_failure_surfaces_as_io_error() {
        let descriptor = LaunchDescriptor::new(
            &PathBuf::from("/nonexistent/runtime"),
            Path::new("server.js"),
            Value::Null,
        );

        assert!(start(&descriptor).is_err());
    }
}

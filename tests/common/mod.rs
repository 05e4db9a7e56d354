//! Shared fixtures for the HTTP-level tests
//!
//! `ScriptedExecutor` stands in for terraform and az: it answers each
//! invocation from a per-operation script and records what was run.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

use hostforge::config::EnvConfig;
use hostforge::infra::{
    CommandError, CommandExecutor, CommandOutput, CommandSpec, EnvironmentError, FixedTools,
    ToolLocator, ToolPaths,
};
use hostforge::state::AppState;

pub const BOUNDARY: &str = "hostforge-test-boundary";
pub const PUBLISHED_URL: &str = "https://mysite.z13.web.core.windows.net/";

/// External operations the deploy pipeline performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    AccountShow,
    Init,
    Apply,
    KeysList,
    UploadBatch,
    Output,
    Unknown,
}

impl Op {
    pub fn of(spec: &CommandSpec) -> Op {
        let args: Vec<&str> = spec.args.iter().map(String::as_str).collect();
        match args.as_slice() {
            ["account", "show", ..] => Op::AccountShow,
            ["init", ..] => Op::Init,
            ["apply", ..] => Op::Apply,
            ["output", ..] => Op::Output,
            ["storage", "account", "keys", "list", ..] => Op::KeysList,
            ["storage", "blob", "upload-batch", ..] => Op::UploadBatch,
            _ => Op::Unknown,
        }
    }
}

/// Scripted answer for one operation
#[derive(Debug, Clone)]
pub enum Reply {
    Output(CommandOutput),
    Timeout,
    NotFound,
}

/// One recorded invocation
#[derive(Debug, Clone)]
pub struct Call {
    pub op: Op,
    pub spec: CommandSpec,
    /// For uploads: whether the source directory held index.html at call time
    pub source_had_index: bool,
}

pub struct ScriptedExecutor {
    replies: Mutex<HashMap<Op, Reply>>,
    delays: Mutex<HashMap<Op, Duration>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedExecutor {
    /// Every operation succeeds; outputs publish `PUBLISHED_URL`
    pub fn happy() -> Self {
        let outputs = serde_json::json!({
            "static_site_url": {
                "sensitive": false,
                "type": "string",
                "value": PUBLISHED_URL,
            }
        })
        .to_string();

        let replies = HashMap::from([
            (Op::AccountShow, Reply::Output(CommandOutput::ok(""))),
            (Op::Init, Reply::Output(CommandOutput::ok("Terraform has been successfully initialized!"))),
            (Op::Apply, Reply::Output(CommandOutput::ok("Apply complete! Resources: 2 added, 0 changed, 0 destroyed."))),
            (Op::KeysList, Reply::Output(CommandOutput::ok("c2VjcmV0LWtleQ==\n"))),
            (Op::UploadBatch, Reply::Output(CommandOutput::ok("[]"))),
            (Op::Output, Reply::Output(CommandOutput::ok(outputs))),
        ]);

        Self {
            replies: Mutex::new(replies),
            delays: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with(self, op: Op, reply: Reply) -> Self {
        self.replies.lock().unwrap().insert(op, reply);
        self
    }

    /// Make `op` take `delay` before answering
    pub fn with_delay(self, op: Op, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(op, delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ops(&self) -> Vec<Op> {
        self.calls().into_iter().map(|c| c.op).collect()
    }

    pub fn call(&self, op: Op) -> Option<Call> {
        self.calls().into_iter().find(|c| c.op == op)
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn execute(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        let op = Op::of(spec);
        let source_had_index = op == Op::UploadBatch
            && arg_after(spec, "--source")
                .map(|dir| Path::new(&dir).join("index.html").is_file())
                .unwrap_or(false);

        self.calls.lock().unwrap().push(Call {
            op,
            spec: spec.clone(),
            source_had_index,
        });

        let delay = self.delays.lock().unwrap().get(&op).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&op)
            .cloned()
            .unwrap_or_else(|| Reply::Output(CommandOutput::failed(127, "unscripted command")));

        match reply {
            Reply::Output(output) => Ok(output),
            Reply::Timeout => Err(CommandError::Timeout(spec.timeout)),
            Reply::NotFound => Err(CommandError::SpawnFailed(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "program not found",
            ))),
        }
    }
}

/// Value following `flag` in the argument list
pub fn arg_after(spec: &CommandSpec, flag: &str) -> Option<String> {
    let pos = spec.args.iter().position(|a| a == flag)?;
    spec.args.get(pos + 1).cloned()
}

/// Locator that reports both tools missing
pub struct NoTools;

impl ToolLocator for NoTools {
    fn locate(&self) -> Result<ToolPaths, EnvironmentError> {
        Err(EnvironmentError {
            missing: vec!["Terraform", "Azure CLI"],
        })
    }
}

pub fn fixed_tools() -> FixedTools {
    FixedTools(ToolPaths {
        terraform: PathBuf::from("/opt/tools/terraform"),
        az: PathBuf::from("/opt/tools/az"),
    })
}

/// An app wired to scratch directories and a scripted executor
pub struct Harness {
    pub state: Arc<AppState>,
    pub executor: Arc<ScriptedExecutor>,
    pub terraform_dir: TempDir,
    pub uploads_dir: TempDir,
    pub frontend_dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_executor(ScriptedExecutor::happy())
    }

    pub fn with_executor(executor: ScriptedExecutor) -> Self {
        Self::build(executor, Arc::new(fixed_tools()))
    }

    pub fn build(executor: ScriptedExecutor, tools: Arc<dyn ToolLocator>) -> Self {
        let terraform_dir = TempDir::new().unwrap();
        let uploads_dir = TempDir::new().unwrap();
        let frontend_dir = TempDir::new().unwrap();

        let config = EnvConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            terraform_dir: terraform_dir.path().to_path_buf(),
            frontend_dir: frontend_dir.path().to_path_buf(),
            uploads_dir: uploads_dir.path().to_path_buf(),
            terraform_path: None,
            az_path: None,
            max_upload_bytes: 10 * 1024 * 1024,
        };

        let executor = Arc::new(executor);
        let state = Arc::new(AppState::with_components(
            config,
            tools,
            executor.clone() as Arc<dyn CommandExecutor>,
        ));

        Self {
            state,
            executor,
            terraform_dir,
            uploads_dir,
            frontend_dir,
        }
    }

    pub fn router(&self) -> Router {
        hostforge::api::router(self.state.clone())
    }

    /// Number of per-request workspaces still on disk
    pub fn leftover_workspaces(&self) -> usize {
        std::fs::read_dir(self.uploads_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    pub fn parameters_file(&self) -> PathBuf {
        self.terraform_dir.path().join("terraform.tfvars.json")
    }
}

/// ZIP archive containing `files` (path, contents)
pub fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::FileOptions::default();
    for (name, contents) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A multipart deploy form
pub struct DeployForm {
    fields: Vec<(&'static str, String)>,
    file: Option<(String, Vec<u8>)>,
}

impl DeployForm {
    /// All fields valid, archive with index.html at its root
    pub fn valid() -> Self {
        Self::empty()
            .field("location", "eastus")
            .field("environment", "dev")
            .field("owner", "alice")
            .field("storage_account_name", "mysite")
            .file(
                "site.zip",
                zip_bytes(&[
                    ("index.html", "<h1>hello</h1>"),
                    ("css/site.css", "body { margin: 0 }"),
                ]),
            )
    }

    pub fn empty() -> Self {
        Self {
            fields: Vec::new(),
            file: None,
        }
    }

    pub fn field(mut self, name: &'static str, value: &str) -> Self {
        self.fields.retain(|(n, _)| *n != name);
        self.fields.push((name, value.to_string()));
        self
    }

    pub fn without(mut self, name: &str) -> Self {
        self.fields.retain(|(n, _)| *n != name);
        self
    }

    pub fn file(mut self, filename: &str, bytes: Vec<u8>) -> Self {
        self.file = Some((filename.to_string(), bytes));
        self
    }

    pub fn body(&self) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in &self.fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, bytes)) = &self.file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"zip_file\"; filename=\"{filename}\"\r\nContent-Type: application/zip\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    pub fn request(&self) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/deploy")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body()))
            .unwrap()
    }
}

pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

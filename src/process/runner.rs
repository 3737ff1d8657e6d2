// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! External command execution with streamed output.

use crate::error::{OcsdkError, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{info, instrument, warn};

/// Arguments whose value must not show up in logs
const SECRET_ARG_PREFIXES: &[&str] = &["--token="];

/// Which output stream a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// Receives the output of a running command line by line
pub trait OutputSink: Send + Sync {
    fn line(&self, stream: OutputStream, line: &str);
}

/// Forwards command output to the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl OutputSink for TracingSink {
    fn line(&self, stream: OutputStream, line: &str) {
        match stream {
            OutputStream::Stdout => info!(target: "ocsdk::command", "{}", line),
            OutputStream::Stderr => warn!(target: "ocsdk::command", "{}", line),
        }
    }
}

/// A command to run: program, arguments, per-call environment and working directory.
///
/// The child inherits the current environment with `env` layered on top;
/// the environment of this process is never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub working_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            working_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Command line for logs and error messages, with secrets redacted
    pub fn display(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|arg| {
                match SECRET_ARG_PREFIXES.iter().find(|p| arg.starts_with(*p)) {
                    Some(prefix) => format!("{}<redacted>", prefix),
                    None => arg.clone(),
                }
            }))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the command, streaming its output to the tracing subscriber
    pub async fn run(&self) -> Result<()> {
        run_command(self, &TracingSink).await
    }
}

/// Run a command to completion, streaming stdout and stderr to `sink`.
///
/// Succeeds on exit code 0. A non-zero exit yields `CommandFailed` and a
/// program that cannot be started yields `SpawnFailed`. Nothing is retried.
#[instrument(skip(spec, sink), fields(command = %spec.display()))]
pub async fn run_command(spec: &CommandSpec, sink: &dyn OutputSink) -> Result<()> {
    info!("Running {}", spec.display());

    let mut command = Command::new(&spec.program);
    command
        .args(&spec.args)
        .envs(&spec.env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = &spec.working_dir {
        command.current_dir(dir);
    }

    let mut child = command.spawn().map_err(|e| OcsdkError::SpawnFailed {
        command: spec.display(),
        message: e.to_string(),
    })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    futures::try_join!(
        pump(stdout, OutputStream::Stdout, sink),
        pump(stderr, OutputStream::Stderr, sink)
    )?;

    let status = child.wait().await?;
    if status.success() {
        Ok(())
    } else {
        Err(OcsdkError::CommandFailed {
            command: spec.display(),
            status,
        })
    }
}

async fn pump<R>(reader: Option<R>, stream: OutputStream, sink: &dyn OutputSink) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return Ok(());
    };

    // Output is not guaranteed to be UTF-8; only the exit status decides success
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        let line = buf
            .strip_suffix(b"\n")
            .map(|l| l.strip_suffix(b"\r").unwrap_or(l))
            .unwrap_or(buf.as_slice());
        sink.line(stream, &String::from_utf8_lossy(line));
    }
}

//! Streaming test-runner execution.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;

use anyhow::Context;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

use tselect_core::{Invocation, RunOutcome};

/// Trait for test-runner backends.
#[async_trait]
pub trait TestRunner: Send + Sync {
    /// Execute an invocation and return the parsed outcome.
    async fn run(&self, invocation: &Invocation) -> anyhow::Result<RunOutcome>;
}

/// Runs pytest invocations as a subprocess in a working directory.
///
/// Output is streamed to the operator line-by-line as it is produced while
/// being accumulated for outcome parsing. There is no timeout: a hung run
/// blocks until externally signalled.
pub struct PytestRunner {
    work_dir: PathBuf,
}

impl PytestRunner {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    /// Spawn the given command tokens, stream output, and parse the outcome.
    pub async fn execute_tokens(&self, tokens: &[String]) -> anyhow::Result<RunOutcome> {
        let (exe, args) = tokens
            .split_first()
            .context("invocation has no command tokens")?;

        let start = Instant::now();

        let mut child = Command::new(exe)
            .args(args)
            .current_dir(&self.work_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn '{exe}'"))?;

        let stdout = child.stdout.take().context("child stdout not captured")?;
        let stderr = child.stderr.take().context("child stderr not captured")?;

        let stdout_task = tokio::spawn(stream_lines(stdout));
        let stderr_task = tokio::spawn(stream_lines(stderr));

        let status = child.wait().await.context("failed to wait for runner")?;

        let mut output = stdout_task.await.context("stdout task panicked")??;
        output.push_str(&stderr_task.await.context("stderr task panicked")??);

        let duration = start.elapsed().as_secs_f64();
        let return_code = status.code().unwrap_or(-1);

        Ok(RunOutcome::from_output(return_code, &output, duration))
    }
}

#[async_trait]
impl TestRunner for PytestRunner {
    async fn run(&self, invocation: &Invocation) -> anyhow::Result<RunOutcome> {
        self.execute_tokens(invocation.tokens()).await
    }
}

/// Echo each line to the operator as it arrives, accumulating the full text
/// for outcome parsing.
async fn stream_lines<R>(reader: R) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut accumulated = String::new();
    while let Some(line) = lines.next_line().await? {
        println!("{line}");
        accumulated.push_str(&line);
        accumulated.push('\n');
    }
    Ok(accumulated)
}

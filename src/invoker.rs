use async_trait::async_trait;
use std::fmt::Display;
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};
use crate::outcome::find_transaction_id;

// Same cap as node's execFile maxBuffer
pub const DEFAULT_MAX_OUTPUT: usize = 1024 * 1024;

// What gets sent to the disbursement backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisbursementRequest {
    pub destination: String,
    pub amount: u64,
}

// Raw result of one disbursement attempt, before classification.
// `succeeded` means the tool ran and exited cleanly; whether the transfer
// went through is decided by the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisbursementResult {
    pub succeeded: bool,
    pub transaction_id: Option<String>,
    pub raw_output: String,
    pub raw_error: Option<String>,
}

impl DisbursementResult {
    pub fn completed(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        let raw_output = stdout.into();
        let stderr = stderr.into();
        Self {
            succeeded: true,
            transaction_id: find_transaction_id(&raw_output).map(str::to_string),
            raw_output,
            raw_error: (!stderr.is_empty()).then_some(stderr),
        }
    }

    // Tool ran but exited non-zero, whatever it printed
    pub fn exited(
        program: &str,
        status: impl Display,
        stdout: impl Into<String>,
        stderr: &str,
    ) -> Self {
        let stderr = stderr.trim_end();
        let error = if stderr.is_empty() {
            format!("{program} failed ({status})")
        } else {
            format!("{program} failed ({status}): {stderr}")
        };
        Self {
            succeeded: false,
            transaction_id: None,
            raw_output: stdout.into(),
            raw_error: Some(error),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            transaction_id: None,
            raw_output: String::new(),
            raw_error: Some(error.into()),
        }
    }
}

// Moves funds from the operator wallet to a destination
#[async_trait]
pub trait Disburser: Send + Sync {
    async fn disburse(&self, request: &DisbursementRequest) -> DisbursementResult;
}

// Fixed invocation contract for the external transfer tool
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: String,
    pub operation: String,
    pub ledger_url: String,
    pub signing_key: String,
    pub public_key: String,
    pub asset_id: String,
    pub timeout: Duration,
    pub max_output: usize, // per stream, in bytes
}

// One child process per request, killed when dropped (timeout, oversized output)
#[derive(Debug, Clone)]
pub struct CommandDisburser {
    spec: CommandSpec,
}

impl CommandDisburser {
    pub fn new(spec: CommandSpec) -> Self {
        Self { spec }
    }

    // Positional: operation, ledger, private key, public key, asset, destination, amount
    pub fn args(&self, request: &DisbursementRequest) -> Vec<String> {
        vec![
            self.spec.operation.clone(),
            self.spec.ledger_url.clone(),
            self.spec.signing_key.clone(),
            self.spec.public_key.clone(),
            self.spec.asset_id.clone(),
            request.destination.clone(),
            request.amount.to_string(),
        ]
    }

    pub async fn invoke(&self, request: &DisbursementRequest) -> DisbursementResult {
        let program = &self.spec.program;
        let mut child = match Command::new(program)
            .args(self.args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                warn!(program = %program, error = %err, "failed to launch disbursement command");
                return DisbursementResult::failed(format!("failed to run {program}: {err}"));
            }
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let limit = self.spec.max_output;
        let finished = async {
            tokio::try_join!(
                read_capped(stdout, limit, "stdout"),
                read_capped(stderr, limit, "stderr"),
                child.wait(),
            )
        };

        match timeout(self.spec.timeout, finished).await {
            Ok(Ok((stdout, stderr, status))) => {
                debug!(status = %status, program = %program, "disbursement command finished");
                let stdout = String::from_utf8_lossy(&stdout);
                let stderr = String::from_utf8_lossy(&stderr);
                if status.success() {
                    DisbursementResult::completed(stdout, stderr)
                } else {
                    warn!(status = %status, program = %program, "disbursement command exited with failure");
                    DisbursementResult::exited(program, status, stdout, &stderr)
                }
            }
            Ok(Err(err)) => {
                warn!(program = %program, error = %err, "disbursement command output not captured");
                DisbursementResult::failed(format!("{program} output not captured: {err}"))
            }
            Err(_) => {
                warn!(program = %program, timeout = ?self.spec.timeout, "disbursement command timed out");
                DisbursementResult::failed(format!(
                    "{} timed out after {}s",
                    program,
                    self.spec.timeout.as_secs_f64()
                ))
            }
        }
    }
}

async fn read_capped<R>(pipe: Option<R>, limit: usize, stream: &str) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut captured = Vec::new();
    if let Some(pipe) = pipe {
        pipe.take(limit as u64 + 1).read_to_end(&mut captured).await?;
    }
    if captured.len() > limit {
        return Err(io::Error::other(format!("{stream} exceeded {limit} bytes")));
    }
    Ok(captured)
}

#[async_trait]
impl Disburser for CommandDisburser {
    async fn disburse(&self, request: &DisbursementRequest) -> DisbursementResult {
        self.invoke(request).await
    }
}

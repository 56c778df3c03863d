// SPDX-License-Identifier: GPL-3.0-only

//! HTTP transport for the enhancement service
//!
//! Requests go through the system `curl` binary so the crate does not carry
//! its own TLS stack. Headers are read by curl from a private temporary file
//! and the body from stdin, so neither shows up in the process list.

use crate::constants::ENHANCE_TIMEOUT;
use crate::errors::EnhanceError;
use async_trait::async_trait;
use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Sends a JSON POST and returns the response body
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: String,
    ) -> Result<String, EnhanceError>;
}

/// Transport that shells out to `curl`
#[derive(Debug, Clone)]
pub struct CurlTransport {
    program: String,
    timeout: Duration,
}

impl CurlTransport {
    pub fn new() -> Self {
        Self {
            program: "curl".to_string(),
            timeout: ENHANCE_TIMEOUT,
        }
    }

    /// Use a different curl binary
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self, url: &str, header_file: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["--silent", "--show-error", "--fail-with-body", "-X", "POST"])
            .arg("--max-time")
            .arg(self.timeout.as_secs().max(1).to_string())
            .arg("-H")
            .arg(format!("@{}", header_file.display()))
            .args(["--data-binary", "@-"])
            .arg(url)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

/// Write one `Name: value` line per header, readable by the owner only
///
/// The file is removed when the returned handle is dropped.
fn header_file(headers: &[(String, String)]) -> Result<NamedTempFile, EnhanceError> {
    let io_error = |e: std::io::Error| EnhanceError::Transport(format!("Header file: {}", e));

    let mut file = NamedTempFile::new().map_err(io_error)?;
    writeln!(file, "Content-Type: application/json").map_err(io_error)?;
    for (name, value) in headers {
        writeln!(file, "{}: {}", name, value).map_err(io_error)?;
    }
    file.flush().map_err(io_error)?;
    Ok(file)
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for CurlTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: String,
    ) -> Result<String, EnhanceError> {
        debug!(url, size = body.len(), "POST via curl");

        // Must outlive the child
        let header_lines = header_file(headers)?;
        let mut child = self
            .command(url, header_lines.path())
            .spawn()
            .map_err(|e| EnhanceError::Transport(format!("Failed to run {}: {}", self.program, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EnhanceError::Transport("curl stdin unavailable".to_string()))?;
        stdin
            .write_all(body.as_bytes())
            .await
            .map_err(|e| EnhanceError::Transport(format!("Failed to send request body: {}", e)))?;
        drop(stdin);

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| EnhanceError::Transport("Request timed out".to_string()))?
            .map_err(|e| EnhanceError::Transport(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = ?output.status.code(), error = %stderr.trim(), "curl request failed");
            return Err(EnhanceError::Transport(format!(
                "curl exited with {:?}: {}",
                output.status.code(),
                stderr.trim()
            )));
        }

        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_is_transport_error() {
        let transport = CurlTransport::new().with_program("definitely-not-a-real-curl-binary");
        let result = transport
            .post_json("http://127.0.0.1:9/", &[], "{}".to_string())
            .await;
        assert!(matches!(result, Err(EnhanceError::Transport(_))));
    }

    #[test]
    fn test_headers_stay_off_the_command_line() {
        let secret = "secret-key-123";
        let file = header_file(&[("x-goog-api-key".to_string(), secret.to_string())]).unwrap();

        let transport = CurlTransport::new();
        let cmd = transport.command("https://example.invalid/x", file.path());
        let args: Vec<String> = cmd
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert!(args.iter().all(|a| !a.contains(secret)));
        assert!(args.contains(&format!("@{}", file.path().display())));
        assert_eq!(args.last().map(String::as_str), Some("https://example.invalid/x"));

        let lines = std::fs::read_to_string(file.path()).unwrap();
        assert!(lines.contains("Content-Type: application/json\n"));
        assert!(lines.contains("x-goog-api-key: secret-key-123\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_header_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let file = header_file(&[]).unwrap();
        let mode = std::fs::metadata(file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
    }
}

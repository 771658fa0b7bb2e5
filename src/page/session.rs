use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::FillError;
use crate::field::field_model::RawControl;
use crate::plan::plan_model::FillInstruction;

/// Overall bound on the readiness wait.
pub const READY_TIMEOUT: Duration = Duration::from_millis(5000);
/// Interval between readiness probes.
pub const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

pub const DEFAULT_DRIVER_SCRIPT: &str = "node/page-driver/page_server.js";

/// The page operations one fill cycle needs. `PageSession` is the live
/// implementation; tests substitute scripted drivers.
pub trait PageDriver {
    /// Block until the page script context is ready to receive
    /// messages.
    fn wait_ready(&mut self) -> Result<(), FillError>;
    /// Capture the current page's form controls.
    fn scan(&mut self) -> Result<Vec<RawControl>, FillError>;
    /// Write plan values into the page; returns how many took effect.
    fn fill(&mut self, instructions: Vec<FillInstruction>) -> Result<u32, FillError>;
}

/// Request sent to the page driver over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PageRequest {
    Navigate {
        cmd: &'static str,
        url: String,
    },
    Ping {
        cmd: &'static str,
    },
    Scan {
        cmd: &'static str,
    },
    Fill {
        cmd: &'static str,
        instructions: Vec<FillInstruction>,
    },
    Quit {
        cmd: &'static str,
    },
}

impl PageRequest {
    pub fn navigate(url: &str) -> Self {
        PageRequest::Navigate {
            cmd: "navigate",
            url: url.to_string(),
        }
    }

    pub fn ping() -> Self {
        PageRequest::Ping { cmd: "ping" }
    }

    pub fn scan() -> Self {
        PageRequest::Scan { cmd: "scan" }
    }

    pub fn fill(instructions: Vec<FillInstruction>) -> Self {
        PageRequest::Fill {
            cmd: "fill",
            instructions,
        }
    }

    pub fn quit() -> Self {
        PageRequest::Quit { cmd: "quit" }
    }
}

/// Response from the page driver over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct PageResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    /// Whether the in-page script context finished initializing.
    #[serde(default)]
    pub initialized: Option<bool>,
    #[serde(default)]
    pub fields: Option<Vec<RawControl>>,
    #[serde(default)]
    pub filled: Option<u32>,
}

/// Bounded readiness polling: call `probe` until it reports ready,
/// sleeping `interval` between attempts; fail with a distinct timeout
/// error once `timeout` has elapsed.
pub fn poll_ready<F>(mut probe: F, timeout: Duration, interval: Duration) -> Result<(), FillError>
where
    F: FnMut() -> Result<bool, FillError>,
{
    let started = Instant::now();
    loop {
        if probe()? {
            return Ok(());
        }
        if started.elapsed() >= timeout {
            return Err(FillError::Timeout {
                waited_ms: timeout.as_millis() as u64,
            });
        }
        std::thread::sleep(interval);
    }
}

/// A persistent page session backed by a Node driver process.
///
/// The driver keeps a browser page open; commands are sent as NDJSON
/// over stdin, responses read from stdout.
pub struct PageSession {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
    current_url: Option<String>,
}

impl PageSession {
    /// Spawn the driver and wait for its ready line.
    pub fn launch(script: &str) -> Result<Self, FillError> {
        let mut child = Command::new("node")
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| FillError::SubprocessSpawn {
                script: script.to_string(),
                source: e,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| FillError::SessionIo("Failed to capture driver stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| FillError::SessionIo("Failed to capture driver stdout".to_string()))?;

        let mut reader = BufReader::new(stdout);

        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| FillError::SessionIo(format!("Failed to read ready signal: {}", e)))?;

        let response: PageResponse =
            serde_json::from_str(line.trim()).map_err(|e| FillError::JsonParse {
                context: "page driver ready signal".to_string(),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            return Err(FillError::SessionProtocol {
                command: "launch".to_string(),
                error: "Did not receive ready signal from page driver".to_string(),
            });
        }

        Ok(PageSession {
            child,
            stdin,
            reader,
            current_url: None,
        })
    }

    fn send(&mut self, request: &PageRequest) -> Result<PageResponse, FillError> {
        let json = serde_json::to_string(request).map_err(|e| FillError::JsonParse {
            context: "page request".to_string(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json)
            .map_err(|e| FillError::SessionIo(format!("Failed to write to driver stdin: {}", e)))?;
        self.stdin
            .flush()
            .map_err(|e| FillError::SessionIo(format!("Failed to flush driver stdin: {}", e)))?;

        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|e| FillError::SessionIo(format!("Failed to read from driver stdout: {}", e)))?;

        if line.trim().is_empty() {
            return Err(FillError::SessionIo(
                "Empty response from page driver (process may have died)".to_string(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| FillError::JsonParse {
            context: "page driver response".to_string(),
            source: e,
        })
    }

    fn send_ok(
        &mut self,
        request: &PageRequest,
        command_name: &str,
    ) -> Result<PageResponse, FillError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(FillError::SessionProtocol {
                command: command_name.to_string(),
                error: response.error.unwrap_or_else(|| "Unknown error".to_string()),
            });
        }
        Ok(response)
    }

    pub fn navigate(&mut self, url: &str) -> Result<(), FillError> {
        self.send_ok(&PageRequest::navigate(url), "navigate")?;
        self.current_url = Some(url.to_string());
        Ok(())
    }

    /// One readiness probe: has the in-page script context finished
    /// initializing?
    pub fn ping(&mut self) -> Result<bool, FillError> {
        let response = self.send_ok(&PageRequest::ping(), "ping")?;
        Ok(response.initialized.unwrap_or(false))
    }

    /// Block until the page script context is ready to receive
    /// messages, up to `READY_TIMEOUT`.
    pub fn wait_ready(&mut self) -> Result<(), FillError> {
        self.wait_ready_within(READY_TIMEOUT)
    }

    pub fn wait_ready_within(&mut self, timeout: Duration) -> Result<(), FillError> {
        poll_ready(|| self.ping(), timeout, READY_POLL_INTERVAL)
    }

    /// Scan the current page for form controls.
    pub fn scan(&mut self) -> Result<Vec<RawControl>, FillError> {
        let response = self.send_ok(&PageRequest::scan(), "scan")?;
        response.fields.ok_or_else(|| FillError::SessionProtocol {
            command: "scan".to_string(),
            error: "No fields in scan response".to_string(),
        })
    }

    /// Write plan values into the page. The driver locates each
    /// element by selector and dispatches input/change/blur events.
    pub fn fill(&mut self, instructions: Vec<FillInstruction>) -> Result<u32, FillError> {
        let response = self.send_ok(&PageRequest::fill(instructions), "fill")?;
        Ok(response.filled.unwrap_or(0))
    }

    pub fn last_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    pub fn quit(&mut self) -> Result<(), FillError> {
        // Best-effort quit; the process may already be gone
        let _ = self.send(&PageRequest::quit());
        let _ = self.child.wait();
        Ok(())
    }
}

impl PageDriver for PageSession {
    fn wait_ready(&mut self) -> Result<(), FillError> {
        PageSession::wait_ready(self)
    }

    fn scan(&mut self) -> Result<Vec<RawControl>, FillError> {
        PageSession::scan(self)
    }

    fn fill(&mut self, instructions: Vec<FillInstruction>) -> Result<u32, FillError> {
        PageSession::fill(self, instructions)
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        let _ = self.quit();
    }
}

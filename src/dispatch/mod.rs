//! CB-007: Request dispatch — transport-neutral entry point to the core.
//!
//! Each inbound request maps to exactly one core operation:
//! `normalize` → name normalizer, `register` → registry insert,
//! `summarize` → recipe resolver. Results and failures are rendered as
//! tagged JSON values; `serve` runs the same mapping over JSON lines.

use crate::core::normalize::normalize;
use crate::core::resolver::{self, ResolveOptions};
use crate::core::types::{CookbookEntry, RecipeSummary};
use crate::core::{CookbookError, Registry};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

/// Kind reported for lines that are not a valid request.
pub const MALFORMED_REQUEST: &str = "MalformedRequest";

/// Inbound request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Normalize { input: String },
    Register { entry: CookbookEntry },
    Summarize { name: String },
}

/// Outbound response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Normalized { msg: String },
    Registered,
    Summary(RecipeSummary),
    Error { kind: String, message: String },
}

impl Response {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl From<CookbookError> for Response {
    fn from(e: CookbookError) -> Self {
        Self::Error {
            kind: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}

/// Counters from one `serve` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeStats {
    pub handled: u64,
    pub failed: u64,
}

/// Owns the registry and routes requests to it.
#[derive(Debug, Default)]
pub struct Dispatcher {
    registry: Registry,
    options: ResolveOptions,
}

impl Dispatcher {
    pub fn new(registry: Registry, options: ResolveOptions) -> Self {
        Self { registry, options }
    }

    /// Handle one request.
    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::Normalize { input } => match normalize(&input) {
                Ok(msg) => Response::Normalized { msg },
                Err(e) => e.into(),
            },
            Request::Register { entry } => match self.registry.insert(&entry) {
                Ok(()) => Response::Registered,
                Err(e) => e.into(),
            },
            Request::Summarize { name } => {
                match resolver::resolve_with(&self.registry, &name, &self.options) {
                    Ok(summary) => Response::Summary(summary),
                    Err(e) => e.into(),
                }
            }
        }
    }

    /// Decode and handle one JSON line.
    pub fn handle_line(&self, line: &str) -> Response {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle(request),
            Err(e) => {
                warn!(error = %e, "malformed request");
                Response::Error {
                    kind: MALFORMED_REQUEST.to_string(),
                    message: format!("malformed request: {}", e),
                }
            }
        }
    }

    /// Serve JSON-lines requests until `reader` is exhausted. Blank lines are
    /// skipped; every other line gets exactly one response line.
    pub fn serve<R: BufRead, W: Write>(
        &self,
        reader: R,
        mut writer: W,
    ) -> std::io::Result<ServeStats> {
        let mut stats = ServeStats::default();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let response = self.handle_line(&line);
            stats.handled += 1;
            if response.is_error() {
                stats.failed += 1;
            }
            debug!(?response, "request handled");
            serde_json::to_writer(&mut writer, &response)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        info!(handled = stats.handled, failed = stats.failed, "serve loop finished");
        Ok(stats)
    }
}

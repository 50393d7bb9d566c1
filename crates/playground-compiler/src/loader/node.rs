//! Runs a compiler module inside a Node.js driver process.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::cache::ModuleFiles;
use crate::error::{LoadError, Result};
use crate::module::{CompilerModule, ModuleCall, StripTypesModule};
use crate::package::ModuleSpec;
use crate::thrown::{Thrown, normalize_thrown};

/// Source of the driver script, installed next to the cached modules.
pub const DRIVER_SOURCE: &str = include_str!("driver.mjs");

/// Node executable plus the installed driver script.
#[derive(Debug, Clone)]
pub struct NodeRuntime {
    pub node_path: PathBuf,
    pub driver_path: PathBuf,
}

#[derive(Debug, Serialize)]
struct DriverRequest<'a> {
    op: &'a str,
    code: &'a str,
    options: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum DriverMessage {
    Ready,
    InitFailed { thrown: Thrown },
    Ok { value: Value },
    Thrown { thrown: Thrown },
}

struct DriverProcess {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    stdout: BufReader<ChildStdout>,
}

impl DriverProcess {
    fn send(&mut self, request: &DriverRequest<'_>) -> Result<DriverMessage> {
        let line = serde_json::to_string(request)?;
        self.stdin.write_all(line.as_bytes())?;
        self.stdin.write_all(b"\n")?;
        self.stdin.flush()?;
        self.receive()
    }

    fn receive(&mut self) -> Result<DriverMessage> {
        let mut response = String::new();
        let bytes = self.stdout.read_line(&mut response)?;
        if bytes == 0 {
            return Err(LoadError::Runtime("driver exited unexpectedly".to_string()));
        }
        Ok(serde_json::from_str(response.trim_end())?)
    }

    fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    fn shutdown(&mut self) {
        if self.is_running() {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
    }
}

/// A compiler module hosted by a long-lived driver process.
///
/// The module's async initializer runs once per process. A process that
/// dies is restarted on the next call.
pub struct NodeModule {
    spec: ModuleSpec,
    runtime: NodeRuntime,
    files: ModuleFiles,
    process: Mutex<Option<DriverProcess>>,
}

impl NodeModule {
    /// Starts the driver and waits for the module to initialize.
    ///
    /// Blocks until the driver reports back.
    pub fn start(runtime: NodeRuntime, spec: ModuleSpec, files: ModuleFiles) -> Result<Self> {
        let module = Self {
            spec,
            runtime,
            files,
            process: Mutex::new(None),
        };
        let process = module.spawn()?;
        *module.lock() = Some(process);
        info!(module = %module.spec, "initialized");
        Ok(module)
    }

    #[must_use]
    pub fn spec(&self) -> &ModuleSpec {
        &self.spec
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<DriverProcess>> {
        self.process.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spawn(&self) -> Result<DriverProcess> {
        debug!(module = %self.spec, node = %self.runtime.node_path.display(), "starting driver");

        let mut child = Command::new(&self.runtime.node_path)
            .arg(&self.runtime.driver_path)
            .arg(&self.files.entry)
            .arg(&self.files.wasm)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|err| {
                LoadError::Runtime(format!(
                    "failed to spawn {}: {err}",
                    self.runtime.node_path.display()
                ))
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            return Err(LoadError::Runtime("driver stdio unavailable".to_string()));
        };
        let mut process = DriverProcess {
            child,
            stdin: BufWriter::new(stdin),
            stdout: BufReader::new(stdout),
        };

        match process.receive() {
            Ok(DriverMessage::Ready) => Ok(process),
            Ok(DriverMessage::InitFailed { thrown }) => {
                process.shutdown();
                Err(LoadError::Initialization {
                    version: self.spec.version.to_string(),
                    message: normalize_thrown(&thrown),
                })
            }
            Ok(other) => {
                process.shutdown();
                Err(LoadError::Runtime(format!("unexpected driver message: {other:?}")))
            }
            Err(err) => {
                process.shutdown();
                Err(err)
            }
        }
    }

    fn call(&self, op: &str, code: &str, options: &Value) -> ModuleCall {
        let request = DriverRequest { op, code, options };
        let mut guard = self.lock();

        let mut attempts = 0;
        loop {
            attempts += 1;
            let outcome = match guard.as_mut() {
                Some(process) => {
                    if process.is_running() {
                        process.send(&request)
                    } else {
                        Err(LoadError::Runtime("driver not running".to_string()))
                    }
                }
                None => Err(LoadError::Runtime("driver not running".to_string())),
            };
            match outcome {
                Ok(DriverMessage::Ok { value }) => return Ok(value),
                Ok(DriverMessage::Thrown { thrown }) => return Err(thrown),
                Ok(other) => {
                    return Err(Thrown::other(format!("unexpected driver message: {other:?}")));
                }
                Err(err) if attempts >= 2 => {
                    return Err(Thrown::other(format!("swc runtime failed: {err}")));
                }
                Err(err) => {
                    warn!(module = %self.spec, "restarting driver: {err}");
                    if let Some(mut stale) = guard.take() {
                        stale.shutdown();
                    }
                    match self.spawn() {
                        Ok(process) => *guard = Some(process),
                        Err(err) => {
                            return Err(Thrown::other(format!("swc runtime failed: {err}")));
                        }
                    }
                }
            }
        }
    }
}

impl Drop for NodeModule {
    fn drop(&mut self) {
        if let Some(mut process) = self.lock().take() {
            process.shutdown();
        }
    }
}

impl CompilerModule for NodeModule {
    fn parse_sync(&self, code: &str, options: &Value) -> ModuleCall {
        self.call("parse", code, options)
    }

    fn transform_sync(&self, code: &str, options: &Value) -> ModuleCall {
        self.call("transform", code, options)
    }
}

impl StripTypesModule for NodeModule {
    fn transform_sync(&self, code: &str, options: &Value) -> ModuleCall {
        self.call("transform", code, options)
    }
}

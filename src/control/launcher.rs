use crate::error::{HarnessError, Result};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Launcher {
    pub program: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Launcher {
    pub fn new(program: impl Into<PathBuf>, host: impl Into<String>, port: u16) -> Self {
        Self {
            program: program.into(),
            host: host.into(),
            port,
        }
    }

    /// Returns as soon as the process exists. Results of the run only show up
    /// later, through the engine's metrics snapshot.
    pub fn launch(&self, clients: u32, orders_per_client: u32) -> Result<LaunchHandle> {
        let child = Command::new(&self.program)
            .arg(clients.to_string())
            .arg(orders_per_client.to_string())
            .arg("--host")
            .arg(&self.host)
            .arg("--port")
            .arg(self.port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| HarnessError::Launch {
                program: self.program.display().to_string(),
                source,
            })?;

        info!(pid = child.id(), clients, orders_per_client, "load test started");
        Ok(LaunchHandle {
            child,
            clients,
            orders_per_client,
        })
    }
}

#[derive(Debug)]
pub struct LaunchHandle {
    child: Child,
    pub clients: u32,
    pub orders_per_client: u32,
}

impl LaunchHandle {
    #[inline]
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    #[inline]
    pub fn total_orders(&self) -> u64 {
        self.clients as u64 * self.orders_per_client as u64
    }

    /// Non-blocking reap. `Some` once the process has exited.
    pub fn poll_exit(&mut self) -> Option<ExitStatus> {
        match self.child.try_wait() {
            Ok(status) => status,
            Err(e) => {
                warn!(pid = self.child.id(), error = %e, "failed to poll load test");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_fails_at_launch() {
        let launcher = Launcher::new("/nonexistent/load-generator", "localhost", 8080);

        match launcher.launch(50, 4000) {
            Err(HarnessError::Launch { program, .. }) => {
                assert_eq!(program, "/nonexistent/load-generator");
            }
            other => panic!("unexpected launch result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_returns_handle_without_waiting() {
        let launcher = Launcher::new("true", "localhost", 8080);
        let mut handle = launcher.launch(2, 100).unwrap();
        assert_eq!(handle.total_orders(), 200);

        let status = loop {
            if let Some(status) = handle.poll_exit() {
                break status;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        };
        assert!(status.success());
    }
}

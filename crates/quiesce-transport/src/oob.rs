//! Out-of-band host power controller.
//!
//! A host that is fully powered down has no reachable management path, so
//! power-up is issued through an external executable that speaks to the
//! host's baseboard controller. The executable is invoked once per signal;
//! convergence is then established by polling the host's connection state
//! through the management API.

use std::path::PathBuf;
use std::process::Stdio;

use quiesce_core::Credentials;
use tokio::process::Command;

use crate::error::TransportError;

/// Wrapper around the external power-control executable.
#[derive(Debug, Clone)]
pub struct OobPowerController {
    program: PathBuf,
}

impl OobPowerController {
    /// Use the given executable for power signals.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Issue a hard power-up signal to the host's baseboard controller.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Session`] when the executable cannot be
    /// launched and [`TransportError::Exec`] when it exits nonzero.
    pub async fn power_on(
        &self,
        address: &str,
        credentials: &Credentials,
    ) -> Result<(), TransportError> {
        let output = Command::new(&self.program)
            .arg("--address")
            .arg(address)
            .arg("--username")
            .arg(&credentials.username)
            .arg("--password")
            .arg(&credentials.password)
            .arg("power-on")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|err| {
                TransportError::Session(format!(
                    "failed to launch {}: {err}",
                    self.program.display()
                ))
            })?;

        if output.status.success() {
            tracing::debug!(address, "issued out-of-band power-up signal");
            Ok(())
        } else {
            Err(TransportError::Exec {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn write_script(dir: &std::path::Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("oob-power");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_signal() {
        let dir = tempfile::tempdir().unwrap();
        let program = write_script(dir.path(), "exit 0");

        let controller = OobPowerController::new(program);
        let creds = Credentials::new("admin", "pw");
        assert!(controller.power_on("10.0.0.7", &creds).await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_surfaces_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let program = write_script(dir.path(), "echo 'no route to bmc' >&2; exit 2");

        let controller = OobPowerController::new(program);
        let creds = Credentials::new("admin", "pw");
        let err = controller.power_on("10.0.0.7", &creds).await.unwrap_err();
        match err {
            TransportError::Exec { status, stderr } => {
                assert_eq!(status, 2);
                assert!(stderr.contains("no route to bmc"));
            }
            other => panic!("expected Exec error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_executable() {
        let controller = OobPowerController::new("/nonexistent/oob-power");
        let creds = Credentials::new("admin", "pw");
        let err = controller.power_on("10.0.0.7", &creds).await.unwrap_err();
        assert!(matches!(err, TransportError::Session(_)));
    }
}

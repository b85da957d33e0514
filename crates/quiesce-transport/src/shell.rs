//! Host shell command channel over SSH.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quiesce_core::{Credentials, Endpoint};
use russh::client;
use russh::ChannelMsg;
use russh_keys::key;

use crate::error::TransportError;
use crate::probe::{preflight, DEFAULT_PROBE_TIMEOUT};

/// Result of one remote command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Remote exit status.
    pub exit_status: u32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the command exited zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_status == 0
    }
}

/// A channel that can execute shell commands on a remote host.
///
/// The production implementation is [`ShellSession`]; tests script this
/// trait with canned outputs.
#[async_trait]
pub trait ShellChannel: Send {
    /// Run one command, collecting output until the remote side closes.
    ///
    /// # Errors
    ///
    /// Returns a classified [`TransportError`] on channel or timeout
    /// failure.
    async fn run(
        &mut self,
        command: &str,
        timeout: Duration,
    ) -> Result<CommandOutput, TransportError>;
}

struct HostKeyAccepter;

// Host keys are not verified: the shell channel is only used inside the
// management network, against hosts whose keys rotate with reimaging.
#[async_trait]
impl client::Handler for HostKeyAccepter {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &key::PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// One authenticated SSH session against one host.
pub struct ShellSession {
    handle: client::Handle<HostKeyAccepter>,
    endpoint: Endpoint,
    open: bool,
}

impl ShellSession {
    /// Open a session: probe the port, connect, authenticate with a
    /// password.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Unreachable`] when the probe or connect
    /// fails and [`TransportError::AuthenticationFailed`] when the password
    /// is rejected.
    pub async fn open(
        endpoint: Endpoint,
        credentials: &Credentials,
    ) -> Result<Self, TransportError> {
        preflight(&endpoint, DEFAULT_PROBE_TIMEOUT).await?;

        let config = Arc::new(client::Config::default());
        let addr = (endpoint.address.as_str(), endpoint.port);
        let mut handle = client::connect(config, addr, HostKeyAccepter)
            .await
            .map_err(|err| TransportError::Unreachable {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            })?;

        let authenticated = handle
            .authenticate_password(&credentials.username, &credentials.password)
            .await
            .map_err(|err| TransportError::Session(err.to_string()))?;
        if !authenticated {
            return Err(TransportError::AuthenticationFailed {
                endpoint: endpoint.to_string(),
            });
        }

        tracing::debug!(endpoint = %endpoint, "opened shell session");
        Ok(Self {
            handle,
            endpoint,
            open: true,
        })
    }

    /// Close the session. Idempotent; safe to call after a failed command.
    pub async fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Err(err) = self
            .handle
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
        {
            tracing::debug!(error = %err, "disconnect failed during close");
        }
    }
}

#[async_trait]
impl ShellChannel for ShellSession {
    async fn run(
        &mut self,
        command: &str,
        timeout: Duration,
    ) -> Result<CommandOutput, TransportError> {
        if !self.open {
            return Err(TransportError::Session(
                "command on a closed session".to_string(),
            ));
        }

        let work = async {
            let mut channel = self
                .handle
                .channel_open_session()
                .await
                .map_err(|err| TransportError::Transient(err.to_string()))?;
            channel
                .exec(true, command)
                .await
                .map_err(|err| TransportError::Transient(err.to_string()))?;

            let mut stdout = Vec::new();
            let mut stderr = Vec::new();
            let mut exit_status = 0u32;
            while let Some(msg) = channel.wait().await {
                match msg {
                    ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                    ChannelMsg::ExtendedData { ref data, ext: 1 } => {
                        stderr.extend_from_slice(data);
                    }
                    ChannelMsg::ExitStatus { exit_status: code } => exit_status = code,
                    _ => {}
                }
            }

            Ok(CommandOutput {
                exit_status,
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            })
        };

        match tokio::time::timeout(timeout, work).await {
            Ok(result) => result,
            Err(_elapsed) => Err(TransportError::Timeout {
                endpoint: self.endpoint.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_output_success() {
        let ok = CommandOutput {
            exit_status: 0,
            stdout: "STARTED".into(),
            stderr: String::new(),
        };
        assert!(ok.success());

        let failed = CommandOutput {
            exit_status: 3,
            stdout: String::new(),
            stderr: "unknown service".into(),
        };
        assert!(!failed.success());
    }
}

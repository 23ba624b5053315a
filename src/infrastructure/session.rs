//! Serial session layer.
//!
//! [`SerialSession`] holds the single "current device" slot and forwards
//! connect/send/disconnect to the transport, exactly one link at a time.
//! [`spawn_session_worker`] runs a session on its own thread and bridges it
//! to the UI over unbounded channels, the same way the app's event loop
//! talks to its I/O side everywhere else.

use crate::domain::models::{AppEvent, ConnectionStatus, DeviceInfo, SessionCommand, StatusMessage};
use crate::infrastructure::transport::{DeviceLink, InboundSender, SerialTransport};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No device connected")]
    NoActiveConnection,
    /// Opaque transport failure, passed through unchanged.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

pub struct SerialSession {
    transport: Box<dyn SerialTransport>,
    link: Option<Box<dyn DeviceLink>>,
    inbound: InboundSender,
}

impl SerialSession {
    pub fn new(transport: Box<dyn SerialTransport>, inbound: InboundSender) -> Self {
        Self {
            transport,
            link: None,
            inbound,
        }
    }

    pub fn bonded_devices(&self) -> Result<Vec<DeviceInfo>, SessionError> {
        Ok(self.transport.bonded_devices()?)
    }

    /// Connect by device id and make it the current device. On failure the
    /// slot is left untouched; no retry is attempted.
    pub fn connect(&mut self, id: &str) -> Result<DeviceInfo, SessionError> {
        let link = self.transport.connect(id, self.inbound.clone())?;
        let info = link.info().clone();
        info!("Connected to {} ({})", info.name, info.id);
        self.link = Some(link);
        Ok(info)
    }

    /// Forward the literal command string to the current device. The slot
    /// is checked before any I/O is issued; nothing is queued and no
    /// acknowledgement is awaited.
    pub fn send(&self, command: &str) -> Result<(), SessionError> {
        let link = self.link.as_ref().ok_or(SessionError::NoActiveConnection)?;
        link.write(command)?;
        Ok(())
    }

    /// Drop the current device. The slot is cleared even when the
    /// transport-level disconnect fails; that error is still reported.
    pub fn disconnect(&mut self) -> Result<(), SessionError> {
        let Some(link) = self.link.take() else {
            warn!("Disconnect requested with no device connected");
            return Ok(());
        };
        let result = link.disconnect();
        info!("Disconnected from {}", link.info().name);
        result.map_err(SessionError::Transport)
    }

    pub fn current_device(&self) -> Option<&DeviceInfo> {
        self.link.as_ref().map(|l| l.info())
    }
}

/// Run a session on a dedicated worker thread. Returns the command sender
/// and event receiver the UI uses to talk to it; the worker exits when the
/// command sender is dropped.
pub fn spawn_session_worker(
    transport: Box<dyn SerialTransport>,
) -> (
    mpsc::UnboundedSender<SessionCommand>,
    mpsc::UnboundedReceiver<AppEvent>,
) {
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<SessionCommand>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<AppEvent>();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime for serial session");

        rt.block_on(async move {
            let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
            let mut session = SerialSession::new(transport, line_tx);

            loop {
                tokio::select! {
                    cmd = cmd_rx.recv() => {
                        let Some(cmd) = cmd else { break };
                        handle_command(&mut session, cmd, &event_tx);
                    }
                    line = line_rx.recv() => {
                        if let Some(line) = line {
                            let _ = event_tx.send(AppEvent::DataReceived(line));
                        }
                    }
                }
            }

            if session.current_device().is_some() {
                if let Err(e) = session.disconnect() {
                    warn!("Disconnect on shutdown failed: {}", e);
                }
            }
        });
    });

    (cmd_tx, event_rx)
}

fn handle_command(
    session: &mut SerialSession,
    cmd: SessionCommand,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
) {
    match cmd {
        SessionCommand::ListBondedDevices => match session.bonded_devices() {
            Ok(devices) => {
                let _ = event_tx.send(AppEvent::BondedDevices(devices));
            }
            Err(e) => {
                error!("Failed to list bonded devices: {}", e);
                let _ = event_tx.send(AppEvent::LogMessage(StatusMessage::error(format!(
                    "Could not list paired devices: {}",
                    e
                ))));
            }
        },
        SessionCommand::Connect(id) => match session.connect(&id) {
            Ok(info) => {
                let _ = event_tx.send(AppEvent::ConnectionStatus(ConnectionStatus::Connected));
                let _ = event_tx.send(AppEvent::LogMessage(StatusMessage::success(format!(
                    "Connected to {}",
                    info.name
                ))));
            }
            Err(e) => {
                error!("Connection failed: {}", e);
                let _ = event_tx.send(AppEvent::LogMessage(StatusMessage::error(format!(
                    "Connection failed: {}",
                    e
                ))));
                let _ = event_tx.send(AppEvent::ConnectionStatus(ConnectionStatus::Disconnected));
            }
        },
        SessionCommand::Send(wire) => {
            if let Err(e) = session.send(&wire) {
                warn!("Send of {:?} failed: {}", wire, e);
                let _ = event_tx.send(AppEvent::CommandFailed(wire));
            }
        }
        SessionCommand::Disconnect => {
            if let Err(e) = session.disconnect() {
                warn!("Disconnect failed: {}", e);
            }
            let _ = event_tx.send(AppEvent::LogMessage(StatusMessage::info("Disconnected")));
            let _ = event_tx.send(AppEvent::ConnectionStatus(ConnectionStatus::Disconnected));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::sync::{Arc, Mutex};

    /// Transport double recording every write as (device name, text).
    #[derive(Default)]
    struct MockTransport {
        writes: Arc<Mutex<Vec<(String, String)>>>,
        fail_connect: bool,
        fail_write: bool,
        fail_disconnect: bool,
    }

    impl MockTransport {
        fn with_writes(writes: Arc<Mutex<Vec<(String, String)>>>) -> Self {
            Self {
                writes,
                ..Default::default()
            }
        }
    }

    struct MockLink {
        info: DeviceInfo,
        writes: Arc<Mutex<Vec<(String, String)>>>,
        fail_write: bool,
        fail_disconnect: bool,
    }

    impl SerialTransport for MockTransport {
        fn bonded_devices(&self) -> Result<Vec<DeviceInfo>> {
            Ok(vec![DeviceInfo {
                id: "98:D3:31:F5:B2:1C".to_string(),
                name: "CONAN II".to_string(),
            }])
        }

        fn connect(&self, id: &str, _inbound: InboundSender) -> Result<Box<dyn DeviceLink>> {
            if self.fail_connect {
                anyhow::bail!("rfcomm connect refused");
            }
            Ok(Box::new(MockLink {
                info: DeviceInfo {
                    id: id.to_string(),
                    name: "CONAN II".to_string(),
                },
                writes: self.writes.clone(),
                fail_write: self.fail_write,
                fail_disconnect: self.fail_disconnect,
            }))
        }
    }

    impl DeviceLink for MockLink {
        fn info(&self) -> &DeviceInfo {
            &self.info
        }

        fn write(&self, text: &str) -> Result<()> {
            if self.fail_write {
                anyhow::bail!("write failed");
            }
            self.writes
                .lock()
                .unwrap()
                .push((self.info.name.clone(), text.to_string()));
            Ok(())
        }

        fn disconnect(&self) -> Result<()> {
            if self.fail_disconnect {
                anyhow::bail!("disconnect failed");
            }
            Ok(())
        }
    }

    fn session_with(
        transport: MockTransport,
    ) -> (SerialSession, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (SerialSession::new(Box::new(transport), tx), rx)
    }

    #[test]
    fn send_without_connection_fails_and_issues_no_io() {
        let writes = Arc::new(Mutex::new(Vec::new()));
        let (session, _rx) = session_with(MockTransport::with_writes(writes.clone()));

        let err = session.send("H;").unwrap_err();
        assert!(matches!(err, SessionError::NoActiveConnection));
        assert!(writes.lock().unwrap().is_empty());
    }

    #[test]
    fn connect_stores_current_device() {
        let (mut session, _rx) = session_with(MockTransport::default());
        assert!(session.current_device().is_none());

        let info = session.connect("98:D3:31:F5:B2:1C").unwrap();
        assert_eq!(info.name, "CONAN II");
        assert_eq!(
            session.current_device().map(|d| d.id.as_str()),
            Some("98:D3:31:F5:B2:1C")
        );
    }

    #[test]
    fn failed_connect_leaves_slot_unchanged() {
        let (mut session, _rx) = session_with(MockTransport {
            fail_connect: true,
            ..Default::default()
        });
        assert!(session.connect("98:D3:31:F5:B2:1C").is_err());
        assert!(session.current_device().is_none());
    }

    #[test]
    fn send_writes_literal_string_to_connected_device() {
        let writes = Arc::new(Mutex::new(Vec::new()));
        let (mut session, _rx) = session_with(MockTransport::with_writes(writes.clone()));
        session.connect("98:D3:31:F5:B2:1C").unwrap();

        session.send("H;").unwrap();
        assert_eq!(
            writes.lock().unwrap().as_slice(),
            &[("CONAN II".to_string(), "H;".to_string())]
        );
    }

    #[test]
    fn write_failure_propagates() {
        let (mut session, _rx) = session_with(MockTransport {
            fail_write: true,
            ..Default::default()
        });
        session.connect("98:D3:31:F5:B2:1C").unwrap();
        assert!(matches!(
            session.send("M;").unwrap_err(),
            SessionError::Transport(_)
        ));
    }

    #[test]
    fn disconnect_clears_slot_even_when_transport_fails() {
        let (mut session, _rx) = session_with(MockTransport {
            fail_disconnect: true,
            ..Default::default()
        });
        session.connect("98:D3:31:F5:B2:1C").unwrap();

        assert!(session.disconnect().is_err());
        assert!(session.current_device().is_none());
    }

    #[test]
    fn failed_send_surfaces_command_failed_event() {
        let (mut session, _rx) = session_with(MockTransport {
            fail_write: true,
            ..Default::default()
        });
        session.connect("98:D3:31:F5:B2:1C").unwrap();

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        handle_command(&mut session, SessionCommand::Send("H;".to_string()), &event_tx);

        match event_rx.try_recv().unwrap() {
            AppEvent::CommandFailed(wire) => assert_eq!(wire, "H;"),
            other => panic!("Expected CommandFailed, got {:?}", other),
        }
    }

    #[test]
    fn successful_send_emits_no_event() {
        let writes = Arc::new(Mutex::new(Vec::new()));
        let (mut session, _rx) = session_with(MockTransport::with_writes(writes.clone()));
        session.connect("98:D3:31:F5:B2:1C").unwrap();

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        handle_command(&mut session, SessionCommand::Send("M;".to_string()), &event_tx);

        assert!(event_rx.try_recv().is_err());
        assert_eq!(writes.lock().unwrap().len(), 1);
    }

    #[test]
    fn disconnect_without_device_is_a_warned_noop() {
        let (mut session, _rx) = session_with(MockTransport::default());
        assert!(session.disconnect().is_ok());
    }
}

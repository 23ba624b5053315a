use serde::{Deserialize, Serialize};

/// Identity of one bonded peripheral as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Opaque transport identifier (a MAC-style address for RFCOMM devices).
    pub id: String,
    pub name: String,
}

/// Move the most recently used device (if present) to the front of a
/// bonded-device list, so the picker offers it first.
pub fn sort_last_used_first(devices: &mut Vec<DeviceInfo>, last_id: Option<&str>) {
    let Some(last_id) = last_id else { return };
    if let Some(pos) = devices.iter().position(|d| d.id == last_id) {
        let device = devices.remove(pos);
        devices.insert(0, device);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Requests from the UI to the session worker.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    ListBondedDevices,
    Connect(String),
    Send(String),
    Disconnect,
}

/// Events pushed from the session worker back to the UI.
#[derive(Debug, Clone)]
pub enum AppEvent {
    ConnectionStatus(ConnectionStatus),
    BondedDevices(Vec<DeviceInfo>),
    /// One text line received from the vehicle.
    DataReceived(String),
    /// A send that reached the transport but failed; carries the wire string
    /// so the UI can roll back optimistic toggle state.
    CommandFailed(String),
    LogMessage(StatusMessage),
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub severity: MessageSeverity,
}

impl StatusMessage {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: MessageSeverity::Info,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: MessageSeverity::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: MessageSeverity::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSeverity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Drive,
    Console,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: &str, name: &str) -> DeviceInfo {
        DeviceInfo {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn last_used_device_moves_to_front() {
        let mut devices = vec![device("aa", "HC-05"), device("bb", "CONAN II")];
        sort_last_used_first(&mut devices, Some("bb"));
        assert_eq!(devices[0].name, "CONAN II");
        assert_eq!(devices[1].name, "HC-05");
    }

    #[test]
    fn unknown_or_missing_last_id_keeps_order() {
        let mut devices = vec![device("aa", "HC-05"), device("bb", "CONAN II")];
        sort_last_used_first(&mut devices, Some("zz"));
        assert_eq!(devices[0].id, "aa");
        sort_last_used_first(&mut devices, None);
        assert_eq!(devices[0].id, "aa");
    }
}

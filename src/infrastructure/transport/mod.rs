//! Serial Transport Module
//!
//! Abstraction over a Bluetooth Classic RFCOMM serial link: bonded-device
//! enumeration, connect-by-id, per-link text write and disconnect, and a
//! per-link data-received stream. The session layer consumes this as a
//! black box; [`sim`] provides the simulated vehicle used when no hardware
//! is around, and tests substitute their own mock.

pub mod sim;

use crate::domain::models::DeviceInfo;
use anyhow::Result;
use tokio::sync::mpsc;

/// Channel a link pushes received text lines into. The subscription lasts
/// as long as the link holds the sender; dropping the link releases it.
pub type InboundSender = mpsc::UnboundedSender<String>;

/// One established connection to a peripheral.
pub trait DeviceLink: Send {
    fn info(&self) -> &DeviceInfo;

    /// Write the literal UTF-8 string to the device. No terminator is
    /// added here; callers own the protocol framing.
    fn write(&self, text: &str) -> Result<()>;

    fn disconnect(&self) -> Result<()>;
}

/// A source of connectable serial devices.
pub trait SerialTransport: Send {
    /// Devices already paired at the platform level.
    fn bonded_devices(&self) -> Result<Vec<DeviceInfo>>;

    /// Open a connection to the device with the given identifier,
    /// registering `inbound` as its data subscription.
    fn connect(&self, id: &str, inbound: InboundSender) -> Result<Box<dyn DeviceLink>>;
}

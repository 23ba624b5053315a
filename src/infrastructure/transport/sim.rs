//! Simulated vehicle transport.
//!
//! Stands in for the real RFCOMM stack: advertises a small bonded list and
//! answers the car's serial protocol from an in-memory vehicle model, so
//! the whole app can be exercised without hardware. Replies are pushed
//! synchronously through the link's inbound channel.

use super::{DeviceLink, InboundSender, SerialTransport};
use crate::domain::command::Command;
use crate::domain::models::DeviceInfo;
use anyhow::Result;
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Debug, Default)]
struct VehicleState {
    front_lights: bool,
    rear_lights: bool,
    motors_on: bool,
    // Wheel values from the last A command, range ±1000
    left: i32,
    right: i32,
}

impl VehicleState {
    /// Speed estimate in m/s from the last drive command. The real firmware
    /// reads an encoder; here forward throttle maps linearly to 4 m/s.
    fn speed(&self) -> f64 {
        if !self.motors_on {
            return 0.0;
        }
        let avg = (self.left.abs() + self.right.abs()) as f64 / 2.0;
        avg / 1000.0 * 4.0
    }

    fn apply(&mut self, cmd: &Command) {
        match cmd {
            Command::FrontLightsOn => self.front_lights = true,
            Command::FrontLightsOff => self.front_lights = false,
            Command::RearLightsOn => self.rear_lights = true,
            Command::RearLightsOff => self.rear_lights = false,
            Command::MotorsOn => self.motors_on = true,
            Command::MotorsOff => {
                self.motors_on = false;
                self.left = 0;
                self.right = 0;
            }
            Command::Drive { left, right } => {
                self.left = *left;
                self.right = *right;
            }
            Command::SpeedQuery | Command::Raw(_) => {}
        }
    }
}

pub struct SimTransport {
    devices: Vec<DeviceInfo>,
}

impl SimTransport {
    pub fn new() -> Self {
        Self {
            devices: vec![
                DeviceInfo {
                    id: "98:D3:31:F5:B2:1C".to_string(),
                    name: "CONAN II".to_string(),
                },
                DeviceInfo {
                    id: "00:21:13:00:7A:4E".to_string(),
                    name: "HC-05".to_string(),
                },
            ],
        }
    }
}

impl Default for SimTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialTransport for SimTransport {
    fn bonded_devices(&self) -> Result<Vec<DeviceInfo>> {
        Ok(self.devices.clone())
    }

    fn connect(&self, id: &str, inbound: InboundSender) -> Result<Box<dyn DeviceLink>> {
        let info = self
            .devices
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown device: {}", id))?;

        debug!("Simulated connect to {} ({})", info.name, info.id);
        Ok(Box::new(SimLink {
            info,
            state: Arc::new(Mutex::new(VehicleState::default())),
            inbound,
        }))
    }
}

struct SimLink {
    info: DeviceInfo,
    state: Arc<Mutex<VehicleState>>,
    inbound: InboundSender,
}

impl DeviceLink for SimLink {
    fn info(&self) -> &DeviceInfo {
        &self.info
    }

    fn write(&self, text: &str) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| anyhow::anyhow!("Vehicle state lock poisoned"))?;

        match Command::parse(text) {
            Some(Command::SpeedQuery) => {
                let _ = self.inbound.send(format!("{:.2}", state.speed()));
            }
            Some(cmd) => {
                state.apply(&cmd);
                debug!(
                    "Vehicle state: lights {}/{}, motors {}, wheels {},{}",
                    state.front_lights, state.rear_lights, state.motors_on, state.left, state.right
                );
            }
            None => {
                // Local debugging aid only; the real firmware stays silent.
                let _ = self.inbound.send(format!("ERR {}", text.trim()));
            }
        }
        Ok(())
    }

    fn disconnect(&self) -> Result<()> {
        debug!("Simulated disconnect from {}", self.info.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_speed_query_answers_bare_decimal() {
        let transport = SimTransport::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let link = transport.connect("98:D3:31:F5:B2:1C", tx).unwrap();

        link.write("J;").unwrap();
        link.write("A1000,1000;").unwrap();
        link.write("M;").unwrap();

        let reply = rx.try_recv().unwrap();
        assert_eq!(reply.parse::<f64>().unwrap(), 4.0);
    }

    #[test]
    fn test_motors_off_means_zero_speed() {
        let transport = SimTransport::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let link = transport.connect("98:D3:31:F5:B2:1C", tx).unwrap();

        link.write("A1000,1000;").unwrap();
        link.write("M;").unwrap();
        assert_eq!(rx.try_recv().unwrap(), "0.00");
    }

    #[test]
    fn test_unknown_device_is_rejected() {
        let transport = SimTransport::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(transport.connect("AA:BB:CC:DD:EE:FF", tx).is_err());
    }
}

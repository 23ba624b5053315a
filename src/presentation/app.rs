use crate::domain::command::{drive_for_axis, parse_reply, toggle_effect, Command, Reply, Toggle};
use crate::domain::console::ConsoleLog;
use crate::domain::joystick::{Axis, StickTracker};
use crate::domain::models::{
    AppEvent, ConnectionStatus, DeviceInfo, SessionCommand, StatusMessage, Tab,
};
use crate::domain::settings::SettingsService;
use crate::infrastructure::session::spawn_session_worker;
use crate::infrastructure::transport::sim::SimTransport;
use eframe::egui;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub struct RcCarApp {
    // Services
    pub(crate) settings: SettingsService,

    // Session worker channels
    pub(crate) session_tx: mpsc::UnboundedSender<SessionCommand>,
    pub(crate) event_rx: mpsc::UnboundedReceiver<AppEvent>,

    // Connection state
    pub(crate) connection_status: ConnectionStatus,
    pub(crate) status_message: Option<StatusMessage>,
    pub(crate) connected_device: Option<DeviceInfo>,

    // Device picker
    pub(crate) bonded_devices: Vec<DeviceInfo>,
    pub(crate) show_device_list: bool,
    pub(crate) connecting_device: Option<DeviceInfo>,

    // Vehicle state mirrored in the UI
    pub(crate) front_lights_on: bool,
    pub(crate) rear_lights_on: bool,
    pub(crate) motors_on: bool,
    pub(crate) speed: f64,

    // Fixed-interval speed poll, armed while connected
    pub(crate) next_speed_poll: Option<Instant>,

    // Console
    pub(crate) console: ConsoleLog,
    pub(crate) command_input: String,

    // Joysticks
    pub(crate) throttle: StickTracker,
    pub(crate) steering: StickTracker,

    // UI state
    pub(crate) selected_tab: Tab,
    pub(crate) is_dark_mode: bool,

    // Logging guard
    pub(crate) _logging_guard: Option<crate::infrastructure::logging::LoggingGuard>,
}

impl RcCarApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        crate::presentation::theme::configure_neubrutalism(&cc.egui_ctx, false);

        let settings = SettingsService::new().expect("Failed to load settings");

        let logging_guard = crate::infrastructure::logging::init_logger(
            &settings.get().log_settings,
        )
        .map_err(|e| eprintln!("Failed to initialize logging: {}", e))
        .ok();

        tracing::info!("Starting RC Car Remote");

        let (session_tx, event_rx) = spawn_session_worker(Box::new(SimTransport::new()));

        let s = settings.get();
        let track = s.joystick_track_size;
        let knob = s.joystick_knob_size;
        let console_capacity = s.console_capacity;

        Self {
            settings,
            session_tx,
            event_rx,
            connection_status: ConnectionStatus::Disconnected,
            status_message: None,
            connected_device: None,
            bonded_devices: Vec::new(),
            show_device_list: false,
            connecting_device: None,
            front_lights_on: false,
            rear_lights_on: false,
            motors_on: false,
            speed: 0.0,
            next_speed_poll: None,
            console: ConsoleLog::new(console_capacity),
            command_input: String::new(),
            throttle: StickTracker::new(Axis::Vertical, track, knob),
            steering: StickTracker::new(Axis::Horizontal, track, knob),
            selected_tab: Tab::default(),
            is_dark_mode: false,
            _logging_guard: logging_guard,
        }
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.connection_status == ConnectionStatus::Connected
    }

    /// Fire-and-forget dispatch to the session worker. A no-op with a debug
    /// log when nothing is connected, matching the toggle/joystick call
    /// sites' behavior.
    pub(crate) fn send(&self, cmd: &Command) {
        if !self.is_connected() {
            debug!("Ignoring {:?}: no connection", cmd);
            return;
        }
        let _ = self.session_tx.send(SessionCommand::Send(cmd.wire()));
    }

    pub(crate) fn open_device_list(&mut self) {
        let _ = self.session_tx.send(SessionCommand::ListBondedDevices);
    }

    pub(crate) fn connect_to(&mut self, device: DeviceInfo) {
        self.connection_status = ConnectionStatus::Connecting;
        self.connecting_device = Some(device.clone());
        let _ = self.session_tx.send(SessionCommand::Connect(device.id));
    }

    pub(crate) fn disconnect(&mut self) {
        let _ = self.session_tx.send(SessionCommand::Disconnect);
    }

    pub(crate) fn toggle_front_lights(&mut self) {
        if !self.is_connected() {
            return;
        }
        let cmd = if self.front_lights_on {
            Command::FrontLightsOff
        } else {
            Command::FrontLightsOn
        };
        self.send(&cmd);
        self.front_lights_on = !self.front_lights_on;
    }

    pub(crate) fn toggle_rear_lights(&mut self) {
        if !self.is_connected() {
            return;
        }
        let cmd = if self.rear_lights_on {
            Command::RearLightsOff
        } else {
            Command::RearLightsOn
        };
        self.send(&cmd);
        self.rear_lights_on = !self.rear_lights_on;
    }

    pub(crate) fn toggle_motors(&mut self) {
        if !self.is_connected() {
            return;
        }
        let cmd = if self.motors_on {
            Command::MotorsOff
        } else {
            Command::MotorsOn
        };
        self.send(&cmd);
        self.motors_on = !self.motors_on;
    }

    pub(crate) fn handle_joystick_change(&mut self, axis: Axis, value: i32) {
        if !self.is_connected() {
            debug!("Joystick ({:?}) ignored: no connection", axis);
            return;
        }
        let cmd = drive_for_axis(axis, value);
        self.send(&cmd);
    }

    pub(crate) fn send_console_command(&mut self) {
        let input = self.command_input.trim().to_string();
        if input.is_empty() {
            return;
        }
        if !self.is_connected() {
            self.console.received("Not connected".to_string());
            return;
        }
        let cmd = Command::Raw(input.clone());
        self.send(&cmd);
        self.console.sent(input);
        self.command_input.clear();
    }

    fn process_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ConnectionStatus(status) => {
                self.connection_status = status;
                match status {
                    ConnectionStatus::Connected => {
                        if let Some(device) = self.connecting_device.take() {
                            if let Err(e) = self.settings.set_last_device(&device.id) {
                                warn!("Could not persist last device: {}", e);
                            }
                            self.connected_device = Some(device);
                        }
                        self.show_device_list = false;
                        self.next_speed_poll = Some(Instant::now());
                    }
                    ConnectionStatus::Disconnected | ConnectionStatus::Error => {
                        self.connecting_device = None;
                        self.connected_device = None;
                        self.next_speed_poll = None;
                        self.speed = 0.0;
                    }
                    ConnectionStatus::Connecting => {}
                }
            }
            AppEvent::BondedDevices(mut devices) => {
                crate::domain::models::sort_last_used_first(
                    &mut devices,
                    self.settings.get().last_device_id.as_deref(),
                );
                self.bonded_devices = devices;
                self.show_device_list = true;
            }
            AppEvent::DataReceived(line) => {
                match parse_reply(&line) {
                    Reply::Speed(speed) => self.speed = speed,
                    Reply::Text(ref text) => debug!("Other data from the car: {}", text),
                }
                self.console.received(line.trim().to_string());
            }
            AppEvent::CommandFailed(wire) => {
                self.rollback_toggle(&wire);
                self.status_message = Some(StatusMessage {
                    message: format!("Command {} was not delivered", wire),
                    severity: crate::domain::models::MessageSeverity::Warning,
                });
            }
            AppEvent::LogMessage(msg) => {
                self.status_message = Some(msg);
            }
        }
    }

    /// A toggle flips optimistically when its command is sent; when the
    /// worker reports the send failed, put the flag back to the state the
    /// vehicle still has.
    fn rollback_toggle(&mut self, wire: &str) {
        let Some((toggle, asked_for)) = Command::parse(wire).as_ref().and_then(toggle_effect)
        else {
            return;
        };
        let flag = match toggle {
            Toggle::FrontLights => &mut self.front_lights_on,
            Toggle::RearLights => &mut self.rear_lights_on,
            Toggle::Motors => &mut self.motors_on,
        };
        *flag = !asked_for;
    }

    fn tick_speed_poll(&mut self) {
        if !self.is_connected() {
            return;
        }
        let Some(due) = self.next_speed_poll else {
            return;
        };
        if Instant::now() >= due {
            self.send(&Command::SpeedQuery);
            let interval = Duration::from_millis(self.settings.get().speed_poll_interval_ms);
            self.next_speed_poll = Some(Instant::now() + interval);
        }
    }
}

impl eframe::App for RcCarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.process_event(event);
        }

        self.tick_speed_poll();

        // Keep polling timers and inbound data moving even without input
        ctx.request_repaint_after(Duration::from_millis(100));

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.selectable_value(&mut self.selected_tab, Tab::Drive, "Drive");
                ui.selectable_value(&mut self.selected_tab, Tab::Console, "Console");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let switch_icon = if self.is_dark_mode {
                        "☀ Light"
                    } else {
                        "🌙 Dark"
                    };
                    if ui.button(switch_icon).clicked() {
                        self.is_dark_mode = !self.is_dark_mode;
                        crate::presentation::theme::configure_neubrutalism(ctx, self.is_dark_mode);
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.set_max_width(800.0);
                    ui.add_space(16.0);

                    use crate::presentation::tabs;
                    match self.selected_tab {
                        Tab::Drive => tabs::drive::render(self, ui),
                        Tab::Console => tabs::console::render(self, ui),
                    }

                    ui.add_space(40.0);
                });
            });
        });

        crate::presentation::tabs::drive::render_device_list(self, ctx);
    }
}

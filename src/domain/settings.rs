use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_level")]
    pub level: String, // "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_true")]
    pub console_logging_enabled: bool,
    #[serde(default = "default_false")]
    pub file_logging_enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_prefix")]
    pub file_name_prefix: String,
    #[serde(default = "default_rotation")]
    pub rotation: String, // "daily", "hourly", "minutely", "never"
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            console_logging_enabled: default_true(),
            file_logging_enabled: default_false(),
            log_dir: default_log_dir(),
            file_name_prefix: default_prefix(),
            rotation: default_rotation(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_log_dir() -> String {
    "logs".to_string()
}
fn default_prefix() -> String {
    "rc_car_remote".to_string()
}
fn default_rotation() -> String {
    "daily".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Device picked on the last successful connect.
    #[serde(default)]
    pub last_device_id: Option<String>,

    /// How often the Drive screen polls the vehicle speed with `M;`.
    #[serde(default = "default_speed_poll_interval_ms")]
    pub speed_poll_interval_ms: u64,

    /// Console scrollback cap, in lines.
    #[serde(default = "default_console_capacity")]
    pub console_capacity: usize,

    // Joystick geometry, in logical pixels
    #[serde(default = "default_joystick_track_size")]
    pub joystick_track_size: f32,
    #[serde(default = "default_joystick_knob_size")]
    pub joystick_knob_size: f32,

    #[serde(default)]
    pub log_settings: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            last_device_id: None,
            speed_poll_interval_ms: default_speed_poll_interval_ms(),
            console_capacity: default_console_capacity(),
            joystick_track_size: default_joystick_track_size(),
            joystick_knob_size: default_joystick_knob_size(),
            log_settings: LogSettings::default(),
        }
    }
}

fn default_speed_poll_interval_ms() -> u64 {
    1000
}
fn default_console_capacity() -> usize {
    200
}
fn default_joystick_track_size() -> f32 {
    150.0
}
fn default_joystick_knob_size() -> f32 {
    50.0
}

pub struct SettingsService {
    settings: Settings,
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new() -> anyhow::Result<Self> {
        let settings_path = Self::get_settings_path()?;
        let settings = Self::load_from_file(&settings_path).unwrap_or_default();

        Ok(Self {
            settings,
            settings_path,
        })
    }

    fn get_settings_path() -> anyhow::Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        path.push("RcCarRemote");
        fs::create_dir_all(&path)?;
        path.push("settings.json");
        Ok(path)
    }

    fn load_from_file(path: &PathBuf) -> anyhow::Result<Settings> {
        let contents = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.settings_path, json)?;
        Ok(())
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn set_last_device(&mut self, id: &str) -> anyhow::Result<()> {
        if self.settings.last_device_id.as_deref() != Some(id) {
            self.settings.last_device_id = Some(id.to_string());
            self.save()?;
        }
        Ok(())
    }
}

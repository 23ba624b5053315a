//! Vehicle command protocol.
//!
//! The car speaks single-letter ASCII commands terminated by `;`, plus the
//! differential drive form `A<left>,<right>;` with both wheel values in
//! [-1000, 1000]. The speed query `M;` is answered with a bare decimal
//! string. This is a fixed external contract; nothing beyond what the
//! firmware is known to accept is encoded here.

use crate::domain::joystick::Axis;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FrontLightsOn,
    FrontLightsOff,
    RearLightsOn,
    RearLightsOff,
    MotorsOn,
    MotorsOff,
    SpeedQuery,
    Drive { left: i32, right: i32 },
    /// Console input, sent as typed (trimmed) with the terminator appended.
    Raw(String),
}

impl Command {
    /// Wire form including the trailing terminator.
    pub fn wire(&self) -> String {
        match self {
            Command::FrontLightsOn => "H;".to_string(),
            Command::FrontLightsOff => "I;".to_string(),
            Command::RearLightsOn => "N;".to_string(),
            Command::RearLightsOff => "O;".to_string(),
            Command::MotorsOn => "J;".to_string(),
            Command::MotorsOff => "K;".to_string(),
            Command::SpeedQuery => "M;".to_string(),
            Command::Drive { left, right } => format!("A{},{};", left, right),
            Command::Raw(text) => format!("{};", text.trim()),
        }
    }

    /// Recover a command from its wire form. Used to interpret a failed
    /// send when rolling back toggle state; raw console strings come back
    /// as whatever structured command they happen to spell.
    pub fn parse(wire: &str) -> Option<Command> {
        let body = wire.trim().strip_suffix(';')?;
        match body {
            "H" => Some(Command::FrontLightsOn),
            "I" => Some(Command::FrontLightsOff),
            "N" => Some(Command::RearLightsOn),
            "O" => Some(Command::RearLightsOff),
            "J" => Some(Command::MotorsOn),
            "K" => Some(Command::MotorsOff),
            "M" => Some(Command::SpeedQuery),
            _ => {
                let args = body.strip_prefix('A')?;
                let (left, right) = args.split_once(',')?;
                Some(Command::Drive {
                    left: left.trim().parse().ok()?,
                    right: right.trim().parse().ok()?,
                })
            }
        }
    }
}

/// Map one joystick value onto the differential drive command: the throttle
/// stick moves both wheels together, the steering stick moves them against
/// each other.
pub fn drive_for_axis(axis: Axis, value: i32) -> Command {
    match axis {
        Axis::Vertical => Command::Drive {
            left: value,
            right: value,
        },
        Axis::Horizontal => Command::Drive {
            left: value,
            right: -value,
        },
    }
}

/// UI toggles the single-letter commands control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    FrontLights,
    RearLights,
    Motors,
}

/// Which toggle a command drives and the state it asks the vehicle for.
/// When a send fails, the UI flag goes back to the opposite of this state.
pub fn toggle_effect(cmd: &Command) -> Option<(Toggle, bool)> {
    match cmd {
        Command::FrontLightsOn => Some((Toggle::FrontLights, true)),
        Command::FrontLightsOff => Some((Toggle::FrontLights, false)),
        Command::RearLightsOn => Some((Toggle::RearLights, true)),
        Command::RearLightsOff => Some((Toggle::RearLights, false)),
        Command::MotorsOn => Some((Toggle::Motors, true)),
        Command::MotorsOff => Some((Toggle::Motors, false)),
        Command::SpeedQuery | Command::Drive { .. } | Command::Raw(_) => None,
    }
}

/// What an inbound line from the vehicle means.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Answer to `M;` — a bare floating-point speed value.
    Speed(f64),
    Text(String),
}

pub fn parse_reply(line: &str) -> Reply {
    let trimmed = line.trim();
    match trimmed.parse::<f64>() {
        Ok(speed) => Reply::Speed(speed),
        Err(_) => Reply::Text(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_strings() {
        assert_eq!(Command::FrontLightsOn.wire(), "H;");
        assert_eq!(Command::FrontLightsOff.wire(), "I;");
        assert_eq!(Command::RearLightsOn.wire(), "N;");
        assert_eq!(Command::RearLightsOff.wire(), "O;");
        assert_eq!(Command::MotorsOn.wire(), "J;");
        assert_eq!(Command::MotorsOff.wire(), "K;");
        assert_eq!(Command::SpeedQuery.wire(), "M;");
        assert_eq!(Command::Drive { left: 1000, right: -1000 }.wire(), "A1000,-1000;");
    }

    #[test]
    fn test_raw_is_trimmed_and_terminated() {
        assert_eq!(Command::Raw("  H ".to_string()).wire(), "H;");
    }

    #[test]
    fn test_parse_round_trips() {
        for cmd in [
            Command::FrontLightsOn,
            Command::MotorsOff,
            Command::SpeedQuery,
            Command::Drive { left: -500, right: 500 },
        ] {
            assert_eq!(Command::parse(&cmd.wire()), Some(cmd));
        }
        assert_eq!(Command::parse("Z;"), None);
        assert_eq!(Command::parse("A12"), None);
        assert_eq!(Command::parse("Afoo,bar;"), None);
    }

    #[test]
    fn test_throttle_drives_both_wheels_together() {
        assert_eq!(
            drive_for_axis(Axis::Vertical, 1000),
            Command::Drive { left: 1000, right: 1000 }
        );
    }

    #[test]
    fn test_steering_inverts_wheels() {
        assert_eq!(
            drive_for_axis(Axis::Horizontal, -500),
            Command::Drive { left: -500, right: 500 }
        );
    }

    #[test]
    fn test_failed_front_lights_on_rolls_back_to_off() {
        // "H;" asked for lights on; a failed send means they are still off.
        let cmd = Command::parse("H;").unwrap();
        assert_eq!(toggle_effect(&cmd), Some((Toggle::FrontLights, true)));
    }

    #[test]
    fn test_toggle_effect_covers_only_toggles() {
        assert_eq!(
            toggle_effect(&Command::MotorsOff),
            Some((Toggle::Motors, false))
        );
        assert_eq!(
            toggle_effect(&Command::RearLightsOn),
            Some((Toggle::RearLights, true))
        );
        assert_eq!(toggle_effect(&Command::SpeedQuery), None);
        assert_eq!(toggle_effect(&Command::Drive { left: 10, right: 10 }), None);
    }

    #[test]
    fn test_reply_classification() {
        assert_eq!(parse_reply("3.70\r\n"), Reply::Speed(3.7));
        assert_eq!(parse_reply("0"), Reply::Speed(0.0));
        assert_eq!(parse_reply("OK"), Reply::Text("OK".to_string()));
    }
}

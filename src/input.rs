//! Keyboard commands.

use crate::config::KeyBindings;

/// Semantic command produced by one key poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Leave the main loop
    Exit,
    /// Save the last frame
    Screenshot,
    /// Freeze or resume capture
    TogglePause,
    /// Start or stop recording
    ToggleRecord,
    /// No key, or an unbound one
    None,
}

/// Map a raw key code, as returned by `highgui::wait_key`, to a command.
///
/// Only the low byte of the code is compared; negative codes mean no key.
#[must_use]
pub fn resolve(raw_key: i32, bindings: &KeyBindings) -> Command {
    if raw_key < 0 {
        return Command::None;
    }

    let key = char::from((raw_key & 0xFF) as u8);
    if key == bindings.exit {
        Command::Exit
    } else if key == bindings.screenshot {
        Command::Screenshot
    } else if key == bindings.pause {
        Command::TogglePause
    } else if key == bindings.record {
        Command::ToggleRecord
    } else {
        Command::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::default();
        assert_eq!(resolve(i32::from(b'q'), &bindings), Command::Exit);
        assert_eq!(resolve(i32::from(b's'), &bindings), Command::Screenshot);
        assert_eq!(resolve(i32::from(b'p'), &bindings), Command::TogglePause);
        assert_eq!(resolve(i32::from(b'r'), &bindings), Command::ToggleRecord);
        assert_eq!(resolve(i32::from(b'x'), &bindings), Command::None);
    }

    #[test]
    fn test_no_key() {
        assert_eq!(resolve(-1, &KeyBindings::default()), Command::None);
    }

    #[test]
    fn test_exact_match_only() {
        let bindings = KeyBindings::default();
        assert_eq!(resolve(i32::from(b'Q'), &bindings), Command::None);
    }

    #[test]
    fn test_high_bits_are_masked() {
        let bindings = KeyBindings::default();
        assert_eq!(resolve(0x0010_0000 | i32::from(b'p'), &bindings), Command::TogglePause);
    }

    #[test]
    fn test_custom_bindings() {
        let bindings = KeyBindings {
            exit: 'x',
            screenshot: 'c',
            pause: 'z',
            record: 'v',
        };
        assert_eq!(resolve(i32::from(b'x'), &bindings), Command::Exit);
        assert_eq!(resolve(i32::from(b'q'), &bindings), Command::None);
    }
}

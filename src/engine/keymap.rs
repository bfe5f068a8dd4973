//! Character-to-scancode table for plain (non-escaped) input bytes.
//!
//! US layout over the HID Keyboard/Keypad usage page. The table is total:
//! bytes with no mapping decode to [`KeyPress::NONE`], which leaves the
//! report inactive.

use crate::engine::report::Modifier;

/// HID usage IDs for the keys reachable through escape tokens.
pub mod keycodes {
    pub const KEY_ESC: u8 = 0x29;
    pub const KEY_BACKSPACE: u8 = 0x2A;
    pub const KEY_TAB: u8 = 0x2B;
    pub const KEY_F1: u8 = 0x3A;
    pub const KEY_F2: u8 = 0x3B;
    pub const KEY_F3: u8 = 0x3C;
    pub const KEY_F4: u8 = 0x3D;
    pub const KEY_F5: u8 = 0x3E;
    pub const KEY_F6: u8 = 0x3F;
    pub const KEY_F7: u8 = 0x40;
    pub const KEY_F8: u8 = 0x41;
    pub const KEY_F9: u8 = 0x42;
    pub const KEY_F10: u8 = 0x43;
    pub const KEY_F11: u8 = 0x44;
    pub const KEY_F12: u8 = 0x45;
    pub const KEY_INSERT: u8 = 0x49;
    pub const KEY_HOME: u8 = 0x4A;
    pub const KEY_PAGEUP: u8 = 0x4B;
    pub const KEY_DELETE: u8 = 0x4C;
    pub const KEY_END: u8 = 0x4D;
    pub const KEY_PAGEDOWN: u8 = 0x4E;
    pub const KEY_RIGHT: u8 = 0x4F;
    pub const KEY_LEFT: u8 = 0x50;
    pub const KEY_DOWN: u8 = 0x51;
    pub const KEY_UP: u8 = 0x52;
    /// Keypad Enter; `\cr` presses this rather than the main Return key.
    pub const KEY_KPENTER: u8 = 0x58;
}

/// The (modifier, keycode) pair a single input byte decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub modifier: Modifier,
    pub key: u8,
}

impl KeyPress {
    /// "No key": what unmapped bytes decode to.
    pub const NONE: KeyPress = KeyPress {
        modifier: Modifier::NONE,
        key: 0,
    };
}

macro_rules! def_char_map {
    ($($keycode:literal => $char:literal $( $char_shift:literal )?;)*) => {
        /// Look up the scancode for a raw input byte.
        pub fn lookup(byte: u8) -> KeyPress {
            match byte {
            $(
                $char => KeyPress { modifier: Modifier::NONE, key: $keycode },
                $(
                    $char_shift => KeyPress { modifier: Modifier::LSHIFT, key: $keycode },
                )?
            )*
            _ => KeyPress::NONE,
            }
        }
    };
}

def_char_map!(
0x04 => b'a' b'A';
0x05 => b'b' b'B';
0x06 => b'c' b'C';
0x07 => b'd' b'D';
0x08 => b'e' b'E';
0x09 => b'f' b'F';
0x0A => b'g' b'G';
0x0B => b'h' b'H';
0x0C => b'i' b'I';
0x0D => b'j' b'J';
0x0E => b'k' b'K';
0x0F => b'l' b'L';
0x10 => b'm' b'M';
0x11 => b'n' b'N';
0x12 => b'o' b'O';
0x13 => b'p' b'P';
0x14 => b'q' b'Q';
0x15 => b'r' b'R';
0x16 => b's' b'S';
0x17 => b't' b'T';
0x18 => b'u' b'U';
0x19 => b'v' b'V';
0x1A => b'w' b'W';
0x1B => b'x' b'X';
0x1C => b'y' b'Y';
0x1D => b'z' b'Z';

0x1E => b'1' b'!';
0x1F => b'2' b'@';
0x20 => b'3' b'#';
0x21 => b'4' b'$';
0x22 => b'5' b'%';
0x23 => b'6' b'^';
0x24 => b'7' b'&';
0x25 => b'8' b'*';
0x26 => b'9' b'(';
0x27 => b'0' b')';

0x28 => b'\n';
0x2B => b'\t';
0x2C => b' ';

0x2D => b'-' b'_';
0x2E => b'=' b'+';
0x2F => b'[' b'{';
0x30 => b']' b'}';
0x31 => b'\\' b'|';
0x33 => b';' b':';
0x34 => b'\'' b'"';
0x35 => b'`' b'~';
0x36 => b',' b'<';
0x37 => b'.' b'>';
0x38 => b'/' b'?';
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters() {
        assert_eq!(
            lookup(b'a'),
            KeyPress {
                modifier: Modifier::NONE,
                key: 0x04
            }
        );
        assert_eq!(
            lookup(b'z'),
            KeyPress {
                modifier: Modifier::NONE,
                key: 0x1D
            }
        );
        assert_eq!(
            lookup(b'A'),
            KeyPress {
                modifier: Modifier::LSHIFT,
                key: 0x04
            }
        );
        assert_eq!(
            lookup(b'Z'),
            KeyPress {
                modifier: Modifier::LSHIFT,
                key: 0x1D
            }
        );
    }

    #[test]
    fn test_digits() {
        assert_eq!(lookup(b'1').key, 0x1E);
        assert_eq!(lookup(b'9').key, 0x26);
        assert_eq!(lookup(b'0').key, 0x27);
        assert!(lookup(b'0').modifier.is_empty());

        // Shifted digit row
        assert_eq!(
            lookup(b'!'),
            KeyPress {
                modifier: Modifier::LSHIFT,
                key: 0x1E
            }
        );
        assert_eq!(
            lookup(b')'),
            KeyPress {
                modifier: Modifier::LSHIFT,
                key: 0x27
            }
        );
    }

    #[test]
    fn test_whitespace() {
        assert_eq!(lookup(b'\n').key, 0x28);
        assert_eq!(lookup(b'\t').key, 0x2B);
        assert_eq!(lookup(b' ').key, 0x2C);
    }

    #[test]
    fn test_backslash_and_punctuation() {
        assert_eq!(lookup(b'\\').key, 0x31);
        assert!(lookup(b'\\').modifier.is_empty());
        assert_eq!(
            lookup(b'|'),
            KeyPress {
                modifier: Modifier::LSHIFT,
                key: 0x31
            }
        );
        assert_eq!(
            lookup(b'?'),
            KeyPress {
                modifier: Modifier::LSHIFT,
                key: 0x38
            }
        );
    }

    #[test]
    fn test_total_over_all_bytes() {
        // Every byte value decodes to something; unmapped bytes are NONE.
        for byte in 0..=255u8 {
            let entry = lookup(byte);
            if entry == KeyPress::NONE {
                continue;
            }
            assert_ne!(entry.key, 0, "mapped byte {byte:02X} has no keycode");
        }
        assert_eq!(lookup(0x00), KeyPress::NONE);
        assert_eq!(lookup(0x80), KeyPress::NONE);
        assert_eq!(lookup(0xFF), KeyPress::NONE);
    }
}

use std::fmt;
use std::ops::BitOr;

use bytemuck::{Pod, Zeroable};

/// Modifier bits of a boot-protocol keyboard report.
///
/// The modifier byte is a bitmask over HID usages 224-231:
/// - Bit 0 (0x01): Left Ctrl
/// - Bit 1 (0x02): Left Shift
/// - Bit 2 (0x04): Left Alt
/// - Bit 3 (0x08): Left Meta/GUI
///
/// Bits 4-7 are the right-hand variants; this keyboard only ever presses the
/// left-hand keys, but any bitmask combination is representable.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Modifier(u8);

impl Modifier {
    pub const NONE: Modifier = Modifier(0);
    pub const LCTRL: Modifier = Modifier(0x01);
    pub const LSHIFT: Modifier = Modifier(0x02);
    pub const LALT: Modifier = Modifier(0x04);
    pub const LMETA: Modifier = Modifier(0x08);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifier {
    type Output = Modifier;

    fn bitor(self, rhs: Modifier) -> Modifier {
        Modifier(self.0 | rhs.0)
    }
}

impl fmt::Debug for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modifier({:02X}=", self.0)?;
        let mut first = true;
        for modifier in [
            ("Ctrl", self.0 & 0x01 != 0),
            ("Shift", self.0 & 0x02 != 0),
            ("Alt", self.0 & 0x04 != 0),
            ("Meta", self.0 & 0x08 != 0),
        ] {
            if modifier.1 {
                if first {
                    first = false;
                } else {
                    write!(f, "+")?;
                }
                write!(f, "{}", modifier.0)?;
            }
        }
        write!(f, ")")?;
        Ok(())
    }
}

/// One 8-byte boot-protocol keyboard input report.
///
/// Byte 0 holds the modifier bits, byte 1 is reserved, byte 2 is the single
/// active keycode. Bytes 3-7 are the remaining keycode slots of the boot
/// report; this keyboard presses at most one non-modifier key at a time, so
/// they stay zero.
#[derive(Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Report {
    modifier: u8,
    reserved: u8,
    key: u8,
    tail: [u8; 5],
}

impl Report {
    pub const SIZE: usize = 8;

    /// The all-keys-up report.
    pub fn idle() -> Self {
        Zeroable::zeroed()
    }

    /// OR another modifier into byte 0.
    pub fn add_modifier(&mut self, modifier: Modifier) {
        self.modifier |= modifier.bits();
    }

    /// Overwrite the keycode slot. The last key written within one decode
    /// cycle wins.
    pub fn set_key(&mut self, key: u8) {
        self.key = key;
    }

    pub fn modifier(&self) -> Modifier {
        Modifier(self.modifier)
    }

    pub fn key(&self) -> u8 {
        self.key
    }

    pub fn is_idle(&self) -> bool {
        self.modifier == 0 && self.key == 0
    }

    /// Wire form of the report, as handed to the transport layer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl fmt::Debug for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Report(modifier={:?}, key={:02X})",
            self.modifier(),
            self.key
        )
    }
}

/// HID report descriptor for the boot-protocol keyboard this engine feeds.
///
/// The transport layer serves this to the host; [`Report`]'s byte layout
/// must match it exactly: 8 modifier bits over usages 224-231, one reserved
/// byte, 5 LED output bits, then keycode bytes over the 0-255 usage range.
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, /* Usage Page (Generic Desktop) */
    0x09, 0x06, /* Usage (Keyboard) */
    0xa1, 0x01, /* Collection (Application) */
    0x75, 0x01, /*   Report Size (1) */
    0x95, 0x08, /*   Report Count (8) */
    0x05, 0x07, /*   Usage Page (Key Codes) */
    0x19, 0xe0, /*   Usage Minimum (224) */
    0x29, 0xe7, /*   Usage Maximum (231) */
    0x15, 0x00, /*   Logical Minimum (0) */
    0x25, 0x01, /*   Logical Maximum (1) */
    0x81, 0x02, /*   Input (Data, Variable, Absolute) */
    0x95, 0x01, /*   Report Count (1) */
    0x75, 0x08, /*   Report Size (8) */
    0x81, 0x01, /*   Input (Constant) */
    0x95, 0x05, /*   Report Count (5) */
    0x75, 0x01, /*   Report Size (1) */
    0x05, 0x08, /*   Usage Page (LEDs) */
    0x19, 0x01, /*   Usage Minimum (1) */
    0x29, 0x05, /*   Usage Maximum (5) */
    0x91, 0x02, /*   Output (Data, Variable, Absolute) */
    0x95, 0x01, /*   Report Count (1) */
    0x75, 0x03, /*   Report Size (3) */
    0x91, 0x01, /*   Output (Constant) */
    0x95, 0x06, /*   Report Count (6) */
    0x75, 0x08, /*   Report Size (8) */
    0x15, 0x00, /*   Logical Minimum (0) */
    0x25, 0xff, /*   Logical Maximum (255) */
    0x05, 0x07, /*   Usage Page (Key Codes) */
    0x19, 0x00, /*   Usage Minimum (0) */
    0x29, 0xff, /*   Usage Maximum (255) */
    0x81, 0x00, /*   Input (Data, Array) */
    0xc0, /* End Collection */
];

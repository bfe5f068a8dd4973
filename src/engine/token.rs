//! Escape-token lexer and resolver.
//!
//! Control directives arrive inline in the text stream as a `\` marker
//! followed by 1-3 classifying bytes (`\c`, `\esc`, `\f1`, ...). Tokens that
//! share a first letter are disambiguated by peeking: the peeked byte is only
//! consumed when it extends a longer token, otherwise it belongs to the
//! following input and is left in the reader. Unrecognized sequences lex to
//! [`ControlToken::Unknown`], which resolves to a no-op.

use crate::engine::keymap::keycodes::*;
use crate::engine::reader::{ByteSource, SourceReader};
use crate::engine::report::Modifier;

/// Introduces a control token.
pub const ESCAPE_MARKER: u8 = b'\\';
/// Chains another token into the same report.
pub const COMBO_MARKER: u8 = b'+';

/// Control tokens recognized after the escape marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlToken {
    /// `\\`: a literal backslash, decoded through the character table.
    Backslash,
    /// `\c`
    Ctrl,
    /// `\a`
    Alt,
    /// `\s`
    Shift,
    /// `\m`
    Meta,
    /// `\t`
    Tab,
    /// `\esc`
    Esc,
    /// `\u`
    Up,
    /// `\d`
    Down,
    /// `\l`
    Left,
    /// `\r`
    Right,
    /// `\i`
    Insert,
    /// `\h`
    Home,
    /// `\pu`
    PageUp,
    /// `\del`
    Delete,
    /// `\end`
    End,
    /// `\pd`
    PageDown,
    /// `\bs`
    Backspace,
    /// `\cr`
    Enter,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    /// Anything else; carries the last byte read so it can be traced.
    Unknown(u8),
}

/// What a resolved token contributes to the in-progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// OR a modifier into the report.
    Modifier(Modifier),
    /// Write a keycode into the report's key slot.
    Key(u8),
    /// Fall through to standard decoding of the literal `\` character.
    Literal,
    /// Leave the report unchanged.
    NoOp,
}

impl ControlToken {
    pub fn resolution(&self) -> Resolution {
        match self {
            ControlToken::Backslash => Resolution::Literal,
            ControlToken::Ctrl => Resolution::Modifier(Modifier::LCTRL),
            ControlToken::Alt => Resolution::Modifier(Modifier::LALT),
            ControlToken::Shift => Resolution::Modifier(Modifier::LSHIFT),
            ControlToken::Meta => Resolution::Modifier(Modifier::LMETA),
            ControlToken::Tab => Resolution::Key(KEY_TAB),
            ControlToken::Esc => Resolution::Key(KEY_ESC),
            ControlToken::Up => Resolution::Key(KEY_UP),
            ControlToken::Down => Resolution::Key(KEY_DOWN),
            ControlToken::Left => Resolution::Key(KEY_LEFT),
            ControlToken::Right => Resolution::Key(KEY_RIGHT),
            ControlToken::Insert => Resolution::Key(KEY_INSERT),
            ControlToken::Home => Resolution::Key(KEY_HOME),
            ControlToken::PageUp => Resolution::Key(KEY_PAGEUP),
            ControlToken::Delete => Resolution::Key(KEY_DELETE),
            ControlToken::End => Resolution::Key(KEY_END),
            ControlToken::PageDown => Resolution::Key(KEY_PAGEDOWN),
            ControlToken::Backspace => Resolution::Key(KEY_BACKSPACE),
            ControlToken::Enter => Resolution::Key(KEY_KPENTER),
            ControlToken::F1 => Resolution::Key(KEY_F1),
            ControlToken::F2 => Resolution::Key(KEY_F2),
            ControlToken::F3 => Resolution::Key(KEY_F3),
            ControlToken::F4 => Resolution::Key(KEY_F4),
            ControlToken::F5 => Resolution::Key(KEY_F5),
            ControlToken::F6 => Resolution::Key(KEY_F6),
            ControlToken::F7 => Resolution::Key(KEY_F7),
            ControlToken::F8 => Resolution::Key(KEY_F8),
            ControlToken::F9 => Resolution::Key(KEY_F9),
            ControlToken::F10 => Resolution::Key(KEY_F10),
            ControlToken::F11 => Resolution::Key(KEY_F11),
            ControlToken::F12 => Resolution::Key(KEY_F12),
            ControlToken::Unknown(_) => Resolution::NoOp,
        }
    }
}

/// Lex one control token. The reader's cursor sits just past the escape
/// marker; on return it sits past the last byte that belongs to the token.
///
/// Returns `None` when the source is exhausted before a classifying byte
/// arrives; the escape marker itself then decodes to nothing this cycle.
pub fn lex<S: ByteSource>(reader: &mut SourceReader<S>) -> Option<ControlToken> {
    let first = reader.next()?;
    Some(match first {
        b'\\' => ControlToken::Backslash,
        b'a' => ControlToken::Alt,
        b's' => ControlToken::Shift,
        b'm' => ControlToken::Meta,
        b't' => ControlToken::Tab,
        b'u' => ControlToken::Up,
        b'l' => ControlToken::Left,
        b'r' => ControlToken::Right,
        b'i' => ControlToken::Insert,
        b'h' => ControlToken::Home,

        // `\c` is Ctrl unless extended to `\cr` (Enter). The peeked byte is
        // ordinary input when it doesn't extend the token.
        b'c' => match reader.peek() {
            Some(b'r') => {
                reader.consume();
                ControlToken::Enter
            }
            _ => ControlToken::Ctrl,
        },

        // `\d` is Down unless extended to `\del` (Delete).
        b'd' => match reader.peek() {
            Some(b'e') => {
                reader.consume();
                match reader.next() {
                    Some(b'l') => ControlToken::Delete,
                    Some(other) => ControlToken::Unknown(other),
                    None => ControlToken::Unknown(b'e'),
                }
            }
            _ => ControlToken::Down,
        },

        // `\e` on its own is not a token; it only starts `\esc` or `\end`.
        b'e' => match reader.peek() {
            Some(b's') => {
                reader.consume();
                match reader.next() {
                    Some(b'c') => ControlToken::Esc,
                    Some(other) => ControlToken::Unknown(other),
                    None => ControlToken::Unknown(b's'),
                }
            }
            Some(b'n') => {
                reader.consume();
                match reader.next() {
                    Some(b'd') => ControlToken::End,
                    Some(other) => ControlToken::Unknown(other),
                    None => ControlToken::Unknown(b'n'),
                }
            }
            _ => ControlToken::Unknown(b'e'),
        },

        // Fixed two-byte tokens: the second byte always belongs to the
        // escape, recognized or not.
        b'p' => match reader.next() {
            Some(b'u') => ControlToken::PageUp,
            Some(b'd') => ControlToken::PageDown,
            Some(other) => ControlToken::Unknown(other),
            None => ControlToken::Unknown(b'p'),
        },
        b'b' => match reader.next() {
            Some(b's') => ControlToken::Backspace,
            Some(other) => ControlToken::Unknown(other),
            None => ControlToken::Unknown(b'b'),
        },
        b'f' => match reader.next() {
            Some(b'1') => ControlToken::F1,
            Some(b'2') => ControlToken::F2,
            Some(b'3') => ControlToken::F3,
            Some(b'4') => ControlToken::F4,
            Some(b'5') => ControlToken::F5,
            Some(b'6') => ControlToken::F6,
            Some(b'7') => ControlToken::F7,
            Some(b'8') => ControlToken::F8,
            Some(b'9') => ControlToken::F9,
            Some(b'a') => ControlToken::F10,
            Some(b'b') => ControlToken::F11,
            Some(b'c') => ControlToken::F12,
            Some(other) => ControlToken::Unknown(other),
            None => ControlToken::Unknown(b'f'),
        },

        other => ControlToken::Unknown(other),
    })
}

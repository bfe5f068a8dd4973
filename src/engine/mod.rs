//! Scancode decode engine.
//!
//! Turns a stream of text and `\`-prefixed control tokens into 8-byte
//! boot-protocol keyboard reports. The engine is poll-driven and never
//! blocks: each [`Engine::poll`] either redelivers the previous report (the
//! pacing gate is closed, or the source has nothing new) or runs one decode
//! cycle against the buffered source reader.

pub mod keymap;
pub mod pacer;
pub mod reader;
pub mod report;
pub mod token;

use std::time::{Duration, Instant};

use tracing::{debug, trace};

pub use pacer::{DEFAULT_INTERVAL_US, Pacer};
pub use reader::{ByteSource, SourceReader};
pub use report::{Modifier, Report};
pub use token::ControlToken;

use token::{COMBO_MARKER, ESCAPE_MARKER, Resolution};

/// Working buffer size for the source reader.
const BUFFER_CAPACITY: usize = 80;

/// Upper bound on `+`-chained tokens in one report. Chains longer than this
/// emit the combo built so far and leave the rest for later cycles.
const MAX_COMBO_TOKENS: usize = 8;

/// Decode state for one virtual keyboard instance.
pub struct Engine<S> {
    reader: SourceReader<S>,
    pacer: Pacer,
    last: Report,
}

impl<S: ByteSource> Engine<S> {
    pub fn new(source: S, interval: Duration) -> Self {
        Self {
            reader: SourceReader::new(source, BUFFER_CAPACITY),
            pacer: Pacer::new(interval),
            last: Report::idle(),
        }
    }

    /// Produce the report for this poll cycle.
    pub fn poll(&mut self) -> Report {
        self.poll_at(Instant::now())
    }

    /// [`poll`](Self::poll) with an explicit clock, for deterministic tests.
    pub fn poll_at(&mut self, now: Instant) -> Report {
        if !self.pacer.ready(now) {
            return self.last;
        }
        self.pacer.mark(now);
        let report = self.decode_event().unwrap_or_else(Report::idle);
        if report != self.last {
            debug!("new report {report:?}");
        }
        self.last = report;
        report
    }

    /// Run one decode cycle: a plain character, or an escape token chain
    /// collapsed into a single report. `None` means the source had no data.
    fn decode_event(&mut self) -> Option<Report> {
        let mut report = Report::idle();
        let mut byte = self.reader.next()?;
        let mut chained = 0;
        loop {
            if byte != ESCAPE_MARKER {
                // Standard decode through the character table. Plain
                // characters end the chain.
                let entry = keymap::lookup(byte);
                report.add_modifier(entry.modifier);
                report.set_key(entry.key);
                break;
            }

            let Some(tok) = token::lex(&mut self.reader) else {
                break;
            };
            trace!("control token {tok:?}");
            match tok.resolution() {
                Resolution::Modifier(modifier) => report.add_modifier(modifier),
                Resolution::Key(key) => report.set_key(key),
                Resolution::Literal => {
                    let entry = keymap::lookup(ESCAPE_MARKER);
                    report.add_modifier(entry.modifier);
                    report.set_key(entry.key);
                }
                Resolution::NoOp => {}
            }

            chained += 1;
            if chained >= MAX_COMBO_TOKENS {
                debug!("combo chain hit the {MAX_COMBO_TOKENS}-token cap, emitting partial combo");
                break;
            }
            // Only a `+` right after the token extends the chain; any other
            // byte is left for the next cycle.
            if self.reader.peek() != Some(COMBO_MARKER) {
                break;
            }
            self.reader.consume();
            match self.reader.next() {
                Some(next) => byte = next,
                None => break,
            }
        }
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::keymap::keycodes::*;
    use super::reader::testing::ScriptedSource;
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(100);

    fn engine(chunks: &[&'static str]) -> Engine<ScriptedSource> {
        Engine::new(ScriptedSource::new(chunks.iter().copied()), INTERVAL)
    }

    /// Poll once per interval, collecting one report per decode cycle.
    fn run(engine: &mut Engine<ScriptedSource>, cycles: usize) -> Vec<Report> {
        let t0 = Instant::now();
        (0..cycles)
            .map(|i| engine.poll_at(t0 + INTERVAL * i as u32))
            .collect()
    }

    fn key(code: u8) -> Report {
        let mut report = Report::idle();
        report.set_key(code);
        report
    }

    fn combo(modifier: Modifier, code: u8) -> Report {
        let mut report = Report::idle();
        report.add_modifier(modifier);
        report.set_key(code);
        report
    }

    #[test]
    fn test_plain_text() {
        let mut engine = engine(&["hi"]);
        assert_eq!(run(&mut engine, 2), vec![key(0x0B), key(0x0C)]);
    }

    #[test]
    fn test_shifted_character() {
        let mut engine = engine(&["H"]);
        assert_eq!(run(&mut engine, 1), vec![combo(Modifier::LSHIFT, 0x0B)]);
    }

    #[test]
    fn test_pacing_redelivers_within_interval() {
        let mut engine = engine(&["ab"]);
        let t0 = Instant::now();
        let first = engine.poll_at(t0);
        assert_eq!(first, key(0x04));
        // Polls inside the interval repeat the same report
        assert_eq!(engine.poll_at(t0 + Duration::from_millis(10)), first);
        assert_eq!(engine.poll_at(t0 + Duration::from_millis(99)), first);
        // Past the interval a fresh event is decoded
        assert_eq!(engine.poll_at(t0 + INTERVAL), key(0x05));
    }

    #[test]
    fn test_exhausted_source_releases_keys() {
        let mut engine = engine(&["a"]);
        let reports = run(&mut engine, 3);
        assert_eq!(reports[0], key(0x04));
        assert!(reports[1].is_idle());
        assert!(reports[2].is_idle());
    }

    #[test]
    fn test_ctrl_then_plain_is_two_cycles() {
        let mut engine = engine(&["\\ca"]);
        assert_eq!(
            run(&mut engine, 2),
            vec![combo(Modifier::LCTRL, 0), key(0x04)]
        );
    }

    #[test]
    fn test_ctrl_combined_with_plain() {
        let mut engine = engine(&["\\c+a"]);
        assert_eq!(run(&mut engine, 1), vec![combo(Modifier::LCTRL, 0x04)]);
    }

    #[test]
    fn test_ctrl_alt_delete() {
        let mut engine = engine(&["\\c+\\a+\\del"]);
        assert_eq!(
            run(&mut engine, 1),
            vec![combo(Modifier::LCTRL | Modifier::LALT, KEY_DELETE)]
        );
    }

    #[test]
    fn test_last_key_wins_in_combo() {
        let mut engine = engine(&["\\esc+\\del"]);
        assert_eq!(run(&mut engine, 1), vec![key(KEY_DELETE)]);
    }

    #[test]
    fn test_escape_key() {
        let mut engine = engine(&["\\esc"]);
        assert_eq!(run(&mut engine, 1), vec![key(KEY_ESC)]);
    }

    #[test]
    fn test_literal_backslash() {
        let mut engine = engine(&["\\\\"]);
        assert_eq!(run(&mut engine, 1), vec![key(0x31)]);
    }

    #[test]
    fn test_down_pushback_keeps_following_byte() {
        // `\d` not followed by `e` is Down; the next byte is ordinary input
        // decoded on the following cycle, not swallowed by the escape.
        let mut engine = engine(&["\\dx"]);
        assert_eq!(run(&mut engine, 2), vec![key(KEY_DOWN), key(0x1B)]);
    }

    #[test]
    fn test_unknown_escape_is_silent() {
        let mut engine = engine(&["\\za"]);
        let reports = run(&mut engine, 2);
        assert!(reports[0].is_idle());
        assert_eq!(reports[1], key(0x04));
    }

    #[test]
    fn test_byte_after_token_not_consumed_without_combo_marker() {
        let mut engine = engine(&["\\escq"]);
        assert_eq!(run(&mut engine, 2), vec![key(KEY_ESC), key(0x14)]);
    }

    #[test]
    fn test_combo_chain_is_capped() {
        // Nine chained modifiers exceed the cap; the partial combo is
        // emitted and the leftovers decode on later cycles.
        let mut engine = engine(&["\\c+\\c+\\c+\\c+\\c+\\c+\\c+\\c+\\c+\\a"]);
        let reports = run(&mut engine, 1);
        assert_eq!(reports[0].modifier(), Modifier::LCTRL);
    }

    #[test]
    fn test_truncated_combo_emits_partial() {
        // Chain broken by end-of-data right after the `+`
        let mut engine = engine(&["\\c+"]);
        assert_eq!(run(&mut engine, 1), vec![combo(Modifier::LCTRL, 0)]);
    }

    #[test]
    fn test_bare_escape_at_end_of_data() {
        let mut engine = engine(&["\\"]);
        let reports = run(&mut engine, 1);
        assert!(reports[0].is_idle());
    }

    #[test]
    fn test_function_keys_through_engine() {
        let mut engine = engine(&["\\f1\\fa\\fc"]);
        assert_eq!(
            run(&mut engine, 3),
            vec![key(KEY_F1), key(KEY_F10), key(KEY_F12)]
        );
    }

    #[test]
    fn test_unmapped_byte_is_inactive() {
        let mut engine = engine(&["\x01"]);
        let reports = run(&mut engine, 1);
        assert!(reports[0].is_idle());
    }
}

//! Typewriter command model.
//!
//! Turns semantic operations (type a character, move the carriage, feed the
//! platen) into abbreviated single-command frames sent through relay mode,
//! while tracking the carriage position and the pitch of the mounted
//! printwheel. The carriage position is the authoritative basis for
//! `carriage_return`, so it only ever moves after a send has succeeded.

use tracing::{debug, warn};
use wheelwriter_protocol::{
    BusCommand, Model, Printwheel, CARRIAGE_DIRECTION_LEFT, CARRIAGE_DIRECTION_RIGHT,
    CARRIAGE_MAX_USTEPS, CMD_ERASE_AND_ADVANCE, CMD_MOVE_CARRIAGE, CMD_MOVE_PLATEN,
    CMD_QUERY_MODEL, CMD_QUERY_PRINTWHEEL, CMD_RESET, CMD_SPIN_WHEEL, CMD_TYPE,
    CMD_TYPE_AND_ADVANCE, PLATEN_DIRECTION_DOWN, PLATEN_DIRECTION_UP, PLATEN_MAX_USTEPS,
    UNDERSCORE_POSITION,
};

use crate::error::ClientError;
use crate::glyphs::Keyboard;
use crate::modes::RelayMode;
use crate::transport::Transport;

/// Character styling applied while typing in relay mode.
///
/// Underline strikes the underscore glyph over the character; bold shifts the
/// carriage one microstep and strikes the character again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Double-strike the glyph, offset by one microstep.
    pub bold: bool,
    /// Overstrike with the underscore glyph.
    pub underline: bool,
}

impl Style {
    /// Plain single strike.
    pub const NORMAL: Style = Style {
        bold: false,
        underline: false,
    };
    /// Bold only.
    pub const BOLD: Style = Style {
        bold: true,
        underline: false,
    };
    /// Underline only.
    pub const UNDERLINE: Style = Style {
        bold: false,
        underline: true,
    };
    /// Bold and underline combined.
    pub const BOLD_UNDERLINE: Style = Style {
        bold: true,
        underline: true,
    };

    /// Whether no styling is applied.
    pub fn is_normal(&self) -> bool {
        !self.bold && !self.underline
    }
}

/// Vertical line spacing multiplier, as selected on the typewriter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineSpacing {
    /// Single spacing.
    #[default]
    Single,
    /// One-and-a-half spacing.
    OneAndHalf,
    /// Double spacing.
    Double,
    /// Triple spacing.
    Triple,
}

impl LineSpacing {
    /// Platen microsteps for one line advance at this spacing.
    pub fn usteps(&self, single_line: u8) -> i32 {
        let single = i32::from(single_line);
        match self {
            LineSpacing::Single => single,
            LineSpacing::OneAndHalf => single * 3 / 2,
            LineSpacing::Double => single * 2,
            LineSpacing::Triple => single * 3,
        }
    }
}

/// Default carriage microsteps per character (10/12 cpi wheels).
const DEFAULT_CHAR_SPACE: u8 = 10;
/// Default platen microsteps per single line.
const DEFAULT_LINE_SPACE: u8 = 16;

/// Pack a signed carriage move into the wire field: clamped 15-bit magnitude
/// with the direction bit folded into the high data byte. Returns the clamped
/// magnitude alongside the two data bytes.
fn pack_carriage_move(usteps: i32) -> (u16, [u8; 2]) {
    let magnitude = usteps.unsigned_abs().min(u32::from(CARRIAGE_MAX_USTEPS)) as u16;
    let direction = if usteps < 0 {
        CARRIAGE_DIRECTION_LEFT
    } else {
        CARRIAGE_DIRECTION_RIGHT
    };
    (
        magnitude,
        [(magnitude >> 8) as u8 | direction, (magnitude & 0xFF) as u8],
    )
}

/// Pack a signed platen move into the wire field: clamped 7-bit magnitude
/// with the direction bit. Returns the clamped magnitude alongside the data
/// byte.
fn pack_platen_move(usteps: i32) -> (u8, u8) {
    let magnitude = usteps.unsigned_abs().min(u32::from(PLATEN_MAX_USTEPS)) as u8;
    let direction = if usteps < 0 {
        PLATEN_DIRECTION_DOWN
    } else {
        PLATEN_DIRECTION_UP
    };
    (magnitude, magnitude | direction)
}

/// Stateful command model over an active relay mode.
///
/// Assumes the session stays in relay mode for its whole lifetime; dropping
/// the `Typewriter` drops the inner guard, which exits relay mode.
pub struct Typewriter<'s, T: Transport> {
    relay: RelayMode<'s, T>,
    char_space: u8,
    line_space_single: u8,
    line_spacing: LineSpacing,
    carriage_position: i32,
    keyboard: Keyboard,
}

impl<'s, T: Transport> Typewriter<'s, T> {
    /// Wrap an active relay mode with default pitch (10 microsteps per
    /// character) and the US keyboard.
    pub fn new(relay: RelayMode<'s, T>) -> Self {
        Typewriter {
            relay,
            char_space: DEFAULT_CHAR_SPACE,
            line_space_single: DEFAULT_LINE_SPACE,
            line_spacing: LineSpacing::Single,
            carriage_position: 0,
            keyboard: Keyboard::Us,
        }
    }

    fn send(&mut self, entry: BusCommand) -> Result<u8, ClientError> {
        self.relay.send_command(None, entry)
    }

    // ------------------------------------------------------------------
    // Queries and simple commands
    // ------------------------------------------------------------------

    /// Ask the typewriter for its model code.
    pub fn query_model(&mut self) -> Result<Model, ClientError> {
        let code = self.send(BusCommand::query(CMD_QUERY_MODEL))?;
        Ok(Model::from(code))
    }

    /// Ask which printwheel is mounted.
    pub fn query_printwheel(&mut self) -> Result<Printwheel, ClientError> {
        let code = self.send(BusCommand::query(CMD_QUERY_PRINTWHEEL))?;
        Ok(Printwheel::from(code))
    }

    /// Reset the typewriter.
    pub fn reset(&mut self) -> Result<(), ClientError> {
        self.send(BusCommand::query(CMD_RESET))?;
        Ok(())
    }

    /// Spin the printwheel to its home position.
    pub fn spin_wheel(&mut self) -> Result<(), ClientError> {
        self.send(BusCommand::query(CMD_SPIN_WHEEL))?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Carriage motion
    // ------------------------------------------------------------------

    /// Current carriage position in microsteps from the left margin.
    pub fn carriage_position(&self) -> i32 {
        self.carriage_position
    }

    /// Carriage microsteps per character at the current pitch.
    pub fn char_space(&self) -> u8 {
        self.char_space
    }

    /// Move the carriage by a signed number of microsteps (positive is
    /// right). The magnitude is clamped to the 15-bit wire field.
    pub fn move_carriage(&mut self, usteps: i32) -> Result<(), ClientError> {
        let (magnitude, data) = pack_carriage_move(usteps);
        self.send(BusCommand::new(CMD_MOVE_CARRIAGE, data))?;

        if usteps < 0 {
            self.carriage_position -= i32::from(magnitude);
        } else {
            self.carriage_position += i32::from(magnitude);
        }
        Ok(())
    }

    /// Move the carriage by whole character widths.
    pub fn move_carriage_spaces(&mut self, spaces: i32) -> Result<(), ClientError> {
        self.move_carriage(spaces * i32::from(self.char_space))
    }

    /// Return the carriage to the left margin.
    pub fn carriage_return(&mut self) -> Result<(), ClientError> {
        self.move_carriage(-self.carriage_position)?;
        self.carriage_position = 0;
        Ok(())
    }

    /// Declare the current carriage position to be the left margin.
    pub fn set_left_margin(&mut self) {
        self.carriage_position = 0;
    }

    // ------------------------------------------------------------------
    // Platen motion
    // ------------------------------------------------------------------

    /// Move the platen by a signed number of microsteps (positive feeds the
    /// paper up). The magnitude is clamped to the 7-bit wire field.
    pub fn move_platen(&mut self, usteps: i32) -> Result<(), ClientError> {
        let (_, data) = pack_platen_move(usteps);
        self.send(BusCommand::with_value(CMD_MOVE_PLATEN, data))?;
        Ok(())
    }

    /// Move the platen by whole lines at the current line spacing.
    pub fn move_platen_lines(&mut self, lines: i32) -> Result<(), ClientError> {
        self.move_platen(lines * self.line_spacing.usteps(self.line_space_single))
    }

    /// Advance the paper one line.
    pub fn line_feed(&mut self) -> Result<(), ClientError> {
        self.move_platen(self.line_spacing.usteps(self.line_space_single))
    }

    /// Roll the paper back one line.
    pub fn reverse_line_feed(&mut self) -> Result<(), ClientError> {
        self.move_platen(-self.line_spacing.usteps(self.line_space_single))
    }

    // ------------------------------------------------------------------
    // Typing
    // ------------------------------------------------------------------

    /// Strike a wheel position and advance the carriage.
    ///
    /// A plain style uses the typewriter's own type-and-advance command.
    /// Styled text is composited in place first, then the carriage advances;
    /// bold reduces the advance by the one microstep the double strike
    /// already consumed.
    pub fn type_glyph(
        &mut self,
        wheel_position: u8,
        advance_usteps: u8,
        style: Style,
    ) -> Result<(), ClientError> {
        if style.is_normal() {
            self.send(BusCommand::new(
                CMD_TYPE_AND_ADVANCE,
                [wheel_position, advance_usteps],
            ))?;
            self.carriage_position += i32::from(advance_usteps);
        } else {
            self.type_glyph_in_place(wheel_position, style)?;
            let advance = if style.bold {
                advance_usteps.saturating_sub(1)
            } else {
                advance_usteps
            };
            self.move_carriage(i32::from(advance))?;
        }
        Ok(())
    }

    /// Strike a wheel position without advancing the carriage.
    ///
    /// The underline overstrike comes before the bold re-strike, and the
    /// underscore glyph itself is only struck once.
    pub fn type_glyph_in_place(
        &mut self,
        wheel_position: u8,
        style: Style,
    ) -> Result<(), ClientError> {
        if wheel_position != UNDERSCORE_POSITION {
            self.send(BusCommand::with_value(CMD_TYPE, wheel_position))?;
        }
        if style.underline {
            self.send(BusCommand::with_value(CMD_TYPE, UNDERSCORE_POSITION))?;
        }
        if style.bold {
            self.move_carriage(1)?;
            self.send(BusCommand::with_value(CMD_TYPE, wheel_position))?;
        }
        Ok(())
    }

    /// Type a character at the current pitch.
    pub fn type_char(&mut self, c: char, style: Style) -> Result<(), ClientError> {
        self.type_glyph(self.keyboard.wheel_position(c), self.char_space, style)
    }

    /// Type a character without advancing the carriage.
    pub fn type_char_in_place(&mut self, c: char, style: Style) -> Result<(), ClientError> {
        self.type_glyph_in_place(self.keyboard.wheel_position(c), style)
    }

    /// Type a string of plain text at the current pitch.
    pub fn type_str(&mut self, text: &str) -> Result<(), ClientError> {
        for c in text.chars() {
            self.type_char(c, Style::NORMAL)?;
        }
        Ok(())
    }

    /// Strike a sequence of wheel positions with uniform advance and style.
    pub fn type_glyphs(
        &mut self,
        wheel_positions: &[u8],
        advance_usteps: u8,
        style: Style,
    ) -> Result<(), ClientError> {
        for &position in wheel_positions {
            self.type_glyph(position, advance_usteps, style)?;
        }
        Ok(())
    }

    /// Erase the character behind the carriage and advance past it. The
    /// advance is clamped to the 7-bit wire field.
    pub fn erase(&mut self, wheel_position: u8, advance_usteps: u8) -> Result<(), ClientError> {
        let advance = advance_usteps.min(PLATEN_MAX_USTEPS);
        self.send(BusCommand::new(
            CMD_ERASE_AND_ADVANCE,
            [wheel_position, advance],
        ))?;
        self.carriage_position += i32::from(advance);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Select the keyboard layout used for character-to-glyph translation.
    ///
    /// Fails for layouts without a host-side glyph table.
    pub fn set_keyboard(&mut self, keyboard: Keyboard) -> Result<(), ClientError> {
        if keyboard.glyph_table().is_none() {
            return Err(ClientError::UnsupportedKeyboard(keyboard));
        }
        self.keyboard = keyboard;
        Ok(())
    }

    /// Set the vertical line spacing multiplier.
    pub fn set_line_spacing(&mut self, spacing: LineSpacing) {
        self.line_spacing = spacing;
    }

    /// Query the mounted printwheel and apply its pitch.
    ///
    /// Must be re-run whenever the wheel is swapped. Wheels the pitch table
    /// does not cover leave the current pitch unchanged.
    pub fn calibrate_pitch(&mut self) -> Result<Printwheel, ClientError> {
        let wheel = self.query_printwheel()?;
        self.apply_wheel_pitch(wheel);
        Ok(wheel)
    }

    /// Apply the pitch for a known printwheel code.
    pub fn apply_wheel_pitch(&mut self, wheel: Printwheel) {
        match wheel {
            Printwheel::Cpi10 => {
                self.char_space = 12;
                self.line_space_single = 16;
            }
            Printwheel::Cpi12 => {
                self.char_space = 10;
                self.line_space_single = 16;
            }
            other => {
                warn!(wheel = %other, "no pitch table for this wheel, keeping current pitch");
                return;
            }
        }
        debug!(wheel = %wheel, char_space = self.char_space, "applied wheel pitch");
    }

    /// Leave relay mode, surfacing any exit error.
    pub fn exit(self) -> Result<(), ClientError> {
        self.relay.exit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Session, SessionConfig};
    use crate::transport::testing::MockTransport;
    use std::time::Duration;
    use wheelwriter_protocol::STATUS_OK;

    /// A relay-mode session whose transport acknowledges `oks` abbreviated
    /// commands in advance.
    fn session_with_oks(oks: usize) -> Session<MockTransport> {
        let mut transport = MockTransport::with_lines(["[READY]", "[BEGIN]"]);
        for _ in 0..oks {
            transport.push_raw_line(vec![0x11, STATUS_OK, 0x00, 0x0A]);
        }
        let config = SessionConfig {
            connect_retry_delay: Duration::ZERO,
            ..SessionConfig::default()
        };
        Session::new(transport, config)
    }

    /// Written frames after the probe and mode command, excluding the final
    /// exit byte. Abbreviated single frames are a fixed five bytes, so the
    /// stream chunks cleanly (data bytes may themselves be 0x0A).
    fn sent_frames(session: &mut Session<MockTransport>) -> Vec<Vec<u8>> {
        let written = session.transport_mut().written().to_vec();
        let body = &written[b"\nrelay\n".len()..written.len() - 1];
        assert_eq!(body.len() % 5, 0, "expected only abbreviated single frames");
        body.chunks(5).map(<[u8]>::to_vec).collect()
    }

    #[test]
    fn test_carriage_packing_round_trips_full_range() {
        for magnitude in 0..=0x7FFFi32 {
            for usteps in [magnitude, -magnitude] {
                let (clamped, data) = pack_carriage_move(usteps);
                assert_eq!(i32::from(clamped), magnitude);

                let direction_right = data[0] & 0x80 != 0;
                let unpacked = (u16::from(data[0] & 0x7F) << 8) | u16::from(data[1]);
                assert_eq!(i32::from(unpacked), magnitude);
                assert_eq!(direction_right, usteps >= 0);
            }
        }
        // Above the field width the magnitude clamps, never wraps.
        let (clamped, data) = pack_carriage_move(0x8000);
        assert_eq!(clamped, 0x7FFF);
        assert_eq!(data, [0xFF, 0xFF]);
        let (clamped, _) = pack_carriage_move(i32::MIN);
        assert_eq!(clamped, 0x7FFF);
    }

    #[test]
    fn test_platen_packing_round_trips_full_range() {
        for magnitude in 0..=0x7Fi32 {
            for usteps in [magnitude, -magnitude] {
                let (clamped, data) = pack_platen_move(usteps);
                assert_eq!(i32::from(clamped), magnitude);
                assert_eq!(i32::from(data & 0x7F), magnitude);
                assert_eq!(data & 0x80 != 0, usteps >= 0);
            }
        }
        let (clamped, data) = pack_platen_move(0x80);
        assert_eq!(clamped, 0x7F);
        assert_eq!(data, 0xFF);
    }

    #[test]
    fn test_move_carriage_packs_direction_and_magnitude() {
        let mut session = session_with_oks(2);
        {
            let mut tw = Typewriter::new(session.enter_relay().expect("relay"));
            tw.move_carriage(0x1234).expect("right move");
            tw.move_carriage(-0x1234).expect("left move");
            assert_eq!(tw.carriage_position(), 0);
        }

        let frames = sent_frames(&mut session);
        assert_eq!(frames[0], vec![0x11, 0x06, 0x12 | 0x80, 0x34, 0x0A]);
        assert_eq!(frames[1], vec![0x11, 0x06, 0x12, 0x34, 0x0A]);
    }

    #[test]
    fn test_move_carriage_clamps_to_15_bits() {
        let mut session = session_with_oks(1);
        {
            let mut tw = Typewriter::new(session.enter_relay().expect("relay"));
            tw.move_carriage(40_000).expect("move");
            assert_eq!(tw.carriage_position(), 0x7FFF);
        }

        let frames = sent_frames(&mut session);
        assert_eq!(frames[0], vec![0x11, 0x06, 0x7F | 0x80, 0xFF, 0x0A]);
    }

    #[test]
    fn test_move_platen_packs_direction_bit() {
        let mut session = session_with_oks(3);
        {
            let mut tw = Typewriter::new(session.enter_relay().expect("relay"));
            tw.move_platen(32).expect("up");
            tw.move_platen(-32).expect("down");
            tw.move_platen(300).expect("clamped");
        }

        let frames = sent_frames(&mut session);
        assert_eq!(frames[0], vec![0x11, 0x05, 32 | 0x80, 0x00, 0x0A]);
        assert_eq!(frames[1], vec![0x11, 0x05, 32, 0x00, 0x0A]);
        assert_eq!(frames[2], vec![0x11, 0x05, 0x7F | 0x80, 0x00, 0x0A]);
    }

    #[test]
    fn test_plain_typing_advances_position() {
        let mut session = session_with_oks(1);
        {
            let mut tw = Typewriter::new(session.enter_relay().expect("relay"));
            tw.type_char('a', Style::NORMAL).expect("type");
            assert_eq!(tw.carriage_position(), 10);
        }

        let frames = sent_frames(&mut session);
        assert_eq!(frames[0], vec![0x11, 0x03, 0x01, 10, 0x0A]);
    }

    #[test]
    fn test_bold_underline_compositing_order() {
        let mut session = session_with_oks(5);
        {
            let mut tw = Typewriter::new(session.enter_relay().expect("relay"));
            tw.type_glyph(0x01, 10, Style::BOLD_UNDERLINE).expect("type");
            // One microstep consumed by the bold shift, advance reduced by
            // one: net movement is the requested ten.
            assert_eq!(tw.carriage_position(), 10);
        }

        let frames = sent_frames(&mut session);
        assert_eq!(frames[0], vec![0x11, 0x02, 0x01, 0x00, 0x0A]); // plain strike
        assert_eq!(frames[1], vec![0x11, 0x02, 0x4F, 0x00, 0x0A]); // underscore strike
        assert_eq!(frames[2], vec![0x11, 0x06, 0x80, 0x01, 0x0A]); // one-step shift
        assert_eq!(frames[3], vec![0x11, 0x02, 0x01, 0x00, 0x0A]); // bold re-strike
        assert_eq!(frames[4], vec![0x11, 0x06, 0x80, 0x09, 0x0A]); // advance - 1
    }

    #[test]
    fn test_underscore_glyph_is_struck_once_when_underlined() {
        let mut session = session_with_oks(2);
        {
            let mut tw = Typewriter::new(session.enter_relay().expect("relay"));
            tw.type_glyph(UNDERSCORE_POSITION, 10, Style::UNDERLINE)
                .expect("type");
        }

        let frames = sent_frames(&mut session);
        // No plain strike first: just the underline strike and the advance.
        assert_eq!(frames[0], vec![0x11, 0x02, 0x4F, 0x00, 0x0A]);
        assert_eq!(frames[1], vec![0x11, 0x06, 0x80, 0x0A, 0x0A]);
    }

    #[test]
    fn test_failed_send_leaves_position_untouched() {
        let mut transport = MockTransport::with_lines(["[READY]", "[BEGIN]"]);
        transport.push_raw_line(vec![0x11, 0x20, 0x01, 0x0A]);
        let config = SessionConfig {
            connect_retry_delay: Duration::ZERO,
            ..SessionConfig::default()
        };
        let mut session = Session::new(transport, config);

        let mut tw = Typewriter::new(session.enter_relay().expect("relay"));
        tw.move_carriage(100).expect_err("send should fail");
        assert_eq!(tw.carriage_position(), 0);
    }

    #[test]
    fn test_carriage_return_moves_back_to_margin() {
        let mut session = session_with_oks(3);
        {
            let mut tw = Typewriter::new(session.enter_relay().expect("relay"));
            tw.type_glyph(0x01, 10, Style::NORMAL).expect("type");
            tw.move_carriage(20).expect("move");
            tw.carriage_return().expect("return");
            assert_eq!(tw.carriage_position(), 0);
        }

        let frames = sent_frames(&mut session);
        assert_eq!(frames[2], vec![0x11, 0x06, 0x00, 30, 0x0A]);
    }

    #[test]
    fn test_erase_clamps_advance() {
        let mut session = session_with_oks(1);
        {
            let mut tw = Typewriter::new(session.enter_relay().expect("relay"));
            tw.erase(0x01, 0xFF).expect("erase");
            assert_eq!(tw.carriage_position(), 0x7F);
        }

        let frames = sent_frames(&mut session);
        assert_eq!(frames[0], vec![0x11, 0x04, 0x01, 0x7F, 0x0A]);
    }

    #[test]
    fn test_pitch_calibration_from_wheel_query() {
        let mut transport = MockTransport::with_lines(["[READY]", "[BEGIN]"]);
        transport.push_raw_line(vec![0x11, STATUS_OK, 0x40, 0x0A]);
        let config = SessionConfig {
            connect_retry_delay: Duration::ZERO,
            ..SessionConfig::default()
        };
        let mut session = Session::new(transport, config);

        let mut tw = Typewriter::new(session.enter_relay().expect("relay"));
        let wheel = tw.calibrate_pitch().expect("calibrate");
        assert_eq!(wheel, Printwheel::Cpi10);
        assert_eq!(tw.char_space(), 12);
    }

    #[test]
    fn test_unknown_wheel_keeps_pitch() {
        let mut session = session_with_oks(0);
        let relay = session.enter_relay().expect("relay");
        let mut tw = Typewriter::new(relay);

        tw.apply_wheel_pitch(Printwheel::Proportional);
        assert_eq!(tw.char_space(), DEFAULT_CHAR_SPACE);

        tw.apply_wheel_pitch(Printwheel::Cpi12);
        assert_eq!(tw.char_space(), 10);
    }

    #[test]
    fn test_line_spacing_usteps() {
        assert_eq!(LineSpacing::Single.usteps(16), 16);
        assert_eq!(LineSpacing::OneAndHalf.usteps(16), 24);
        assert_eq!(LineSpacing::Double.usteps(16), 32);
        assert_eq!(LineSpacing::Triple.usteps(16), 48);
    }

    #[test]
    fn test_keyboard_without_table_is_rejected() {
        let mut session = session_with_oks(0);
        let relay = session.enter_relay().expect("relay");
        let mut tw = Typewriter::new(relay);

        assert!(matches!(
            tw.set_keyboard(Keyboard::Ussr),
            Err(ClientError::UnsupportedKeyboard(Keyboard::Ussr))
        ));
        tw.set_keyboard(Keyboard::Ascii).expect("ascii has a table");
    }
}

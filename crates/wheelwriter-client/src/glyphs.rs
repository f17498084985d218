//! Keyboard layouts and character-to-printwheel translation tables.
//!
//! The printwheel code is the position of the glyph on the wheel: `a`
//! (code 0x01) sits at twelve o'clock, and codes count counter-clockwise
//! from there. The tables map a character code to the wheel position for a
//! given keyboard layout; unmapped characters resolve to the null position,
//! which strikes nothing.

use wheelwriter_protocol::NO_STRIKE_POSITION;

/// Keyboard layouts understood by the interface board's type mode.
///
/// Every layout has a wire identifier; only [`Keyboard::Us`] and
/// [`Keyboard::Ascii`] additionally carry a host-side glyph table for use in
/// relay mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    /// US English layout.
    Us,
    /// German layout.
    Germany,
    /// UK English layout.
    Uk,
    /// Spanish layout.
    Spain,
    /// Full-ASCII wheel layout.
    Ascii,
    /// Symbol wheel 1.
    Symbol1,
    /// Symbol wheel 2.
    Symbol2,
    /// Symbol wheel 3.
    Symbol3,
    /// Cyrillic layout.
    Ussr,
}

impl Keyboard {
    /// Wire identifier passed to the board's type-mode command.
    pub fn id(&self) -> u8 {
        match self {
            Keyboard::Us => 1,
            Keyboard::Germany => 26,
            Keyboard::Uk => 67,
            Keyboard::Spain => 70,
            Keyboard::Ascii => 103,
            Keyboard::Symbol1 => 200,
            Keyboard::Symbol2 => 202,
            Keyboard::Symbol3 => 203,
            Keyboard::Ussr => 231,
        }
    }

    /// Look up a keyboard by its wire identifier.
    pub fn from_id(id: u8) -> Option<Keyboard> {
        match id {
            1 => Some(Keyboard::Us),
            26 => Some(Keyboard::Germany),
            67 => Some(Keyboard::Uk),
            70 => Some(Keyboard::Spain),
            103 => Some(Keyboard::Ascii),
            200 => Some(Keyboard::Symbol1),
            202 => Some(Keyboard::Symbol2),
            203 => Some(Keyboard::Symbol3),
            231 => Some(Keyboard::Ussr),
            _ => None,
        }
    }

    /// Host-side glyph table for this layout, if one exists.
    pub fn glyph_table(&self) -> Option<&'static GlyphTable> {
        match self {
            Keyboard::Us => Some(&US_WHEEL),
            Keyboard::Ascii => Some(&ASCII_WHEEL),
            _ => None,
        }
    }

    /// Wheel position for a character on this layout.
    ///
    /// Characters outside the table, or on layouts without a table, resolve
    /// to [`NO_STRIKE_POSITION`].
    pub fn wheel_position(&self, c: char) -> u8 {
        let Some(table) = self.glyph_table() else {
            return NO_STRIKE_POSITION;
        };
        let code = c as u32;
        if code < table.len() as u32 {
            table[code as usize]
        } else {
            NO_STRIKE_POSITION
        }
    }
}

impl std::fmt::Display for Keyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Keyboard::Us => write!(f, "us"),
            Keyboard::Germany => write!(f, "germany"),
            Keyboard::Uk => write!(f, "uk"),
            Keyboard::Spain => write!(f, "spain"),
            Keyboard::Ascii => write!(f, "ascii"),
            Keyboard::Symbol1 => write!(f, "symbol1"),
            Keyboard::Symbol2 => write!(f, "symbol2"),
            Keyboard::Symbol3 => write!(f, "symbol3"),
            Keyboard::Ussr => write!(f, "ussr"),
        }
    }
}

/// A character-code-indexed table of wheel positions.
pub type GlyphTable = [u8; 256];

/// US keyboard wheel positions.
#[rustfmt::skip]
pub static US_WHEEL: GlyphTable = [
// col: 00    01    02    03    04    05    06    07    08    09    0A    0B    0C    0D    0E    0F    row:
       0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 00
       0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 10
//     SP     !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
       0x00, 0x49, 0x4b, 0x38, 0x37, 0x39, 0x3f, 0x4c, 0x23, 0x16, 0x36, 0x3b, 0x0c, 0x0e, 0x57, 0x28, // 20
//      0     1     2     3     4     5     6     7     8     9     :     ;     <     =     >     ?
       0x30, 0x2e, 0x2f, 0x2c, 0x32, 0x31, 0x33, 0x35, 0x34, 0x2a, 0x4e, 0x50, 0x00, 0x4d, 0x00, 0x4a, // 30
//      @     A     B     C     D     E     F     G     H     I     J     K     L     M     N     O
       0x3d, 0x20, 0x12, 0x1b, 0x1d, 0x1e, 0x11, 0x0f, 0x14, 0x1f, 0x21, 0x2b, 0x18, 0x24, 0x1a, 0x22, // 40
//      P     Q     R     S     T     U     V     W     X     Y     Z     [     \     ]     ^     _
       0x15, 0x3e, 0x17, 0x19, 0x1c, 0x10, 0x0d, 0x29, 0x2d, 0x26, 0x13, 0x41, 0x00, 0x40, 0x00, 0x4f, // 50
//      `     a     b     c     d     e     f     g     h     i     j     k     l     m     n     o
       0x00, 0x01, 0x59, 0x05, 0x07, 0x60, 0x0a, 0x5a, 0x08, 0x5d, 0x56, 0x0b, 0x09, 0x04, 0x02, 0x5f, // 60
//      p     q     r     s     t     u     v     w     x     y     z     {     |     }     ~    DEL
       0x5c, 0x52, 0x03, 0x06, 0x5e, 0x5b, 0x53, 0x55, 0x51, 0x58, 0x54, 0x00, 0x00, 0x00, 0x00, 0x00, // 70
       0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 80
       0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 90
//                  ¢                             §
       0x00, 0x00, 0x3a, 0x00, 0x00, 0x00, 0x00, 0x45, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // A0
//      °     ±     ²     ³                 ¶                                   ¼     ½
       0x44, 0x3c, 0x43, 0x42, 0x00, 0x00, 0x46, 0x00, 0x00, 0x00, 0x00, 0x00, 0x48, 0x47, 0x00, 0x00, // B0
       0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // C0
       0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // D0
       0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // E0
       0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // F0
];

/// Full-ASCII wheel positions. Extends the US table with the bracket, caret,
/// backtick and tilde glyphs that wheel carries.
#[rustfmt::skip]
pub static ASCII_WHEEL: GlyphTable = [
// col: 00    01    02    03    04    05    06    07    08    09    0A    0B    0C    0D    0E    0F    row:
       0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 00
       0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 10
//     SP     !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
       0x00, 0x49, 0x4b, 0x38, 0x37, 0x39, 0x3f, 0x4c, 0x23, 0x16, 0x36, 0x3b, 0x0c, 0x0e, 0x57, 0x28, // 20
//      0     1     2     3     4     5     6     7     8     9     :     ;     <     =     >     ?
       0x30, 0x2e, 0x2f, 0x2c, 0x32, 0x31, 0x33, 0x35, 0x34, 0x2a, 0x4e, 0x50, 0x45, 0x4d, 0x46, 0x4a, // 30
//      @     A     B     C     D     E     F     G     H     I     J     K     L     M     N     O
       0x3d, 0x20, 0x12, 0x1b, 0x1d, 0x1e, 0x11, 0x0f, 0x14, 0x1f, 0x21, 0x2b, 0x18, 0x24, 0x1a, 0x22, // 40
//      P     Q     R     S     T     U     V     W     X     Y     Z     [     \     ]     ^     _
       0x15, 0x3e, 0x17, 0x19, 0x1c, 0x10, 0x0d, 0x29, 0x2d, 0x26, 0x13, 0x41, 0x42, 0x40, 0x3a, 0x4f, // 50
//      `     a     b     c     d     e     f     g     h     i     j     k     l     m     n     o
       0x3c, 0x01, 0x59, 0x05, 0x07, 0x60, 0x0a, 0x5a, 0x08, 0x5d, 0x56, 0x0b, 0x09, 0x04, 0x02, 0x5f, // 60
//      p     q     r     s     t     u     v     w     x     y     z     {     |     }     ~    DEL
       0x5c, 0x52, 0x03, 0x06, 0x5e, 0x5b, 0x53, 0x55, 0x51, 0x58, 0x54, 0x48, 0x43, 0x47, 0x44, 0x00, // 70
       0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 80
       0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 90
//                  ¢                             §
       0x00, 0x00, 0x3a, 0x00, 0x00, 0x00, 0x00, 0x45, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // A0
//      °     ±     ²     ³                 ¶                                   ¼     ½
       0x44, 0x3c, 0x43, 0x42, 0x00, 0x00, 0x46, 0x00, 0x00, 0x00, 0x00, 0x00, 0x48, 0x47, 0x00, 0x00, // B0
       0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // C0
       0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // D0
       0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // E0
       0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // F0
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_us_layout_basic_glyphs() {
        assert_eq!(Keyboard::Us.wheel_position('a'), 0x01);
        assert_eq!(Keyboard::Us.wheel_position('A'), 0x20);
        assert_eq!(Keyboard::Us.wheel_position('0'), 0x30);
        assert_eq!(Keyboard::Us.wheel_position('_'), 0x4f);
        assert_eq!(Keyboard::Us.wheel_position(' '), NO_STRIKE_POSITION);
    }

    #[test]
    fn test_ascii_layout_extends_us() {
        // Glyphs missing from the US wheel exist on the full-ASCII wheel.
        assert_eq!(Keyboard::Us.wheel_position('~'), NO_STRIKE_POSITION);
        assert_eq!(Keyboard::Ascii.wheel_position('~'), 0x44);
        assert_eq!(Keyboard::Ascii.wheel_position('{'), 0x48);
        assert_eq!(Keyboard::Ascii.wheel_position('\\'), 0x42);
    }

    #[test]
    fn test_unmapped_characters_do_not_strike() {
        assert_eq!(Keyboard::Us.wheel_position('\u{2603}'), NO_STRIKE_POSITION);
        assert_eq!(Keyboard::Us.wheel_position('\u{7f}'), NO_STRIKE_POSITION);
    }

    #[test]
    fn test_layouts_without_tables() {
        assert!(Keyboard::Germany.glyph_table().is_none());
        assert_eq!(Keyboard::Germany.wheel_position('a'), NO_STRIKE_POSITION);
    }

    #[test]
    fn test_keyboard_id_round_trip() {
        for kb in [
            Keyboard::Us,
            Keyboard::Germany,
            Keyboard::Uk,
            Keyboard::Spain,
            Keyboard::Ascii,
            Keyboard::Symbol1,
            Keyboard::Symbol2,
            Keyboard::Symbol3,
            Keyboard::Ussr,
        ] {
            assert_eq!(Keyboard::from_id(kb.id()), Some(kb));
        }
        assert_eq!(Keyboard::from_id(42), None);
    }
}

//! Protocol constants
//!
//! These constants define the frame identifiers, typewriter command codes, and
//! other protocol-specific values used on the Wheelwriter option bus and on
//! the serial link to the interface board.

// ============================================================================
// Frame Identifiers (host → board)
// ============================================================================

/// Single command with an explicit bus address.
pub const FRAME_SINGLE_ADDRESSED: u8 = 0x10;
/// Single command targeting the board's default bus address.
pub const FRAME_SINGLE_ABBREVIATED: u8 = 0x11;
/// Batch of commands, each with an explicit bus address.
pub const FRAME_BATCH_ADDRESSED: u8 = 0x12;
/// Batch of commands targeting the board's default bus address.
pub const FRAME_BATCH_ABBREVIATED: u8 = 0x13;

/// Terminator byte closing every command frame and response line.
pub const FRAME_TERMINATOR: u8 = 0x0A;

/// Maximum number of entries in a batch frame (the count field is one byte).
pub const MAX_BATCH_SIZE: usize = 255;

/// Status byte reported by the board when a command succeeded.
pub const STATUS_OK: u8 = 0x10;

// ============================================================================
// Typewriter Command Codes (placed in the command byte of a frame entry)
// ============================================================================

/// Query the typewriter model.
pub const CMD_QUERY_MODEL: u8 = 0x00;
/// Reset the typewriter.
pub const CMD_RESET: u8 = 0x01;
/// Strike a printwheel position without advancing the carriage.
pub const CMD_TYPE: u8 = 0x02;
/// Strike a printwheel position, then advance the carriage.
pub const CMD_TYPE_AND_ADVANCE: u8 = 0x03;
/// Erase the character at the current position, then advance.
pub const CMD_ERASE_AND_ADVANCE: u8 = 0x04;
/// Move the platen (paper feed).
pub const CMD_MOVE_PLATEN: u8 = 0x05;
/// Move the carriage horizontally.
pub const CMD_MOVE_CARRIAGE: u8 = 0x06;
/// Spin the printwheel to its home position.
pub const CMD_SPIN_WHEEL: u8 = 0x07;
/// Query the mounted printwheel.
pub const CMD_QUERY_PRINTWHEEL: u8 = 0x08;
/// Set the typewriter's repeat mode (reserved, unused by this driver).
pub const CMD_SET_REPEAT_MODE: u8 = 0x09;
/// Reserved code with no known function.
pub const CMD_UNKNOWN_0A: u8 = 0x0A;
/// Query motion status (reserved, unused by this driver).
pub const CMD_QUERY_STATUS: u8 = 0x0B;
/// Reserved code with no known function.
pub const CMD_UNKNOWN_0C: u8 = 0x0C;
/// Query the last keyboard operation (reserved, unused by this driver).
pub const CMD_QUERY_OPERATION: u8 = 0x0D;
/// Send a raw keyboard code (reserved, unused by this driver).
pub const CMD_SEND_CODE: u8 = 0x0E;

// ============================================================================
// Motion Direction Bits
// ============================================================================

/// Carriage moves toward the left margin.
pub const CARRIAGE_DIRECTION_LEFT: u8 = 0x00;
/// Carriage moves toward the right margin.
pub const CARRIAGE_DIRECTION_RIGHT: u8 = 0x80;
/// Platen rolls the paper down (reverse feed).
pub const PLATEN_DIRECTION_DOWN: u8 = 0x00;
/// Platen rolls the paper up (forward feed).
pub const PLATEN_DIRECTION_UP: u8 = 0x80;

/// Maximum carriage move magnitude in microsteps (15-bit field).
pub const CARRIAGE_MAX_USTEPS: u16 = 0x7FFF;
/// Maximum platen move magnitude in microsteps (7-bit field).
pub const PLATEN_MAX_USTEPS: u8 = 0x7F;

// ============================================================================
// Printwheel Positions
// ============================================================================

/// Printwheel position of the underscore glyph, used for underlining.
pub const UNDERSCORE_POSITION: u8 = 0x4F;
/// Null position; striking it is a no-op (used for unmapped characters).
pub const NO_STRIKE_POSITION: u8 = 0x00;

// ============================================================================
// Serial Link Tokens
// ============================================================================

/// Sentinel line announcing the board is idle and accepting mode commands.
pub const TOKEN_READY: &str = "[READY]";
/// Sentinel line announcing a mode switch has completed.
pub const TOKEN_BEGIN: &str = "[BEGIN]";
/// Prefix of the banner line the board may print before `[READY]`.
pub const BANNER_PREFIX: &str = "###";
/// Control byte that exits the current mode back to ready.
pub const CTRL_EXIT_MODE: u8 = 0x04;

/// Mode command selecting bus relay mode.
pub const MODE_RELAY: &str = "relay";
/// Mode command selecting passive bus read mode.
pub const MODE_READ: &str = "read";
/// Mode command selecting character relay (type) mode; takes a keyboard id.
pub const MODE_TYPE: &str = "type";

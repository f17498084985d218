//! Typewriter identification types reported over the bus.

/// Typewriter model codes returned by the query-model command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    /// Wheelwriter 3.
    Wheelwriter3,
    /// Wheelwriter 5.
    Wheelwriter5,
    /// Wheelwriter 6.
    Wheelwriter6,
    /// Unrecognized model code.
    Unknown(u8),
}

impl From<u8> for Model {
    fn from(code: u8) -> Self {
        match code {
            0x06 => Model::Wheelwriter3,
            0x25 => Model::Wheelwriter5,
            0x26 => Model::Wheelwriter6,
            _ => Model::Unknown(code),
        }
    }
}

impl From<Model> for u8 {
    fn from(model: Model) -> Self {
        match model {
            Model::Wheelwriter3 => 0x06,
            Model::Wheelwriter5 => 0x25,
            Model::Wheelwriter6 => 0x26,
            Model::Unknown(code) => code,
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Model::Wheelwriter3 => write!(f, "Wheelwriter 3"),
            Model::Wheelwriter5 => write!(f, "Wheelwriter 5"),
            Model::Wheelwriter6 => write!(f, "Wheelwriter 6"),
            Model::Unknown(code) => write!(f, "unknown model (0x{:02X})", code),
        }
    }
}

/// Printwheel codes returned by the query-printwheel command.
///
/// The code identifies the pitch of the mounted print element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Printwheel {
    /// Proportionally spaced wheel.
    Proportional,
    /// 15 characters per inch.
    Cpi15,
    /// 12 characters per inch.
    Cpi12,
    /// No wheel mounted.
    NoWheel,
    /// 10 characters per inch.
    Cpi10,
    /// Unrecognized printwheel code.
    Unknown(u8),
}

impl From<u8> for Printwheel {
    fn from(code: u8) -> Self {
        match code {
            0x08 => Printwheel::Proportional,
            0x10 => Printwheel::Cpi15,
            0x20 => Printwheel::Cpi12,
            0x21 => Printwheel::NoWheel,
            0x40 => Printwheel::Cpi10,
            _ => Printwheel::Unknown(code),
        }
    }
}

impl From<Printwheel> for u8 {
    fn from(wheel: Printwheel) -> Self {
        match wheel {
            Printwheel::Proportional => 0x08,
            Printwheel::Cpi15 => 0x10,
            Printwheel::Cpi12 => 0x20,
            Printwheel::NoWheel => 0x21,
            Printwheel::Cpi10 => 0x40,
            Printwheel::Unknown(code) => code,
        }
    }
}

impl std::fmt::Display for Printwheel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Printwheel::Proportional => write!(f, "proportional"),
            Printwheel::Cpi15 => write!(f, "15 cpi"),
            Printwheel::Cpi12 => write!(f, "12 cpi"),
            Printwheel::NoWheel => write!(f, "no wheel"),
            Printwheel::Cpi10 => write!(f, "10 cpi"),
            Printwheel::Unknown(code) => write!(f, "unknown wheel (0x{:02X})", code),
        }
    }
}

/// Format bytes as space-separated hex, for protocol trace output.
pub fn hex_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 5);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("0x{:02x}", byte));
    }
    out
}

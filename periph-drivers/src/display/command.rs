//! SSD1306 command encoding
//!
//! Pure translation from display operations to controller command bytes.
//! Nothing in here touches the bus. Every command byte travels as a write
//! to register 0 ([`periph_hal::COMMAND_REGISTER`]), so multi-command
//! payloads are sequences of `(0, opcode)` pairs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// SSD1306 opcodes
pub mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    pub const INVERSE_DISPLAY: u8 = 0xA7;
    pub const COM_SCAN_INC: u8 = 0xC0;
    pub const COM_SCAN_DEC: u8 = 0xC8;
    pub const SEG_REMAP: u8 = 0xA1;
    pub const NO_SEG_REMAP: u8 = 0xA0;
    pub const SET_START_LINE: u8 = 0x40;
    /// Resume rendering from display RAM; sent ahead of every frame
    pub const DISPLAY_WRITE: u8 = 0xA4;
    pub const DEACTIVATE_SCROLL: u8 = 0x2E;
    pub const ACTIVATE_SCROLL: u8 = 0x2F;
    pub const RIGHT_HORIZONTAL_SCROLL: u8 = 0x26;
    pub const LEFT_HORIZONTAL_SCROLL: u8 = 0x27;
    pub const VERTICAL_RIGHT_HORIZONTAL_SCROLL: u8 = 0x29;
    pub const VERTICAL_LEFT_HORIZONTAL_SCROLL: u8 = 0x2A;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const NO_DISPLAY_OFFSET: u8 = 0x00;
    pub const SET_MEMORY_ADDRESSING_MODE: u8 = 0x20;
    pub const HORIZONTAL_ADDRESSING: u8 = 0x00;
    /// 1/64 duty
    pub const MULTIPLEX_RATIO: u8 = 0x3F;
    pub const RESISTOR_RATIO: u8 = 0x80;
}

/// Power-up sequence, sent once per driver construction
///
/// Display off, addressing and timing setup, normal mode with no offset,
/// display on, charge pump. The panel comes up blank until the first frame
/// is rendered.
#[rustfmt::skip]
pub const INIT_PAYLOAD: [u8; 26] = [
    0, cmd::DISPLAY_OFF,
    0, cmd::SEG_REMAP,
    0, cmd::COM_SCAN_DEC,
    0, cmd::MULTIPLEX_RATIO,
    0, cmd::SET_CLOCK_DIV,
    0, cmd::RESISTOR_RATIO,
    0, cmd::SET_MEMORY_ADDRESSING_MODE,
    0, cmd::HORIZONTAL_ADDRESSING,
    0, cmd::NORMAL_DISPLAY,
    0, cmd::SET_DISPLAY_OFFSET,
    0, cmd::NO_DISPLAY_OFFSET,
    0, cmd::DISPLAY_ON,
    0, cmd::SET_CHARGE_PUMP,
];

/// Frame rate byte placed in every scroll setup
const SCROLL_FRAME_RATE: u8 = 0xFF;

/// A two-state setting with one opcode per state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    /// Opcode sent for `true`
    pub on: u8,
    /// Opcode sent for `false`
    pub off: u8,
}

impl Toggle {
    /// Opcode for the requested state
    pub const fn opcode(self, on: bool) -> u8 {
        if on {
            self.on
        } else {
            self.off
        }
    }
}

/// Panel power
pub const POWER: Toggle = Toggle {
    on: cmd::DISPLAY_ON,
    off: cmd::DISPLAY_OFF,
};

/// Pixel inversion
pub const INVERSION: Toggle = Toggle {
    on: cmd::INVERSE_DISPLAY,
    off: cmd::NORMAL_DISPLAY,
};

/// Vertical flip (COM output scan direction)
pub const FLIP: Toggle = Toggle {
    on: cmd::COM_SCAN_INC,
    off: cmd::COM_SCAN_DEC,
};

/// Horizontal mirror (segment remap)
pub const MIRROR: Toggle = Toggle {
    on: cmd::NO_SEG_REMAP,
    off: cmd::SEG_REMAP,
};

/// Scroll direction
///
/// The discriminant is the controller opcode for the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum ScrollMode {
    RightHorizontal = cmd::RIGHT_HORIZONTAL_SCROLL,
    LeftHorizontal = cmd::LEFT_HORIZONTAL_SCROLL,
    VerticalRightHorizontal = cmd::VERTICAL_RIGHT_HORIZONTAL_SCROLL,
    VerticalLeftHorizontal = cmd::VERTICAL_LEFT_HORIZONTAL_SCROLL,
}

impl ScrollMode {
    /// All modes, in opcode order
    pub const ALL: [ScrollMode; 4] = [
        ScrollMode::RightHorizontal,
        ScrollMode::LeftHorizontal,
        ScrollMode::VerticalRightHorizontal,
        ScrollMode::VerticalLeftHorizontal,
    ];

    /// Controller opcode selecting this mode
    pub const fn opcode(self) -> u8 {
        self as u8
    }
}

/// Contrast level outside 0..=255
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ContrastOutOfRange(pub i32);

/// Encode a contrast change: select opcode, then the level
pub fn contrast(level: i32) -> Result<[u8; 2], ContrastOutOfRange> {
    let level = u8::try_from(level).map_err(|_| ContrastOutOfRange(level))?;
    Ok([cmd::SET_CONTRAST, level])
}

/// Register 0 command sent ahead of every frame
///
/// The framebuffer (control byte first) follows as a plain write.
pub const fn render_trigger() -> u8 {
    cmd::DISPLAY_WRITE
}

/// Build the scroll setup payload
///
/// The rows are passed through untouched: the controller decides what an
/// out-of-range row means.
#[rustfmt::skip]
pub fn scroll_payload(start_y: u8, finish_y: u8, mode: ScrollMode) -> [u8; 16] {
    [
        0, mode.opcode(),
        0, 0,
        0, start_y,
        0, 0,
        0, finish_y,
        0, 0,
        0, SCROLL_FRAME_RATE,
        0, cmd::ACTIVATE_SCROLL,
    ]
}

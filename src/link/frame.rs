//! Frame codec - command/status constants and fixed-size frame layout
//!
//! Wire format:
//! - command frame, 5 bytes: [cmd][b1][b2][b3][chk]
//! - short response, 6 bytes: [cmd][status][b1][b2][b3][chk]
//! - field response, 84 bytes: [cmd][status][81 cells row-major][chk]
//!
//! The trailing byte of every frame is the XOR of all preceding bytes.
//! Responses echo the command byte and, for short frames, the request
//! payload.

use arrayvec::ArrayVec;

use crate::types::{GameError, CELL_COUNT};

// Commands
pub const CMD_START: u8 = 0x01;
pub const CMD_RESTART: u8 = 0x02;
pub const CMD_GIVEUP: u8 = 0x03;
pub const CMD_SET: u8 = 0x04;
pub const CMD_CLEAR: u8 = 0x05;
pub const CMD_CLEARALL: u8 = 0x06;
pub const CMD_FIELD: u8 = 0x07;
pub const CMD_DIFFICULTY: u8 = 0x08;
pub const CMD_HINT: u8 = 0x98;
pub const CMD_SOLUTION: u8 = 0x99;

// Statuses
pub const STATUS_OK: u8 = 0x10;
pub const STATUS_INVALID: u8 = 0x11;
pub const STATUS_LOCKED: u8 = 0x12;
pub const STATUS_CHKERR: u8 = 0x13;
pub const STATUS_LOSE: u8 = 0x14;
pub const STATUS_WIN: u8 = 0x15;
pub const STATUS_FAIL: u8 = 0x16;
pub const STATUS_HINT: u8 = 0x65;
pub const STATUS_SOLUTION: u8 = 0x66;

/// Frame sizes
pub const CMD_FRAME_LEN: usize = 5;
pub const SHORT_FRAME_LEN: usize = 6;
pub const FIELD_FRAME_LEN: usize = 2 + CELL_COUNT + 1;

/// XOR of all bytes, the checksum every frame carries in its last byte
pub fn xor_checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, &b| acc ^ b)
}

/// Why an inbound byte sequence was not a usable command frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Not exactly 5 bytes
    WrongLength,
    /// Checksum byte does not match the payload
    BadChecksum,
}

/// A validated inbound command frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame {
    pub cmd: u8,
    pub b1: u8,
    pub b2: u8,
    pub b3: u8,
}

impl CommandFrame {
    /// Parse and checksum-verify an inbound frame
    pub fn parse(data: &[u8]) -> Result<Self, FrameError> {
        if data.len() != CMD_FRAME_LEN {
            return Err(FrameError::WrongLength);
        }
        if xor_checksum(&data[..CMD_FRAME_LEN - 1]) != data[CMD_FRAME_LEN - 1] {
            return Err(FrameError::BadChecksum);
        }
        Ok(Self {
            cmd: data[0],
            b1: data[1],
            b2: data[2],
            b3: data[3],
        })
    }

    /// Map the command byte to a typed command
    pub fn decode(&self) -> Result<Command, GameError> {
        match self.cmd {
            CMD_START => Ok(Command::Start),
            CMD_RESTART => Ok(Command::Restart),
            CMD_GIVEUP => Ok(Command::GiveUp),
            CMD_SET => Ok(Command::Set {
                row: self.b1,
                col: self.b2,
                value: self.b3,
            }),
            CMD_CLEAR => Ok(Command::Clear {
                row: self.b1,
                col: self.b2,
            }),
            CMD_CLEARALL => Ok(Command::ClearAll),
            CMD_FIELD => Ok(Command::Field),
            CMD_DIFFICULTY => Ok(Command::Difficulty { level: self.b1 }),
            CMD_HINT => Ok(Command::Hint {
                row: self.b1,
                col: self.b2,
            }),
            CMD_SOLUTION => Ok(Command::Solution),
            _ => Err(GameError::UnknownCommand),
        }
    }

    /// Encode an outbound command frame (the client side of the link)
    pub fn encode(&self) -> [u8; CMD_FRAME_LEN] {
        let mut frame = [self.cmd, self.b1, self.b2, self.b3, 0];
        frame[CMD_FRAME_LEN - 1] = xor_checksum(&frame[..CMD_FRAME_LEN - 1]);
        frame
    }
}

/// Typed inbound command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Restart,
    GiveUp,
    Set { row: u8, col: u8, value: u8 },
    Clear { row: u8, col: u8 },
    ClearAll,
    Field,
    Difficulty { level: u8 },
    Hint { row: u8, col: u8 },
    Solution,
}

/// One outbound frame, short or field-sized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutFrame {
    Short([u8; SHORT_FRAME_LEN]),
    Field([u8; FIELD_FRAME_LEN]),
}

impl OutFrame {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            OutFrame::Short(frame) => frame,
            OutFrame::Field(frame) => frame,
        }
    }

    /// The status byte carried by the frame
    pub fn status(&self) -> u8 {
        self.as_bytes()[1]
    }
}

/// Encode a 6-byte short response
pub fn encode_short(cmd: u8, status: u8, b1: u8, b2: u8, b3: u8) -> [u8; SHORT_FRAME_LEN] {
    let mut frame = [cmd, status, b1, b2, b3, 0];
    frame[SHORT_FRAME_LEN - 1] = xor_checksum(&frame[..SHORT_FRAME_LEN - 1]);
    frame
}

/// Encode an 84-byte field response carrying the full 81-cell grid
pub fn encode_field(cmd: u8, status: u8, cells: &[u8; CELL_COUNT]) -> [u8; FIELD_FRAME_LEN] {
    let mut frame = [0u8; FIELD_FRAME_LEN];
    frame[0] = cmd;
    frame[1] = status;
    frame[2..2 + CELL_COUNT].copy_from_slice(cells);
    frame[FIELD_FRAME_LEN - 1] = xor_checksum(&frame[..FIELD_FRAME_LEN - 1]);
    frame
}

/// The bounded frame sequence a single command produces. At most two
/// frames: only CMD_FIELD answers with a progress frame ahead of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    frames: ArrayVec<OutFrame, 2>,
}

impl Reply {
    pub fn short(cmd: u8, status: u8, b1: u8, b2: u8, b3: u8) -> Self {
        let mut frames = ArrayVec::new();
        frames.push(OutFrame::Short(encode_short(cmd, status, b1, b2, b3)));
        Self { frames }
    }

    pub fn field(cmd: u8, status: u8, cells: &[u8; CELL_COUNT]) -> Self {
        let mut frames = ArrayVec::new();
        frames.push(OutFrame::Field(encode_field(cmd, status, cells)));
        Self { frames }
    }

    /// Short progress frame followed by the grid frame
    pub fn progress_and_field(
        cmd: u8,
        status: u8,
        initial_empty: u8,
        now_empty: u8,
        cells: &[u8; CELL_COUNT],
    ) -> Self {
        let mut frames = ArrayVec::new();
        frames.push(OutFrame::Short(encode_short(
            cmd,
            status,
            initial_empty,
            now_empty,
            0,
        )));
        frames.push(OutFrame::Field(encode_field(cmd, status, cells)));
        Self { frames }
    }

    pub fn frames(&self) -> &[OutFrame] {
        &self.frames
    }

    /// Status byte of the leading frame
    pub fn status(&self) -> u8 {
        self.frames[0].status()
    }
}

/// Human-readable command name for logs
pub fn command_name(cmd: u8) -> &'static str {
    match cmd {
        CMD_START => "START",
        CMD_RESTART => "RESTART",
        CMD_GIVEUP => "GIVEUP",
        CMD_SET => "SET",
        CMD_CLEAR => "CLEAR",
        CMD_CLEARALL => "CLEARALL",
        CMD_FIELD => "FIELD",
        CMD_DIFFICULTY => "DIFFICULTY",
        CMD_HINT => "HINT",
        CMD_SOLUTION => "SOLUTION",
        _ => "UNKNOWN",
    }
}

/// Human-readable status name for logs
pub fn status_name(status: u8) -> &'static str {
    match status {
        STATUS_OK => "OK",
        STATUS_INVALID => "INVALID",
        STATUS_LOCKED => "LOCKED",
        STATUS_CHKERR => "CHKERR",
        STATUS_LOSE => "LOSE",
        STATUS_WIN => "WIN",
        STATUS_FAIL => "FAIL",
        STATUS_HINT => "HINT",
        STATUS_SOLUTION => "SOLUTION",
        _ => "UNKNOWN",
    }
}

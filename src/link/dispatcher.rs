//! Command dispatcher - one command frame in, one bounded reply out
//!
//! Owns the single game session; every inbound frame is decoded, applied,
//! and answered here. Game-logic failures become status bytes, never
//! panics: a malformed or unknown frame gets an error reply and the
//! dispatcher keeps running.

use crate::core::session::{GameSession, HintOutcome, SetOutcome};
use crate::link::frame::{
    Command, CommandFrame, FrameError, Reply, CMD_FIELD, CMD_SOLUTION, STATUS_CHKERR, STATUS_FAIL,
    STATUS_HINT, STATUS_INVALID, STATUS_LOCKED, STATUS_LOSE, STATUS_OK, STATUS_SOLUTION,
    STATUS_WIN,
};
use crate::types::GameError;

/// Map a game-logic failure to its wire status
fn status_for(err: GameError) -> u8 {
    match err {
        GameError::OutOfRange | GameError::InvalidValue | GameError::InvalidState => STATUS_INVALID,
        GameError::Locked => STATUS_LOCKED,
        GameError::UnknownCommand => STATUS_FAIL,
    }
}

/// Decodes frames and drives the session state machine
#[derive(Debug)]
pub struct Dispatcher {
    session: GameSession,
}

impl Dispatcher {
    pub fn new(session: GameSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Process one raw inbound frame and produce the reply frames.
    /// Total: every possible input gets a reply.
    pub fn handle(&mut self, raw: &[u8]) -> Reply {
        let frame = match CommandFrame::parse(raw) {
            Ok(frame) => frame,
            Err(FrameError::WrongLength) => {
                let cmd = raw.first().copied().unwrap_or(0);
                return Reply::short(cmd, STATUS_INVALID, 0, 0, 0);
            }
            Err(FrameError::BadChecksum) => {
                return Reply::short(raw[0], STATUS_CHKERR, raw[1], raw[2], raw[3]);
            }
        };

        let command = match frame.decode() {
            Ok(command) => command,
            Err(err) => return self.error_reply(&frame, err),
        };

        match command {
            Command::Start => match self.session.start() {
                Ok(()) => Reply::field(frame.cmd, STATUS_OK, &self.session.snapshot()),
                Err(err) => self.error_reply(&frame, err),
            },

            Command::Restart => {
                self.session.restart();
                Reply::field(frame.cmd, STATUS_OK, &self.session.snapshot())
            }

            Command::GiveUp => match self.session.give_up() {
                Ok(()) => Reply::short(frame.cmd, STATUS_OK, 0, 0, 0),
                Err(err) => self.error_reply(&frame, err),
            },

            Command::Set { row, col, value } => match self.session.set(row, col, value) {
                Ok(outcome) => {
                    let status = match outcome {
                        SetOutcome::Stored => STATUS_OK,
                        SetOutcome::Conflict => STATUS_CHKERR,
                        SetOutcome::Won => STATUS_WIN,
                        SetOutcome::Lost => STATUS_LOSE,
                    };
                    Reply::short(frame.cmd, status, row, col, value)
                }
                Err(err) => self.error_reply(&frame, err),
            },

            Command::Clear { row, col } => match self.session.clear(row, col) {
                Ok(()) => Reply::short(frame.cmd, STATUS_OK, row, col, 0),
                Err(err) => self.error_reply(&frame, err),
            },

            Command::ClearAll => match self.session.clear_all() {
                Ok(()) => Reply::short(frame.cmd, STATUS_OK, 0, 0, 0),
                Err(err) => self.error_reply(&frame, err),
            },

            Command::Field => match self.session.progress() {
                Ok((initial_empty, now_empty)) => Reply::progress_and_field(
                    CMD_FIELD,
                    STATUS_OK,
                    initial_empty,
                    now_empty,
                    &self.session.snapshot(),
                ),
                Err(err) => self.error_reply(&frame, err),
            },

            Command::Difficulty { level } => match self.session.set_difficulty(level) {
                Ok(difficulty) => Reply::short(frame.cmd, STATUS_OK, difficulty.level(), 0, 0),
                Err(err) => self.error_reply(&frame, err),
            },

            Command::Hint { row, col } => match self.session.hint(row, col) {
                Ok(HintOutcome::Revealed(value)) => {
                    Reply::short(frame.cmd, STATUS_HINT, row, col, value)
                }
                Ok(HintOutcome::Won(value)) => Reply::short(frame.cmd, STATUS_WIN, row, col, value),
                Err(err) => self.error_reply(&frame, err),
            },

            Command::Solution => match self.session.solution() {
                Ok(solution) => Reply::field(CMD_SOLUTION, STATUS_SOLUTION, solution),
                Err(err) => self.error_reply(&frame, err),
            },
        }
    }

    /// Short error reply echoing the request payload
    fn error_reply(&self, frame: &CommandFrame, err: GameError) -> Reply {
        Reply::short(frame.cmd, status_for(err), frame.b1, frame.b2, frame.b3)
    }
}

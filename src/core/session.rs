//! Game session - lifecycle and rules around one board
//!
//! Ties the board, the generator, and the RNG together. Every mutation
//! arrives through here so the lifecycle gates in one place: commands on a
//! session that is not in progress fail with `InvalidState` instead of
//! touching the board.
//!
//! The session keeps the generated solution grid for hints and the solution
//! reveal, and tracks consecutive conflicting placements for the loss rule.

use crate::core::board::Board;
use crate::core::generator::{self, Puzzle};
use crate::core::rng::SimpleRng;
use crate::types::{Difficulty, GameError, Lifecycle, CELL_COUNT, DEFAULT_MAX_MISTAKES};

/// Tunable game rules
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Difficulty used by the next puzzle generation
    pub difficulty: Difficulty,
    /// Reject conflicting placements outright instead of storing them
    pub strict_set: bool,
    /// Consecutive conflicting placements before the game is lost; 0 disables
    pub max_mistakes: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            strict_set: false,
            max_mistakes: DEFAULT_MAX_MISTAKES,
        }
    }
}

/// Result of a placement that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// Stored and consistent with all constraints
    Stored,
    /// Conflicting with a row, column, or box. In the default mode the value
    /// is on the board anyway; under `strict_set` it was rejected.
    Conflict,
    /// The placement completed the board
    Won,
    /// The placement was conflicting and exhausted the mistake budget
    Lost,
}

/// Result of a hint request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintOutcome {
    /// The solution digit written to the requested cell
    Revealed(u8),
    /// The revealed digit completed the board
    Won(u8),
}

/// A single game: board, retained solution, and lifecycle state
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    solution: [u8; CELL_COUNT],
    lifecycle: Lifecycle,
    config: SessionConfig,
    rng: SimpleRng,
    /// Monotonic puzzle counter (increments on every generation)
    episode: u32,
    /// Empty cells right after generation, for progress reports
    initial_empty: u8,
    /// Consecutive conflicting placements
    mistakes: u8,
}

impl GameSession {
    /// Create an unstarted session with the given RNG seed
    pub fn new(seed: u32, config: SessionConfig) -> Self {
        Self {
            board: Board::new_blank(),
            solution: [0u8; CELL_COUNT],
            lifecycle: Lifecycle::Unstarted,
            config,
            rng: SimpleRng::new(seed),
            episode: 0,
            initial_empty: 0,
            mistakes: 0,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn mistakes(&self) -> u8 {
        self.mistakes
    }

    /// Start a new game. Fails while a game is already running; use
    /// `restart` for an unconditional new puzzle.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.lifecycle == Lifecycle::InProgress {
            return Err(GameError::InvalidState);
        }
        self.regenerate();
        Ok(())
    }

    /// Abandon whatever is on the board and begin a fresh puzzle
    pub fn restart(&mut self) {
        self.regenerate();
    }

    fn regenerate(&mut self) {
        let Puzzle { givens, solution } = generator::generate(self.config.difficulty, &mut self.rng);
        self.board = Board::new_blank();
        self.board.load_puzzle(&givens);
        self.solution = solution;
        self.lifecycle = Lifecycle::InProgress;
        self.episode = self.episode.wrapping_add(1);
        self.initial_empty = self.board.empty_count();
        self.mistakes = 0;
    }

    /// Surrender the current game
    pub fn give_up(&mut self) -> Result<(), GameError> {
        self.require_in_progress()?;
        self.lifecycle = Lifecycle::GivenUp;
        Ok(())
    }

    /// Change the difficulty for subsequent generations. Not allowed while
    /// a game is running.
    pub fn set_difficulty(&mut self, level: u8) -> Result<Difficulty, GameError> {
        if self.lifecycle == Lifecycle::InProgress {
            return Err(GameError::InvalidState);
        }
        let difficulty = Difficulty::from_level(level).ok_or(GameError::InvalidValue)?;
        self.config.difficulty = difficulty;
        Ok(difficulty)
    }

    /// Place a digit at (row, col).
    ///
    /// A consistent placement resets the mistake streak and may win the
    /// game. A conflicting one extends the streak and may lose it; whether
    /// the conflicting digit lands on the board depends on `strict_set`.
    pub fn set(&mut self, row: u8, col: u8, value: u8) -> Result<SetOutcome, GameError> {
        self.require_in_progress()?;

        let consistent = if self.config.strict_set {
            self.board.validate_write(row, col, value)?;
            let ok = self.board.is_valid_placement(row, col, value);
            if ok {
                self.board.set(row, col, value)?;
            }
            ok
        } else {
            self.board.set(row, col, value)?
        };

        if consistent {
            self.mistakes = 0;
            if self.board.is_complete() {
                self.lifecycle = Lifecycle::Won;
                return Ok(SetOutcome::Won);
            }
            return Ok(SetOutcome::Stored);
        }

        self.mistakes = self.mistakes.saturating_add(1);
        if self.config.max_mistakes > 0 && self.mistakes >= self.config.max_mistakes {
            self.lifecycle = Lifecycle::Lost;
            return Ok(SetOutcome::Lost);
        }
        Ok(SetOutcome::Conflict)
    }

    /// Empty the cell at (row, col)
    pub fn clear(&mut self, row: u8, col: u8) -> Result<(), GameError> {
        self.require_in_progress()?;
        self.board.clear(row, col)
    }

    /// Empty every editable cell and reset the mistake streak
    pub fn clear_all(&mut self) -> Result<(), GameError> {
        self.require_in_progress()?;
        self.board.clear_all();
        self.mistakes = 0;
        Ok(())
    }

    /// Reveal the solution digit at (row, col), writing it to the board.
    /// Hinting a fixed cell is refused the same way a write is.
    pub fn hint(&mut self, row: u8, col: u8) -> Result<HintOutcome, GameError> {
        self.require_in_progress()?;
        let idx = cell_index(row, col).ok_or(GameError::OutOfRange)?;
        if self.board.is_fixed(row, col) {
            return Err(GameError::Locked);
        }
        let value = self.solution[idx];
        // The digit comes from the solution grid, so it can only conflict
        // with a wrong editable digit elsewhere; store it regardless.
        self.board.set(row, col, value)?;
        if self.board.is_complete() {
            self.lifecycle = Lifecycle::Won;
            return Ok(HintOutcome::Won(value));
        }
        Ok(HintOutcome::Revealed(value))
    }

    /// The full solution grid, readable only while a game is running
    pub fn solution(&self) -> Result<&[u8; CELL_COUNT], GameError> {
        self.require_in_progress()?;
        Ok(&self.solution)
    }

    /// (cells empty at puzzle start, cells empty now)
    pub fn progress(&self) -> Result<(u8, u8), GameError> {
        self.require_in_progress()?;
        Ok((self.initial_empty, self.board.empty_count()))
    }

    /// The 81-cell grid, row-major
    pub fn snapshot(&self) -> [u8; CELL_COUNT] {
        self.board.values()
    }

    fn require_in_progress(&self) -> Result<(), GameError> {
        if self.lifecycle != Lifecycle::InProgress {
            return Err(GameError::InvalidState);
        }
        Ok(())
    }

    /// Build a session around a hand-crafted board, bypassing generation
    #[cfg(test)]
    pub fn from_parts(board: Board, solution: [u8; CELL_COUNT], config: SessionConfig) -> Self {
        let initial_empty = board.empty_count();
        Self {
            board,
            solution,
            lifecycle: Lifecycle::InProgress,
            config,
            rng: SimpleRng::new(1),
            episode: 1,
            initial_empty,
            mistakes: 0,
        }
    }
}

fn cell_index(row: u8, col: u8) -> Option<usize> {
    use crate::types::GRID_SIZE;
    if row >= GRID_SIZE || col >= GRID_SIZE {
        return None;
    }
    Some((row as usize) * (GRID_SIZE as usize) + (col as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A solved grid laid out with the classic shift pattern
    fn solved_grid() -> [u8; CELL_COUNT] {
        let mut grid = [0u8; CELL_COUNT];
        for row in 0..9usize {
            for col in 0..9usize {
                grid[row * 9 + col] = (((row * 3 + row / 3 + col) % 9) + 1) as u8;
            }
        }
        grid
    }

    /// A session whose puzzle is the solved grid minus the listed holes
    fn session_with_holes(holes: &[(u8, u8)], config: SessionConfig) -> GameSession {
        let solution = solved_grid();
        let mut givens = solution;
        for &(r, c) in holes {
            givens[(r as usize) * 9 + (c as usize)] = 0;
        }
        let mut board = Board::new_blank();
        board.load_puzzle(&givens);
        GameSession::from_parts(board, solution, config)
    }

    #[test]
    fn test_new_session_unstarted() {
        let mut session = GameSession::new(1, SessionConfig::default());
        assert_eq!(session.lifecycle(), Lifecycle::Unstarted);
        assert_eq!(session.episode(), 0);
        assert_eq!(session.set(0, 0, 1), Err(GameError::InvalidState));
        assert_eq!(session.clear(0, 0), Err(GameError::InvalidState));
        assert_eq!(session.progress(), Err(GameError::InvalidState));
    }

    #[test]
    fn test_start_generates_and_gates() {
        let mut session = GameSession::new(1, SessionConfig::default());
        session.start().unwrap();
        assert_eq!(session.lifecycle(), Lifecycle::InProgress);
        assert_eq!(session.episode(), 1);
        assert!(!session.board().is_complete());

        // Starting twice is refused, restarting is not
        assert_eq!(session.start(), Err(GameError::InvalidState));
        session.restart();
        assert_eq!(session.episode(), 2);
        assert_eq!(session.lifecycle(), Lifecycle::InProgress);
    }

    #[test]
    fn test_restart_changes_puzzle() {
        let mut session = GameSession::new(1, SessionConfig::default());
        session.start().unwrap();
        let first = session.snapshot();
        session.restart();
        assert_ne!(session.snapshot(), first);
    }

    #[test]
    fn test_give_up_blocks_play() {
        let mut session = GameSession::new(1, SessionConfig::default());
        session.start().unwrap();
        session.give_up().unwrap();
        assert_eq!(session.lifecycle(), Lifecycle::GivenUp);
        assert_eq!(session.set(0, 0, 1), Err(GameError::InvalidState));
        assert_eq!(session.give_up(), Err(GameError::InvalidState));

        // A terminal session can start again
        session.start().unwrap();
        assert_eq!(session.lifecycle(), Lifecycle::InProgress);
    }

    #[test]
    fn test_set_difficulty_gated_by_state() {
        let mut session = GameSession::new(1, SessionConfig::default());
        assert_eq!(session.set_difficulty(3), Ok(Difficulty::Hard));
        assert_eq!(session.set_difficulty(0), Err(GameError::InvalidValue));

        session.start().unwrap();
        assert_eq!(session.set_difficulty(1), Err(GameError::InvalidState));
    }

    #[test]
    fn test_set_completing_board_wins() {
        let mut session = session_with_holes(&[(4, 4)], SessionConfig::default());
        let value = solved_grid()[4 * 9 + 4];
        assert_eq!(session.set(4, 4, value), Ok(SetOutcome::Won));
        assert_eq!(session.lifecycle(), Lifecycle::Won);
    }

    #[test]
    fn test_conflict_streak_loses() {
        let config = SessionConfig {
            max_mistakes: 2,
            ..SessionConfig::default()
        };
        let mut session = session_with_holes(&[(0, 0), (8, 8)], config);
        let wrong = solved_grid()[1]; // (0,1)'s digit conflicts at (0,0)

        assert_eq!(session.set(0, 0, wrong), Ok(SetOutcome::Conflict));
        assert_eq!(session.mistakes(), 1);
        assert_eq!(session.set(0, 0, wrong), Ok(SetOutcome::Lost));
        assert_eq!(session.lifecycle(), Lifecycle::Lost);
        assert_eq!(session.set(8, 8, 1), Err(GameError::InvalidState));
    }

    #[test]
    fn test_consistent_set_resets_streak() {
        let config = SessionConfig {
            max_mistakes: 2,
            ..SessionConfig::default()
        };
        let solution = solved_grid();
        let mut session = session_with_holes(&[(0, 0), (8, 8), (4, 4)], config);
        let wrong = solution[1];

        assert_eq!(session.set(0, 0, wrong), Ok(SetOutcome::Conflict));
        assert_eq!(session.set(0, 0, solution[0]), Ok(SetOutcome::Stored));
        assert_eq!(session.mistakes(), 0);
    }

    #[test]
    fn test_strict_set_rejects_without_storing() {
        let config = SessionConfig {
            strict_set: true,
            ..SessionConfig::default()
        };
        let mut session = session_with_holes(&[(0, 0), (8, 8)], config);
        let wrong = solved_grid()[1];

        assert_eq!(session.set(0, 0, wrong), Ok(SetOutcome::Conflict));
        assert_eq!(session.board().value(0, 0), 0);
        assert_eq!(session.mistakes(), 1);
    }

    #[test]
    fn test_clear_all_resets_mistakes() {
        let mut session = session_with_holes(&[(0, 0), (8, 8)], SessionConfig::default());
        let wrong = solved_grid()[1];
        session.set(0, 0, wrong).unwrap();
        assert_eq!(session.mistakes(), 1);

        session.clear_all().unwrap();
        assert_eq!(session.mistakes(), 0);
        assert_eq!(session.board().value(0, 0), 0);
    }

    #[test]
    fn test_hint_reveals_solution_digit() {
        let mut session = session_with_holes(&[(2, 3), (8, 8)], SessionConfig::default());
        let expected = solved_grid()[2 * 9 + 3];

        assert_eq!(session.hint(2, 3), Ok(HintOutcome::Revealed(expected)));
        assert_eq!(session.board().value(2, 3), expected);
        assert!(!session.board().is_fixed(2, 3));
    }

    #[test]
    fn test_hint_on_last_hole_wins() {
        let mut session = session_with_holes(&[(6, 6)], SessionConfig::default());
        let expected = solved_grid()[6 * 9 + 6];
        assert_eq!(session.hint(6, 6), Ok(HintOutcome::Won(expected)));
        assert_eq!(session.lifecycle(), Lifecycle::Won);
    }

    #[test]
    fn test_hint_respects_fixed_and_range() {
        let mut session = session_with_holes(&[(6, 6)], SessionConfig::default());
        assert_eq!(session.hint(0, 0), Err(GameError::Locked));
        assert_eq!(session.hint(9, 0), Err(GameError::OutOfRange));
    }

    #[test]
    fn test_progress_counts_holes() {
        let mut session = session_with_holes(&[(0, 0), (1, 1), (8, 8)], SessionConfig::default());
        assert_eq!(session.progress(), Ok((3, 3)));
        session.set(0, 0, solved_grid()[0]).unwrap();
        assert_eq!(session.progress(), Ok((3, 2)));
    }

    #[test]
    fn test_solution_matches_puzzle() {
        let mut session = GameSession::new(5, SessionConfig::default());
        session.start().unwrap();
        let solution = *session.solution().unwrap();
        let snapshot = session.snapshot();
        for i in 0..CELL_COUNT {
            assert!(snapshot[i] == 0 || snapshot[i] == solution[i]);
        }
    }
}

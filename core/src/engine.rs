use std::collections::{HashSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::*;

/// Seconds a new game may be played for unless the caller picks otherwise.
pub const DEFAULT_DURATION_SECONDS: i32 = 90;

/// Lifecycle of a game.
///
/// `New -> Started <-> Paused`, then one of the terminal states. `Won` and
/// `Lost` are set by the driving caller, see [`Game::settle_reveal`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    #[default]
    New,
    Started,
    Paused,
    Timeout,
    Won,
    Lost,
}

impl GameState {
    /// Once finished, no further operation is meaningful.
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Timeout | Self::Won | Self::Lost)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Started => "started",
            Self::Paused => "paused",
            Self::Timeout => "timeout",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`Game::settle_reveal`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Rows of [`ViewCell`], the externally visible rendering of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardView(pub Vec<Vec<ViewCell>>);

/// Persisted form of a [`Game`]: both layers as symbol matrices plus the
/// lifecycle fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub player_board: Overlay,
    pub state: GameState,
    pub duration_seconds: i32,
}

/// One board, its overlay and the lifecycle state.
///
/// Operations mutate in place and never fail halfway: coordinates are
/// validated before anything is written.
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    board: Board,
    overlay: Overlay,
    state: GameState,
    duration_seconds: i32,
}

impl Game {
    pub fn new(board: Board, overlay: Overlay) -> Result<Self> {
        if board.size() != overlay.size() {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(Self {
            board,
            overlay,
            state: GameState::New,
            duration_seconds: DEFAULT_DURATION_SECONDS,
        })
    }

    /// Starts from a freshly generated, all-hidden board.
    pub fn generate(config: GameConfig, generator: impl BoardGenerator) -> Self {
        let (board, overlay) = generator.generate(config);
        Self {
            board,
            overlay,
            state: GameState::New,
            duration_seconds: DEFAULT_DURATION_SECONDS,
        }
    }

    pub fn with_duration_seconds(mut self, duration_seconds: i32) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }

    pub fn from_snapshot(snapshot: GameSnapshot) -> Result<Self> {
        let GameSnapshot {
            board,
            player_board,
            state,
            duration_seconds,
        } = snapshot;
        let mut game = Self::new(board, player_board)?.with_duration_seconds(duration_seconds);
        game.state = state;
        Ok(game)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            player_board: self.overlay.clone(),
            state: self.state,
            duration_seconds: self.duration_seconds,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn duration_seconds(&self) -> i32 {
        self.duration_seconds
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn checked_coords(&self, x: i64, y: i64) -> Result<Coord2> {
        self.board.checked_coords(x, y)
    }

    /// Opens a cell, flooding outward through zero-count cells.
    ///
    /// Does not look at the mine layer beyond adjacency counts and does not
    /// change the state; returns how many cells were newly opened.
    pub fn reveal(&mut self, coords: Coord2) -> Result<CellCount> {
        let coords = self.board.validate_coords(coords)?;

        if self.overlay[coords].is_revealed() {
            return Ok(0);
        }

        let mut opened = 0;
        let mut visited = HashSet::from([coords]);
        let mut to_visit = VecDeque::from([coords]);

        while let Some(visit_coords) = to_visit.pop_front() {
            if self.overlay[visit_coords].is_revealed() {
                continue;
            }

            self.overlay[visit_coords] = OverlayCell::Revealed;
            opened += 1;

            if self.board[visit_coords] == MineCell::Count(0) {
                let overlay = &self.overlay;
                to_visit.extend(
                    self.board
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| !overlay[pos].is_revealed())
                        .filter(|&pos| visited.insert(pos)),
                );
            }
        }

        log::trace!("Revealed {} cells from {:?}", opened, coords);
        Ok(opened)
    }

    pub fn is_mine_at(&self, coords: Coord2) -> Result<bool> {
        self.board.is_mine_at(coords)
    }

    /// Whether every safe cell is open. Marks on mine cells do not matter.
    pub fn is_all_revealed(&self) -> bool {
        let revealed_safe = self
            .board
            .cells()
            .iter()
            .zip(self.overlay.cells().iter())
            .filter(|(mine, overlay)| !mine.is_mine() && overlay.is_revealed())
            .count();
        revealed_safe == usize::from(self.board.safe_cell_count())
    }

    /// Flags a cell, replacing whatever mark it had, revealed included.
    pub fn mark_flag_at(&mut self, coords: Coord2) -> Result<()> {
        self.mark_at(coords, OverlayCell::Flagged)
    }

    /// Question-marks a cell, replacing whatever mark it had, revealed included.
    pub fn mark_question_at(&mut self, coords: Coord2) -> Result<()> {
        self.mark_at(coords, OverlayCell::Questioned)
    }

    fn mark_at(&mut self, coords: Coord2, mark: OverlayCell) -> Result<()> {
        let coords = self.board.validate_coords(coords)?;
        if self.overlay[coords].is_revealed() {
            log::debug!("Overwriting revealed cell at {:?} with {:?}", coords, mark);
        }
        self.overlay[coords] = mark;
        Ok(())
    }

    /// Reveals and applies the win/loss rule: landing on a mine loses,
    /// clearing every safe cell wins.
    pub fn settle_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let opened = self.reveal(coords)?;

        Ok(if self.is_mine_at(coords)? {
            self.set_state(GameState::Lost);
            RevealOutcome::HitMine
        } else if self.is_all_revealed() {
            self.set_state(GameState::Won);
            RevealOutcome::Won
        } else if opened == 0 {
            RevealOutcome::NoChange
        } else {
            RevealOutcome::Revealed
        })
    }

    /// Counts down one time unit, timing out when the counter reaches zero.
    pub fn tick(&mut self) -> GameState {
        self.duration_seconds = self.duration_seconds.saturating_sub(1);
        if self.duration_seconds == 0 {
            self.set_state(GameState::Timeout);
        }
        self.state
    }

    pub fn start(&mut self) {
        self.set_state(GameState::Started);
    }

    pub fn pause(&mut self) {
        self.set_state(GameState::Paused);
    }

    /// Back to started. Also consumes one time unit, without a timeout check.
    pub fn resume(&mut self) {
        self.duration_seconds = self.duration_seconds.saturating_sub(1);
        self.set_state(GameState::Started);
    }

    pub fn set_state(&mut self, state: GameState) {
        if self.state != state {
            log::debug!("Game state {} -> {}", self.state, state);
            self.state = state;
        }
    }

    pub fn view(&self) -> BoardView {
        let board = self.board.cells();
        let rows = board
            .rows()
            .into_iter()
            .zip(self.overlay.cells().rows())
            .map(|(mines, marks)| {
                mines
                    .iter()
                    .zip(marks.iter())
                    .map(|(&mine, &mark)| ViewCell::new(mine, mark))
                    .collect()
            })
            .collect();
        BoardView(rows)
    }
}

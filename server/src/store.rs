use std::collections::BTreeMap;

use minesweeper_core::{Game, GameError, GameId, Result};
use parking_lot::Mutex;

/// A stored game together with what the boundary tracks about it.
#[derive(Clone, Debug, PartialEq)]
pub struct GameEntry {
    pub id: GameId,
    pub title: String,
    pub player: String,
    pub game: Game,
}

/// Where games live between requests.
///
/// `update` runs the whole operation under exclusive access to the entry and
/// keeps the change only if it succeeds.
pub trait GameStore: Send + Sync {
    fn insert(&self, title: String, player: String, game: Game) -> GameEntry;

    fn get(&self, id: GameId) -> Result<GameEntry>;

    fn list(&self) -> Vec<GameEntry>;

    fn update(
        &self,
        id: GameId,
        op: &mut dyn FnMut(&mut GameEntry) -> Result<()>,
    ) -> Result<GameEntry>;
}

/// In-memory game storage, ids count up from 1.
pub struct MemoryGameStore {
    inner: Mutex<Inner>,
}

struct Inner {
    games: BTreeMap<GameId, GameEntry>,
    next_id: GameId,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                games: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryGameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStore for MemoryGameStore {
    fn insert(&self, title: String, player: String, game: Game) -> GameEntry {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;

        let entry = GameEntry {
            id,
            title,
            player,
            game,
        };
        inner.games.insert(id, entry.clone());
        log::debug!("Stored game {} for {}", id, entry.player);
        entry
    }

    fn get(&self, id: GameId) -> Result<GameEntry> {
        self.inner
            .lock()
            .games
            .get(&id)
            .cloned()
            .ok_or(GameError::NotFound(id))
    }

    fn list(&self) -> Vec<GameEntry> {
        self.inner.lock().games.values().cloned().collect()
    }

    fn update(
        &self,
        id: GameId,
        op: &mut dyn FnMut(&mut GameEntry) -> Result<()>,
    ) -> Result<GameEntry> {
        let mut inner = self.inner.lock();
        let entry = inner.games.get_mut(&id).ok_or(GameError::NotFound(id))?;

        let mut draft = entry.clone();
        op(&mut draft)?;
        *entry = draft.clone();
        Ok(draft)
    }
}

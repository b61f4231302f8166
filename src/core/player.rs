//! Player identification, per-player data storage and the active roster.
//!
//! ## PlayerId
//!
//! Type-safe player identifier supporting up to 255 players.
//!
//! ## PlayerMap
//!
//! Per-player data storage backed by `Vec` for O(1) access, indexed by the
//! ids players had at game start (elimination never reuses an id).
//!
//! ## Roster
//!
//! The ordered set of players still in the game, with exactly one current
//! player while any remain.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Player identifier.
///
/// Player indices are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use dice_wars::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[0], PlayerId::new(0));
    /// assert_eq!(players[3], PlayerId::new(3));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count.min(256)).map(|i| PlayerId(i as u8))
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// RGB color used by the presentation layer to paint a player's cells.
///
/// The engine never interprets colors; it only carries them to snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PlayerColor {
    /// Create a color from its components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Default palette, assigned to players in order.
    pub const PALETTE: [PlayerColor; 8] = [
        PlayerColor::rgb(0, 0, 255),
        PlayerColor::rgb(255, 0, 0),
        PlayerColor::rgb(0, 255, 0),
        PlayerColor::rgb(255, 200, 0),
        PlayerColor::rgb(255, 0, 255),
        PlayerColor::rgb(0, 255, 255),
        PlayerColor::rgb(255, 175, 175),
        PlayerColor::rgb(128, 128, 128),
    ];

    /// Palette color for a player, cycling when there are more players than colors.
    #[must_use]
    pub const fn for_player(player: PlayerId) -> Self {
        Self::PALETTE[player.index() % Self::PALETTE.len()]
    }
}

/// A participant in the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable identity for the whole game.
    pub id: PlayerId,
    /// Presentation color.
    pub color: PlayerColor,
    /// Whether the engine plays this player's turns itself.
    pub automated: bool,
}

impl Player {
    /// Create a human-controlled player with the palette color for `id`.
    #[must_use]
    pub const fn human(id: PlayerId) -> Self {
        Self {
            id,
            color: PlayerColor::for_player(id),
            automated: false,
        }
    }

    /// Create an automated player with the palette color for `id`.
    #[must_use]
    pub const fn automated(id: PlayerId) -> Self {
        Self {
            id,
            color: PlayerColor::for_player(id),
            automated: true,
        }
    }

    /// Check if this player is controlled by a person.
    #[must_use]
    pub const fn is_human(&self) -> bool {
        !self.automated
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use dice_wars::core::{PlayerId, PlayerMap};
///
/// let mut wins: PlayerMap<u32> = PlayerMap::with_value(4, 0);
/// wins[PlayerId::new(1)] += 1;
/// assert_eq!(wins[PlayerId::new(1)], 1);
/// assert_eq!(wins[PlayerId::new(0)], 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    ///
    /// The factory receives the `PlayerId` for each player.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8)
            .map(|i| factory(PlayerId(i)))
            .collect();

        Self { data }
    }

    /// Create a new PlayerMap with all entries set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Create a new PlayerMap with default values.
    #[must_use]
    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

/// Ordered set of players still in the game.
///
/// Exactly one player is current while the roster is non-empty. The roster
/// only ever shrinks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
    current: usize,
}

impl Roster {
    /// Create a roster with the first player current.
    #[must_use]
    pub fn new(players: Vec<Player>) -> Self {
        Self { players, current: 0 }
    }

    /// Active players in turn order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current(&self) -> Option<&Player> {
        self.players.get(self.current)
    }

    /// Id of the player whose turn it is.
    #[must_use]
    pub fn current_id(&self) -> Option<PlayerId> {
        self.current().map(|p| p.id)
    }

    /// Check if `player` holds the turn.
    #[must_use]
    pub fn is_current(&self, player: PlayerId) -> bool {
        self.current_id() == Some(player)
    }

    /// Look up an active player.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player)
    }

    /// Check if `player` is still in the game.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        self.get(player).is_some()
    }

    /// Check if any human player remains.
    #[must_use]
    pub fn has_human(&self) -> bool {
        self.players.iter().any(Player::is_human)
    }

    /// Pass the turn to the next player, wrapping after the last one.
    ///
    /// Returns the new current player.
    pub fn advance(&mut self) -> Option<PlayerId> {
        if self.players.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.players.len();
        log::trace!("Turn passes to {}", self.players[self.current].id);
        self.current_id()
    }

    /// Remove every player for which `keep` returns false.
    ///
    /// Builds a filtered copy instead of removing while iterating. The current
    /// marker stays on the same player; if that player is removed it moves to
    /// the next surviving player in turn order.
    ///
    /// Returns the removed players in roster order.
    pub fn retain(&mut self, keep: impl Fn(&Player) -> bool) -> Vec<Player> {
        let mut kept = Vec::with_capacity(self.players.len());
        let mut removed = Vec::new();
        let mut new_current = None;
        let mut kept_before_current = 0;

        for (i, player) in self.players.iter().enumerate() {
            if keep(player) {
                if i == self.current {
                    new_current = Some(kept.len());
                }
                if i < self.current {
                    kept_before_current += 1;
                }
                kept.push(*player);
            } else {
                removed.push(*player);
            }
        }

        self.current = match new_current {
            Some(index) => index,
            None if kept.is_empty() => 0,
            None => kept_before_current % kept.len(),
        };
        self.players = kept;
        removed
    }
}

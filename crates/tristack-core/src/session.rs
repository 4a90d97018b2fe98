//! Player identity and explicit session state.
//!
//! A [`Session`] is owned by the front end and passed into every call that
//! needs to know who is playing. Nothing in this crate keeps a global
//! "current user".

use crate::ledger::PlayerLedger;
use crate::puzzle::PuzzleId;
use crate::store::{LedgerStore, StoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum length of a player name
pub const MAX_PLAYER_NAME: usize = 32;

/// Errors from session operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("player name must not be empty")]
    EmptyName,

    #[error("player name is longer than 32 characters")]
    NameTooLong,

    #[error("player name may only contain letters, digits, '-', '_' and '.'")]
    InvalidName,
}

/// Identity of a signed-in player
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    /// Validate and normalize a player name (surrounding whitespace is trimmed)
    pub fn new(name: &str) -> Result<Self, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        if name.chars().count() > MAX_PLAYER_NAME {
            return Err(SessionError::NameTooLong);
        }
        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(SessionError::InvalidName);
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PlayerId {
    type Error = SessionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

/// Who is playing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerRef {
    /// Anonymous play; the ledger lives only in the session
    Guest,
    /// Signed-in play; the ledger is persisted in a [`LedgerStore`]
    Player(PlayerId),
}

impl PlayerRef {
    pub fn is_guest(&self) -> bool {
        matches!(self, PlayerRef::Guest)
    }

    pub fn player_id(&self) -> Option<&PlayerId> {
        match self {
            PlayerRef::Guest => None,
            PlayerRef::Player(id) => Some(id),
        }
    }

    /// Name for display
    pub fn display_name(&self) -> &str {
        match self {
            PlayerRef::Guest => "Guest",
            PlayerRef::Player(id) => id.as_str(),
        }
    }
}

/// Session timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle time after which a signed-in player is signed out, in milliseconds
    pub inactivity_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_ms: 30 * 60 * 1000,
        }
    }
}

/// One player's session.
///
/// Timestamps are caller-supplied milliseconds from any monotonic origin so
/// the same code runs natively and in the browser.
#[derive(Debug, Clone)]
pub struct Session {
    player: PlayerRef,
    guest_ledger: PlayerLedger,
    config: SessionConfig,
    last_activity_ms: u64,
}

impl Session {
    /// Start a guest session
    pub fn guest(config: SessionConfig, now_ms: u64) -> Self {
        Self {
            player: PlayerRef::Guest,
            guest_ledger: PlayerLedger::new(),
            config,
            last_activity_ms: now_ms,
        }
    }

    /// Start a signed-in session
    pub fn signed_in(player: PlayerId, config: SessionConfig, now_ms: u64) -> Self {
        let mut session = Self::guest(config, now_ms);
        session.player = PlayerRef::Player(player);
        session
    }

    pub fn player(&self) -> &PlayerRef {
        &self.player
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The in-memory ledger used while playing as a guest
    pub fn guest_ledger(&self) -> &PlayerLedger {
        &self.guest_ledger
    }

    /// Switch to a signed-in player. The guest ledger is discarded.
    pub fn sign_in(&mut self, player: PlayerId, now_ms: u64) {
        log::info!("player {player} signed in");
        self.player = PlayerRef::Player(player);
        self.guest_ledger.clear();
        self.last_activity_ms = now_ms;
    }

    /// Return to guest play with a fresh ledger
    pub fn sign_out(&mut self, now_ms: u64) {
        if let PlayerRef::Player(id) = &self.player {
            log::info!("player {id} signed out");
        }
        self.player = PlayerRef::Guest;
        self.guest_ledger.clear();
        self.last_activity_ms = now_ms;
    }

    /// Forget what this guest has played
    pub fn reset_guest_ledger(&mut self) {
        self.guest_ledger.clear();
    }

    /// Note player activity
    pub fn touch(&mut self, now_ms: u64) {
        self.last_activity_ms = self.last_activity_ms.max(now_ms);
    }

    pub fn idle_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_activity_ms)
    }

    /// Check if the inactivity timeout has passed
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.idle_ms(now_ms) >= self.config.inactivity_timeout_ms
    }

    /// Sign out a signed-in player who has been idle too long.
    /// Returns true if the session was signed out.
    pub fn expire_if_idle(&mut self, now_ms: u64) -> bool {
        if !self.player.is_guest() && self.is_expired(now_ms) {
            log::info!("session idle for {} ms, signing out", self.idle_ms(now_ms));
            self.sign_out(now_ms);
            true
        } else {
            false
        }
    }

    /// The ledger this session reads and records through
    pub fn ledger_source<'a>(&'a mut self, store: &'a dyn LedgerStore) -> LedgerSource<'a> {
        match &self.player {
            PlayerRef::Guest => LedgerSource::Guest(&mut self.guest_ledger),
            PlayerRef::Player(player) => LedgerSource::Persisted { store, player },
        }
    }
}

/// Where a player's recent-puzzle ledger lives
pub enum LedgerSource<'a> {
    /// Caller-held in-memory ledger
    Guest(&'a mut PlayerLedger),
    /// Ledger persisted in an external store
    Persisted {
        store: &'a dyn LedgerStore,
        player: &'a PlayerId,
    },
}

impl LedgerSource<'_> {
    pub fn is_guest(&self) -> bool {
        matches!(self, LedgerSource::Guest(_))
    }

    /// Recently served ids, oldest first
    pub fn recent_ids(&self) -> StoreResult<Vec<PuzzleId>> {
        match self {
            LedgerSource::Guest(ledger) => Ok(ledger.to_vec()),
            LedgerSource::Persisted { store, player } => store.get_recent_ids(player),
        }
    }

    /// Record a served puzzle. For a persisted ledger this is a
    /// read-modify-write against the store; concurrent writers race and the
    /// last write wins.
    pub fn record(&mut self, id: PuzzleId) -> StoreResult<()> {
        match self {
            LedgerSource::Guest(ledger) => {
                ledger.record(id);
                Ok(())
            }
            LedgerSource::Persisted { store, player } => {
                let mut ledger = PlayerLedger::from_ids(store.get_recent_ids(player)?);
                ledger.record(id);
                store.set_recent_ids(player, &ledger.to_vec())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryLedgerStore;

    #[test]
    fn test_player_id_validation() {
        assert_eq!(PlayerId::new("  alice ").unwrap().as_str(), "alice");
        assert_eq!(PlayerId::new("   "), Err(SessionError::EmptyName));
        assert_eq!(
            PlayerId::new(&"a".repeat(33)),
            Err(SessionError::NameTooLong)
        );
        assert_eq!(PlayerId::new("bob smith"), Err(SessionError::InvalidName));
        assert!(PlayerId::new("bob_smith-2.0").is_ok());
    }

    #[test]
    fn test_sign_in_discards_guest_ledger() {
        let mut session = Session::guest(SessionConfig::default(), 0);
        let store = MemoryLedgerStore::new();
        session
            .ledger_source(&store)
            .record(PuzzleId::from("easy-1"))
            .unwrap();
        assert_eq!(session.guest_ledger().len(), 1);

        session.sign_in(PlayerId::new("alice").unwrap(), 10);
        assert!(!session.player().is_guest());
        assert!(session.guest_ledger().is_empty());

        session.sign_out(20);
        assert!(session.player().is_guest());
        assert!(session.guest_ledger().is_empty());
    }

    #[test]
    fn test_persisted_record_read_modify_write() {
        let store = MemoryLedgerStore::new();
        let alice = PlayerId::new("alice").unwrap();
        let mut session = Session::signed_in(alice.clone(), SessionConfig::default(), 0);

        {
            let mut source = session.ledger_source(&store);
            assert!(!source.is_guest());
            source.record("a".into()).unwrap();
            source.record("b".into()).unwrap();
            source.record("a".into()).unwrap();
        }

        assert_eq!(
            store.get_recent_ids(&alice).unwrap(),
            vec![PuzzleId::from("b"), PuzzleId::from("a")]
        );
        assert!(session.guest_ledger().is_empty());
    }

    #[test]
    fn test_inactivity_expiry() {
        let config = SessionConfig {
            inactivity_timeout_ms: 1_000,
        };
        let mut session = Session::signed_in(PlayerId::new("alice").unwrap(), config, 0);

        session.touch(500);
        assert!(!session.expire_if_idle(1_200));
        assert!(session.is_expired(1_500));
        assert!(session.expire_if_idle(1_500));
        assert!(session.player().is_guest());

        // Guests are never signed out
        assert!(!session.expire_if_idle(10_000));
    }
}

use alloc::vec::Vec;
use core::fmt;
use core::ops::{Index, IndexMut};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Valid transitions:
/// - Menu -> Playing
/// - Playing -> GameOver
/// - Playing -> Menu
/// - GameOver -> Menu
/// - GameOver -> Playing
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Menu,
    Playing,
    GameOver,
}

impl Default for Screen {
    fn default() -> Self {
        Self::Menu
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Single,
    Multi,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::One
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores([u32; 2]);

impl Index<Player> for Scores {
    type Output = u32;

    fn index(&self, player: Player) -> &Self::Output {
        &self.0[usize::from(player.number()) - 1]
    }
}

impl IndexMut<Player> for Scores {
    fn index_mut(&mut self, player: Player) -> &mut Self::Output {
        &mut self.0[usize::from(player.number()) - 1]
    }
}

/// Short-lived banner shown after a resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    Match,
    NoMatch,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Match => "Match!",
            Self::NoMatch => "No Match!",
        })
    }
}

/// Final standing, decided once when the last pair is matched.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Solo { score: u32 },
    Winner { player: Player, scores: Scores },
    Tie { score: u32 },
}

impl GameResult {
    pub fn decide(mode: Mode, scores: Scores) -> Self {
        let (one, two) = (scores[Player::One], scores[Player::Two]);
        match mode {
            Mode::Single => Self::Solo { score: one },
            Mode::Multi if one > two => Self::Winner {
                player: Player::One,
                scores,
            },
            Mode::Multi if two > one => Self::Winner {
                player: Player::Two,
                scores,
            },
            Mode::Multi => Self::Tie { score: one },
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solo { score } => write!(f, "Congratulations! Score: {score}"),
            Self::Winner { player, .. } => write!(f, "Congratulations! {player} Wins!"),
            Self::Tie { .. } => f.write_str("Congratulations! Tie!"),
        }
    }
}

/// A value that stays visible until `deadline`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timed<T> {
    pub value: T,
    pub deadline: Timestamp,
}

impl<T> Timed<T> {
    pub const fn new(value: T, deadline: Timestamp) -> Self {
        Self { value, deadline }
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.deadline
    }
}

/// Everything the presentation layer may read about the running game.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MatchState {
    pub(crate) screen: Screen,
    pub(crate) mode: Option<Mode>,
    pub(crate) pair_count: Option<PairCount>,
    pub(crate) cards: Vec<Card>,
    pub(crate) flipped: SmallVec<[CardIndex; 2]>,
    pub(crate) current_player: Player,
    pub(crate) scores: Scores,
    pub(crate) wait_deadline: Option<Timestamp>,
    pub(crate) message: Option<Timed<Message>>,
    pub(crate) hints_remaining: u8,
    pub(crate) hint: Option<Timed<CardIndex>>,
    pub(crate) result: Option<GameResult>,
}

impl MatchState {
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Selected mode; while on the menu this is the pending choice.
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Selected board size; while on the menu this is the pending choice.
    pub fn pair_count(&self) -> Option<PairCount> {
        self.pair_count
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: CardIndex) -> Option<&Card> {
        self.cards.get(index)
    }

    /// Indices of the face-up cards that are not resolved yet, in flip order.
    pub fn flipped_unresolved(&self) -> &[CardIndex] {
        &self.flipped
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn is_waiting(&self) -> bool {
        self.wait_deadline.is_some()
    }

    pub fn wait_deadline(&self) -> Option<Timestamp> {
        self.wait_deadline
    }

    pub fn message(&self) -> Option<Message> {
        self.message.map(|message| message.value)
    }

    pub fn message_deadline(&self) -> Option<Timestamp> {
        self.message.map(|message| message.deadline)
    }

    pub fn hints_remaining(&self) -> u8 {
        self.hints_remaining
    }

    pub fn hint_card(&self) -> Option<CardIndex> {
        self.hint.map(|hint| hint.value)
    }

    pub fn hint_deadline(&self) -> Option<Timestamp> {
        self.hint.map(|hint| hint.deadline)
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn matched_count(&self) -> usize {
        self.cards.iter().filter(|card| card.is_matched).count()
    }

    pub fn all_matched(&self) -> bool {
        !self.cards.is_empty() && self.cards.iter().all(|card| card.is_matched)
    }

    /// Index of the card drawn at `point`, if any.
    pub fn card_at(&self, point: Point) -> Option<CardIndex> {
        self.cards
            .iter()
            .position(|card| card.position.contains(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_mode_result_prefers_strictly_higher_score() {
        let mut scores = Scores::default();
        scores[Player::One] = 3;
        scores[Player::Two] = 5;

        assert_eq!(
            GameResult::decide(Mode::Multi, scores),
            GameResult::Winner {
                player: Player::Two,
                scores
            }
        );

        scores[Player::One] = 5;
        assert_eq!(
            GameResult::decide(Mode::Multi, scores),
            GameResult::Tie { score: 5 }
        );
        assert_eq!(
            GameResult::decide(Mode::Single, scores),
            GameResult::Solo { score: 5 }
        );
    }

    #[test]
    fn result_banner_text() {
        let solo = GameResult::Solo { score: 10 };
        let tie = GameResult::Tie { score: 4 };

        assert_eq!(alloc::format!("{solo}"), "Congratulations! Score: 10");
        assert_eq!(alloc::format!("{tie}"), "Congratulations! Tie!");
        assert_eq!(alloc::format!("{}", Message::NoMatch), "No Match!");
    }
}

use std::path::Path;

use anyhow::{Context, bail};
use serde::Deserialize;
use trucxanh_core::{Button, CardIndex, InputEvent, Key, MatchState, Point};

/// Timed inputs fed to a session by `trucxanh replay`.
///
/// ```toml
/// seed = 7
///
/// [[events]]
/// at_ms = 0
/// key = "1"
///
/// [[events]]
/// at_ms = 500
/// flip = 3
///
/// [[events]]
/// at_ms = 900
/// button = "Hint"
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub seed: Option<u64>,
    /// How long to keep running after the last event so pending timers fire
    #[serde(default = "Script::default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

/// One timed input; exactly one action key must be set.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawEvent")]
pub struct ScriptEvent {
    pub at_ms: u64,
    pub action: ScriptAction,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEvent {
    at_ms: u64,
    key: Option<String>,
    flip: Option<CardIndex>,
    button: Option<String>,
    press: Option<Point>,
    #[serde(rename = "move")]
    move_to: Option<Point>,
}

impl TryFrom<RawEvent> for ScriptEvent {
    type Error = String;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let actions = [
            raw.key.map(ScriptAction::Key),
            raw.flip.map(ScriptAction::Flip),
            raw.button.map(ScriptAction::Button),
            raw.press.map(ScriptAction::Press),
            raw.move_to.map(ScriptAction::Move),
        ];
        let mut actions = actions.into_iter().flatten();
        match (actions.next(), actions.next()) {
            (Some(action), None) => Ok(Self {
                at_ms: raw.at_ms,
                action,
            }),
            (None, _) => Err(format!("event at {}ms has no action", raw.at_ms)),
            (Some(_), Some(_)) => Err(format!("event at {}ms has more than one action", raw.at_ms)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptAction {
    Key(String),
    /// Press the centre of a card on the current board
    Flip(CardIndex),
    /// Press a button of the current screen by label
    Button(String),
    Press(Point),
    Move(Point),
}

impl Script {
    const fn default_settle_ms() -> u64 {
        3_000
    }

    /// Parses a script, keeping events with equal times in file order.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let mut script: Script = toml::from_str(text)?;
        script.events.sort_by_key(|event| event.at_ms);
        Ok(script)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid script {}", path.display()))
    }

    /// Time after which nothing is left to replay.
    pub fn end_ms(&self) -> u64 {
        self.events
            .last()
            .map_or(0, |event| event.at_ms)
            .saturating_add(self.settle_ms)
    }
}

pub fn parse_key(text: &str) -> Key {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => match c.to_digit(10) {
            Some(digit) => Key::Digit(digit as u8),
            None => Key::Char(c),
        },
        _ => Key::Other,
    }
}

impl ScriptAction {
    /// Resolves the action against what is currently on screen.
    pub fn to_input(&self, state: &MatchState, buttons: &[Button]) -> anyhow::Result<InputEvent> {
        let event = match self {
            ScriptAction::Key(key) => InputEvent::KeyPress(parse_key(key)),
            ScriptAction::Flip(index) => match state.card(*index) {
                Some(card) => InputEvent::PointerPress(card.position().center()),
                None => bail!("No card {} on the board", index),
            },
            ScriptAction::Button(label) => {
                match buttons
                    .iter()
                    .find(|button| button.label().eq_ignore_ascii_case(label))
                {
                    Some(button) => InputEvent::PointerPress(button.rect().center()),
                    None => bail!("No {:?} button on the {:?} screen", label, state.screen()),
                }
            }
            ScriptAction::Press(point) => InputEvent::PointerPress(*point),
            ScriptAction::Move(point) => InputEvent::PointerMove(*point),
        };
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_ordered_by_time() {
        let script = Script::parse(
            r#"
            seed = 7

            [[events]]
            at_ms = 500
            flip = 3

            [[events]]
            at_ms = 0
            key = "1"

            [[events]]
            at_ms = 500
            press = [400, 300]
            "#,
        )
        .unwrap();

        assert_eq!(script.seed, Some(7));
        assert_eq!(
            script.events,
            vec![
                ScriptEvent {
                    at_ms: 0,
                    action: ScriptAction::Key("1".into()),
                },
                ScriptEvent {
                    at_ms: 500,
                    action: ScriptAction::Flip(3),
                },
                ScriptEvent {
                    at_ms: 500,
                    action: ScriptAction::Press((400, 300)),
                },
            ]
        );
        assert_eq!(script.end_ms(), 3_500);
    }

    #[test]
    fn events_take_exactly_one_action() {
        let doubled = Script::parse(
            r#"
            [[events]]
            at_ms = 0
            key = "1"
            flip = 3
            "#,
        );
        let err = format!("{:#}", doubled.unwrap_err());
        assert!(err.contains("more than one action"), "{err}");

        let empty = Script::parse(
            r#"
            [[events]]
            at_ms = 0
            "#,
        );
        let err = format!("{:#}", empty.unwrap_err());
        assert!(err.contains("no action"), "{err}");

        let moved = Script::parse(
            r#"
            [[events]]
            at_ms = 10
            move = [5, 6]
            "#,
        )
        .unwrap();
        assert_eq!(moved.events[0].action, ScriptAction::Move((5, 6)));
    }

    #[test]
    fn keys() {
        assert_eq!(parse_key("3"), Key::Digit(3));
        assert_eq!(parse_key("r"), Key::Char('r'));
        assert_eq!(parse_key("Escape"), Key::Other);
        assert_eq!(parse_key(""), Key::Other);
    }

    #[test]
    fn unknown_targets_are_errors() {
        let state = MatchState::default();

        assert!(ScriptAction::Flip(0).to_input(&state, &[]).is_err());
        assert!(ScriptAction::Button("Hint".into()).to_input(&state, &[]).is_err());
        assert_eq!(
            ScriptAction::Move((1, 2)).to_input(&state, &[]).unwrap(),
            InputEvent::PointerMove((1, 2))
        );
    }
}

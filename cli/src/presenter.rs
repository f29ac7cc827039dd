use anyhow::anyhow;
use serde::Serialize;
use trucxanh_core::{
    Frame, MatchState, Message, Player, Presenter, Scores, Screen, Symbol, SymbolCatalog,
};

/// What changed between two frames worth telling the user about.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Snapshot {
    screen: Screen,
    message: Option<Message>,
    player: Player,
    scores: Scores,
    hint: Option<usize>,
    hints_remaining: u8,
}

impl Snapshot {
    fn of(state: &MatchState) -> Self {
        Self {
            screen: state.screen(),
            message: state.message(),
            player: state.current_player(),
            scores: state.scores(),
            hint: state.hint_card(),
            hints_remaining: state.hints_remaining(),
        }
    }
}

/// Logs what a graphical front end would draw and play.
#[derive(Debug, Default)]
pub struct TextPresenter {
    frames: u64,
    last: Option<Snapshot>,
    fallback_tone: Option<String>,
    played: Vec<String>,
}

impl TextPresenter {
    /// Symbols without a tone of their own play the tone of `fallback` instead.
    pub fn new(catalog: &SymbolCatalog, fallback: &str) -> Self {
        let fallback_tone = catalog
            .id_of(fallback)
            .and_then(|id| catalog.get(id))
            .and_then(|symbol| symbol.tone.clone());
        Self {
            fallback_tone,
            ..Self::default()
        }
    }

    /// Tone handles in the order they were played.
    pub fn played(&self) -> &[String] {
        &self.played
    }
}

impl Presenter for TextPresenter {
    type Error = anyhow::Error;

    fn render(&mut self, frame: &Frame<'_>) {
        self.frames += 1;
        log::trace!("frame {} at {}ms", self.frames, frame.now.as_millis());

        let snapshot = Snapshot::of(frame.state);
        let previous = self.last.replace(snapshot);
        let Some(previous) = previous else {
            log::info!("{:?} screen", snapshot.screen);
            return;
        };

        if previous.screen != snapshot.screen {
            log::info!("{:?} screen", snapshot.screen);
            if let Some(result) = frame.state.result() {
                log::info!("{}", result);
            }
        }
        if previous.message != snapshot.message {
            if let Some(message) = snapshot.message {
                log::info!("{}", message);
            }
        }
        if snapshot.screen == Screen::Playing {
            if previous.player != snapshot.player {
                log::info!("{}'s turn", snapshot.player);
            }
            if previous.scores != snapshot.scores {
                log::info!(
                    "Scores: {} / {}",
                    snapshot.scores[Player::One],
                    snapshot.scores[Player::Two]
                );
            }
            if snapshot.hint.is_some() && previous.hint != snapshot.hint {
                log::info!("Hint revealed, {} left", snapshot.hints_remaining);
            }
        }
    }

    fn play_tone(&mut self, symbol: &Symbol) -> Result<(), Self::Error> {
        let tone = symbol
            .tone
            .as_ref()
            .or(self.fallback_tone.as_ref())
            .ok_or_else(|| anyhow!("no tone for {}", symbol.name))?;
        log::debug!("Playing {} ({})", symbol.name, tone);
        self.played.push(tone.clone());
        Ok(())
    }
}

/// Draws the board as text, one grid row per line.
pub fn render_board(state: &MatchState, catalog: &SymbolCatalog) -> String {
    let width = catalog
        .iter()
        .map(|(_, symbol)| symbol.name.chars().count())
        .max()
        .unwrap_or(1)
        .max(2);

    let mut out = String::new();
    let mut row_y = None;
    for card in state.cards() {
        let y = card.position().y;
        if row_y.is_some_and(|row| row != y) {
            out.push('\n');
        }
        row_y = Some(y);

        let name = catalog.get(card.symbol()).map_or("?", |symbol| &symbol.name);
        let cell = if card.is_matched() {
            format!("[{:^width$}]", name)
        } else if card.is_face_up() {
            format!(" {:^width$} ", name)
        } else {
            format!(" {:^width$} ", "#".repeat(width))
        };
        out.push_str(&cell);
    }
    if row_y.is_some() {
        out.push('\n');
    }
    out
}

/// End-of-run report printed by the commands.
#[derive(Clone, Debug, Serialize)]
pub struct Summary {
    pub seed: u64,
    pub frames: u64,
    pub elapsed_ms: u64,
    pub exit_requested: bool,
    pub state: MatchState,
    #[serde(skip)]
    pub board: String,
}

impl Summary {
    pub fn describe(&self) -> String {
        match self.state.result() {
            Some(result) => result.to_string(),
            None => {
                let pairs = self.state.pair_count().unwrap_or(0);
                format!(
                    "Unfinished on the {:?} screen: {} of {} pairs matched",
                    self.state.screen(),
                    self.state.matched_count() / 2,
                    pairs
                )
            }
        }
    }
}

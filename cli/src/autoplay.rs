use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::bail;
use trucxanh_core::{
    ButtonAction, CardIndex, Clock, DeckGenerator, InputEvent, Key, ManualClock, MatchState, Mode,
    PairCount, Screen, Session, ShuffledDeckGenerator, SymbolId, Timestamp,
};

use crate::clock::SystemClock;
use crate::config::AppConfig;
use crate::presenter::{Summary, TextPresenter, render_board};

/// Pause between two bot actions, so mismatches stay visible in real time.
const THINK_TIME: Duration = Duration::from_millis(400);

/// Upper bound on simulated play before the run is abandoned.
const GIVE_UP_AFTER: Duration = Duration::from_secs(3_600);

#[derive(Copy, Clone, Debug)]
pub struct Options {
    pub mode: Mode,
    pub pairs: PairCount,
    pub hints: bool,
    pub realtime: bool,
}

/// Player with perfect memory of every card it has seen face up, hinted cards included.
#[derive(Clone, Debug)]
struct Bot {
    options: Options,
    seen: BTreeMap<CardIndex, SymbolId>,
}

impl Bot {
    fn new(options: Options) -> Self {
        Self {
            options,
            seen: BTreeMap::new(),
        }
    }

    fn observe(&mut self, state: &MatchState) {
        for card in state.cards() {
            if card.is_face_up() && !card.is_matched() {
                self.seen.insert(card.id(), card.symbol());
            }
        }
    }

    /// A known card, other than `except`, holding `symbol` that can still be flipped.
    fn known(&self, state: &MatchState, symbol: SymbolId, except: CardIndex) -> Option<CardIndex> {
        self.seen
            .iter()
            .filter(|&(&index, &seen)| index != except && seen == symbol)
            .map(|(&index, _)| index)
            .find(|&index| state.cards()[index].can_flip())
    }

    fn known_pair(&self, state: &MatchState) -> Option<CardIndex> {
        self.seen
            .iter()
            .filter(|&(&index, _)| state.cards()[index].can_flip())
            .find_map(|(&index, &symbol)| self.known(state, symbol, index).map(|_| index))
    }

    fn unseen(&self, state: &MatchState, except: Option<CardIndex>) -> Option<CardIndex> {
        let flippable = |index: &CardIndex| {
            Some(*index) != except && state.cards()[*index].can_flip()
        };
        let all = 0..state.cards().len();
        all.clone()
            .filter(flippable)
            .find(|index| !self.seen.contains_key(index))
            .or_else(|| all.filter(flippable).next())
    }

    fn next_input<G: DeckGenerator>(&mut self, session: &Session<G>) -> Option<InputEvent> {
        let state = session.state();
        let press_card = |index: CardIndex| {
            InputEvent::PointerPress(state.cards()[index].position().center())
        };

        match state.screen() {
            Screen::Menu => {
                let key = match state.mode() {
                    None => match self.options.mode {
                        Mode::Single => 1,
                        Mode::Multi => 2,
                    },
                    Some(_) if self.options.pairs == session.engine().config().presets.large => 4,
                    Some(_) => 3,
                };
                Some(InputEvent::KeyPress(Key::Digit(key)))
            }
            Screen::GameOver => None,
            Screen::Playing if state.is_waiting() => None,
            Screen::Playing => {
                self.observe(state);
                match *state.flipped_unresolved() {
                    [] => self
                        .known_pair(state)
                        .or_else(|| self.unseen(state, None))
                        .map(press_card),
                    [first] => {
                        let symbol = state.cards()[first].symbol();
                        if let Some(partner) = self.known(state, symbol, first) {
                            return Some(press_card(partner));
                        }
                        if self.options.hints && state.hints_remaining() > 0 {
                            let hint_button = session
                                .buttons()
                                .iter()
                                .find(|button| button.action() == ButtonAction::UseHint);
                            if let Some(button) = hint_button {
                                return Some(InputEvent::PointerPress(button.rect().center()));
                            }
                        }
                        self.unseen(state, Some(first)).map(press_card)
                    }
                    _ => None,
                }
            }
        }
    }
}

/// Plays one game to the end and reports how it went.
pub fn run(config: AppConfig, options: Options, seed: u64) -> anyhow::Result<Summary> {
    let rate = u64::from(config.game.tick_rate_hz.max(1));
    let mut presenter = TextPresenter::new(&config.symbols, "C4");
    let mut session = Session::new(
        config.game,
        config.symbols,
        ShuffledDeckGenerator::from_seed(seed),
    )?;
    let mut bot = Bot::new(options);

    let manual = ManualClock::new(Timestamp::ZERO);
    let system = SystemClock::new();
    let clock: &dyn Clock = if options.realtime { &system } else { &manual };
    let frame_time = session.clock().step();

    let mut frames = 0u64;
    let mut next_action = Timestamp::ZERO;
    loop {
        let now = clock.now();
        let mut batch = None;
        if now >= next_action {
            batch = bot.next_input(&session);
            if batch.is_some() {
                next_action = now + THINK_TIME;
            }
        }

        match session.frame(now, batch, &mut presenter) {
            Ok(_) => {}
            Err(err) if err.is_configuration() => bail!("Could not start a game: {}", err),
            Err(err) => return Err(err.into()),
        }
        frames += 1;

        if session.state().screen() == Screen::GameOver || session.exit_requested() {
            break;
        }
        if now.saturating_duration_since(Timestamp::ZERO) > GIVE_UP_AFTER {
            bail!("Game still running after {} frames", frames);
        }

        if options.realtime {
            std::thread::sleep(frame_time);
        } else {
            manual.set(Timestamp::from_millis(frames * 1_000 / rate));
        }
    }

    log::info!("Finished after {} frames", frames);
    Ok(Summary {
        seed,
        frames,
        elapsed_ms: clock.now().as_millis(),
        exit_requested: session.exit_requested(),
        state: session.state().clone(),
        board: render_board(session.state(), session.engine().catalog()),
    })
}

use alloc::vec::Vec;

use crate::*;

/// Side effects requested by the engine, drained by whoever owns the presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    PlayTone(SymbolId),
}

/// State machine over a [`MatchState`].
///
/// Operations whose preconditions do not hold (a stale click, a key pressed on the wrong screen) are
/// no-ops reported as `NoChange`. Only a card index outside the current board is an error.
#[derive(Clone, Debug)]
pub struct MatchEngine<G> {
    config: GameConfig,
    catalog: SymbolCatalog,
    generator: G,
    state: MatchState,
    effects: Vec<Effect>,
}

impl<G: DeckGenerator> MatchEngine<G> {
    pub fn new(config: GameConfig, catalog: SymbolCatalog, generator: G) -> Result<Self> {
        config.validate_with(&catalog)?;
        let state = MatchState {
            hints_remaining: config.hints_per_game,
            ..Default::default()
        };
        Ok(Self {
            config,
            catalog,
            generator,
            state,
            effects: Vec::new(),
        })
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    pub fn pending_effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn drain_effects(&mut self) -> impl Iterator<Item = Effect> + '_ {
        self.effects.drain(..)
    }

    pub fn select_mode(&mut self, mode: Mode) -> Result<SetupOutcome> {
        if self.state.screen != Screen::Menu {
            return Ok(SetupOutcome::NoChange);
        }
        log::debug!("Selected mode {:?}", mode);
        self.state.mode = Some(mode);
        self.try_start()
    }

    pub fn select_grid_size(&mut self, pairs: PairCount) -> Result<SetupOutcome> {
        if self.state.screen != Screen::Menu {
            return Ok(SetupOutcome::NoChange);
        }
        log::debug!("Selected {} pairs", pairs);
        self.state.pair_count = Some(pairs);
        self.try_start()
    }

    fn try_start(&mut self) -> Result<SetupOutcome> {
        let (Some(mode), Some(pairs)) = (self.state.mode, self.state.pair_count) else {
            return Ok(SetupOutcome::Pending);
        };

        if let Err(err) = self.setup(mode, pairs) {
            log::warn!("Could not start a {} pair game: {}", pairs, err);
            self.state.pair_count = None;
            return Err(err);
        }
        Ok(SetupOutcome::Started)
    }

    /// Deals a fresh board; on failure the current state is left untouched.
    fn setup(&mut self, mode: Mode, pairs: PairCount) -> Result<()> {
        let dimensions = self.config.grid.dimensions(pairs);
        let cards = build_deck(
            &mut self.generator,
            pairs,
            &self.catalog,
            dimensions,
            &self.config.board,
        )?;

        self.state = MatchState {
            screen: Screen::Playing,
            mode: Some(mode),
            pair_count: Some(pairs),
            cards,
            hints_remaining: self.config.hints_per_game,
            ..Default::default()
        };
        log::debug!("Started {:?} game with {} pairs", mode, pairs);
        Ok(())
    }

    pub fn flip_card(&mut self, index: CardIndex, now: Timestamp) -> Result<FlipOutcome> {
        if self.state.screen != Screen::Playing {
            return Ok(FlipOutcome::NoChange);
        }
        let Some(card) = self.state.cards.get_mut(index) else {
            log::error!(
                "Flip of card {} on a board of {} cards",
                index,
                self.state.cards.len()
            );
            return Err(GameError::InvalidReference(index));
        };

        if self.state.wait_deadline.is_some() || self.state.flipped.len() >= 2 || !card.can_flip() {
            return Ok(FlipOutcome::NoChange);
        }

        card.is_flipped = true;
        let symbol = card.symbol;
        self.state.flipped.push(index);
        self.effects.push(Effect::PlayTone(symbol));
        log::trace!("Flipped card {} ({:?})", index, symbol);

        if self.state.flipped.len() == 2 {
            Ok(self.resolve(now))
        } else {
            Ok(FlipOutcome::Flipped)
        }
    }

    fn resolve(&mut self, now: Timestamp) -> FlipOutcome {
        let state = &mut self.state;
        let (first, second) = (state.flipped[0], state.flipped[1]);

        if state.cards[first].symbol == state.cards[second].symbol {
            state.cards[first].is_matched = true;
            state.cards[second].is_matched = true;
            state.flipped.clear();
            state.scores[state.current_player] += 1;
            state.message = Some(Timed::new(
                Message::Match,
                now + self.config.message_duration(),
            ));
            log::debug!(
                "{} matched cards {} and {}",
                state.current_player,
                first,
                second
            );

            if state.all_matched() {
                let mode = state.mode.unwrap_or(Mode::Single);
                let result = GameResult::decide(mode, state.scores);
                state.result = Some(result);
                state.screen = Screen::GameOver;
                log::debug!("Game over: {:?}", result);
                FlipOutcome::Won
            } else {
                FlipOutcome::Matched
            }
        } else {
            state.wait_deadline = Some(now + self.config.mismatch_wait());
            state.message = Some(Timed::new(
                Message::NoMatch,
                now + self.config.message_duration(),
            ));
            log::debug!("Cards {} and {} do not match", first, second);
            FlipOutcome::Mismatched
        }
    }

    /// Applies every deadline that has passed by `now`.
    pub fn tick(&mut self, now: Timestamp) -> TickOutcome {
        let state = &mut self.state;
        let mut outcome = TickOutcome::empty();

        if let Some(deadline) = state.wait_deadline {
            if now >= deadline {
                for index in state.flipped.drain(..) {
                    state.cards[index].is_flipped = false;
                }
                state.wait_deadline = None;
                if state.mode == Some(Mode::Multi) {
                    state.current_player = state.current_player.other();
                }
                log::trace!("Turned cards back, {} to move", state.current_player);
                outcome |= TickOutcome::UNFLIPPED;
            }
        }

        if state.message.is_some_and(|message| message.is_expired(now)) {
            state.message = None;
            outcome |= TickOutcome::MESSAGE_CLEARED;
        }

        if let Some(hint) = state.hint {
            if hint.is_expired(now) {
                if let Some(card) = state.cards.get_mut(hint.value) {
                    card.is_hint = false;
                }
                state.hint = None;
                outcome |= TickOutcome::HINT_CLEARED;
            }
        }

        outcome
    }

    /// Reveals the partner of the single face-up card for a while.
    pub fn use_hint(&mut self, now: Timestamp) -> HintOutcome {
        let state = &mut self.state;
        if state.screen != Screen::Playing
            || state.hints_remaining == 0
            || state.flipped.len() != 1
        {
            return HintOutcome::NoChange;
        }

        let selected = state.flipped[0];
        let symbol = state.cards[selected].symbol;
        let Some(partner) = state
            .cards
            .iter()
            .enumerate()
            .position(|(index, card)| index != selected && card.symbol == symbol && !card.is_matched)
        else {
            log::debug!("No unmatched partner for card {}", selected);
            return HintOutcome::NoChange;
        };

        if let Some(previous) = state.hint.take() {
            if let Some(card) = state.cards.get_mut(previous.value) {
                card.is_hint = false;
            }
        }
        state.cards[partner].is_hint = true;
        state.hint = Some(Timed::new(partner, now + self.config.hint_duration()));
        state.hints_remaining -= 1;
        log::debug!(
            "Hinted card {}, {} hints left",
            partner,
            state.hints_remaining
        );
        HintOutcome::Revealed(partner)
    }

    pub fn back_to_menu(&mut self) -> ScreenOutcome {
        if self.state.screen == Screen::Menu {
            return ScreenOutcome::NoChange;
        }
        self.state = MatchState {
            hints_remaining: self.config.hints_per_game,
            ..Default::default()
        };
        log::debug!("Back to menu");
        ScreenOutcome::Changed
    }

    /// Deals a new board with the same mode and size; only valid once a game is over.
    pub fn restart(&mut self) -> Result<ScreenOutcome> {
        if self.state.screen != Screen::GameOver {
            return Ok(ScreenOutcome::NoChange);
        }
        let (Some(mode), Some(pairs)) = (self.state.mode, self.state.pair_count) else {
            return Ok(ScreenOutcome::NoChange);
        };
        self.setup(mode, pairs)?;
        Ok(ScreenOutcome::Changed)
    }
}

use smallvec::SmallVec;

use crate::*;

/// What one call to [`Session::frame`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub outcomes: SmallVec<[RouteOutcome; 4]>,
    pub ticks: usize,
    pub tones: usize,
}

impl FrameReport {
    pub fn has_update(&self) -> bool {
        self.outcomes.iter().any(|outcome| outcome.has_update())
    }
}

/// One game session: the engine plus the input router and the tick clock driving it.
#[derive(Clone, Debug)]
pub struct Session<G> {
    engine: MatchEngine<G>,
    router: InputRouter,
    clock: FixedStep,
    exit_requested: bool,
}

impl<G: DeckGenerator> Session<G> {
    pub fn new(config: GameConfig, catalog: SymbolCatalog, generator: G) -> Result<Self> {
        let router = InputRouter::new(ButtonPanels::standard(&config));
        let clock = FixedStep::from_rate(config.tick_rate_hz);
        let engine = MatchEngine::new(config, catalog, generator)?;
        Ok(Self {
            engine,
            router,
            clock,
            exit_requested: false,
        })
    }

    pub fn engine(&self) -> &MatchEngine<G> {
        &self.engine
    }

    pub fn state(&self) -> &MatchState {
        self.engine.state()
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    pub fn buttons(&self) -> &[Button] {
        self.router.buttons(self.engine.state().screen())
    }

    pub fn clock(&self) -> &FixedStep {
        &self.clock
    }

    /// Set once an `Exit` button was pressed.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn handle_input(&mut self, event: InputEvent, now: Timestamp) -> Result<RouteOutcome> {
        let outcome = self.router.handle(&mut self.engine, event, now)?;
        if outcome == RouteOutcome::Exit {
            log::debug!("Exit requested");
            self.exit_requested = true;
        }
        Ok(outcome)
    }

    /// Runs one frame: applies the input batch, runs due ticks, plays queued tones and renders.
    ///
    /// An input error stops the rest of the batch, but the frame still ticks and renders before it is
    /// returned.
    pub fn frame<P, I>(
        &mut self,
        now: Timestamp,
        events: I,
        presenter: &mut P,
    ) -> Result<FrameReport>
    where
        P: Presenter,
        I: IntoIterator<Item = InputEvent>,
    {
        let mut report = FrameReport::default();
        let mut failure = None;

        for event in events {
            match self.handle_input(event, now) {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(err) => {
                    log::error!("Input {:?} failed: {}", event, err);
                    failure = Some(err);
                    break;
                }
            }
        }

        for tick in self.clock.advance(now) {
            self.engine.tick(tick);
            report.ticks += 1;
        }

        let effects: SmallVec<[Effect; 4]> = self.engine.drain_effects().collect();
        for effect in effects {
            match effect {
                Effect::PlayTone(id) => {
                    let Some(symbol) = self.engine.catalog().get(id) else {
                        continue;
                    };
                    if let Err(err) = presenter.play_tone(symbol) {
                        log::warn!("Could not play {}: {}", symbol.name, err);
                    }
                    report.tones += 1;
                }
            }
        }

        let state = self.engine.state();
        presenter.render(&Frame {
            now,
            state,
            buttons: self.router.buttons(state.screen()),
            catalog: self.engine.catalog(),
        });

        match failure {
            Some(err) => Err(err),
            None => Ok(report),
        }
    }
}

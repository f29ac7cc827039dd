use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a button does when pressed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonAction {
    SetMode(Mode),
    SetGridSize(PairCount),
    Exit,
    UseHint,
    BackToMenu,
    Restart,
    PlayAgain,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Button {
    label: String,
    rect: Rect,
    action: ButtonAction,
    hovered: bool,
}

impl Button {
    pub fn new(label: impl Into<String>, rect: Rect, action: ButtonAction) -> Self {
        Self {
            label: label.into(),
            rect,
            action,
            hovered: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn action(&self) -> ButtonAction {
        self.action
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }
}

/// The buttons shown on each screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ButtonPanels {
    menu: Vec<Button>,
    playing: Vec<Button>,
    game_over: Vec<Button>,
}

impl ButtonPanels {
    pub fn new(menu: Vec<Button>, playing: Vec<Button>, game_over: Vec<Button>) -> Self {
        Self {
            menu,
            playing,
            game_over,
        }
    }

    /// The stock layout, scaled to the configured viewport.
    pub fn standard(config: &GameConfig) -> Self {
        use ButtonAction::*;

        let (width, height) = config.board.viewport;
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        let column_x = width / 2 - 100;
        let wide = |label: String, y: i32, action| {
            Button::new(label, Rect::new(column_x, y, 200, 50), action)
        };
        let small = |label: &str, x: i32, action| {
            Button::new(label, Rect::new(x, height - 50, 100, 40), action)
        };
        let presets = config.presets;

        Self::new(
            alloc::vec![
                wide("Single Player".into(), 200, SetMode(Mode::Single)),
                wide("Multiplayer".into(), 260, SetMode(Mode::Multi)),
                wide(format!("{} Pairs", presets.small), 320, SetGridSize(presets.small)),
                wide(format!("{} Pairs", presets.large), 380, SetGridSize(presets.large)),
                wide("Exit".into(), 440, Exit),
            ],
            alloc::vec![
                small("Hint", width - 150, UseHint),
                small("Back", 20, BackToMenu),
                small("Exit", 140, Exit),
            ],
            alloc::vec![
                wide("Play Again".into(), height / 2 + 100, PlayAgain),
                wide("Exit".into(), height / 2 + 160, Exit),
            ],
        )
    }

    pub fn for_screen(&self, screen: Screen) -> &[Button] {
        match screen {
            Screen::Menu => &self.menu,
            Screen::Playing => &self.playing,
            Screen::GameOver => &self.game_over,
        }
    }

    fn panels_mut(&mut self) -> [(Screen, &mut [Button]); 3] {
        [
            (Screen::Menu, &mut self.menu),
            (Screen::Playing, &mut self.playing),
            (Screen::GameOver, &mut self.game_over),
        ]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Digit(u8),
    Char(char),
    Other,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerMove(Point),
    PointerPress(Point),
    KeyPress(Key),
}

/// Result of routing one input event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteOutcome {
    Ignored,
    HoverChanged,
    Setup(SetupOutcome),
    Flip(FlipOutcome),
    Hint(HintOutcome),
    Screen(ScreenOutcome),
    /// The player asked to quit; closing the window is up to the caller
    Exit,
}

impl RouteOutcome {
    pub const fn has_update(self) -> bool {
        use RouteOutcome::*;
        match self {
            Ignored => false,
            HoverChanged => true,
            Setup(outcome) => outcome.has_update(),
            Flip(outcome) => outcome.has_update(),
            Hint(outcome) => outcome.has_update(),
            Screen(outcome) => outcome.has_update(),
            Exit => true,
        }
    }
}

/// Turns raw pointer and keyboard events into engine operations for the current screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputRouter {
    panels: ButtonPanels,
    pointer: Option<Point>,
}

impl InputRouter {
    pub fn new(panels: ButtonPanels) -> Self {
        Self {
            panels,
            pointer: None,
        }
    }

    pub fn buttons(&self, screen: Screen) -> &[Button] {
        self.panels.for_screen(screen)
    }

    pub fn handle<G: DeckGenerator>(
        &mut self,
        engine: &mut MatchEngine<G>,
        event: InputEvent,
        now: Timestamp,
    ) -> Result<RouteOutcome> {
        let screen = engine.state().screen();
        let outcome = match event {
            InputEvent::PointerMove(point) => {
                self.pointer = Some(point);
                return Ok(if self.refresh_hover(screen) {
                    RouteOutcome::HoverChanged
                } else {
                    RouteOutcome::Ignored
                });
            }
            InputEvent::PointerPress(point) => {
                self.pointer = Some(point);
                self.press(engine, point, now)
            }
            InputEvent::KeyPress(key) => match self.key_action(engine, screen, key) {
                Some(action) => Self::dispatch(engine, action, now),
                None => Ok(RouteOutcome::Ignored),
            },
        };

        let current = engine.state().screen();
        if current != screen {
            self.refresh_hover(current);
        }
        outcome
    }

    /// Only buttons of `screen` under the last pointer position are hovered; returns whether a flag changed.
    fn refresh_hover(&mut self, screen: Screen) -> bool {
        let pointer = self.pointer;
        let mut changed = false;
        for (panel, buttons) in self.panels.panels_mut() {
            for button in buttons {
                let hovered = panel == screen && pointer.is_some_and(|point| button.rect.contains(point));
                changed |= button.hovered != hovered;
                button.hovered = hovered;
            }
        }
        changed
    }

    fn press<G: DeckGenerator>(
        &mut self,
        engine: &mut MatchEngine<G>,
        point: Point,
        now: Timestamp,
    ) -> Result<RouteOutcome> {
        let state = engine.state();
        let screen = state.screen();
        let pressed = self
            .panels
            .for_screen(screen)
            .iter()
            .find(|button| button.rect.contains(point))
            .map(Button::action);

        if let Some(action) = pressed {
            log::trace!("Pressed {:?} at {:?}", action, point);
            return Self::dispatch(engine, action, now);
        }

        if screen != Screen::Playing {
            return Ok(RouteOutcome::Ignored);
        }
        match state.card_at(point) {
            Some(index) if state.cards()[index].can_flip() => {
                engine.flip_card(index, now).map(RouteOutcome::Flip)
            }
            _ => Ok(RouteOutcome::Ignored),
        }
    }

    fn key_action<G: DeckGenerator>(
        &self,
        engine: &MatchEngine<G>,
        screen: Screen,
        key: Key,
    ) -> Option<ButtonAction> {
        let presets = engine.config().presets;
        match (screen, key) {
            (Screen::Menu, Key::Digit(1)) => Some(ButtonAction::SetMode(Mode::Single)),
            (Screen::Menu, Key::Digit(2)) => Some(ButtonAction::SetMode(Mode::Multi)),
            (Screen::Menu, Key::Digit(3)) => Some(ButtonAction::SetGridSize(presets.small)),
            (Screen::Menu, Key::Digit(4)) => Some(ButtonAction::SetGridSize(presets.large)),
            (Screen::GameOver, Key::Char('r' | 'R')) => Some(ButtonAction::Restart),
            _ => None,
        }
    }

    /// Runs a button action against the engine.
    pub fn dispatch<G: DeckGenerator>(
        engine: &mut MatchEngine<G>,
        action: ButtonAction,
        now: Timestamp,
    ) -> Result<RouteOutcome> {
        use ButtonAction::*;
        Ok(match action {
            SetMode(mode) => RouteOutcome::Setup(engine.select_mode(mode)?),
            SetGridSize(pairs) => RouteOutcome::Setup(engine.select_grid_size(pairs)?),
            Exit => RouteOutcome::Exit,
            UseHint => RouteOutcome::Hint(engine.use_hint(now)),
            BackToMenu => RouteOutcome::Screen(engine.back_to_menu()),
            Restart | PlayAgain => RouteOutcome::Screen(engine.restart()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: Timestamp = Timestamp::ZERO;

    fn setup() -> (InputRouter, MatchEngine<FixedDeckGenerator>) {
        let catalog = SymbolCatalog::from_names(["X", "Y"]).unwrap();
        let generator = FixedDeckGenerator::from_names(&catalog, &["X", "Y", "X", "Y"]).unwrap();
        let config = GameConfig {
            presets: Presets { small: 2, large: 2 },
            ..Default::default()
        };
        let router = InputRouter::new(ButtonPanels::standard(&config));
        let engine = MatchEngine::new(config, catalog, generator).unwrap();
        (router, engine)
    }

    fn center_of(router: &InputRouter, screen: Screen, label: &str) -> Point {
        router
            .buttons(screen)
            .iter()
            .find(|button| button.label() == label)
            .map(|button| button.rect().center())
            .unwrap()
    }

    #[test]
    fn menu_keys_start_a_game() {
        let (mut router, mut engine) = setup();

        let first = router.handle(&mut engine, InputEvent::KeyPress(Key::Digit(2)), NOW);
        let second = router.handle(&mut engine, InputEvent::KeyPress(Key::Digit(3)), NOW);

        assert_eq!(first, Ok(RouteOutcome::Setup(SetupOutcome::Pending)));
        assert_eq!(second, Ok(RouteOutcome::Setup(SetupOutcome::Started)));
        assert_eq!(engine.state().mode(), Some(Mode::Multi));
        assert_eq!(engine.state().screen(), Screen::Playing);
    }

    #[test]
    fn menu_buttons_start_a_game() {
        let (mut router, mut engine) = setup();
        let single = center_of(&router, Screen::Menu, "Single Player");
        let pairs = center_of(&router, Screen::Menu, "2 Pairs");

        router.handle(&mut engine, InputEvent::PointerPress(single), NOW).unwrap();
        router.handle(&mut engine, InputEvent::PointerPress(pairs), NOW).unwrap();

        assert_eq!(engine.state().screen(), Screen::Playing);
        assert_eq!(engine.state().pair_count(), Some(2));
    }

    #[test]
    fn pressing_a_card_flips_it() {
        let (mut router, mut engine) = setup();
        engine.select_mode(Mode::Single).unwrap();
        engine.select_grid_size(2).unwrap();
        let card = engine.state().cards()[1].position().center();

        let outcome = router.handle(&mut engine, InputEvent::PointerPress(card), NOW);
        assert_eq!(outcome, Ok(RouteOutcome::Flip(FlipOutcome::Flipped)));
        assert!(engine.state().cards()[1].is_flipped());

        // second press on the same card is ignored before reaching the engine
        let outcome = router.handle(&mut engine, InputEvent::PointerPress(card), NOW);
        assert_eq!(outcome, Ok(RouteOutcome::Ignored));

        let outcome = router.handle(&mut engine, InputEvent::PointerPress((0, 0)), NOW);
        assert_eq!(outcome, Ok(RouteOutcome::Ignored));
    }

    #[test]
    fn hint_and_back_buttons() {
        let (mut router, mut engine) = setup();
        engine.select_mode(Mode::Single).unwrap();
        engine.select_grid_size(2).unwrap();
        engine.flip_card(0, NOW).unwrap();

        let hint = center_of(&router, Screen::Playing, "Hint");
        let outcome = router.handle(&mut engine, InputEvent::PointerPress(hint), NOW);
        assert_eq!(outcome, Ok(RouteOutcome::Hint(HintOutcome::Revealed(2))));

        let back = center_of(&router, Screen::Playing, "Back");
        let outcome = router.handle(&mut engine, InputEvent::PointerPress(back), NOW);
        assert_eq!(outcome, Ok(RouteOutcome::Screen(ScreenOutcome::Changed)));
        assert_eq!(engine.state().screen(), Screen::Menu);
    }

    #[test]
    fn keys_only_apply_on_their_screen() {
        let (mut router, mut engine) = setup();

        let outcome = router.handle(&mut engine, InputEvent::KeyPress(Key::Char('r')), NOW);
        assert_eq!(outcome, Ok(RouteOutcome::Ignored));

        engine.select_mode(Mode::Single).unwrap();
        engine.select_grid_size(2).unwrap();
        let outcome = router.handle(&mut engine, InputEvent::KeyPress(Key::Digit(1)), NOW);
        assert_eq!(outcome, Ok(RouteOutcome::Ignored));

        for index in [0, 2, 1, 3] {
            engine.flip_card(index, NOW).unwrap();
        }
        assert_eq!(engine.state().screen(), Screen::GameOver);
        let outcome = router.handle(&mut engine, InputEvent::KeyPress(Key::Char('R')), NOW);
        assert_eq!(outcome, Ok(RouteOutcome::Screen(ScreenOutcome::Changed)));
        assert_eq!(engine.state().screen(), Screen::Playing);
    }

    #[test]
    fn hover_tracks_current_screen_only() {
        let (mut router, mut engine) = setup();
        let exit = center_of(&router, Screen::Menu, "Exit");

        let outcome = router.handle(&mut engine, InputEvent::PointerMove(exit), NOW);
        assert_eq!(outcome, Ok(RouteOutcome::HoverChanged));
        assert_eq!(hovered(&router, Screen::Menu), ["Exit"]);
        assert!(router.buttons(Screen::GameOver).iter().all(|b| !b.is_hovered()));

        let outcome = router.handle(&mut engine, InputEvent::PointerMove(exit), NOW);
        assert_eq!(outcome, Ok(RouteOutcome::Ignored));
    }

    fn hovered(router: &InputRouter, screen: Screen) -> Vec<&str> {
        router
            .buttons(screen)
            .iter()
            .filter(|button| button.is_hovered())
            .map(Button::label)
            .collect()
    }

    #[test]
    fn hover_is_dropped_when_the_screen_changes() {
        let (mut router, mut engine) = setup();
        let exit = center_of(&router, Screen::Menu, "Exit");
        router.handle(&mut engine, InputEvent::PointerMove(exit), NOW).unwrap();
        assert_eq!(hovered(&router, Screen::Menu), ["Exit"]);

        router.handle(&mut engine, InputEvent::KeyPress(Key::Digit(1)), NOW).unwrap();
        router.handle(&mut engine, InputEvent::KeyPress(Key::Digit(3)), NOW).unwrap();
        assert_eq!(engine.state().screen(), Screen::Playing);
        assert!(hovered(&router, Screen::Menu).is_empty());

        router.handle(&mut engine, InputEvent::PointerMove((400, 20)), NOW).unwrap();
        engine.back_to_menu();
        assert!(hovered(&router, Screen::Menu).is_empty());
        assert!(hovered(&router, Screen::Playing).is_empty());
    }

    #[test]
    fn screen_change_rehovers_under_the_pointer() {
        let (mut router, mut engine) = setup();
        engine.select_mode(Mode::Single).unwrap();
        engine.select_grid_size(2).unwrap();
        let back = center_of(&router, Screen::Playing, "Back");
        router.handle(&mut engine, InputEvent::PointerMove(back), NOW).unwrap();
        assert_eq!(hovered(&router, Screen::Playing), ["Back"]);

        router.handle(&mut engine, InputEvent::PointerPress(back), NOW).unwrap();

        assert_eq!(engine.state().screen(), Screen::Menu);
        assert!(hovered(&router, Screen::Playing).is_empty());
        assert!(hovered(&router, Screen::Menu).is_empty());
    }

    #[test]
    fn huge_viewport_does_not_wrap() {
        let config = GameConfig {
            board: BoardMetrics {
                viewport: (u32::MAX, u32::MAX),
                ..Default::default()
            },
            ..Default::default()
        };
        let panels = ButtonPanels::standard(&config);

        let hint = &panels.for_screen(Screen::Playing)[0];
        assert_eq!(hint.label(), "Hint");
        assert_eq!(hint.rect().x, i32::MAX - 150);
        assert_eq!(hint.rect().y, i32::MAX - 50);
        assert!(panels.for_screen(Screen::Menu).iter().all(|button| button.rect().x > 0));
    }

    #[test]
    fn exit_is_reported_to_the_caller() {
        let (mut router, mut engine) = setup();
        let exit = center_of(&router, Screen::Menu, "Exit");

        let outcome = router.handle(&mut engine, InputEvent::PointerPress(exit), NOW);

        assert_eq!(outcome, Ok(RouteOutcome::Exit));
        assert_eq!(engine.state().screen(), Screen::Menu);
    }
}

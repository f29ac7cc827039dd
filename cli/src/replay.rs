use anyhow::Context;
use trucxanh_core::{
    Clock, InputEvent, ManualClock, RouteOutcome, Session, ShuffledDeckGenerator, Timestamp,
};

use crate::config::AppConfig;
use crate::presenter::{Summary, TextPresenter, render_board};
use crate::script::Script;

/// Runs `script` on simulated time, one frame per tick interval.
pub fn run(config: AppConfig, script: &Script, seed: u64) -> anyhow::Result<Summary> {
    let rate = u64::from(config.game.tick_rate_hz.max(1));
    let mut presenter = TextPresenter::new(&config.symbols, "C4");
    let mut session = Session::new(
        config.game,
        config.symbols,
        ShuffledDeckGenerator::from_seed(seed),
    )?;

    let clock = ManualClock::new(Timestamp::ZERO);
    let end = script.end_ms();
    let mut events = script.events.iter().peekable();
    let mut frames = 0u64;

    loop {
        let now = clock.now();
        while let Some(event) = events.next_if(|event| event.at_ms <= now.as_millis()) {
            let input = event
                .action
                .to_input(session.state(), session.buttons())
                .with_context(|| format!("Event at {}ms", event.at_ms))?;
            match session.handle_input(input, now) {
                Ok(RouteOutcome::Ignored) => log::debug!("{:?} ignored", input),
                Ok(outcome) => log::debug!("{:?} -> {:?}", input, outcome),
                Err(err) if err.is_configuration() => log::warn!("{}", err),
                Err(err) => {
                    return Err(err).with_context(|| format!("Event at {}ms", event.at_ms));
                }
            }
        }

        session.frame(now, None::<InputEvent>, &mut presenter)?;
        frames += 1;

        if session.exit_requested() || now.as_millis() >= end {
            break;
        }
        clock.set(Timestamp::from_millis(frames * 1_000 / rate));
    }

    Ok(Summary {
        seed,
        frames,
        elapsed_ms: clock.now().as_millis(),
        exit_requested: session.exit_requested(),
        state: session.state().clone(),
        board: render_board(session.state(), session.engine().catalog()),
    })
}

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use trucxanh_core::{Mode, PairCount, Presets};

mod autoplay;
mod clock;
mod config;
mod presenter;
mod replay;
mod script;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play back a scripted list of timed inputs
    Replay {
        script: PathBuf,

        /// Game settings and symbol catalog (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Force a seed instead of the script's or a random one
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Let a perfect-memory bot play one game
    Autoplay {
        /// Game settings and symbol catalog (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Force a seed instead of random
        #[arg(short, long)]
        seed: Option<u64>,

        #[arg(long, value_enum, default_value_t = ModeArg::Single)]
        mode: ModeArg,

        #[arg(long, value_enum, default_value_t = SizeArg::Small)]
        size: SizeArg,

        /// Spend hints when the bot has nothing to go on
        #[arg(long)]
        hints: bool,

        /// Sleep between frames instead of simulating time
        #[arg(long)]
        realtime: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Single,
    Multi,
}

impl From<ModeArg> for Mode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Single => Mode::Single,
            ModeArg::Multi => Mode::Multi,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SizeArg {
    Small,
    Large,
}

impl SizeArg {
    fn pairs(self, presets: &Presets) -> PairCount {
        match self {
            SizeArg::Small => presets.small,
            SizeArg::Large => presets.large,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .format_timestamp(None)
        .init();

    match args.command {
        Command::Replay {
            script,
            config,
            seed,
            json,
        } => {
            let config = config::AppConfig::load(config.as_deref())?;
            let script = script::Script::load(&script)?;
            let seed = seed.or(script.seed).unwrap_or_else(rand::random);
            log::debug!("seed: {}", seed);

            let summary = replay::run(config, &script, seed)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary.board);
                println!("{}", summary.describe());
            }
        }
        Command::Autoplay {
            config,
            seed,
            mode,
            size,
            hints,
            realtime,
        } => {
            let config = config::AppConfig::load(config.as_deref())?;
            let seed = seed.unwrap_or_else(rand::random);
            log::debug!("seed: {}", seed);

            let pairs = size.pairs(&config.game.presets);
            let options = autoplay::Options {
                mode: mode.into(),
                pairs,
                hints,
                realtime,
            };
            let summary = autoplay::run(config, options, seed)?;
            print!("{}", summary.board);
            println!("{}", summary.describe());
        }
    }

    Ok(())
}

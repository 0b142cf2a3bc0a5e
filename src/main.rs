//! Serial Sudoku engine (default binary).
//!
//! Opens the transport, builds a session from the CLI options, and runs the
//! synchronous frame pump until the peer closes the link.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};

use sudoku_link::core::{GameSession, SessionConfig};
use sudoku_link::link::{open_serial, serve, Dispatcher, StdioLink};
use sudoku_link::logger::{Logger, Verbosity};
use sudoku_link::types::{Difficulty, DEFAULT_MAX_MISTAKES};

const HELP: &str = "\
sudoku-link - Sudoku game engine served over a serial link

Speaks 5-byte command frames and 6/84-byte response frames with XOR
checksums, one command at a time.

USAGE:
  sudoku-link [OPTIONS]

OPTIONS:
  -h, --help            Prints help information
  --device <path>       Serial device (default: $SUDOKU_PORT)
  --baud <rate>         Baud rate (default: 115200)
  --stdio               Serve on stdin/stdout instead of a serial device
  --seed <n>            Puzzle RNG seed (default: derived from the clock)
  --difficulty <1-3>    Starting difficulty (default: 2)
  --strict              Reject conflicting placements instead of storing them
  --max-mistakes <n>    Consecutive conflicts before the game is lost
                        (0 disables, default: 5)
  -v, --verbose         Log command/status traffic
  -vv, --trace          Log raw frame bytes
  --log <file>          Write log output to file instead of stderr
";

#[derive(Debug)]
struct AppArgs {
    device: Option<String>,
    baud: u32,
    stdio: bool,
    seed: Option<u32>,
    difficulty: u8,
    strict: bool,
    max_mistakes: u8,
    verbosity: Verbosity,
    log_file: Option<String>,
}

fn parse_args() -> Result<AppArgs, pico_args::Error> {
    let mut pargs = pico_args::Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{}", HELP);
        std::process::exit(0);
    }

    let verbosity = if pargs.contains("--trace") || pargs.contains("-vv") {
        Verbosity::Trace
    } else if pargs.contains(["-v", "--verbose"]) {
        Verbosity::Verbose
    } else {
        Verbosity::Quiet
    };

    let args = AppArgs {
        device: pargs.opt_value_from_str("--device")?,
        baud: pargs.opt_value_from_str("--baud")?.unwrap_or(115_200),
        stdio: pargs.contains("--stdio"),
        seed: pargs.opt_value_from_str("--seed")?,
        difficulty: pargs.opt_value_from_str("--difficulty")?.unwrap_or(2),
        strict: pargs.contains("--strict"),
        max_mistakes: pargs
            .opt_value_from_str("--max-mistakes")?
            .unwrap_or(DEFAULT_MAX_MISTAKES),
        verbosity,
        log_file: pargs.opt_value_from_str("--log")?,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        eprintln!("warning: unused arguments: {:?}", remaining);
    }

    Ok(args)
}

/// Seed from the clock when none was given
fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn main() -> Result<()> {
    let args = parse_args().map_err(|e| anyhow!("argument error: {}", e))?;

    let log = match &args.log_file {
        Some(path) => Logger::file(path, args.verbosity)?,
        None => Logger::stderr(args.verbosity),
    };

    let difficulty =
        Difficulty::from_level(args.difficulty).ok_or_else(|| anyhow!("difficulty must be 1-3"))?;
    let config = SessionConfig {
        difficulty,
        strict_set: args.strict,
        max_mistakes: args.max_mistakes,
    };

    let seed = args.seed.unwrap_or_else(clock_seed);
    let mut dispatcher = Dispatcher::new(GameSession::new(seed, config));

    log.verbose(&format!(
        "session ready: difficulty {}, seed {}, strict {}, mistake budget {}",
        difficulty.as_str(),
        seed,
        args.strict,
        args.max_mistakes
    ));

    if args.stdio {
        log.verbose("serving on stdio");
        return serve(StdioLink::new(), &mut dispatcher, &log);
    }

    let device = args
        .device
        .or_else(|| std::env::var("SUDOKU_PORT").ok())
        .ok_or_else(|| anyhow!("no serial device: pass --device, set SUDOKU_PORT, or use --stdio"))?;

    log.verbose(&format!("serving on {} at {} baud", device, args.baud));
    let port = open_serial(&device, args.baud)?;
    serve(port, &mut dispatcher, &log)
}

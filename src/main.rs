//! A line-oriented driver for the engine: reads commands from stdin and prints the game after each of them.

use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use mine_engine::{Difficulty, GameConfig, Minesweeper, MinesweeperAction};
use std::io::{BufRead, Write};
use std::time::Instant;
use tracing::Level;

const HELP: &str = "\
commands:
  o ROW,COL                open a cell
  s ROW,COL                open the cells around an open one
  a ROW,COL                either of the above
  f ROW,COL                toggle a flag
  tick                     advance the clock by one tick
  reset                    start over
  new PRESET               beginner, intermediate or expert
  new ROWS COLUMNS MINES   a custom field
  q                        quit";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One of the presets: beginner, intermediate, expert.
    #[arg(short, long, default_value_t = Difficulty::Beginner)]
    difficulty: Difficulty,
    /// Custom number of rows. Overrides the preset together with --width and --mines.
    #[arg(short = 'H', long)]
    height: Option<u8>,
    /// Custom number of columns.
    #[arg(short, long)]
    width: Option<u8>,
    /// Custom number of mines.
    #[arg(short, long)]
    mines: Option<u16>,
    /// Seed for the mine placement.
    #[arg(long)]
    seed: Option<u64>,
    /// Print the game as JSON instead of a grid.
    #[arg(long)]
    json: bool,
    /// Log more, up to -vvv.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// A parsed input line.
#[derive(Debug, PartialEq)]
enum Command {
    Action(MinesweeperAction),
    Tick,
    Reset,
    New(GameConfig),
    Help,
    Quit,
}

fn parse_position(input: &str) -> Result<(u8, u8)> {
    let (row, column) = input
        .split_once(',')
        .ok_or_else(|| eyre!("expected ROW,COL, got `{}`", input))?;

    Ok((
        row.trim().parse().wrap_err("bad row index")?,
        column.trim().parse().wrap_err("bad column index")?,
    ))
}

fn parse_command(line: &str) -> Result<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();

    let command = match words.as_slice() {
        ["o", position] => Command::Action(MinesweeperAction::OpenCell(parse_position(position)?)),
        ["s", position] => Command::Action(MinesweeperAction::OpenSurroundingCells(
            parse_position(position)?,
        )),
        ["a", position] => Command::Action(MinesweeperAction::OpenCellOrSurroundingCells(
            parse_position(position)?,
        )),
        ["f", position] => Command::Action(MinesweeperAction::FlagCell(parse_position(position)?)),
        ["tick"] => Command::Tick,
        ["reset"] => Command::Reset,
        ["new", preset] => Command::New(preset.parse::<Difficulty>()?.config()),
        ["new", rows, columns, mines] => Command::New(GameConfig::new(
            rows.parse().wrap_err("bad number of rows")?,
            columns.parse().wrap_err("bad number of columns")?,
            mines.parse().wrap_err("bad number of mines")?,
        )?),
        ["help"] | ["?"] => Command::Help,
        ["q"] | ["quit"] => Command::Quit,
        _ => return Err(eyre!("unknown command `{}`, try `help`", line.trim())),
    };

    Ok(command)
}

fn game_config(args: &Args) -> Result<GameConfig> {
    match (args.height, args.width, args.mines) {
        (Some(rows), Some(columns), Some(mines)) => {
            GameConfig::new(rows, columns, mines).wrap_err("invalid custom field")
        }
        (None, None, None) => Ok(args.difficulty.config()),
        _ => Err(eyre!(
            "--height, --width and --mines must be given together"
        )),
    }
}

fn print_game(out: &mut impl Write, game: &Minesweeper, json: bool) -> Result<()> {
    let snapshot = game.snapshot();

    if json {
        writeln!(out, "{}", serde_json::to_string(&snapshot)?)?;
    } else {
        writeln!(out, "{}", snapshot)?;
    }

    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = game_config(&args)?;
    let mut game = match args.seed {
        Some(seed) => Minesweeper::with_seed(config, seed),
        None => Minesweeper::new(config),
    };

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    print_game(&mut stdout, &game, args.json)?;

    for line in stdin.lock().lines() {
        let line = line.wrap_err("couldn't read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        game.advance_to(Instant::now());

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(stdout, "{:#}", err)?;
                continue;
            }
        };

        match command {
            Command::Action(action) => {
                game.take_action(action)?;
            }
            Command::Tick => game.tick(),
            Command::Reset => game.reset(),
            Command::New(config) => game.select_difficulty(config),
            Command::Help => {
                writeln!(stdout, "{}", HELP)?;
                continue;
            }
            Command::Quit => break,
        }

        print_game(&mut stdout, &game, args.json)?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::{parse_command, parse_position, Command};
    use mine_engine::{Difficulty, GameConfig, MinesweeperAction};

    #[test]
    fn positions_are_row_then_column() {
        assert_eq!(parse_position("3,5").unwrap(), (3, 5));
        assert_eq!(parse_position(" 0 , 12 ").unwrap(), (0, 12));
        assert!(parse_position("3;5").is_err());
        assert!(parse_position("300,5").is_err());
    }

    #[test]
    fn actions_are_parsed() {
        assert_eq!(
            parse_command("o 1,2").unwrap(),
            Command::Action(MinesweeperAction::OpenCell((1, 2)))
        );
        assert_eq!(
            parse_command("f 0,0").unwrap(),
            Command::Action(MinesweeperAction::FlagCell((0, 0)))
        );
        assert_eq!(
            parse_command("a 4,4").unwrap(),
            Command::Action(MinesweeperAction::OpenCellOrSurroundingCells((4, 4)))
        );
        assert_eq!(parse_command("  q ").unwrap(), Command::Quit);
    }

    #[test]
    fn new_accepts_presets_and_custom_fields() {
        assert_eq!(
            parse_command("new expert").unwrap(),
            Command::New(Difficulty::Expert.config())
        );
        assert_eq!(
            parse_command("new 5 6 7").unwrap(),
            Command::New(GameConfig::new(5, 6, 7).unwrap())
        );
        assert!(parse_command("new 3 3 9").is_err());
        assert!(parse_command("new nightmare").is_err());
    }

    #[test]
    fn unknown_commands_are_rejected() {
        assert!(parse_command("x 1,1").is_err());
        assert!(parse_command("o").is_err());
    }
}

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use coingrid_core::{
    Board, Cell, Coord, GRID_SIZE, Line, PropagationMode, RevealOutcome, Simulation, SolveConfig,
};

/// Interactive helper for the 5x5 coin game: enter the line clues, reveal
/// cells as you play, and get the safest next pick.
#[derive(Debug, Parser)]
#[command(name = "coingrid", version, about)]
struct Cli {
    /// Iterate deduction passes to a fixed point before each enumeration.
    #[arg(long)]
    fixed_point: bool,

    #[command(flatten)]
    verbosity: Verbosity,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .init();

    let config = SolveConfig {
        propagation_mode: if cli.fixed_point {
            PropagationMode::FixedPoint
        } else {
            PropagationMode::SinglePass
        },
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut simulation = Simulation::with_config(config);

    'session: loop {
        simulation.restart();
        if !setup(&mut simulation, &mut input)? {
            break;
        }

        loop {
            match simulation.solve() {
                Ok(()) => log::debug!(
                    "{} candidate boards after this solve",
                    simulation.candidates().len()
                ),
                Err(err) => println!("{err}. Check the entered clues, or restart with 'r'."),
            }
            print_board(simulation.board());
            match simulation.safest_unknown_cell() {
                Some(pick) => println!(
                    "Best pick: row {} column {} ({:.0}% safe)",
                    pick.row + 1,
                    pick.column + 1,
                    pick.safe_probability * 100.0,
                ),
                None => println!("No cell is worth revealing."),
            }

            println!("Enter a reveal as 'RCV' (e.g. 213: row 2, column 1, value 3), 'r' to restart, 'q' to quit.");
            let Some(entry) = read_trimmed(&mut input)? else {
                break 'session;
            };
            match entry.as_str() {
                "r" | "R" => {
                    println!("Restarting, new board.");
                    continue 'session;
                }
                "q" | "Q" => break 'session,
                _ => match parse_reveal(&entry) {
                    Some((row, column, value)) => match simulation.reveal(row, column, value) {
                        Ok(RevealOutcome::HitBomb) => {
                            println!("That was a bomb. Restart with 'r' when ready.");
                        }
                        Ok(_) => {}
                        Err(err) => println!("{err}."),
                    },
                    None => println!("Invalid entry."),
                },
            }
        }
    }

    Ok(())
}

/// Reads the clues, runs the one-time line pass, and collects the reveals
/// for any bulk-safe lines. Returns `false` when input ran out.
fn setup(simulation: &mut Simulation, input: &mut impl BufRead) -> Result<bool> {
    println!("Enter the five row clues as 'pointsbombs', e.g. 071 for 7 points and 1 bomb.");
    for index in 0..GRID_SIZE {
        if !read_clue(simulation, input, index, true)? {
            return Ok(false);
        }
    }
    println!("Now the five column clues.");
    for index in 0..GRID_SIZE {
        if !read_clue(simulation, input, index, false)? {
            return Ok(false);
        }
    }

    let safe = simulation
        .finalize_lines()
        .context("finalizing freshly entered clues")?;
    for row in &safe.rows {
        println!("Uncover row {row} before continuing.");
    }
    for column in &safe.columns {
        println!("Uncover column {column} before continuing.");
    }

    if !safe.is_empty() {
        println!("Enter the uncovered cells as 'RCV', anything else when done.");
        loop {
            let Some(entry) = read_trimmed(input)? else {
                return Ok(false);
            };
            let Some((row, column, value)) = parse_reveal(&entry) else {
                break;
            };
            if let Err(err) = simulation.reveal(row, column, value) {
                println!("{err}.");
            }
        }
    }

    Ok(true)
}

fn read_clue(
    simulation: &mut Simulation,
    input: &mut impl BufRead,
    index: Coord,
    is_row: bool,
) -> Result<bool> {
    loop {
        let Some(entry) = read_trimmed(input)? else {
            return Ok(false);
        };
        let outcome = parse_clue(&entry).map(|(points, bombs)| {
            if is_row {
                simulation.set_row_clue(index, points, bombs)
            } else {
                simulation.set_column_clue(index, points, bombs)
            }
        });
        match outcome {
            Some(Ok(())) => return Ok(true),
            _ => println!(
                "Invalid clue, enter {} {} again.",
                if is_row { "row" } else { "column" },
                index + 1
            ),
        }
    }
}

fn read_trimmed(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line).context("reading input")? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

/// Clue entry: two or three digits whose last digit is the bomb count.
fn parse_clue(entry: &str) -> Option<(u8, u8)> {
    if !(2..=3).contains(&entry.len()) || !entry.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (points, bombs) = entry.split_at(entry.len() - 1);
    Some((points.parse().ok()?, bombs.parse().ok()?))
}

/// Reveal entry: 1-based row and column digits followed by the value.
fn parse_reveal(entry: &str) -> Option<(Coord, Coord, u8)> {
    if entry.len() != 3 || !entry.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let bytes = entry.as_bytes();
    let row = (bytes[0] - b'0').checked_sub(1)?;
    let column = (bytes[1] - b'0').checked_sub(1)?;
    let value = bytes[2] - b'0';
    Some((row, column, value))
}

fn cell_symbol(cell: Cell) -> char {
    match cell {
        Cell::Unknown => '_',
        Cell::One => '1',
        Cell::Two => '2',
        Cell::Three => '3',
        Cell::Bomb => 'B',
        Cell::BombOrOne => 'X',
        Cell::Safe => 'S',
    }
}

/// Residual capacity once bombs and bomb-or-ones are counted as 1: how
/// many points above the minimum the line still hides.
fn residual(board: &Board, line: Line) -> i32 {
    i32::from(board.line_clue(line).capacity()) - i32::from(board.line_score(line, 1))
}

fn print_board(board: &Board) {
    for row in 0..GRID_SIZE {
        for column in 0..GRID_SIZE {
            print!("{} ", cell_symbol(board.cell((row, column))));
        }
        println!(" > {}", residual(board, Line::Row(row)));
    }
    println!();
    println!("v v v v v");
    for column in 0..GRID_SIZE {
        print!("{} ", residual(board, Line::Column(column)));
    }
    println!();
}

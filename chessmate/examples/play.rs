/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;

use chessmate::{ChessPosition, Color, Match};

/// Play a list of moves against a fresh match and print the resulting board.
#[derive(Debug, Parser)]
struct Cli {
    /// Moves in long algebraic form, like `e2e4 e7e5`.
    #[arg(required = false)]
    moves: Vec<String>,

    /// FEN piece placements to start from instead of the standard setup.
    #[arg(short, long)]
    fen: Option<String>,

    /// Side to move first when `--fen` is given.
    #[arg(short, long, default_value = "white")]
    side: String,
}

/// Splits a move like `e2e4` into its source and target squares.
fn parse_move(mv: &str) -> Result<(ChessPosition, ChessPosition)> {
    if mv.len() != 4 {
        bail!("expected a move like e2e4, got {mv:?}");
    }
    let from = mv[..2].parse()?;
    let to = mv[2..].parse()?;
    Ok((from, to))
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let mut game = if let Some(fen) = &args.fen {
        let side = match args.side.as_str() {
            "white" | "w" => Color::White,
            "black" | "b" => Color::Black,
            other => bail!("expected side 'white' or 'black', got {other:?}"),
        };
        Match::from_fen(fen, side)?
    } else {
        Match::new()
    };

    for mv in &args.moves {
        let (from, to) = parse_move(mv)?;
        let captured = game
            .perform_move(from, to)
            .with_context(|| format!("move {mv} was rejected"))?;

        if let Some(piece) = captured {
            println!("{mv}: captured {} ({})", piece.char(), piece.color().name());
        } else {
            println!("{mv}");
        }
    }

    println!("\n{game}");

    if game.is_in_checkmate() {
        println!("{}", "Game over.".red().bold());
    } else if game.is_in_check() {
        println!("{}", format!("{} is in check!", game.side_to_move().name()).yellow());
    }

    if !game.captured().is_empty() {
        let captured: String = game.captured().iter().map(|piece| piece.char()).collect();
        println!("Captured so far: {captured}");
    }

    Ok(())
}

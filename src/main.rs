use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use itertools::Itertools;

use chess_core::perft::{perft, perft_divide};
use chess_core::position::{Position, STARTING_POSITION_FEN};
use chess_core::types::Square;

#[derive(Parser, Debug)]
#[command(name = "chess_core")]
#[command(about = "Inspect chess positions: legal moves, perft counts and move sequences")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List legal moves, optionally only for the piece on one square
    Moves {
        #[arg(long, default_value = STARTING_POSITION_FEN)]
        fen: String,

        /// Square in algebraic notation, e.g. e2
        #[arg(long)]
        square: Option<String>,
    },
    /// Count leaf nodes of the legal move tree
    Perft {
        #[arg(short, long, default_value_t = 3)]
        depth: u8,

        #[arg(long, default_value = STARTING_POSITION_FEN)]
        fen: String,

        /// Print node counts below each root move
        #[arg(long)]
        divide: bool,
    },
    /// Apply UCI moves and print the resulting position
    Play {
        #[arg(long, default_value = STARTING_POSITION_FEN)]
        fen: String,

        /// Moves such as e2e4 or e7e8q
        moves: Vec<String>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    match args.command {
        Command::Moves { fen, square } => {
            let position = Position::from_fen(&fen)?;
            let moves = match square {
                Some(text) => {
                    let square = Square::from_algebraic(&text)
                        .ok_or_else(|| eyre!("not a square: {text}"))?;
                    position.legal_moves_for_piece(square)
                }
                None => position.legal_moves(),
            };
            println!("{}", position.board());
            println!("{} moves: {}", moves.len(), moves.iter().map(|mv| mv.to_uci()).join(" "));
        }
        Command::Perft { depth, fen, divide } => {
            let position = Position::from_fen(&fen)?;
            if divide {
                let divided = perft_divide(&position, depth);
                for (mv, nodes) in divided.iter().sorted_by_key(|(mv, _)| mv.to_uci()) {
                    println!("{}: {nodes}", mv.to_uci());
                }
                println!();
                println!("Nodes searched: {}", divided.iter().map(|(_, nodes)| nodes).sum::<u64>());
            } else {
                println!("Nodes searched: {}", perft(&position, depth));
            }
        }
        Command::Play { fen, moves } => {
            let mut position = Position::from_fen(&fen)?;
            for uci in &moves {
                let mv = position.find_legal_move(uci)?;
                position = position.with_move(&mv);
            }
            println!("{}", position.board());
            println!("{}", position.to_fen()?);
            if position.legal_moves().is_empty() {
                let outcome = if position.is_in_check() { "checkmate" } else { "stalemate" };
                println!("{outcome}");
            }
        }
    }
    Ok(())
}

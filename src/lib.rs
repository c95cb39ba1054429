//! Chess move representation and board transitions.
//!
//! Every move is generated for a specific immutable
//! [`Board`](chess::board::Board) and knows how to produce the next one
//! through [`Move::execute`](chess::moves::Move::execute). Legal move
//! generation is left to the user of the crate: it plugs in through
//! [`MoveGenerator`](chess::factory::MoveGenerator).
//!
//! ```
//! use ply::chess::board::Board;
//! use ply::chess::core::{Player, Square};
//! use ply::chess::moves::Move;
//!
//! let board = Board::starting();
//! let pawn = board.at(Square::E2).unwrap();
//! let next = Move::pawn_jump(&board, Square::E2, Square::E4, pawn).execute();
//! assert_eq!(next.at(Square::E2), None);
//! assert_eq!(next.current_player(), Player::Black);
//! assert_eq!(
//!     next.to_string(),
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq"
//! );
//! ```

// Rustdoc lints.
#![warn(
    rustdoc::private_doc_tests,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]
// Performance is extremely important.
#![deny(clippy::perf)]

pub mod chess;

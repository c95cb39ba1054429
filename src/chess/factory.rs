//! Finding the move behind a pair of squares, e.g. the squares a user clicked
//! on or the squares of a UCI move.
//!
//! Legal move generation itself is not implemented here: it is provided by
//! the caller through [`MoveGenerator`].

use std::fmt;

use anyhow::bail;

use crate::chess::board::Board;
use crate::chess::core::{Player, Square};
use crate::chess::moves::{Move, MoveList, NullMove};

/// Source of legal moves for a board. Moves produced by the generator borrow
/// the board they were generated for.
pub trait MoveGenerator {
    /// Calculates the moves `player` can make on `board`, regardless of
    /// whether it is `player`'s turn.
    fn legal_moves<'a>(&self, board: &'a Board, player: Player) -> MoveList<'a>;
}

/// Outcome of [`create_move`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveLookup<'a> {
    /// A legal move connects the squares.
    Found(Move<'a>),
    /// No legal move connects the squares. This is an expected outcome (e.g.
    /// a misclick), not an error.
    Null(NullMove<'a>),
}

impl<'a> MoveLookup<'a> {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null(_))
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from(&self) -> Square {
        match self {
            Self::Found(m) => m.from(),
            Self::Null(null) => null.from(),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn to(&self) -> Square {
        match self {
            Self::Found(m) => m.to(),
            Self::Null(null) => null.to(),
        }
    }

    /// Returns the found move, if any.
    #[must_use]
    pub fn into_move(self) -> Option<Move<'a>> {
        match self {
            Self::Found(m) => Some(m),
            Self::Null(_) => None,
        }
    }

    /// Makes the found move.
    ///
    /// # Errors
    ///
    /// Executing the null outcome is a caller error: there is no move to make
    /// and the board transition would be meaningless.
    pub fn execute(&self) -> anyhow::Result<Board> {
        match self {
            Self::Found(m) => Ok(m.execute()),
            Self::Null(null) => bail!("cannot execute null move {null}"),
        }
    }
}

impl fmt::Display for MoveLookup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(m) => write!(f, "{m}"),
            Self::Null(null) => write!(f, "{null}"),
        }
    }
}

/// Looks up the legal move going from `from` to `to` on the `board`.
///
/// Moves of both players are considered (White first), not only the moves of
/// the player to move. Only the squares are matched, so the first matching
/// move is returned: for promotions and other ambiguous square pairs the
/// result depends on the generator's order.
pub fn create_move<'a, G>(board: &'a Board, generator: &G, from: Square, to: Square) -> MoveLookup<'a>
where
    G: MoveGenerator + ?Sized,
{
    let found = itertools::chain(
        generator.legal_moves(board, Player::White),
        generator.legal_moves(board, Player::Black),
    )
    .find(|m| m.from() == from && m.to() == to);
    match found {
        Some(m) => {
            tracing::trace!(chess_move = %m, "found move");
            MoveLookup::Found(m)
        },
        None => {
            tracing::debug!(%from, %to, "no legal move connects the squares");
            MoveLookup::Null(NullMove::new(board, from, to))
        },
    }
}

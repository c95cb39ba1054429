//! Move representation and board transitions.
//!
//! A [`Move`] knows the [`Board`] it was generated for and the piece it moves.
//! [`Move::execute`] is the only way to get from one board to the next: it
//! never modifies the original board and always builds a new one.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

use anyhow::bail;
use arrayvec::ArrayVec;

use crate::chess::board::{Board, Builder};
use crate::chess::core::{Piece, PieceKind, Square};

/// Upper bound on the number of legal moves in a single position for one side
/// (the known maximum is 218).
pub const MAX_MOVES: usize = 256;

/// Fixed-capacity list of moves generated for a single board.
pub type MoveList<'a> = ArrayVec<Move<'a>, MAX_MOVES>;

bitflags::bitflags! {
    /// Compact summary of the [`MoveKind`] that can be used by the consumers
    /// (move ordering, evaluators) without matching on the kind itself.
    ///
    /// | Bit | Meaning |
    /// | --- | ------- |
    /// | none | Quiet move |
    /// | 0 | Double pawn push |
    /// | 1 | Kingside castle (short castle or O-O) |
    /// | 2 | Queenside castle (long castle or O-O-O) |
    /// | 3 | Capture |
    /// | 4 | Promotion |
    ///
    /// Promotions carry the attributes of the move they decorate, so a
    /// capturing promotion is `CAPTURE | PROMOTION`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MoveAttributes: u8 {
        /// Moves that do not change the material balance.
        const QUIET = 0;
        /// Pawn advancement by 2 squares from the original rank (second for
        /// white and seventh for black).
        const DOUBLE_PAWN_PUSH = 0b0_0001;
        /// Short castle or O-O.
        const KINGSIDE_CASTLE = 0b0_0010;
        /// Long castle or O-O-O.
        const QUEENSIDE_CASTLE = 0b0_0100;
        /// Moves that change the material balance.
        const CAPTURE = 0b0_1000;
        /// Pawn move to the opponent's backrank.
        const PROMOTION = 0b1_0000;
    }
}

/// The side of the board the king castles to.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

/// The rook half of a [castle]. The king is the moved piece of the move
/// itself; the rook travels from `rook_from` to `rook_to` in the same
/// transition.
///
/// [castle]: https://www.chessprogramming.org/Castling
#[derive(Clone, Copy, Debug)]
pub struct Castle {
    side: CastleSide,
    rook: Piece,
    rook_from: Square,
    rook_to: Square,
}

impl Castle {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn side(&self) -> CastleSide {
        self.side
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn rook(&self) -> Piece {
        self.rook
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn rook_from(&self) -> Square {
        self.rook_from
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn rook_to(&self) -> Square {
        self.rook_to
    }
}

/// Everything that distinguishes one kind of move from another. The data
/// common to all moves lives in [`Move`].
#[derive(Clone, Debug)]
pub enum MoveKind {
    /// Piece moves to an empty square.
    Quiet,
    /// Piece moves to the square occupied by the `attacked` piece and
    /// captures it.
    Capture {
        #[allow(missing_docs)]
        attacked: Piece,
    },
    /// Pawn advances two squares from its starting rank. This does not change
    /// how the board is updated but en passant rules depend on it.
    PawnJump,
    /// King and rook move at once.
    Castle(Castle),
    /// Pawn reaches the last rank and turns into a queen. The pawn's own move
    /// (quiet or capture) is described by `decorated`.
    Promotion {
        #[allow(missing_docs)]
        decorated: Box<MoveKind>,
    },
}

impl MoveKind {
    fn attacked_piece(&self) -> Option<Piece> {
        match self {
            Self::Capture { attacked } => Some(*attacked),
            Self::Promotion { decorated } => decorated.attacked_piece(),
            Self::Quiet | Self::PawnJump | Self::Castle(_) => None,
        }
    }

    fn attributes(&self) -> MoveAttributes {
        match self {
            Self::Quiet => MoveAttributes::QUIET,
            Self::Capture { .. } => MoveAttributes::CAPTURE,
            Self::PawnJump => MoveAttributes::DOUBLE_PAWN_PUSH,
            Self::Castle(castle) => match castle.side {
                CastleSide::KingSide => MoveAttributes::KINGSIDE_CASTLE,
                CastleSide::QueenSide => MoveAttributes::QUEENSIDE_CASTLE,
            },
            Self::Promotion { decorated } => MoveAttributes::PROMOTION | decorated.attributes(),
        }
    }
}

impl PartialEq for MoveKind {
    /// Kinds are only equal when the variants match. Castles are compared by
    /// side and rook, captures by the attacked piece.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Quiet, Self::Quiet) | (Self::PawnJump, Self::PawnJump) => true,
            (Self::Capture { attacked: lhs }, Self::Capture { attacked: rhs }) => lhs == rhs,
            (Self::Castle(lhs), Self::Castle(rhs)) => lhs.side == rhs.side && lhs.rook == rhs.rook,
            (Self::Promotion { decorated: lhs }, Self::Promotion { decorated: rhs }) => lhs == rhs,
            _ => false,
        }
    }
}

impl Eq for MoveKind {}

impl Hash for MoveKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Self::Quiet | Self::PawnJump => {},
            Self::Capture { attacked } => attacked.hash(state),
            Self::Castle(castle) => {
                castle.side.hash(state);
                castle.rook.hash(state);
            },
            Self::Promotion { decorated } => decorated.hash(state),
        }
    }
}

/// A move generated for a specific [`Board`]. Moves are immutable and only
/// describe the transition: [`Move::execute`] produces the next board.
///
/// Two moves are equal when they move the same piece between the same
/// squares and are of the same [`MoveKind`]. The board a move was generated
/// for does not participate in comparisons, which makes moves usable as keys
/// in search trees and transposition tables.
///
/// The move does not check its own legality: it trusts whoever generated it.
#[derive(Clone)]
pub struct Move<'a> {
    board: &'a Board,
    from: Square,
    to: Square,
    moved_piece: Piece,
    is_first_move: bool,
    kind: MoveKind,
}

impl<'a> Move<'a> {
    fn new(board: &'a Board, from: Square, to: Square, moved_piece: Piece, kind: MoveKind) -> Self {
        debug_assert_eq!(
            from,
            moved_piece.position(),
            "moved piece {moved_piece} is not on {from}"
        );
        Self {
            board,
            from,
            to,
            moved_piece,
            is_first_move: moved_piece.is_first_move(),
            kind,
        }
    }

    /// Moves a piece to an empty square.
    #[must_use]
    pub fn quiet(board: &'a Board, from: Square, to: Square, moved_piece: Piece) -> Self {
        Self::new(board, from, to, moved_piece, MoveKind::Quiet)
    }

    /// Moves a piece to the square of the `attacked` piece, capturing it.
    #[must_use]
    pub fn capture(
        board: &'a Board,
        from: Square,
        to: Square,
        moved_piece: Piece,
        attacked: Piece,
    ) -> Self {
        debug_assert_eq!(attacked.position(), to, "attacked piece {attacked} is not on {to}");
        Self::new(board, from, to, moved_piece, MoveKind::Capture { attacked })
    }

    /// Advances a pawn two squares forward.
    #[must_use]
    pub fn pawn_jump(board: &'a Board, from: Square, to: Square, pawn: Piece) -> Self {
        Self::new(board, from, to, pawn, MoveKind::PawnJump)
    }

    /// Short castle: the king and the h-file rook.
    #[must_use]
    pub fn king_side_castle(
        board: &'a Board,
        from: Square,
        to: Square,
        king: Piece,
        rook: Piece,
        rook_from: Square,
        rook_to: Square,
    ) -> Self {
        Self::castle(board, from, to, king, Castle {
            side: CastleSide::KingSide,
            rook,
            rook_from,
            rook_to,
        })
    }

    /// Long castle: the king and the a-file rook.
    #[must_use]
    pub fn queen_side_castle(
        board: &'a Board,
        from: Square,
        to: Square,
        king: Piece,
        rook: Piece,
        rook_from: Square,
        rook_to: Square,
    ) -> Self {
        Self::castle(board, from, to, king, Castle {
            side: CastleSide::QueenSide,
            rook,
            rook_from,
            rook_to,
        })
    }

    fn castle(board: &'a Board, from: Square, to: Square, king: Piece, castle: Castle) -> Self {
        debug_assert_eq!(castle.rook.position(), castle.rook_from);
        Self::new(board, from, to, king, MoveKind::Castle(castle))
    }

    /// Turns a pawn move to the last rank into a promotion.
    ///
    /// # Errors
    ///
    /// The decorated move has to be a pawn move that is not already a
    /// promotion.
    pub fn promotion(decorated: Self) -> anyhow::Result<Self> {
        if decorated.moved_piece.kind() != PieceKind::Pawn {
            bail!(
                "only pawns can be promoted, got {} in {decorated}",
                decorated.moved_piece
            );
        }
        if let MoveKind::Promotion { .. } | MoveKind::Castle(_) = decorated.kind {
            bail!("promotion can only decorate a pawn move or capture, got {decorated}");
        }
        let Self {
            board,
            from,
            to,
            moved_piece,
            is_first_move,
            kind,
        } = decorated;
        Ok(Self {
            board,
            from,
            to,
            moved_piece,
            is_first_move,
            kind: MoveKind::Promotion {
                decorated: Box::new(kind),
            },
        })
    }

    /// The board this move was generated for.
    #[must_use]
    pub const fn board(&self) -> &'a Board {
        self.board
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn to(&self) -> Square {
        self.to
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn moved_piece(&self) -> Piece {
        self.moved_piece
    }

    /// Whether the moved piece was on its first move when this move was
    /// generated.
    #[must_use]
    pub const fn is_first_move(&self) -> bool {
        self.is_first_move
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn kind(&self) -> &MoveKind {
        &self.kind
    }

    /// Returns true for captures, including capturing promotions.
    #[must_use]
    pub fn is_attack(&self) -> bool {
        self.attacked_piece().is_some()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_castle(&self) -> bool {
        matches!(self.kind, MoveKind::Castle(_))
    }

    /// The captured piece, if the move is a capture.
    #[must_use]
    pub fn attacked_piece(&self) -> Option<Piece> {
        self.kind.attacked_piece()
    }

    /// The rook that moves along with the king, if the move is a castle.
    #[must_use]
    pub const fn castle_rook(&self) -> Option<Piece> {
        match &self.kind {
            MoveKind::Castle(castle) => Some(castle.rook),
            _ => None,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn attributes(&self) -> MoveAttributes {
        self.kind.attributes()
    }

    /// The pawn move underneath a promotion.
    #[must_use]
    pub fn decorated(&self) -> Option<Self> {
        match &self.kind {
            MoveKind::Promotion { decorated } => Some(self.with_kind(decorated.as_ref().clone())),
            _ => None,
        }
    }

    fn with_kind(&self, kind: MoveKind) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }

    /// Makes the move and returns the resulting board. The board this move
    /// was generated for stays intact.
    ///
    /// The next player to move is the opponent of the moved piece owner.
    #[must_use]
    pub fn execute(&self) -> Board {
        let next = match &self.kind {
            MoveKind::Quiet | MoveKind::Capture { .. } | MoveKind::PawnJump => self.relocate(),
            MoveKind::Castle(castle) => self.castle_pieces(castle),
            MoveKind::Promotion { decorated } => self.promote(decorated),
        };
        tracing::trace!(chess_move = %self, board = %next, "executed move");
        next
    }

    /// Copies every piece except the moved one and puts the moved piece on
    /// the destination square. The captured piece (if any) is overwritten.
    fn relocate(&self) -> Board {
        let mut builder = Builder::new();
        for piece in self.board.pieces().filter(|piece| **piece != self.moved_piece) {
            builder.set_piece(piece.position(), *piece);
        }
        builder.set_piece(self.to, self.moved_piece.move_piece(self));
        builder.set_move_maker(self.moved_piece.owner().opponent());
        builder.build()
    }

    fn castle_pieces(&self, castle: &Castle) -> Board {
        let mut builder = Builder::new();
        for piece in self
            .board
            .pieces()
            .filter(|piece| **piece != self.moved_piece && **piece != castle.rook)
        {
            builder.set_piece(piece.position(), *piece);
        }
        builder.set_piece(self.to, self.moved_piece.move_piece(self));
        // The rook is not the moved piece: it gets its own square and loses
        // the first move flag explicitly.
        builder.set_piece(
            castle.rook_to,
            Piece::new(castle.rook.owner(), PieceKind::Rook, castle.rook_to, false),
        );
        builder.set_move_maker(self.moved_piece.owner().opponent());
        builder.build()
    }

    fn promote(&self, decorated: &MoveKind) -> Board {
        let pawn_moved = self.with_kind(decorated.clone()).execute();
        let mut builder = Builder::new();
        for piece in pawn_moved.pieces().filter(|piece| piece.position() != self.to) {
            builder.set_piece(piece.position(), *piece);
        }
        builder.set_piece(self.to, self.moved_piece.move_piece(self).promotion_piece());
        builder.set_move_maker(pawn_moved.current_player());
        builder.build()
    }

    /// Lays out the pieces of the board this move was generated for again,
    /// with the moved piece's owner to move.
    ///
    /// NOTE: This does not reverse the move. It relies on the original board
    /// being kept intact, which is always the case because [`Move::execute`]
    /// never modifies it.
    #[must_use]
    pub fn undo(&self) -> Board {
        let mut builder = Builder::new();
        for piece in self.board.pieces() {
            builder.set_piece(piece.position(), *piece);
        }
        builder.set_move_maker(self.moved_piece.owner());
        builder.build()
    }
}

impl PartialEq for Move<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.moved_piece == other.moved_piece
            && self.kind == other.kind
    }
}

impl Eq for Move<'_> {}

impl Hash for Move<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
        self.moved_piece.hash(state);
        self.kind.hash(state);
    }
}

impl fmt::Display for Move<'_> {
    /// Prints the move in coordinate notation: `e2-e4`, `e4xd5`, `0-0`,
    /// `0-0-0` and `e7-e8=Q`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            MoveKind::Quiet | MoveKind::PawnJump => write!(f, "{}-{}", self.from, self.to),
            MoveKind::Capture { .. } => write!(f, "{}x{}", self.from, self.to),
            MoveKind::Castle(castle) => f.write_str(match castle.side {
                CastleSide::KingSide => "0-0",
                CastleSide::QueenSide => "0-0-0",
            }),
            MoveKind::Promotion { .. } => {
                write!(f, "{}-{}={}", self.from, self.to, PieceKind::Queen)
            },
        }
    }
}

impl fmt::Debug for Move<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Move")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("moved_piece", &self.moved_piece)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Placeholder for a pair of squares that no legal move connects. Unlike
/// [`Move`], it can not be executed.
#[derive(Clone, Copy)]
pub struct NullMove<'a> {
    board: &'a Board,
    from: Square,
    to: Square,
}

impl<'a> NullMove<'a> {
    pub(crate) const fn new(board: &'a Board, from: Square, to: Square) -> Self {
        Self { board, from, to }
    }

    /// The board that was searched for the move.
    #[must_use]
    pub const fn board(&self) -> &'a Board {
        self.board
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn to(&self) -> Square {
        self.to
    }
}

impl fmt::Display for NullMove<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

impl PartialEq for NullMove<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl Eq for NullMove<'_> {}

impl fmt::Debug for NullMove<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NullMove({self})")
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::Player;

    fn setup(input: &str) -> Board {
        Board::try_from(input).expect("parsing valid board")
    }

    fn piece(board: &Board, square: Square) -> Piece {
        board.at(square).expect("square should be occupied")
    }

    #[test]
    fn display() {
        let board = setup("r3k2r/1P6/8/3p4/4P3/8/8/R3K2R w KQkq -");
        let pawn = piece(&board, Square::E4);
        assert_eq!(
            Move::quiet(&board, Square::E4, Square::E5, pawn).to_string(),
            "e4-e5"
        );
        assert_eq!(
            Move::capture(&board, Square::E4, Square::D5, pawn, piece(&board, Square::D5))
                .to_string(),
            "e4xd5"
        );
        let king = piece(&board, Square::E1);
        assert_eq!(
            Move::king_side_castle(
                &board,
                Square::E1,
                Square::G1,
                king,
                piece(&board, Square::H1),
                Square::H1,
                Square::F1
            )
            .to_string(),
            "0-0"
        );
        assert_eq!(
            Move::queen_side_castle(
                &board,
                Square::E1,
                Square::C1,
                king,
                piece(&board, Square::A1),
                Square::A1,
                Square::D1
            )
            .to_string(),
            "0-0-0"
        );
        let promotion = Move::promotion(Move::quiet(
            &board,
            Square::B7,
            Square::B8,
            piece(&board, Square::B7),
        ))
        .unwrap();
        assert_eq!(promotion.to_string(), "b7-b8=Q");
        assert_eq!(
            NullMove::new(&board, Square::A3, Square::H7).to_string(),
            "a3-h7"
        );
    }

    #[test]
    fn attributes() {
        let board = setup("r3k2r/1P6/8/3p4/4P3/8/6P1/R3K2R w KQkq -");
        let pawn = piece(&board, Square::E4);
        assert_eq!(
            Move::quiet(&board, Square::E4, Square::E5, pawn).attributes(),
            MoveAttributes::QUIET
        );
        assert_eq!(
            Move::pawn_jump(&board, Square::G2, Square::G4, piece(&board, Square::G2)).attributes(),
            MoveAttributes::DOUBLE_PAWN_PUSH
        );
        let capturing_promotion = Move::promotion(Move::capture(
            &board,
            Square::B7,
            Square::A8,
            piece(&board, Square::B7),
            piece(&board, Square::A8),
        ))
        .unwrap();
        assert_eq!(
            capturing_promotion.attributes(),
            MoveAttributes::CAPTURE | MoveAttributes::PROMOTION
        );
        assert!(capturing_promotion.is_attack());
        assert_eq!(
            capturing_promotion.attacked_piece(),
            Some(piece(&board, Square::A8))
        );
        assert!(!capturing_promotion.is_castle());
        let castle = Move::queen_side_castle(
            &board,
            Square::E1,
            Square::C1,
            piece(&board, Square::E1),
            piece(&board, Square::A1),
            Square::A1,
            Square::D1,
        );
        assert_eq!(castle.attributes(), MoveAttributes::QUEENSIDE_CASTLE);
        assert!(castle.is_castle());
        assert!(!castle.is_attack());
        assert_eq!(castle.castle_rook(), Some(piece(&board, Square::A1)));
        let MoveKind::Castle(rook_move) = castle.kind() else {
            panic!("expected castle, got {castle:?}");
        };
        assert_eq!(rook_move.side(), CastleSide::QueenSide);
        assert_eq!(rook_move.rook(), piece(&board, Square::A1));
        assert_eq!(rook_move.rook_from(), Square::A1);
        assert_eq!(rook_move.rook_to(), Square::D1);
    }

    #[test]
    fn invalid_promotions() {
        let board = setup("4k3/1P6/8/8/8/8/8/R3K3 w Q -");
        let rook_move = Move::quiet(&board, Square::A1, Square::A8, piece(&board, Square::A1));
        assert!(Move::promotion(rook_move).is_err());
        let promotion = Move::promotion(Move::quiet(
            &board,
            Square::B7,
            Square::B8,
            piece(&board, Square::B7),
        ))
        .unwrap();
        assert!(Move::promotion(promotion).is_err());
    }

    #[test]
    fn decorated() {
        let board = setup("4k3/1P6/8/8/8/8/8/4K3 w - -");
        let pawn_move = Move::quiet(&board, Square::B7, Square::B8, piece(&board, Square::B7));
        let promotion = Move::promotion(pawn_move.clone()).unwrap();
        assert_eq!(promotion.decorated(), Some(pawn_move.clone()));
        assert_eq!(pawn_move.decorated(), None);
    }

    #[test]
    fn equality() {
        let board = setup("r3k2r/1P6/8/3p4/4P3/8/8/R3K2R w KQkq -");
        let pawn = piece(&board, Square::E4);
        let quiet = Move::quiet(&board, Square::E4, Square::E5, pawn);
        assert_eq!(quiet, quiet);
        assert_eq!(quiet, Move::quiet(&board, Square::E4, Square::E5, pawn));
        assert_ne!(quiet, Move::quiet(&board, Square::E4, Square::E6, pawn));
        // The kind has to match exactly.
        assert_ne!(quiet, Move::pawn_jump(&board, Square::E4, Square::E5, pawn));
        // Boards are not compared.
        let same_pieces = board.clone();
        assert_eq!(quiet, Move::quiet(&same_pieces, Square::E4, Square::E5, pawn));

        let king = piece(&board, Square::E1);
        let rook = piece(&board, Square::H1);
        let short = Move::king_side_castle(
            &board,
            Square::E1,
            Square::G1,
            king,
            rook,
            Square::H1,
            Square::F1,
        );
        let long = Move::queen_side_castle(
            &board,
            Square::E1,
            Square::G1,
            king,
            rook,
            Square::H1,
            Square::F1,
        );
        assert_ne!(short, long);
        assert_ne!(short, Move::quiet(&board, Square::E1, Square::G1, king));
        assert_eq!(
            short,
            Move::king_side_castle(
                &board,
                Square::E1,
                Square::G1,
                king,
                rook,
                Square::H1,
                Square::F1,
            )
        );

        let attacked = piece(&board, Square::D5);
        let capture = Move::capture(&board, Square::E4, Square::D5, pawn, attacked);
        let other_attacked = Piece::new(Player::Black, PieceKind::Queen, Square::D5, false);
        assert_ne!(
            capture,
            Move::capture(&board, Square::E4, Square::D5, pawn, other_attacked)
        );
        assert_ne!(capture, Move::quiet(&board, Square::E4, Square::D5, pawn));

        let promoted_pawn = piece(&board, Square::B7);
        let push = Move::quiet(&board, Square::B7, Square::B8, promoted_pawn);
        let promotion = Move::promotion(push.clone()).unwrap();
        assert_ne!(promotion, push);
        assert_eq!(promotion, Move::promotion(push).unwrap());
    }

    #[test]
    fn hash_consistency() {
        let board = setup("r3k2r/1P6/8/3p4/4P3/8/8/R3K2R w KQkq -");
        let pawn = piece(&board, Square::E4);
        let king = piece(&board, Square::E1);
        let mut moves = HashSet::new();
        assert!(moves.insert(Move::quiet(&board, Square::E4, Square::E5, pawn)));
        assert!(moves.insert(Move::capture(
            &board,
            Square::E4,
            Square::D5,
            pawn,
            piece(&board, Square::D5)
        )));
        assert!(moves.insert(Move::king_side_castle(
            &board,
            Square::E1,
            Square::G1,
            king,
            piece(&board, Square::H1),
            Square::H1,
            Square::F1
        )));
        assert!(moves.insert(Move::queen_side_castle(
            &board,
            Square::E1,
            Square::C1,
            king,
            piece(&board, Square::A1),
            Square::A1,
            Square::D1
        )));
        // Duplicates built independently are found.
        assert!(!moves.insert(Move::quiet(&board, Square::E4, Square::E5, pawn)));
        assert!(!moves.insert(Move::queen_side_castle(
            &board,
            Square::E1,
            Square::C1,
            king,
            piece(&board, Square::A1),
            Square::A1,
            Square::D1
        )));
        let promoted_pawn = piece(&board, Square::B7);
        let promotion = |to: Square| {
            let push = match board.at(to) {
                Some(attacked) => Move::capture(&board, Square::B7, to, promoted_pawn, attacked),
                None => Move::quiet(&board, Square::B7, to, promoted_pawn),
            };
            Move::promotion(push).unwrap()
        };
        assert!(moves.insert(promotion(Square::B8)));
        assert!(moves.insert(promotion(Square::A8)));
        assert!(moves.insert(Move::pawn_jump(&board, Square::E4, Square::E6, pawn)));
        assert!(!moves.insert(promotion(Square::B8)));
        assert!(!moves.insert(promotion(Square::A8)));
        assert!(!moves.insert(Move::pawn_jump(&board, Square::E4, Square::E6, pawn)));
        assert!(!moves.insert(Move::capture(
            &board,
            Square::E4,
            Square::D5,
            pawn,
            piece(&board, Square::D5)
        )));
        assert_eq!(moves.len(), 7);
    }

    #[test]
    fn first_move_snapshot() {
        let board = Board::starting();
        let knight = piece(&board, Square::G1);
        let m = Move::quiet(&board, Square::G1, Square::F3, knight);
        assert!(m.is_first_move());
        let next = m.execute();
        let moved_knight = piece(&next, Square::F3);
        assert!(!moved_knight.is_first_move());
        assert!(!Move::quiet(&next, Square::F3, Square::G5, moved_knight).is_first_move());
    }

    #[test]
    fn execute_keeps_source_board() {
        let board = Board::starting();
        let snapshot = board.clone();
        let m = Move::pawn_jump(&board, Square::D2, Square::D4, piece(&board, Square::D2));
        let next = m.execute();
        assert_eq!(board, snapshot);
        assert_ne!(next, board);
        assert_eq!(m.board(), &snapshot);
    }

    #[test]
    fn undo_restores_source_layout() {
        let board = setup("r3k2r/8/8/8/8/8/8/R3K2R b KQkq -");
        let m = Move::king_side_castle(
            &board,
            Square::E8,
            Square::G8,
            piece(&board, Square::E8),
            piece(&board, Square::H8),
            Square::H8,
            Square::F8,
        );
        let next = m.execute();
        assert_eq!(next.current_player(), Player::White);
        let undone = m.undo();
        assert_eq!(undone, board);
        assert_eq!(undone.current_player(), Player::Black);
        assert_eq!(
            undone.at(Square::H8).map(|rook| rook.is_first_move()),
            Some(true)
        );
    }

    #[test]
    fn undo_after_move_out_of_turn() {
        let board = Board::starting();
        let pawn = piece(&board, Square::C7);
        let m = Move::quiet(&board, Square::C7, Square::C6, pawn);
        assert_eq!(m.execute().current_player(), Player::White);
        let undone = m.undo();
        assert_eq!(undone.current_player(), pawn.owner());
        assert_eq!(undone.current_player(), Player::Black);
        assert!(undone.pieces().eq(board.pieces()));
    }
}

//! Immutable board snapshots and the [`Builder`] that produces them.
//!
//! A [`Board`] is never modified once it is built: making a move produces a
//! brand new [`Board`] (see [`crate::chess::moves::Move::execute`]), so the
//! boards form a graph connected by moves. Boards are stored in the
//! square-centric [Mailbox] representation: querying the piece on a square is
//! a single lookup and enumerating all pieces is a scan over 64 squares.
//!
//! [Mailbox]: https://www.chessprogramming.org/Mailbox

use std::fmt::{self, Write};

use anyhow::bail;
use strum::IntoEnumIterator;

use crate::chess::core::{File, Piece, PieceKind, Player, Rank, Square, BOARD_SIZE, BOARD_WIDTH};

type Mailbox = [Option<Piece>; BOARD_SIZE as usize];

/// Snapshot of all pieces on the board and the player who makes the next move.
///
/// [`Board::try_from()`] provides a convenient interface for creating a
/// [`Board`] from a [Forsyth-Edwards Notation] (FEN) string. Only the parts of
/// FEN that a board can express are used: piece placement, side to move and
/// castling rights (which become first-move flags of kings and rooks). En
/// passant square and move counters are accepted and ignored.
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: Mailbox,
    move_maker: Player,
}

impl Board {
    /// Creates the starting position of the standard chess variant. Every
    /// piece is on its first move.
    ///
    /// ```
    /// use ply::chess::board::Board;
    ///
    /// let board = Board::starting();
    /// assert_eq!(
    ///     &board.to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        const BACKRANK: [PieceKind; BOARD_WIDTH as usize] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut builder = Builder::new();
        for player in [Player::White, Player::Black] {
            for (file, kind) in File::iter().zip(BACKRANK) {
                let square = Square::new(file, Rank::backrank(player));
                builder.set_piece(square, Piece::new(player, kind, square, true));
                let square = Square::new(file, Rank::pawns_starting(player));
                builder.set_piece(square, Piece::new(player, PieceKind::Pawn, square, true));
            }
        }
        builder.set_move_maker(Player::White);
        builder.build()
    }

    /// Starts accumulating pieces for a new board.
    #[must_use]
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Returns the piece standing on given square, if any.
    #[must_use]
    pub const fn at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Enumerates all pieces on the board in square order (A1, B1, ..., H8).
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.squares.iter().flatten()
    }

    /// Enumerates all pieces owned by `player`.
    pub fn player_pieces(&self, player: Player) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces().filter(move |piece| piece.owner() == player)
    }

    /// The player who makes the next move.
    #[must_use]
    pub const fn current_player(&self) -> Player {
        self.move_maker
    }

    /// Human-readable name of the square, as used in move notation.
    #[must_use]
    pub fn position_at_coordinate(square: Square) -> String {
        square.to_string()
    }

    /// Parses board from FEN (or EPD) string.
    ///
    /// NOTE: This expects properly-formatted inputs: no extra symbols or
    /// additional whitespace. Use [`Board::try_from`] for cleaning up the
    /// input if it is coming from untrusted source.
    ///
    /// # Errors
    ///
    /// Returns [`anyhow::Error`] if the piece placement, side to move or
    /// castling rights are malformed or missing.
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.split(' ');
        let Some(pieces_placement) = parts.next() else {
            bail!("incorrect FEN: missing pieces placement");
        };
        let mut builder = Builder::new();
        let mut rank_id = BOARD_WIDTH;
        for rank_fen in pieces_placement.split('/') {
            if rank_id == 0 {
                bail!("incorrect FEN: expected 8 ranks, got {pieces_placement}");
            }
            rank_id -= 1;
            let rank = Rank::try_from(rank_id)?;
            let mut file: u8 = 0;
            for symbol in rank_fen.chars() {
                if file >= BOARD_WIDTH {
                    bail!("incorrect FEN: file exceeded {BOARD_WIDTH} in {rank_fen}");
                }
                match symbol {
                    '0' => bail!("increment can not be 0"),
                    '1'..='8' => {
                        file += symbol as u8 - b'0';
                        continue;
                    },
                    _ => (),
                }
                let (owner, kind) = Piece::parse_symbol(symbol)?;
                let square = Square::new(file.try_into()?, rank);
                builder.set_piece(square, Piece::new(owner, kind, square, false));
                file += 1;
            }
            if file != BOARD_WIDTH {
                bail!(
                    "incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of \
                     length {file}"
                );
            }
        }
        if rank_id != 0 {
            bail!("incorrect FEN: there should be 8 ranks, got {pieces_placement}");
        }
        match parts.next() {
            Some(value) => builder.set_move_maker(value.try_into()?),
            None => bail!("incorrect FEN: missing side to move"),
        }
        let castling = match parts.next() {
            Some(value) => CastleRights::try_from(value)?,
            None => bail!("incorrect FEN: missing castling rights"),
        };
        builder.restore_first_moves(castling);
        // En passant square, halfmove clock and fullmove counter do not affect
        // the board.
        if parts.count() > 3 {
            bail!("trailing symbols are not allowed in FEN");
        }
        Ok(builder.build())
    }

    /// Castling rights implied by the first-move flags of kings and rooks
    /// standing on their original squares.
    fn castle_rights(&self) -> CastleRights {
        let unmoved = |square: Square, owner: Player, kind: PieceKind| {
            self.at(square).is_some_and(|piece| {
                piece.owner() == owner && piece.kind() == kind && piece.is_first_move()
            })
        };
        let mut rights = CastleRights::default();
        for player in [Player::White, Player::Black] {
            let backrank = Rank::backrank(player);
            if !unmoved(Square::new(File::E, backrank), player, PieceKind::King) {
                continue;
            }
            let (short, long) = match player {
                Player::White => (&mut rights.white_short, &mut rights.white_long),
                Player::Black => (&mut rights.black_short, &mut rights.black_long),
            };
            *short = unmoved(Square::new(File::H, backrank), player, PieceKind::Rook);
            *long = unmoved(Square::new(File::A, backrank), player, PieceKind::Rook);
        }
        rights
    }
}

impl TryFrom<&str> for Board {
    type Error = anyhow::Error;

    /// Cleans up the input (trims whitespace, strips "fen"/"epd" prefix) and
    /// parses the board.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        for prefix in ["fen ", "epd "] {
            if let Some(stripped) = input.strip_prefix(prefix) {
                return Self::from_fen(stripped);
            }
        }
        Self::from_fen(input)
    }
}

impl fmt::Display for Board {
    /// Prints the board in the first three fields of FEN: piece placement,
    /// side to move and castling rights.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            let mut empty_squares = 0;
            for file in File::iter() {
                if let Some(piece) = self.at(Square::new(file, rank)) {
                    if empty_squares != 0 {
                        write!(f, "{empty_squares}")?;
                        empty_squares = 0;
                    }
                    write!(f, "{piece}")?;
                } else {
                    empty_squares += 1;
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != Rank::One {
                const RANK_SEPARATOR: char = '/';
                f.write_char(RANK_SEPARATOR)?;
            }
        }
        write!(f, " {} {}", self.move_maker, self.castle_rights())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format ('.' for empty square, FEN algebraic
    /// symbol for piece) a-la Stockfish "debug" command in UCI mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{piece}"),
                    None => f.write_char('.'),
                }?;
                if file != File::H {
                    f.write_str(SQUARE_SEPARATOR)?;
                }
            }
            f.write_str(LINE_SEPARATOR)?;
        }
        write!(f, "Player to move: {:?}", self.move_maker)
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";

/// Accumulates piece placements for exactly one new [`Board`]. The builder is
/// consumed by [`Builder::build`].
#[derive(Clone, Debug)]
pub struct Builder {
    squares: Mailbox,
    move_maker: Player,
}

impl Builder {
    /// Creates an empty builder with White to move.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            squares: [None; BOARD_SIZE as usize],
            move_maker: Player::White,
        }
    }

    /// Places the piece on the square, replacing whatever was placed there
    /// before.
    pub fn set_piece(&mut self, square: Square, piece: Piece) {
        debug_assert_eq!(
            square,
            piece.position(),
            "piece {piece} is placed on {square} but thinks it is on {}",
            piece.position()
        );
        self.squares[square.index()] = Some(piece);
    }

    #[allow(missing_docs)]
    pub fn set_move_maker(&mut self, player: Player) {
        self.move_maker = player;
    }

    /// Produces the immutable board.
    #[must_use]
    pub fn build(self) -> Board {
        Board {
            squares: self.squares,
            move_maker: self.move_maker,
        }
    }

    /// FEN does not track which pieces have moved. Infer it: pawns on their
    /// starting rank, kings and rooks allowed to castle and other pieces on
    /// their original squares are considered unmoved.
    fn restore_first_moves(&mut self, castling: CastleRights) {
        for slot in &mut self.squares {
            let Some(piece) = slot else {
                continue;
            };
            let owner = piece.owner();
            let square = piece.position();
            let on_backrank = square.rank() == Rank::backrank(owner);
            let first_move = match piece.kind() {
                PieceKind::Pawn => square.rank() == Rank::pawns_starting(owner),
                PieceKind::King => {
                    square.file() == File::E && castling.any(owner) && on_backrank
                },
                PieceKind::Rook => {
                    on_backrank
                        && match square.file() {
                            File::H => castling.short(owner),
                            File::A => castling.long(owner),
                            _ => false,
                        }
                },
                PieceKind::Queen => on_backrank && square.file() == File::D,
                PieceKind::Bishop => on_backrank && matches!(square.file(), File::C | File::F),
                PieceKind::Knight => on_backrank && matches!(square.file(), File::B | File::G),
            };
            *piece = Piece::new(owner, piece.kind(), square, first_move);
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

/// The castling field of FEN. It only exists at the boundary of parsing and
/// printing: the board itself keeps this information in first-move flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct CastleRights {
    white_short: bool,
    white_long: bool,
    black_short: bool,
    black_long: bool,
}

impl CastleRights {
    const fn short(self, player: Player) -> bool {
        match player {
            Player::White => self.white_short,
            Player::Black => self.black_short,
        }
    }

    const fn long(self, player: Player) -> bool {
        match player {
            Player::White => self.white_long,
            Player::Black => self.black_long,
        }
    }

    const fn any(self, player: Player) -> bool {
        self.short(player) || self.long(player)
    }
}

impl TryFrom<&str> for CastleRights {
    type Error = anyhow::Error;

    /// Parses castle rights from the FEN format: "-" or
    /// (K)? (Q)? (k)? (q)? in this order.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let mut rights = Self::default();
        if input == "-" {
            return Ok(rights);
        }
        let mut remaining = input;
        for (symbol, right) in [
            ('K', &mut rights.white_short),
            ('Q', &mut rights.white_long),
            ('k', &mut rights.black_short),
            ('q', &mut rights.black_long),
        ] {
            if let Some(stripped) = remaining.strip_prefix(symbol) {
                *right = true;
                remaining = stripped;
            }
        }
        if input.is_empty() || !remaining.is_empty() {
            bail!("unknown castle rights: {input}");
        }
        Ok(rights)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::default() {
            return f.write_char('-');
        }
        for (symbol, right) in [
            ('K', self.white_short),
            ('Q', self.white_long),
            ('k', self.black_short),
            ('q', self.black_long),
        ] {
            if right {
                f.write_char(symbol)?;
            }
        }
        Ok(())
    }
}

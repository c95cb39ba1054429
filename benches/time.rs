//! Criterion benchmarks measure time of the clearly separated pieces of code.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ply::chess::board::Board;
use ply::chess::core::{PieceKind, Player, Square};
use ply::chess::factory::{create_move, MoveGenerator};
use ply::chess::moves::{Move, MoveList};

const POSITIONS: [&str; 6] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
];

fn parse(c: &mut Criterion) {
    c.bench_with_input(
        BenchmarkId::new("parse", format!("{} positions", POSITIONS.len())),
        &POSITIONS,
        |b, positions| {
            b.iter(|| {
                for position in positions {
                    criterion::black_box(Board::try_from(*position).unwrap());
                }
            });
        },
    );
}

/// Single and double pushes of pawns that are not blocked.
struct PawnPushes;

impl MoveGenerator for PawnPushes {
    fn legal_moves<'a>(&self, board: &'a Board, player: Player) -> MoveList<'a> {
        let forward: i8 = match player {
            Player::White => 8,
            Player::Black => -8,
        };
        let target = |square: Square, steps: i8| {
            u8::try_from(square as i8 + forward * steps)
                .ok()
                .and_then(|index| Square::try_from(index).ok())
                .filter(|square| board.at(*square).is_none())
        };
        let mut moves = MoveList::new();
        for pawn in board
            .player_pieces(player)
            .filter(|piece| piece.kind() == PieceKind::Pawn)
        {
            let Some(single) = target(pawn.position(), 1) else {
                continue;
            };
            moves.push(Move::quiet(board, pawn.position(), single, *pawn));
            if let (true, Some(double)) = (pawn.is_first_move(), target(pawn.position(), 2)) {
                moves.push(Move::pawn_jump(board, pawn.position(), double, *pawn));
            }
        }
        moves
    }
}

fn transitions(c: &mut Criterion) {
    let mut group = c.benchmark_group("Transitions");
    let boards = POSITIONS
        .iter()
        .map(|position| Board::try_from(*position).unwrap())
        .collect::<Vec<_>>();
    group.bench_with_input(
        BenchmarkId::new("execute", format!("{} boards", boards.len())),
        &boards,
        |b, boards| {
            b.iter(|| {
                for board in boards {
                    for player in [Player::White, Player::Black] {
                        for m in PawnPushes.legal_moves(board, player) {
                            criterion::black_box(m.execute());
                        }
                    }
                }
            });
        },
    );
    let starting = Board::starting();
    group.bench_function("create_move", |b| {
        b.iter(|| {
            criterion::black_box(create_move(
                &starting,
                &PawnPushes,
                criterion::black_box(Square::H7),
                criterion::black_box(Square::H5),
            ))
        });
    });
    group.finish();
}

criterion_group! {
    name = board;
    config = Criterion::default().sample_size(10);
    targets = parse
}

criterion_group! {
    name = moves;
    config = Criterion::default().sample_size(100);
    targets = transitions
}

criterion_main!(board, moves);

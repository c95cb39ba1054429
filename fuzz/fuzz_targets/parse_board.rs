#![no_main]
use libfuzzer_sys::fuzz_target;
use ply::chess::board::Board;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(board) = Board::try_from(input) else {
        return;
    };
    let printed = board.to_string();
    let reparsed = Board::from_fen(&printed).expect("printed board should be parsed back");
    assert_eq!(reparsed.to_string(), printed);
    assert_eq!(reparsed.pieces().count(), board.pieces().count());
});

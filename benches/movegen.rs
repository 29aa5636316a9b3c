use chess_arbiter_server::chess::{Board, Square};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn bench_perft(c: &mut Criterion) {
    c.bench_function("perft_3_from_start", |b| {
        b.iter(|| {
            let mut board = Board::new();
            black_box(board.perft(3))
        });
    });
}

fn bench_legal_moves(c: &mut Criterion) {
    c.bench_function("legal_moves_start_position", |b| {
        let mut board = Board::new();
        b.iter(|| {
            let mut total = 0usize;
            for row in 0..8u8 {
                for col in 0..8u8 {
                    total += board.legal_moves_from(Square::new(row, col)).len();
                }
            }
            black_box(total)
        });
    });
}

criterion_group!(benches, bench_perft, bench_legal_moves);
criterion_main!(benches);

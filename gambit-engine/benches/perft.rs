use std::thread::available_parallelism;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gambit_engine::fen::Fen;
use gambit_engine::perft::*;
use gambit_engine::*;

pub fn criterion_perft_benchmark(c: &mut Criterion) {
    let starting_position = Position::start_position();
    let num_threads = available_parallelism()
        .map(|inner| inner.get())
        .unwrap_or(1);

    for (ply, expected) in [(2, 400), (3, 8_902)] {
        c.bench_function(&format!("start_position: perft({ply})"), |b| {
            b.iter(|| {
                let info = perft(black_box(starting_position), black_box(ply));
                assert_eq!(info.nodes, expected);
            })
        });
    }
    c.bench_function(
        &format!("start_position: perft(4) threads: {num_threads}"),
        |b| {
            b.iter(|| {
                let info = perft_threaded(
                    black_box(starting_position),
                    black_box(4),
                    black_box(num_threads),
                );
                assert_eq!(info.nodes, 197_281);
            })
        },
    );
}

/// Costs of the calls a host makes for every user action.
pub fn criterion_session_benchmark(c: &mut Criterion) {
    let kiwipete =
        Position::parse_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();

    c.bench_function("kiwipete: legal moves", |b| {
        b.iter(|| assert_eq!(black_box(kiwipete).get_legal_moves().len(), 48))
    });

    c.bench_function("game: move, status and undo", |b| {
        let mut game = Game::from(kiwipete);
        b.iter(|| {
            let san = game.attempt_move(black_box("e1"), black_box("g1"), None).unwrap();
            assert_eq!(san, "O-O");
            black_box(game.snapshot());
            assert!(game.undo());
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().without_plots().sample_size(30);
    targets = criterion_perft_benchmark, criterion_session_benchmark
}
criterion_main!(benches);

//! Benchmarks for the first reveal on a fresh grid.
//!
//! - **`first_reveal`**: mine placement around the click plus the flood fill
//!   that follows, on the expert preset and a mine-free 255x255 grid.
//!
//! ```sh
//! cargo bench --bench reveal
//! ```

use std::hint;

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use sweeper_core::{Grid, GridConfig, Position};

fn bench_first_reveal(c: &mut Criterion) {
    let cases = [
        ("expert", GridConfig::expert()),
        ("open_255", GridConfig::new_unchecked(255, 255, 0)),
    ];

    for (name, config) in cases {
        let click = Position::new(config.rows / 2, config.columns / 2);
        c.bench_with_input(
            BenchmarkId::new("first_reveal", name),
            &config,
            |b, &config| {
                b.iter_batched(
                    || Grid::with_seed(config, 0),
                    |mut grid| hint::black_box(grid.reveal(click)),
                    BatchSize::LargeInput,
                );
            },
        );
    }
}

criterion_group!(benches, bench_first_reveal);
criterion_main!(benches);

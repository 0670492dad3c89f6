// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

fn main() {
    divan::main();
}

const NUM_THREADS: &[usize] = &[1, 2, 4, 8];
const LENGTHS: &[usize] = &[10_000, 100_000, 1_000_000];
const MAX_ITERS: usize = 10;

/// Baseline benchmark on the calling thread (without any multi-threading
/// involved).
mod serial {
    use super::{LENGTHS, MAX_ITERS};
    use divan::counter::BytesCount;
    use divan::{black_box, Bencher};
    use saxpy::{reference, SaxpyData};

    #[divan::bench(args = LENGTHS)]
    fn saxpy(bencher: Bencher, len: usize) {
        let (x, y, a) = SaxpyData::random(len, 1).unwrap().into_parts();
        bencher
            .counter(BytesCount::of_many::<f64>(len * 2 * MAX_ITERS))
            .with_inputs(|| y.clone())
            .bench_local_values(|mut y| {
                reference::sequential(black_box(&x), &mut y, a, MAX_ITERS)
            })
    }
}

/// Benchmarks using one fixed partition per worker thread.
mod threads {
    use super::{LENGTHS, MAX_ITERS, NUM_THREADS};
    use divan::counter::BytesCount;
    use divan::Bencher;
    use saxpy::{
        AccumulationStrategy, CpuPinningPolicy, Saxpy, SaxpyConfig, SaxpyData, ThreadCount,
    };

    #[divan::bench(consts = NUM_THREADS, args = LENGTHS)]
    fn saxpy_atomic<const NUM_THREADS: usize>(bencher: Bencher, len: usize) {
        saxpy_impl::<NUM_THREADS>(bencher, len, AccumulationStrategy::Atomic)
    }

    #[divan::bench(consts = NUM_THREADS, args = LENGTHS)]
    fn saxpy_ordered<const NUM_THREADS: usize>(bencher: Bencher, len: usize) {
        saxpy_impl::<NUM_THREADS>(bencher, len, AccumulationStrategy::Ordered)
    }

    fn saxpy_impl<const NUM_THREADS: usize>(
        bencher: Bencher,
        len: usize,
        accumulation: AccumulationStrategy,
    ) {
        let config = SaxpyConfig {
            len,
            seed: 1,
            num_threads: ThreadCount::try_from(NUM_THREADS).unwrap(),
            max_iters: MAX_ITERS,
            accumulation,
            cpu_pinning: CpuPinningPolicy::IfSupported,
        };
        let data = SaxpyData::random(len, 1).unwrap();

        bencher
            .counter(BytesCount::of_many::<f64>(len * 2 * MAX_ITERS))
            .with_inputs(|| Saxpy::with_data(&config, data.clone()).unwrap())
            .bench_local_values(|saxpy| saxpy.run().unwrap())
    }
}

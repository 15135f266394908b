// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

#![allow(dead_code)]

use capstan_model::instance::{Instance, InstanceBuilder};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing_subscriber::EnvFilter;

pub type IntegerType = i64;

/// Installs a test-writer subscriber filtered by `RUST_LOG`. Safe to call
/// from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// A random instance with processing times in `1..=max_processing` and
/// release times in `0..=max_release`.
pub fn random_instance(
    seed: u64,
    num_jobs: usize,
    max_processing: IntegerType,
    max_release: IntegerType,
) -> Instance<IntegerType> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = InstanceBuilder::with_capacity(num_jobs);
    for _ in 0..num_jobs {
        let processing_time = rng.random_range(1..=max_processing);
        let release_time = rng.random_range(0..=max_release);
        builder.add_job(processing_time, release_time);
    }
    builder.build()
}

/// The optimal objective by enumerating every job order and starting each
/// job as early as possible.
pub fn brute_force_optimum(instance: &Instance<IntegerType>) -> i64 {
    fn recurse(
        instance: &Instance<IntegerType>,
        used: &mut Vec<bool>,
        time: IntegerType,
        sum: i64,
        best: &mut i64,
    ) {
        let mut complete = true;
        for job in instance.job_indices() {
            if used[job.get()] {
                continue;
            }
            complete = false;
            let start = time.max(instance.release_time(job));
            let completion = start + instance.processing_time(job);
            used[job.get()] = true;
            recurse(instance, used, completion, sum + completion, best);
            used[job.get()] = false;
        }
        if complete && sum < *best {
            *best = sum;
        }
    }

    let mut best = i64::MAX;
    let mut used = vec![false; instance.num_jobs()];
    recurse(instance, &mut used, 0, 0, &mut best);
    best
}

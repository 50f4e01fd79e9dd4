//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::display;
use crate::runners::*;
use crate::subtest::{Subtest, TestDetails};
use std::io;
use std::time::Duration;
use threadpool::ThreadPool;

const SUBTESTS: [Subtest; 3] = [parse_subtest(), validate_subtest(), flatten_subtest()];

#[derive(Default)]
struct Tally {
    run: usize,
    elapsed: Duration,
    failures: Vec<(String, String)>,
}

impl Tally {
    fn record(&mut self, subtest: &Subtest, details: TestDetails) {
        self.run += 1;
        self.elapsed += details.elapsed;

        if let Some(failure) = display::print_subtest_result(subtest, details) {
            self.failures.push(failure);
        }
    }

    fn finish(self) -> io::Result<()> {
        display::print_summary(self.run, self.failures.len(), self.elapsed);

        if self.failures.is_empty() {
            return Ok(());
        }

        for (file, failure) in self.failures {
            display::print_failure(file, failure);
        }

        Err(io::Error::from(io::ErrorKind::InvalidInput))
    }
}

fn pool_for_jobs(jobs: Option<usize>) -> ThreadPool {
    jobs.map_or_else(ThreadPool::default, ThreadPool::new)
}

fn run_tests<'a>(
    tests: impl IntoIterator<Item = &'a Subtest>,
    jobs: Option<usize>,
) -> io::Result<()> {
    let pool = pool_for_jobs(jobs);
    let mut tally = Tally::default();

    for test in tests {
        display::print_subtest_header(test);

        for details in test.run(&pool) {
            tally.record(test, details);
        }
    }

    tally.finish()
}

pub fn run_all(jobs: Option<usize>) -> io::Result<()> {
    run_tests(&SUBTESTS, jobs)
}

pub fn run_subtest(name: &str, jobs: Option<usize>) -> io::Result<()> {
    match SUBTESTS.iter().find(|test| test.name() == name) {
        Some(test) => run_tests([test], jobs),
        None => {
            let known: Vec<_> = SUBTESTS.iter().map(Subtest::name).collect();

            eprintln!("unknown subtest `{name}`, expected one of: {}", known.join(", "));

            Err(io::Error::from(io::ErrorKind::NotFound))
        }
    }
}

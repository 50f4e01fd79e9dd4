//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::discovery;
use crate::testcase::{CaseOptions, FileTestCase, TestFailure};
use backtrace::Backtrace;
use passpipe::text::MalformedPipelineTextError;
use passpipe::validate::Diagnostic;
use std::cell::RefCell;
use std::panic;
use std::sync::mpsc;
use std::time::{Duration, Instant};
use threadpool::ThreadPool;

thread_local! {
    pub static BACKTRACE: RefCell<Option<(Backtrace, String)>> = RefCell::new(None);
}

/// What a runner made of a single pipeline file.
pub enum TestResult {
    /// The file was accepted, along with whatever the runner prints for it.
    Output(String),
    /// The file could not be parsed. The rendered form is what a user would see.
    ParseError(MalformedPipelineTextError, String),
    /// The file parsed but the validator rejected it, with every diagnostic.
    Invalid(Vec<Diagnostic>),
}

/// A single pipeline file, handed to a runner.
pub struct TestInput<'a> {
    pub name: &'a str,
    pub source: &'a str,
    pub options: CaseOptions,
}

pub type Runner = fn(&TestInput<'_>) -> TestResult;

pub struct TestDetails {
    pub file: &'static str,
    pub elapsed: Duration,
    pub outcome: Result<(), TestFailure>,
}

/// Every `.pipeline` file under `tests/<name>/`, run through the same runner.
pub struct Subtest {
    name: &'static str,
    runner: Runner,
}

fn run_case(
    runner: Runner,
    file: &'static str,
    source: &'static str,
    case: &FileTestCase<'static>,
) -> TestDetails {
    let input = TestInput {
        name: file,
        source,
        options: case.options(),
    };

    let start = Instant::now();
    let result = panic::catch_unwind(|| runner(&input));
    let elapsed = start.elapsed();

    let outcome = match result {
        Ok(result) => case.check(result),
        Err(_) => {
            let (bt, message) = BACKTRACE
                .with(|b| b.borrow_mut().take())
                .unwrap_or_else(|| (Backtrace::new(), "<unknown panic>".to_owned()));

            Err(TestFailure::Panic(format!("{bt:?}"), message))
        }
    };

    TestDetails {
        file,
        elapsed,
        outcome,
    }
}

impl Subtest {
    pub const fn new(name: &'static str, runner: Runner) -> Self {
        Self { name, runner }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Runs every file on `pool`, and returns the results ordered by file name.
    pub fn run(&self, pool: &ThreadPool) -> Vec<TestDetails> {
        let (send, recv) = mpsc::channel();

        for (file, source, case) in discovery::cases_in_subdir(self.name) {
            let send = send.clone();
            let runner = self.runner;

            pool.execute(move || {
                let details = run_case(runner, file.as_str(), *source, case);

                send.send(details).expect("result receiver hung up");
            });
        }

        // once every worker drops its sender the iterator below ends
        drop(send);

        let mut results: Vec<_> = recv.iter().collect();
        results.sort_by_key(|details| details.file);

        results
    }
}

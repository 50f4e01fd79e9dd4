//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

mod discovery;
mod display;
mod runner;
mod runners;
mod subtest;
mod testcase;

use crate::runner::{run_all, run_subtest};
use crate::subtest::BACKTRACE;
use backtrace::Backtrace;
use bpaf::Parser;
use passpipe::cli;
use std::process::ExitCode;

fn subtest() -> impl Parser<Option<String>> {
    bpaf::long("subtest")
        .help("the subtest to run, is name of a subdir of 'tests/'")
        .argument::<String>("NAME")
        .optional()
}

// stashes the panic so the worker that caught it can report it
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let message = info.to_string();

        BACKTRACE.with(|b| *b.borrow_mut() = Some((Backtrace::new(), message)));
    }));
}

fn main() -> ExitCode {
    #[cfg(windows)]
    ansi_term::enable_ansi_support().expect("unable to enable ANSI");

    let jobs = cli::jobs();
    let subtest = subtest();
    let ((subtest, jobs), options) = cli::tool_with(
        "file-driven test runner for passpipe",
        "filetest [--subtest <NAME>]",
        bpaf::construct!(subtest, jobs),
    )
    .run();

    cli::init_logging(options.verbose);

    if !options.inputs.is_empty() {
        eprintln!("expected file list to be empty!");

        return ExitCode::from(1);
    }

    install_panic_hook();

    let result = match subtest {
        Some(s) => run_subtest(&s, jobs),
        None => run_all(jobs),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::from(1),
    }
}

#[test]
fn test_parse() {
    install_panic_hook();

    assert!(matches!(run_subtest("parse", Some(2)), Ok(())));
}

#[test]
fn test_validate() {
    install_panic_hook();

    assert!(matches!(run_subtest("validate", Some(2)), Ok(())));
}

#[test]
fn test_flatten() {
    install_panic_hook();

    assert!(matches!(run_subtest("flatten", Some(2)), Ok(())));
}

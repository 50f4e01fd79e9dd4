//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::discovery::cases_in_subdir;
use crate::subtest::{Subtest, TestDetails};
use crate::testcase::TestFailure;
use ansi_term::Color::{Blue, Cyan, Green, Red, White, Yellow};
use std::time::Duration;

// padding to where PASS/FAIL should start
const GUTTER: &str = "        ";

fn indent(text: &str) -> String {
    let mut out = String::default();

    for line in text.lines() {
        out += GUTTER;
        out += line;
        out.push('\n');
    }

    out
}

fn seconds(elapsed: Duration) -> String {
    format!("{:11}s", elapsed.as_secs_f32())
}

pub fn print_subtest_header(subtest: &Subtest) {
    let files = cases_in_subdir(subtest.name()).len();
    let starting = Green.bold().paint("Starting");
    let name = White.bold().paint(subtest.name());

    println!("     {starting} subtest '{name}' with {files} pipeline files");
}

pub fn print_summary(total: usize, failed: usize, elapsed: Duration) {
    let color = if failed == 0 { Green } else { Red };

    let passed = Green.paint((total - failed).to_string());
    let total = Blue.paint(total.to_string());
    let failed = color.paint(failed.to_string());
    let summary = color.bold().paint("Summary");
    let time = seconds(elapsed);

    println!("     {summary} [ {time} ] {total} tests run, {passed} passed, {failed} failed");
}

// the output of the runner is on the left, what the test file expected on the right
fn prettify_diff(expected: &str, got: &str) -> String {
    let mut result = String::from("\n");

    for (line, diff) in diff::lines(got, expected).into_iter().enumerate() {
        let text = match diff {
            diff::Result::Left(l) => Red.paint(format!("- {l}")).to_string(),
            diff::Result::Both(l, _) => format!("  {l}"),
            diff::Result::Right(r) => Green.paint(format!("+ {r}")).to_string(),
        };

        result += &format!("{:3} |{text}\n", line + 1);
    }

    result
}

fn list(lines: &[String]) -> String {
    lines.iter().map(|line| format!("{GUTTER}{line}\n")).collect()
}

fn prettify_failure(failure: &TestFailure) -> String {
    match failure {
        TestFailure::UnexpectedParseError(rendered) => {
            let prefix = Red.bold().paint("pipeline unexpectedly failed to parse:");

            format!("{prefix}\n{}", indent(rendered))
        }
        TestFailure::WrongParseError { expected, got } => {
            let prefix = Red.bold().paint("expected the parse error:");
            let suffix = Red.bold().paint("but the parser reported:");

            format!("{prefix}\n{GUTTER}{expected}\n\n{suffix}\n{GUTTER}{got}\n")
        }
        TestFailure::UnexpectedRejection(diagnostics) => {
            let prefix = Red.bold().paint("pipeline was unexpectedly rejected:");

            format!("{prefix}\n{}", list(diagnostics))
        }
        TestFailure::MissingDiagnostic { expected, got } => {
            let prefix = Red.bold().paint("missing diagnostic from INVALID directive:");
            let suffix = Red.bold().paint("diagnostics from the validator:");

            format!("{prefix}\n{GUTTER}{expected}\n\n{suffix}\n{}", list(got))
        }
        TestFailure::Accepted { expected } => {
            let prefix = Red.bold().paint("pipeline was accepted, expected:");

            format!("{prefix}\n{}", indent(expected))
        }
        TestFailure::Missing { check, full } => {
            let prefix = Red.bold().paint("missing line from CHECK directive:");
            let suffix = Red.bold().paint("output from test:");

            format!("{prefix}\n{GUTTER}{check}\n\n{suffix}\n{}", indent(full))
        }
        TestFailure::Diff { expected, got } => prettify_diff(expected, got),
        TestFailure::Panic(bt, message) => {
            let err = Red.paint("runner panicked while running test: ");
            let msg = Red.bold().paint(message);

            format!("{err}{msg}\n\n{}", Yellow.paint(bt))
        }
    }
}

pub fn print_failure(file: String, error: String) {
    println!("{GUTTER}- - - - - - - - - - - - - - - - - - - - -");
    println!();
    println!("{} {error}", Red.paint(format!("output from failure of '{file}':")));
}

pub fn print_subtest_result(subtest: &Subtest, details: TestDetails) -> Option<(String, String)> {
    let filename = format!("{}/{}", Cyan.paint(subtest.name()), Blue.paint(details.file));
    let time = seconds(details.elapsed);

    match &details.outcome {
        Ok(()) => {
            println!("{GUTTER}{} [ {time} ] {filename}", Green.bold().paint("pass"));

            None
        }
        Err(failure) => {
            println!("{GUTTER}{} [ {time} ] {filename}", Red.bold().paint("FAIL"));

            Some((filename, prettify_failure(failure)))
        }
    }
}

//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! The header of a `.pipeline` test file, and checking runner output against it.
//!
//! A test file starts with a block of `#` lines. The first says what kind of
//! check the file wants, the rest of the block may carry directives:
//!
//! - `# STANDARD`, followed by `# CHECK: <line>` lines that must appear in order
//! - `# MATCH-ENTIRE`, the output must be the rest of the file
//! - `# MATCH-SECTION`, the output must contain the `#`-quoted section up to `##`
//! - `# PARSE-ERROR: <line>:<col>: <message>`, the file must fail to parse there
//! - `# INVALID: <diagnostic>`, repeatable, the pipeline must be rejected
//!   with every listed diagnostic
//! - `# duplicates: allow|warn|deny`, the policy used while validating

use crate::subtest::TestResult;
use passpipe::validate::DuplicatePolicy;

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum TestFailure {
    Diff { expected: String, got: String },
    Missing { check: String, full: String },
    UnexpectedParseError(String),
    WrongParseError { expected: String, got: String },
    UnexpectedRejection(Vec<String>),
    MissingDiagnostic { expected: String, got: Vec<String> },
    Accepted { expected: String },
    Panic(String, String),
}

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
struct ExpectedParseError<'data> {
    line: usize,
    col: usize,
    message: &'data str,
}

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
enum Check<'data> {
    MatchEntireFile(&'data str),
    MatchSection(String),
    IndividualChecks(Vec<&'data str>),
    ParseError(ExpectedParseError<'data>),
    Invalid(Vec<&'data str>),
}

/// Directives that change how a runner treats the file.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct CaseOptions {
    pub duplicates: DuplicatePolicy,
}

// the leading run of comment lines, which is where every directive lives
fn header_lines(contents: &str) -> impl Iterator<Item = &str> + '_ {
    contents
        .lines()
        .map(str::trim_end)
        .take_while(|line| line.starts_with('#'))
}

fn find_match_section(header: &[&str]) -> Check<'static> {
    let mut section = String::default();

    assert_eq!(header.get(1), Some(&"#"), "MATCH-SECTION must be followed by `#`");

    for line in header[2..].iter().take_while(|line| **line != "##") {
        // `#` on its own is an empty line of output
        section.push_str(line.strip_prefix("# ").unwrap_or(""));
        section.push('\n');
    }

    Check::MatchSection(section)
}

fn find_parse_error<'data>(name: &str, rest: &'data str) -> Check<'data> {
    let mut parts = rest.splitn(3, ':');
    let position = (parts.next(), parts.next(), parts.next());

    let (line, col, message) = match position {
        (Some(line), Some(col), Some(message)) => (line.trim(), col.trim(), message.trim()),
        _ => panic!("test '{name}' has a PARSE-ERROR without `<line>:<col>: <message>`"),
    };

    let number = |s: &str| -> usize {
        s.parse()
            .unwrap_or_else(|_| panic!("test '{name}' has a bad PARSE-ERROR position '{s}'"))
    };

    Check::ParseError(ExpectedParseError {
        line: number(line),
        col: number(col),
        message,
    })
}

fn find_checks<'data>(name: &str, contents: &'data str, header: &[&'data str]) -> Check<'data> {
    let first = match header.first() {
        Some(first) => *first,
        None => panic!("test '{name}' did not provide a `# <TYPE>` header for `filetest`"),
    };

    if first.starts_with("# MATCH-ENTIRE") {
        let rest = contents.find('\n').map_or("", |idx| &contents[idx + 1..]);

        return Check::MatchEntireFile(rest);
    }

    if first.starts_with("# MATCH-SECTION") {
        return find_match_section(header);
    }

    if let Some(rest) = first.strip_prefix("# PARSE-ERROR: ") {
        return find_parse_error(name, rest);
    }

    if first.starts_with("# INVALID: ") {
        let expected = header
            .iter()
            .filter_map(|line| line.strip_prefix("# INVALID: "))
            .collect();

        return Check::Invalid(expected);
    }

    if first.starts_with("# STANDARD") {
        let checks = header
            .iter()
            .filter_map(|line| line.strip_prefix("# CHECK: "))
            .collect();

        return Check::IndividualChecks(checks);
    }

    panic!("test '{name}' has an unknown `filetest` header: '{first}'")
}

fn find_options(name: &str, header: &[&str]) -> CaseOptions {
    let mut options = CaseOptions::default();

    for policy in header.iter().filter_map(|line| line.strip_prefix("# duplicates: ")) {
        options.duplicates = match policy.trim() {
            "allow" => DuplicatePolicy::Allow,
            "warn" => DuplicatePolicy::Warn,
            "deny" => DuplicatePolicy::Deny,
            other => panic!("test '{name}' has an unknown duplicate policy '{other}'"),
        };
    }

    options
}

fn accepted_output(result: TestResult) -> Result<String, TestFailure> {
    match result {
        TestResult::Output(data) => Ok(data),
        TestResult::ParseError(_, rendered) => Err(TestFailure::UnexpectedParseError(rendered)),
        TestResult::Invalid(diagnostics) => Err(TestFailure::UnexpectedRejection(
            diagnostics.iter().map(|d| d.to_string()).collect(),
        )),
    }
}

fn match_entire_file(output: TestResult, expected: &str) -> Result<(), TestFailure> {
    let got = accepted_output(output)?;

    if got == expected {
        Ok(())
    } else {
        Err(TestFailure::Diff {
            expected: expected.to_string(),
            got,
        })
    }
}

fn match_section(output: TestResult, section: &str) -> Result<(), TestFailure> {
    let got = accepted_output(output)?;

    if got.contains(section) {
        Ok(())
    } else {
        Err(TestFailure::Diff {
            expected: section.to_string(),
            got,
        })
    }
}

fn match_checks(output: TestResult, checks: &[&str]) -> Result<(), TestFailure> {
    let data = accepted_output(output)?;
    let mut lines = data.lines();

    // every check has to show up after the previous one matched
    for check in checks {
        if !lines.any(|line| line == *check) {
            return Err(TestFailure::Missing {
                check: check.to_string(),
                full: data,
            });
        }
    }

    Ok(())
}

fn match_parse_error(
    output: TestResult,
    expected: &ExpectedParseError<'_>,
) -> Result<(), TestFailure> {
    let display = format!("{}:{}: {}", expected.line, expected.col, expected.message);

    match output {
        TestResult::ParseError(err, _)
            if err.line == expected.line
                && err.col == expected.col
                && err.message.contains(expected.message) =>
        {
            Ok(())
        }
        TestResult::ParseError(err, _) => Err(TestFailure::WrongParseError {
            expected: display,
            got: err.to_string(),
        }),
        TestResult::Invalid(diagnostics) => Err(TestFailure::UnexpectedRejection(
            diagnostics.iter().map(|d| d.to_string()).collect(),
        )),
        TestResult::Output(_) => Err(TestFailure::Accepted { expected: display }),
    }
}

fn match_invalid(output: TestResult, expected: &[&str]) -> Result<(), TestFailure> {
    let diagnostics = match output {
        TestResult::Invalid(diagnostics) => diagnostics,
        TestResult::ParseError(_, rendered) => {
            return Err(TestFailure::UnexpectedParseError(rendered))
        }
        TestResult::Output(_) => {
            return Err(TestFailure::Accepted {
                expected: expected.join("\n"),
            })
        }
    };

    let got: Vec<String> = diagnostics.iter().map(|d| d.to_string()).collect();

    match expected.iter().find(|e| !got.iter().any(|g| g.as_str() == **e)) {
        Some(missing) => Err(TestFailure::MissingDiagnostic {
            expected: missing.to_string(),
            got,
        }),
        None => Ok(()),
    }
}

#[derive(Debug, Hash, Eq, PartialEq)]
pub struct FileTestCase<'data> {
    check: Check<'data>,
    options: CaseOptions,
}

impl<'data> FileTestCase<'data> {
    pub fn from_raw(name: &str, raw: &'data str) -> Self {
        let header: Vec<&'data str> = header_lines(raw).collect();

        Self {
            check: find_checks(name, raw, &header),
            options: find_options(name, &header),
        }
    }

    pub fn options(&self) -> CaseOptions {
        self.options
    }

    pub fn check(&self, output: TestResult) -> Result<(), TestFailure> {
        match &self.check {
            Check::MatchEntireFile(expected) => match_entire_file(output, expected),
            Check::MatchSection(section) => match_section(output, section),
            Check::IndividualChecks(checks) => match_checks(output, checks),
            Check::ParseError(expected) => match_parse_error(output, expected),
            Check::Invalid(expected) => match_invalid(output, expected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use passpipe::text;
    use passpipe::validate::{Diagnostic, Violation};

    #[test]
    fn header_directives() {
        let case = FileTestCase::from_raw(
            "t.pipeline",
            "# INVALID: error: unresolved pass reference `A`\n# duplicates: deny\n# INVALID: error: unresolved pass reference `B`\nA\n# duplicates: allow\n",
        );

        assert_eq!(case.options().duplicates, DuplicatePolicy::Deny);
        assert_eq!(
            case.check,
            Check::Invalid(vec![
                "error: unresolved pass reference `A`",
                "error: unresolved pass reference `B`"
            ])
        );
    }

    #[test]
    fn parse_error_position_must_match() {
        let source = "# PARSE-ERROR: 3:1: unmatched `}`\nDCE\n}\n";
        let case = FileTestCase::from_raw("t.pipeline", source);
        let err = text::parse(source).unwrap_err();

        assert_eq!(case.check(TestResult::ParseError(err.clone(), String::default())), Ok(()));

        let moved = text::MalformedPipelineTextError { line: 2, ..err };

        assert!(matches!(
            case.check(TestResult::ParseError(moved, String::default())),
            Err(TestFailure::WrongParseError { .. })
        ));
    }

    #[test]
    fn rejection_is_not_a_parse_error() {
        let case = FileTestCase::from_raw("t.pipeline", "# PARSE-ERROR: 2:1: unmatched `}`\n");
        let rejected = vec![Diagnostic::error(Violation::UnresolvedPassReference("A".to_owned()))];

        assert!(matches!(
            case.check(TestResult::Invalid(rejected)),
            Err(TestFailure::UnexpectedRejection(_))
        ));
    }

    #[test]
    fn accepted_pipeline_fails_invalid_check() {
        let case = FileTestCase::from_raw("t.pipeline", "# INVALID: error: unresolved pass reference `A`\n");

        assert_eq!(
            case.check(TestResult::Output("valid\n".to_owned())),
            Err(TestFailure::Accepted {
                expected: "error: unresolved pass reference `A`".to_owned()
            })
        );
    }

    #[test]
    fn match_section_keeps_blank_lines() {
        let case = FileTestCase::from_raw("t.pipeline", "# MATCH-SECTION\n#\n# a\n#\n#   b\n##\nDCE\n");

        assert_eq!(case.check, Check::MatchSection("a\n\n  b\n".to_owned()));
    }
}

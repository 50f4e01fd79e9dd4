//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use std::fmt;

/// How serious a [`Diagnostic`] is.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Severity {
    /// Worth pointing out, but the pipeline can still run.
    Warning,
    /// The pipeline cannot be handed to an execution engine.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A single problem found in a pipeline.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum Violation {
    /// A pass reference whose name is not registered.
    UnresolvedPassReference(String),
    /// A sub-pipeline that contains itself. The path is every sub-pipeline
    /// name along the cycle, starting with the one that is re-entered.
    CyclicSubPipeline(Vec<String>),
    /// A transform pass that runs more than once. The positions are indices
    /// into the flattened pass sequence.
    DuplicatePassInPipeline(String, Vec<usize>),
    /// A pass or pipeline name that the textual format cannot represent.
    InvalidName(String),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::UnresolvedPassReference(name) => {
                write!(f, "unresolved pass reference `{name}`")
            }
            Violation::CyclicSubPipeline(path) => {
                let first = path.first().map(String::as_str).unwrap_or_default();

                write!(f, "sub-pipeline `{first}` contains itself (")?;

                for name in path {
                    write!(f, "{name} -> ")?;
                }

                write!(f, "{first})")
            }
            Violation::DuplicatePassInPipeline(name, positions) => {
                let positions = positions
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");

                write!(f, "pass `{name}` runs more than once (positions {positions})")
            }
            Violation::InvalidName(name) => {
                write!(f, "`{name}` cannot be used as a pass or pipeline name")
            }
        }
    }
}

/// A [`Violation`] along with how serious it is.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Diagnostic {
    /// How serious the problem is
    pub severity: Severity,
    /// The problem itself
    pub violation: Violation,
}

impl Diagnostic {
    /// Creates an error-level diagnostic.
    pub fn error(violation: Violation) -> Self {
        Self {
            severity: Severity::Error,
            violation,
        }
    }

    /// Creates a warning-level diagnostic.
    pub fn warning(violation: Violation) -> Self {
        Self {
            severity: Severity::Warning,
            violation,
        }
    }

    /// Whether this diagnostic prevents the pipeline from running.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.violation)
    }
}

/// The outcome of validating a pipeline.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationResult {
    /// Nothing at all was found.
    Valid,
    /// At least one problem was found. This is never empty.
    Violations(Vec<Diagnostic>),
}

impl ValidationResult {
    pub(crate) fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        if diagnostics.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Violations(diagnostics)
        }
    }

    /// Whether the pipeline can run, i.e. there are no error-level diagnostics.
    /// Warnings are allowed.
    pub fn is_valid(&self) -> bool {
        !self.diagnostics().iter().any(Diagnostic::is_error)
    }

    /// Whether nothing was found, not even warnings.
    pub fn is_clean(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Every diagnostic, in the order they were found.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Violations(diagnostics) => diagnostics,
        }
    }

    /// Every violation regardless of severity.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> + '_ {
        self.diagnostics().iter().map(|d| &d.violation)
    }

    /// Only the error-level diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics().iter().filter(|d| d.is_error())
    }

    /// Only the warning-level diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics().iter().filter(|d| !d.is_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_display() {
        let single = Violation::CyclicSubPipeline(vec!["A".to_owned()]);
        let longer = Violation::CyclicSubPipeline(vec!["A".to_owned(), "B".to_owned()]);

        assert_eq!(single.to_string(), "sub-pipeline `A` contains itself (A -> A)");
        assert_eq!(
            longer.to_string(),
            "sub-pipeline `A` contains itself (A -> B -> A)"
        );
    }

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::warning(Violation::DuplicatePassInPipeline(
            "DCE".to_owned(),
            vec![1, 4],
        ));

        assert_eq!(
            d.to_string(),
            "warning: pass `DCE` runs more than once (positions 1, 4)"
        );
    }

    #[test]
    fn warnings_are_still_valid() {
        let result = ValidationResult::from_diagnostics(vec![Diagnostic::warning(
            Violation::DuplicatePassInPipeline("DCE".to_owned(), vec![0, 1]),
        )]);

        assert!(result.is_valid());
        assert!(!result.is_clean());
        assert_eq!(result.warnings().count(), 1);
        assert_eq!(result.errors().count(), 0);
    }

    #[test]
    fn empty_is_valid() {
        let result = ValidationResult::from_diagnostics(Vec::default());

        assert_eq!(result, ValidationResult::Valid);
        assert!(result.is_valid() && result.is_clean());
    }
}

//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::pass::{is_valid_name, PassIdentity, PassKind};
use crate::pipeline::{PipelineDefinition, PipelineNode};
use crate::registry::PassRegistry;
use crate::utility::{SaHashMap, SaHashSet};
use crate::validate::{Diagnostic, ValidationResult, Violation};
use smallvec::SmallVec;

/// What to do about transform passes that run more than once in a pipeline.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
pub enum DuplicatePolicy {
    /// Repeated passes are fine.
    Allow,
    /// Repeated passes are reported as warnings.
    #[default]
    Warn,
    /// Repeated passes are reported as errors.
    Deny,
}

/// Knobs for the policy-level checks of a [`Validator`].
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct ValidationOptions {
    /// How repeated transform passes are treated
    pub duplicates: DuplicatePolicy,
}

/// A pipeline that has passed validation, flattened into the exact sequence of
/// passes an execution engine should run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidatedPipeline {
    name: String,
    passes: Vec<PassIdentity>,
    warnings: Vec<Diagnostic>,
}

impl ValidatedPipeline {
    /// The name of the pipeline that was validated.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every pass to run, in order, with sub-pipelines expanded.
    pub fn passes(&self) -> &[PassIdentity] {
        &self.passes
    }

    /// The names of every pass to run, in order.
    pub fn pass_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.passes.iter().map(|p| p.name())
    }

    /// Any warning-level diagnostics the pipeline had.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }
}

/// Checks pipelines against a registry before they get run.
///
/// Validation is a pure function of the pipeline and the registry. It never
/// stops at the first problem, every problem in the pipeline is reported
/// in one go.
///
/// ```
/// # use passpipe::catalog;
/// # use passpipe::pipeline::PipelineBuilder;
/// # use passpipe::validate::{Validator, Violation};
/// let registry = catalog::load_registry().unwrap();
/// let def = PipelineBuilder::new()
///     .append_pass("Mem2Reg")
///     .append_pass("Frobnicate")
///     .build("Main");
///
/// let result = Validator::default().validate(&def, &registry);
/// let violations: Vec<_> = result.violations().collect();
///
/// assert_eq!(
///     violations,
///     [&Violation::UnresolvedPassReference("Frobnicate".to_owned())]
/// );
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct Validator {
    options: ValidationOptions,
}

impl Validator {
    /// Creates a validator with a given set of options.
    pub fn new(options: ValidationOptions) -> Self {
        Self { options }
    }

    /// The options the validator was created with.
    pub fn options(&self) -> ValidationOptions {
        self.options
    }

    /// Validates `def` against `registry`, reporting every problem found.
    ///
    /// # Panics
    /// `registry` must be frozen, pipelines can't be validated against
    /// a set of passes that might still change.
    pub fn validate(&self, def: &PipelineDefinition, registry: &PassRegistry) -> ValidationResult {
        let (diagnostics, _) = self.run(def, registry);

        ValidationResult::from_diagnostics(diagnostics)
    }

    /// Validates `def`, and if it has no error-level problems flattens it
    /// into a [`ValidatedPipeline`].
    ///
    /// # Panics
    /// `registry` must be frozen, see [`Self::validate`].
    pub fn check(
        &self,
        def: &PipelineDefinition,
        registry: &PassRegistry,
    ) -> Result<ValidatedPipeline, Vec<Diagnostic>> {
        let (diagnostics, passes) = self.run(def, registry);

        if diagnostics.iter().any(Diagnostic::is_error) {
            return Err(diagnostics);
        }

        Ok(ValidatedPipeline {
            name: def.name().to_owned(),
            passes,
            warnings: diagnostics,
        })
    }

    fn run(
        &self,
        def: &PipelineDefinition,
        registry: &PassRegistry,
    ) -> (Vec<Diagnostic>, Vec<PassIdentity>) {
        assert!(
            registry.is_frozen(),
            "pipelines can only be validated against a frozen registry"
        );

        let mut walk = Walk::new(registry);

        walk.check_name(def.name());
        walk.open.push(def.name());
        walk.visit(def.nodes());
        walk.open.pop();

        let mut diagnostics = walk.errors;

        for name in walk.transforms {
            let positions = &walk.occurrences[name];

            if positions.len() < 2 {
                continue;
            }

            let violation = Violation::DuplicatePassInPipeline(name.to_owned(), positions.to_vec());

            match self.options.duplicates {
                DuplicatePolicy::Allow => {}
                DuplicatePolicy::Warn => diagnostics.push(Diagnostic::warning(violation)),
                DuplicatePolicy::Deny => diagnostics.push(Diagnostic::error(violation)),
            }
        }

        tracing::debug!(
            pipeline = def.name(),
            passes = walk.resolved.len(),
            diagnostics = diagnostics.len(),
            "validated pipeline"
        );

        (diagnostics, walk.resolved)
    }
}

/// Validates `def` against `registry` with the default options.
///
/// See [`Validator::validate`].
pub fn validate(def: &PipelineDefinition, registry: &PassRegistry) -> ValidationResult {
    Validator::default().validate(def, registry)
}

// depth-first flattening state for a single validation run
struct Walk<'d, 'r> {
    registry: &'r PassRegistry,
    // names of the sub-pipelines currently being expanded, outermost first
    open: SmallVec<[&'d str; 8]>,
    // index of the next pass in the flattened sequence
    position: usize,
    resolved: Vec<PassIdentity>,
    // transform passes in order of first appearance, and where they appear
    transforms: Vec<&'d str>,
    occurrences: SaHashMap<&'d str, SmallVec<[usize; 4]>>,
    reported: SaHashSet<&'d str>,
    errors: Vec<Diagnostic>,
}

impl<'d, 'r> Walk<'d, 'r> {
    fn new(registry: &'r PassRegistry) -> Self {
        Self {
            registry,
            open: SmallVec::default(),
            position: 0,
            resolved: Vec::default(),
            transforms: Vec::default(),
            occurrences: SaHashMap::default(),
            reported: SaHashSet::default(),
            errors: Vec::default(),
        }
    }

    fn visit(&mut self, nodes: &'d [PipelineNode]) {
        for node in nodes {
            match node {
                PipelineNode::Pass(pass) => self.visit_pass(pass.name()),
                PipelineNode::SubPipeline(def) => self.visit_sub_pipeline(def),
            }
        }
    }

    fn visit_pass(&mut self, name: &'d str) {
        let position = self.position;

        self.position += 1;

        if !self.check_name(name) {
            return;
        }

        let pass = match self.registry.lookup(name) {
            Ok(pass) => pass,
            Err(_) => {
                if self.reported.insert(name) {
                    self.errors.push(Diagnostic::error(
                        Violation::UnresolvedPassReference(name.to_owned()),
                    ));
                }

                return;
            }
        };

        if pass.kind() == PassKind::Transform {
            let seen = self.occurrences.entry(name).or_default();

            if seen.is_empty() {
                self.transforms.push(name);
            }

            seen.push(position);
        }

        self.resolved.push(pass.clone());
    }

    fn visit_sub_pipeline(&mut self, def: &'d PipelineDefinition) {
        let name = def.name();

        self.check_name(name);

        if let Some(start) = self.open.iter().position(|open| *open == name) {
            let path = self.open[start..].iter().map(|s| s.to_string()).collect();

            self.errors
                .push(Diagnostic::error(Violation::CyclicSubPipeline(path)));

            return;
        }

        tracing::trace!(sub_pipeline = name, depth = self.open.len(), "expanding");

        self.open.push(name);
        self.visit(def.nodes());
        self.open.pop();
    }

    // reports `name` once if it's not a valid name, returns whether it was valid
    fn check_name(&mut self, name: &'d str) -> bool {
        if is_valid_name(name) {
            return true;
        }

        if self.reported.insert(name) {
            self.errors
                .push(Diagnostic::error(Violation::InvalidName(name.to_owned())));
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::pipeline::PipelineBuilder;
    use crate::validate::Severity;

    fn registry() -> PassRegistry {
        catalog::load_registry().unwrap()
    }

    #[test]
    fn registered_only_is_valid() {
        let def = PipelineBuilder::new()
            .append_pass("SILCleanup")
            .append_sub_pipeline(
                PipelineBuilder::new()
                    .append_pass("CFGPrinter")
                    .append_pass("InstCount")
                    .build("Diagnostics"),
            )
            .append_pass("DCE")
            .build("Main");

        assert_eq!(validate(&def, &registry()), ValidationResult::Valid);
    }

    #[test]
    fn single_unresolved_reference() {
        let def = PipelineBuilder::new()
            .append_pass("DCE")
            .append_pass("Frobnicate")
            .append_pass("CSE")
            .build("Main");

        assert_eq!(
            validate(&def, &registry()),
            ValidationResult::Violations(vec![Diagnostic::error(
                Violation::UnresolvedPassReference("Frobnicate".to_owned())
            )])
        );
    }

    #[test]
    fn self_containing_sub_pipeline() {
        let inner = PipelineBuilder::new().append_pass("DCE").build("A");
        let a = PipelineBuilder::new()
            .append_pass("CSE")
            .append_sub_pipeline(inner)
            .build("A");
        let def = PipelineBuilder::new().append_sub_pipeline(a).build("Main");

        let result = validate(&def, &registry());
        let violations: Vec<_> = result.violations().cloned().collect();

        assert_eq!(
            violations,
            [Violation::CyclicSubPipeline(vec!["A".to_owned()])]
        );
    }

    #[test]
    fn cycle_path_is_witness() {
        let innermost = PipelineBuilder::new().append_pass("DCE").build("A");
        let b = PipelineBuilder::new()
            .append_sub_pipeline(innermost)
            .build("B");
        let a = PipelineBuilder::new().append_sub_pipeline(b).build("A");
        let def = PipelineBuilder::new().append_sub_pipeline(a).build("Main");

        let result = validate(&def, &registry());

        assert_eq!(
            result.violations().cloned().collect::<Vec<_>>(),
            [Violation::CyclicSubPipeline(vec![
                "A".to_owned(),
                "B".to_owned()
            ])]
        );
    }

    #[test]
    fn root_name_is_open() {
        let def = PipelineBuilder::new()
            .append_sub_pipeline(PipelineBuilder::new().append_pass("DCE").build("Main"))
            .build("Main");

        let result = validate(&def, &registry());

        assert_eq!(
            result.violations().cloned().collect::<Vec<_>>(),
            [Violation::CyclicSubPipeline(vec!["Main".to_owned()])]
        );
    }

    #[test]
    fn siblings_with_the_same_name_are_fine() {
        let cleanup = || PipelineBuilder::new().append_pass("SimplifyCFG").build("Cleanup");
        let def = PipelineBuilder::new()
            .append_sub_pipeline(cleanup())
            .append_pass("CFGPrinter")
            .append_sub_pipeline(cleanup())
            .build("Main");

        let result = validate(&def, &registry());

        assert!(result.is_valid());
        assert_eq!(
            result.violations().cloned().collect::<Vec<_>>(),
            [Violation::DuplicatePassInPipeline(
                "SimplifyCFG".to_owned(),
                vec![0, 2]
            )]
        );
    }

    #[test]
    fn every_problem_is_reported() {
        let def = PipelineBuilder::new()
            .append_pass("Frobnicate")
            .append_pass("DCE")
            .append_sub_pipeline(
                PipelineBuilder::new()
                    .append_pass("Frobnicate")
                    .append_pass("Unknown")
                    .append_pass("DCE")
                    .build("Main"),
            )
            .append_pass("not valid")
            .append_pass("DCE")
            .build("Main");

        let result = validate(&def, &registry());
        let violations: Vec<_> = result.violations().cloned().collect();

        assert_eq!(
            violations,
            [
                Violation::UnresolvedPassReference("Frobnicate".to_owned()),
                Violation::CyclicSubPipeline(vec!["Main".to_owned()]),
                Violation::InvalidName("not valid".to_owned()),
                Violation::DuplicatePassInPipeline("DCE".to_owned(), vec![1, 3]),
            ]
        );
        assert!(!result.is_valid());
    }

    #[test]
    fn utilities_may_repeat() {
        let def = PipelineBuilder::new()
            .append_passes(["CFGPrinter", "DCE", "CFGPrinter", "EmitDFDiagnostics", "EmitDFDiagnostics"])
            .build("Main");

        assert!(validate(&def, &registry()).is_clean());
    }

    #[test]
    fn duplicate_policies() {
        let def = PipelineBuilder::new()
            .append_passes(["SILCombine", "DCE", "SILCombine"])
            .build("Main");
        let registry = registry();

        let allow = Validator::new(ValidationOptions {
            duplicates: DuplicatePolicy::Allow,
        });
        let deny = Validator::new(ValidationOptions {
            duplicates: DuplicatePolicy::Deny,
        });

        assert!(allow.validate(&def, &registry).is_clean());

        let denied = deny.validate(&def, &registry);

        assert!(!denied.is_valid());
        assert_eq!(denied.diagnostics()[0].severity, Severity::Error);
        assert!(deny.check(&def, &registry).is_err());
    }

    #[test]
    fn check_flattens() {
        let registry = registry();
        let def = PipelineBuilder::new()
            .append_pass("Mem2Reg")
            .append_sub_pipeline(
                PipelineBuilder::new()
                    .append_passes(["SimplifyCFG", "SILCombine", "SimplifyCFG"])
                    .build("Cleanup"),
            )
            .append_pass("InstCount")
            .build("Main");

        let validated = Validator::default().check(&def, &registry).unwrap();

        assert_eq!(validated.name(), "Main");
        assert_eq!(
            validated.pass_names().collect::<Vec<_>>(),
            ["Mem2Reg", "SimplifyCFG", "SILCombine", "SimplifyCFG", "InstCount"]
        );
        assert_eq!(validated.warnings().len(), 1);
        assert_eq!(
            validated.passes()[4].kind(),
            crate::pass::PassKind::Utility
        );
    }

    #[test]
    fn check_rejects_errors() {
        let def = PipelineBuilder::new().append_pass("Frobnicate").build("Main");

        let errors = Validator::default().check(&def, &registry()).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_error());
    }

    #[test]
    #[should_panic(expected = "frozen registry")]
    fn unfrozen_registry() {
        // hide the stack trace, assuming this test panics as it's supposed to.
        std::panic::set_hook(Box::new(|_| {}));

        let registry = PassRegistry::new();
        let def = PipelineBuilder::new().build("Main");

        validate(&def, &registry);
    }
}

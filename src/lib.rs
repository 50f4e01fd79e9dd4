//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

#![deny(
    unreachable_pub,
    missing_docs,
    missing_abi,
    rust_2018_idioms,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links
)]

//! # passpipe
//!
//! A registry of the optimizer's passes, and the APIs for building,
//! validating and writing out the pipelines that run them.
//!
//! The usual flow is:
//!
//! 1. Load every pass the compiler knows about into a [`registry::PassRegistry`],
//!    either from the built-in [`catalog`] or from a [`registry::PassSource`]
//!    of your own, and freeze it.
//! 2. Build a [`pipeline::PipelineDefinition`] with a [`pipeline::PipelineBuilder`],
//!    take one of the [`pipeline::standard`] pipelines, or [`text::parse`] one.
//! 3. Hand it to a [`validate::Validator`], which either produces the flat
//!    [`validate::ValidatedPipeline`] the pass manager runs or every problem
//!    with the pipeline.

pub mod catalog;
pub mod pass;
pub mod pipeline;
pub mod registry;
pub mod text;
pub mod utility;
pub mod validate;

#[cfg(feature = "dev-tools")]
pub mod cli;

use crate::pipeline::PipelineDefinition;
use crate::registry::PassRegistry;
use crate::validate::{ValidatedPipeline, Validator};

pub use text::{dump, parse};
pub use validate::validate;

/// A helper function that handles "read this pipeline file given by the user"
/// in a way that multiple tools can use.
///
/// `source` is parsed and then checked by `validator` against `registry`. On
/// success both the parsed definition and its validated form are returned.
/// On failure, a human-readable description of the problem is returned: a
/// caret diagnostic pointing at a parse error, or every validation
/// diagnostic one per line.
///
/// - `file` is the name that `source` is reported under
/// - `registry` must be frozen
pub fn check_pipeline(
    file: &str,
    source: &str,
    registry: &PassRegistry,
    validator: &Validator,
) -> Result<(PipelineDefinition, ValidatedPipeline), String> {
    let def = match text::parse(source) {
        Ok(def) => def,
        Err(err) => {
            tracing::debug!(file, line = err.line, "failed to parse pipeline");

            return Err(text::format_parse_error(file, source, &err));
        }
    };

    match validator.check(&def, registry) {
        Ok(validated) => Ok((def, validated)),
        Err(diagnostics) => {
            let mut out = String::default();

            for diagnostic in diagnostics {
                out += &format!("{diagnostic}\n");
            }

            Err(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_good_file() {
        let registry = catalog::load_registry().unwrap();
        let (def, validated) = check_pipeline(
            "good.pipeline",
            "pipeline P\nCleanup {\n  DCE\n  CSE\n}\nDCE\n",
            &registry,
            &Validator::default(),
        )
        .unwrap();

        assert_eq!(def.name(), "P");
        assert_eq!(validated.pass_names().collect::<Vec<_>>(), ["DCE", "CSE", "DCE"]);
        assert_eq!(validated.warnings().len(), 1);
    }

    #[test]
    fn check_parse_error() {
        let registry = catalog::load_registry().unwrap();
        let err = check_pipeline("bad.pipeline", "DCE\n}\n", &registry, &Validator::default())
            .unwrap_err();

        assert!(err.contains("bad.pipeline:2:1"));
        assert!(err.contains("unmatched `}`"));
    }

    #[test]
    fn check_invalid_pipeline() {
        let registry = catalog::load_registry().unwrap();
        let err = check_pipeline(
            "bad.pipeline",
            "Frobnicate\nA {\n  A {\n  }\n}\n",
            &registry,
            &Validator::default(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            "error: unresolved pass reference `Frobnicate`\n\
             error: sub-pipeline `A` contains itself (A -> A)\n"
        );
    }
}

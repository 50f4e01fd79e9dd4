//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::pipeline::{PipelineDefinition, PipelineNode};
use std::fmt::Write;

const INDENT: &str = "  ";

/// Renders a pipeline into its textual form.
///
/// The output is stable: the same pipeline always produces byte-for-byte the
/// same text, so dumps can be checked in and diffed across compiler versions.
///
/// ```
/// # use passpipe::pipeline::PipelineBuilder;
/// # use passpipe::text;
/// let def = PipelineBuilder::new()
///     .append_pass("Mem2Reg")
///     .append_sub_pipeline(PipelineBuilder::new().append_pass("DCE").build("Cleanup"))
///     .build("Main");
///
/// assert_eq!(text::dump(&def), "pipeline Main\nMem2Reg\nCleanup {\n  DCE\n}\n");
/// ```
pub fn dump(def: &PipelineDefinition) -> String {
    let mut out = String::default();

    writeln!(out, "pipeline {}", def.name()).expect("string formatting cannot fail");

    write_nodes(&mut out, def.nodes(), 0);

    out
}

/// Renders the flattened form of a pipeline, one pass name per line.
pub fn dump_flat(def: &PipelineDefinition) -> String {
    let mut out = String::default();

    for name in def.flatten() {
        out += name;
        out.push('\n');
    }

    out
}

fn write_nodes(out: &mut String, nodes: &[PipelineNode], depth: usize) {
    for node in nodes {
        let indent = INDENT.repeat(depth);

        match node {
            PipelineNode::Pass(pass) => {
                out.push_str(&indent);
                out.push_str(pass.name());
                out.push('\n');
            }
            PipelineNode::SubPipeline(def) => {
                out.push_str(&indent);
                out.push_str(def.name());
                out.push_str(" {\n");

                write_nodes(out, def.nodes(), depth + 1);

                out.push_str(&indent);
                out.push_str("}\n");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::pipeline::{default_pipeline, standard, PipelineBuilder};
    use crate::text::parse;

    #[test]
    fn nesting_is_indented() {
        let def = PipelineBuilder::new()
            .append_sub_pipeline(
                PipelineBuilder::new()
                    .append_sub_pipeline(PipelineBuilder::new().append_pass("DCE").build("Inner"))
                    .append_sub_pipeline(PipelineBuilder::new().build("Empty"))
                    .build("Outer"),
            )
            .append_pass("InstCount")
            .build("P");

        assert_eq!(
            dump(&def),
            "pipeline P
Outer {
  Inner {
    DCE
  }
  Empty {
  }
}
InstCount
"
        );
    }

    #[test]
    fn default_dump_is_registration_order() {
        let mut registry = crate::registry::PassRegistry::new();

        for name in ["SILCleanup", "DCE", "CSE"] {
            registry
                .register(name, crate::pass::PassKind::Transform)
                .unwrap();
        }

        registry.freeze();

        assert_eq!(
            dump(&default_pipeline(&registry)),
            "pipeline Default\nSILCleanup\nDCE\nCSE\n"
        );
    }

    #[test]
    fn round_trips() {
        let registry = catalog::load_registry().unwrap();
        let mut defs = vec![default_pipeline(&registry), PipelineBuilder::new().build("Empty")];

        defs.extend(
            standard::STOCK_PIPELINES
                .iter()
                .filter_map(|name| standard::by_name(name)),
        );

        for def in defs {
            assert_eq!(parse(&dump(&def)), Ok(def));
        }
    }

    #[test]
    fn flat() {
        let def = standard::simplifycfg_silcombine();

        assert_eq!(dump_flat(&def), "SimplifyCFG\nSILCombine\nSimplifyCFG\n");
    }
}

//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use static_assertions::assert_impl_all;

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

/// A reference to a pass by name.
///
/// This is not resolved against anything when it's created, whether or not
/// the pass actually exists is only checked when the pipeline is validated.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "enable-serde", serde(transparent))]
pub struct PassRef {
    name: String,
}

impl PassRef {
    /// Creates a reference to the pass `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The name of the referenced pass.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A single entry inside of a pipeline.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum PipelineNode {
    /// Runs a single pass.
    Pass(PassRef),
    /// Runs every node of a nested, named pipeline in order.
    SubPipeline(PipelineDefinition),
}

impl PipelineNode {
    /// The name of the pass or sub-pipeline.
    pub fn name(&self) -> &str {
        match self {
            PipelineNode::Pass(pass) => pass.name(),
            PipelineNode::SubPipeline(def) => def.name(),
        }
    }
}

/// A named, ordered sequence of passes and sub-pipelines.
///
/// The order of the nodes is the order the execution engine will run them in.
/// Definitions are immutable, they are created through
/// [`PipelineBuilder`](crate::pipeline::PipelineBuilder) or by parsing text.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct PipelineDefinition {
    name: String,
    nodes: Vec<PipelineNode>,
}

assert_impl_all!(PipelineDefinition: Send, Sync);

impl PipelineDefinition {
    pub(crate) fn new(name: String, nodes: Vec<PipelineNode>) -> Self {
        Self { name, nodes }
    }

    /// The name of the pipeline.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The top-level nodes of the pipeline, in execution order.
    pub fn nodes(&self) -> &[PipelineNode] {
        &self.nodes
    }

    /// Whether the pipeline has no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Expands every sub-pipeline recursively, returning the names of
    /// every pass in the order they would run.
    ///
    /// This is purely structural, it does not look at sub-pipeline names.
    /// Use [`Validator::check`](crate::validate::Validator::check) to get
    /// a flattened pipeline that has been checked for cycles and unknown passes.
    pub fn flatten(&self) -> Vec<&str> {
        let mut out = Vec::default();

        flatten_into(&self.nodes, &mut out);

        out
    }
}

fn flatten_into<'a>(nodes: &'a [PipelineNode], out: &mut Vec<&'a str>) {
    for node in nodes {
        match node {
            PipelineNode::Pass(pass) => out.push(pass.name()),
            PipelineNode::SubPipeline(def) => flatten_into(def.nodes(), out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineBuilder;

    #[test]
    fn flatten_expands_in_order() {
        let inner = PipelineBuilder::new()
            .append_pass("SimplifyCFG")
            .append_pass("SILCombine")
            .build("Cleanup");

        let def = PipelineBuilder::new()
            .append_pass("Mem2Reg")
            .append_sub_pipeline(inner.clone())
            .append_pass("DCE")
            .append_sub_pipeline(inner)
            .build("Main");

        assert_eq!(
            def.flatten(),
            ["Mem2Reg", "SimplifyCFG", "SILCombine", "DCE", "SimplifyCFG", "SILCombine"]
        );
        assert_eq!(def.nodes().len(), 4);
        assert_eq!(def.nodes()[1].name(), "Cleanup");
    }

    #[test]
    fn empty() {
        let def = PipelineBuilder::new().build("Nothing");

        assert!(def.is_empty());
        assert!(def.flatten().is_empty());
    }

    #[cfg(feature = "enable-serde")]
    #[test]
    fn pass_ref_is_transparent() {
        use serde_test::{assert_tokens, Token};

        assert_tokens(&PassRef::new("LICM"), &[Token::Str("LICM")]);
    }
}

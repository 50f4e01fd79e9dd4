//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::pipeline::{PassRef, PipelineDefinition, PipelineNode};
use crate::registry::PassRegistry;

/// The name given to the pipeline produced by [`default_pipeline`].
pub const DEFAULT_PIPELINE: &str = "Default";

/// Incrementally builds a [`PipelineDefinition`].
///
/// Nothing is checked while building, passes are referenced purely by name.
/// This allows pipelines to be built before the passes they use are even
/// registered.
///
/// ```
/// # use passpipe::pipeline::PipelineBuilder;
/// let cleanup = PipelineBuilder::new()
///     .append_pass("SimplifyCFG")
///     .append_pass("SILCombine")
///     .build("Cleanup");
///
/// let def = PipelineBuilder::new()
///     .append_pass("Mem2Reg")
///     .append_sub_pipeline(cleanup)
///     .build("Main");
///
/// assert_eq!(def.flatten(), ["Mem2Reg", "SimplifyCFG", "SILCombine"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PipelineBuilder {
    nodes: Vec<PipelineNode>,
}

impl PipelineBuilder {
    /// Creates a builder for an empty pipeline.
    pub fn new() -> Self {
        Self {
            nodes: Vec::default(),
        }
    }

    /// Appends a reference to the pass `name`.
    pub fn append_pass(mut self, name: impl Into<String>) -> Self {
        self.nodes.push(PipelineNode::Pass(PassRef::new(name)));

        self
    }

    /// Appends a reference to every pass in `names`, in order.
    pub fn append_passes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes
            .extend(names.into_iter().map(|n| PipelineNode::Pass(PassRef::new(n))));

        self
    }

    /// Appends a nested pipeline.
    pub fn append_sub_pipeline(mut self, def: PipelineDefinition) -> Self {
        self.nodes.push(PipelineNode::SubPipeline(def));

        self
    }

    /// Whether nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Finishes the pipeline, naming it `name`.
    pub fn build(self, name: impl Into<String>) -> PipelineDefinition {
        PipelineDefinition::new(name.into(), self.nodes)
    }
}

/// Builds the pipeline that runs every registered pass exactly once,
/// in registration order.
pub fn default_pipeline(registry: &PassRegistry) -> PipelineDefinition {
    PipelineBuilder::new()
        .append_passes(registry.all().map(|p| p.name()))
        .build(DEFAULT_PIPELINE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::PassKind;

    #[test]
    fn default_follows_registration_order() {
        let mut registry = PassRegistry::new();
        registry.register("SILCleanup", PassKind::Transform).unwrap();
        registry.register("DCE", PassKind::Transform).unwrap();
        registry.register("CSE", PassKind::Transform).unwrap();
        registry.freeze();

        let def = default_pipeline(&registry);

        assert_eq!(def.name(), DEFAULT_PIPELINE);
        assert_eq!(def.flatten(), ["SILCleanup", "DCE", "CSE"]);
    }

    #[test]
    fn default_of_catalog() {
        let registry = crate::catalog::load_registry().unwrap();
        let def = default_pipeline(&registry);

        assert_eq!(def.nodes().len(), crate::catalog::PASSES.len());
        assert!(def
            .flatten()
            .iter()
            .zip(crate::catalog::PASSES.iter())
            .all(|(a, (b, _))| a == b));
    }

    #[test]
    fn builds_nothing_by_default() {
        let builder = PipelineBuilder::default();

        assert!(builder.is_empty());
        assert!(builder.build("Empty").is_empty());
    }
}

//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! The stock pipelines of the SIL optimizer, written in terms of the
//! passes in [`crate::catalog`].

use crate::pipeline::{PipelineBuilder, PipelineDefinition};

/// How aggressively a given round of SSA passes optimizes. This only
/// changes which inliner gets scheduled.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum OptLevel {
    /// Early, high-level round
    High,
    /// Middle round, after loop optimizations
    Mid,
    /// Last round, after lowering
    Low,
}

impl OptLevel {
    /// The inliner that is scheduled at this level.
    pub fn inliner(self) -> &'static str {
        match self {
            OptLevel::High => "EarlyInliner",
            OptLevel::Mid => "PerfInliner",
            OptLevel::Low => "LateInliner",
        }
    }
}

/// Every name accepted by [`by_name`].
pub const STOCK_PIPELINES: [&str; 10] = [
    "diagnostic",
    "simplifycfg-silcombine",
    "highlevel-loopopt",
    "lowlevel-loopopt",
    "ssa-high",
    "ssa-mid",
    "ssa-low",
    "lower",
    "normal",
    "mandatory",
];

/// Looks up a stock pipeline by its command-line spelling, see [`STOCK_PIPELINES`].
pub fn by_name(name: &str) -> Option<PipelineDefinition> {
    let def = match name {
        "diagnostic" => diagnostic(),
        "simplifycfg-silcombine" => simplifycfg_silcombine(),
        "highlevel-loopopt" => highlevel_loopopt(),
        "lowlevel-loopopt" => lowlevel_loopopt(),
        "ssa-high" => ssa_passes(OptLevel::High),
        "ssa-mid" => ssa_passes(OptLevel::Mid),
        "ssa-low" => ssa_passes(OptLevel::Low),
        "lower" => lower(),
        "normal" => normal(),
        "mandatory" => mandatory(),
        _ => return None,
    };

    Some(def)
}

/// The passes that produce diagnostics, these run even without optimizations.
pub fn diagnostic() -> PipelineDefinition {
    PipelineBuilder::new()
        .append_passes([
            "CapturePromotion",
            "AllocBoxToStack",
            "InOutDeshadowing",
            "NoReturnFolding",
            "DefiniteInitialization",
            "PredictableMemoryOptimizations",
            "DiagnosticConstantPropagation",
            "DiagnoseUnreachable",
            "EmitDFDiagnostics",
            "SplitNonCondBrCriticalEdges",
        ])
        .build("Diagnostic")
}

/// The mandatory pipeline: inlining of transparent functions, then the
/// diagnostic passes, then cleanup.
pub fn mandatory() -> PipelineDefinition {
    PipelineBuilder::new()
        .append_pass("MandatoryInlining")
        .append_sub_pipeline(diagnostic())
        .append_pass("SILCleanup")
        .build("Mandatory")
}

/// Simplifies the CFG, cleans it up with instcombine, then simplifies
/// whatever instcombine exposed.
pub fn simplifycfg_silcombine() -> PipelineDefinition {
    PipelineBuilder::new()
        .append_passes(["SimplifyCFG", "SILCombine", "SimplifyCFG"])
        .build("SimplifyCFGSILCombine")
}

/// Loop optimizations that need high-level array semantics.
pub fn highlevel_loopopt() -> PipelineDefinition {
    PipelineBuilder::new()
        .append_passes([
            "LowerAggregateInstrs",
            "SILCombine",
            "SROA",
            "Mem2Reg",
            "DCE",
            "SILCombine",
        ])
        .append_sub_pipeline(simplifycfg_silcombine())
        .append_passes([
            "LoopRotate",
            "DCE",
            "CSE",
            "SILCombine",
            "SimplifyCFG",
            "ABCOpt",
            "DCE",
            "COWArrayOpts",
            "DCE",
            "SwiftArrayOpts",
        ])
        .build("HighLevelLoopOpt")
}

/// Loop optimizations that run after everything has been lowered.
pub fn lowlevel_loopopt() -> PipelineDefinition {
    PipelineBuilder::new()
        .append_passes(["LICM", "DCE", "CSE", "SILCombine", "SimplifyCFG"])
        .build("LowLevelLoopOpt")
}

/// The main round of scalar SSA optimizations.
pub fn ssa_passes(level: OptLevel) -> PipelineDefinition {
    PipelineBuilder::new()
        .append_sub_pipeline(simplifycfg_silcombine())
        .append_passes([
            "AllocBoxToStack",
            "CopyForwarding",
            "LowerAggregateInstrs",
            "SILCombine",
            "SROA",
            "Mem2Reg",
            "PerformanceConstantPropagation",
            "DCE",
            "CSE",
            "SILCombine",
        ])
        .append_sub_pipeline(simplifycfg_silcombine())
        .append_passes([
            "GlobalLoadStoreOpts",
            "CodeMotion",
            "GlobalARCOpts",
            "SILLinker",
            level.inliner(),
            "SimplifyCFG",
            "CodeMotion",
            "GlobalARCOpts",
        ])
        .build("SSAPasses")
}

/// Module-level lowering: removes dead code and specializes closures and
/// dynamic dispatch.
pub fn lower() -> PipelineDefinition {
    PipelineBuilder::new()
        .append_passes([
            "DeadFunctionElimination",
            "DeadObjectElimination",
            "GlobalOpt",
            "CapturePropagation",
            "ClosureSpecializer",
            "Devirtualizer",
            "InlineCaches",
            "FunctionSignatureOpts",
        ])
        .build("Lower")
}

/// The complete optimization pipeline.
pub fn normal() -> PipelineDefinition {
    let stage = |name: &str, def: PipelineDefinition| {
        PipelineBuilder::new().append_sub_pipeline(def).build(name)
    };

    PipelineBuilder::new()
        .append_sub_pipeline(stage("HighLevel", ssa_passes(OptLevel::High)))
        .append_sub_pipeline(stage("EarlyLoopOpt", highlevel_loopopt()))
        .append_sub_pipeline(stage("MidLevelOpt", ssa_passes(OptLevel::Mid)))
        .append_sub_pipeline(lower())
        .append_sub_pipeline(stage("LowLevel", ssa_passes(OptLevel::Low)))
        .append_sub_pipeline(
            PipelineBuilder::new()
                .append_sub_pipeline(lowlevel_loopopt())
                .append_pass("DeadFunctionElimination")
                .build("LateLoopOpt"),
        )
        .build("Normal")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::validate::Validator;

    #[test]
    fn every_stock_pipeline_resolves() {
        let registry = catalog::load_registry().unwrap();
        let validator = Validator::default();

        for name in STOCK_PIPELINES {
            let def = by_name(name).unwrap();
            let result = validator.validate(&def, &registry);

            assert!(result.is_valid(), "`{name}` failed validation: {result:?}");
        }
    }

    #[test]
    fn unknown_stock_pipeline() {
        assert_eq!(by_name("fastest"), None);
    }

    #[test]
    fn inliner_depends_on_level() {
        let high = ssa_passes(OptLevel::High);
        let low = ssa_passes(OptLevel::Low);

        assert!(high.flatten().contains(&"EarlyInliner"));
        assert!(!high.flatten().contains(&"LateInliner"));
        assert!(low.flatten().contains(&"LateInliner"));
    }

    #[test]
    fn normal_stages_in_order() {
        let def = normal();
        let stages: Vec<_> = def.nodes().iter().map(|n| n.name()).collect();

        assert_eq!(
            stages,
            ["HighLevel", "EarlyLoopOpt", "MidLevelOpt", "Lower", "LowLevel", "LateLoopOpt"]
        );
    }

    #[test]
    fn late_loop_opt_ends_with_dead_function_elimination() {
        let def = normal();
        let flat = def.flatten();

        assert_eq!(flat.last(), Some(&"DeadFunctionElimination"));
    }

    #[test]
    fn mandatory_nests_diagnostics() {
        let def = mandatory();
        let flat = def.flatten();

        assert_eq!(flat.first(), Some(&"MandatoryInlining"));
        assert_eq!(flat.last(), Some(&"SILCleanup"));
        assert_eq!(flat.len(), diagnostic().flatten().len() + 2);
    }
}

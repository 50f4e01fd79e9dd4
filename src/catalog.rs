//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! The passes provided by the SIL optimizer.
//!
//! This list is written out by hand. A compiler that can dump its own passes
//! should be loaded through [`TextSource`](crate::registry::TextSource)
//! instead, which goes through the exact same registration path.

use crate::pass::PassKind;
use crate::pass::PassKind::{Analysis, Transform, Utility};
use crate::registry::{PassRegistry, RegistryError, StaticSource};

/// Every pass known to the SIL optimizer, in canonical order.
///
/// This order is the order of the default pipeline.
pub static PASSES: [(&str, PassKind); 49] = [
    ("AADumper", Utility),
    ("ABCOpt", Transform),
    ("AllocBoxToStack", Transform),
    ("CFGPrinter", Utility),
    ("COWArrayOpts", Transform),
    ("CSE", Transform),
    ("CapturePromotion", Transform),
    ("CapturePropagation", Transform),
    ("ClosureSpecializer", Transform),
    ("CodeMotion", Transform),
    ("CopyForwarding", Transform),
    ("DCE", Transform),
    ("DeadFunctionElimination", Transform),
    ("DeadObjectElimination", Transform),
    ("DefiniteInitialization", Transform),
    ("Devirtualizer", Transform),
    ("DiagnoseUnreachable", Transform),
    ("DiagnosticConstantPropagation", Transform),
    ("EarlyInliner", Transform),
    ("EmitDFDiagnostics", Analysis),
    ("FunctionSignatureOpts", Transform),
    ("GenericSpecializer", Transform),
    ("GlobalARCOpts", Transform),
    ("GlobalLoadStoreOpts", Transform),
    ("GlobalOpt", Transform),
    ("IVInfoPrinter", Utility),
    ("InOutDeshadowing", Transform),
    ("InlineCaches", Transform),
    ("InstCount", Utility),
    ("LICM", Transform),
    ("LateInliner", Transform),
    ("LoopInfoPrinter", Utility),
    ("LoopRotate", Transform),
    ("LowerAggregateInstrs", Transform),
    ("MandatoryInlining", Transform),
    ("Mem2Reg", Transform),
    ("NoReturnFolding", Transform),
    ("PerfInliner", Transform),
    ("PerformanceConstantPropagation", Transform),
    ("PredictableMemoryOptimizations", Transform),
    ("SILCleanup", Transform),
    ("SILCombine", Transform),
    ("SILLinker", Transform),
    ("SROA", Transform),
    ("SimplifyCFG", Transform),
    ("SplitAllCriticalEdges", Transform),
    ("SplitNonCondBrCriticalEdges", Transform),
    ("StripDebugInfo", Transform),
    ("SwiftArrayOpts", Transform),
];

/// A [`StaticSource`] over [`PASSES`].
pub const fn source() -> StaticSource {
    StaticSource::new(&PASSES)
}

/// Builds a frozen registry holding every pass in [`PASSES`].
pub fn load_registry() -> Result<PassRegistry, RegistryError> {
    let mut registry = PassRegistry::new();

    registry.load(&source())?;
    registry.freeze();

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_loads() {
        let registry = load_registry().unwrap();

        assert!(registry.is_frozen());
        assert_eq!(registry.len(), PASSES.len());
    }

    #[test]
    fn registry_order_is_catalog_order() {
        let registry = load_registry().unwrap();
        let names: Vec<_> = registry.all().map(|p| p.name()).collect();
        let expected: Vec<_> = PASSES.iter().map(|(name, _)| *name).collect();

        assert_eq!(names, expected);
        assert_eq!(names.first(), Some(&"AADumper"));
        assert_eq!(names.last(), Some(&"SwiftArrayOpts"));
    }

    #[test]
    fn printers_are_utilities() {
        let registry = load_registry().unwrap();

        for name in ["AADumper", "CFGPrinter", "IVInfoPrinter", "InstCount", "LoopInfoPrinter"] {
            assert_eq!(registry.lookup(name).unwrap().kind(), PassKind::Utility);
        }

        assert_eq!(
            registry.lookup("EmitDFDiagnostics").unwrap().kind(),
            PassKind::Analysis
        );
    }
}

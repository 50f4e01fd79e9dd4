//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

mod flatten;
mod parse;
mod validate;

use crate::subtest::{TestInput, TestResult};
use passpipe::pipeline::PipelineDefinition;
use passpipe::registry::PassRegistry;
use passpipe::{catalog, text};
use std::sync::OnceLock;

pub use flatten::*;
pub use parse::*;
pub use validate::*;

static REGISTRY: OnceLock<PassRegistry> = OnceLock::new();

// every runner checks against the same frozen catalog
fn registry() -> &'static PassRegistry {
    REGISTRY.get_or_init(|| catalog::load_registry().expect("built-in catalog should load"))
}

// a file that fails to parse is reported the same way by every runner
fn parse_input(input: &TestInput<'_>) -> Result<PipelineDefinition, TestResult> {
    text::parse(input.source).map_err(|err| {
        let rendered = text::format_parse_error(input.name, input.source, &err);

        TestResult::ParseError(err, rendered)
    })
}

// declares `<name>_subtest()`, running `runner` over every file in `tests/<name>/`
macro_rules! declare_subtest {
    ($name:ident, $runner:ident) => {
        paste::paste! {
            pub const fn [< $name _subtest >]() -> crate::subtest::Subtest {
                crate::subtest::Subtest::new(stringify!($name), $runner)
            }
        }
    };
}

pub(crate) use declare_subtest;

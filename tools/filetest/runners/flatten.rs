//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::runners::{declare_subtest, parse_input, registry};
use crate::subtest::{TestInput, TestResult};
use passpipe::validate::{ValidationOptions, Validator};

fn flattened_output(input: &TestInput<'_>) -> TestResult {
    let def = match parse_input(input) {
        Ok(def) => def,
        Err(rejected) => return rejected,
    };

    let validator = Validator::new(ValidationOptions {
        duplicates: input.options.duplicates,
    });

    let validated = match validator.check(&def, registry()) {
        Ok(validated) => validated,
        Err(diagnostics) => return TestResult::Invalid(diagnostics),
    };

    let mut out = format!("{}:\n", validated.name());

    for (idx, pass) in validated.passes().iter().enumerate() {
        out += &format!("{idx:3} {pass}\n");
    }

    TestResult::Output(out)
}

declare_subtest!(flatten, flattened_output);

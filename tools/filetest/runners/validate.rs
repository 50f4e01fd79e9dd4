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
use passpipe::validate::{ValidationOptions, ValidationResult, Validator};

fn validator_output(input: &TestInput<'_>) -> TestResult {
    let def = match parse_input(input) {
        Ok(def) => def,
        Err(rejected) => return rejected,
    };

    let validator = Validator::new(ValidationOptions {
        duplicates: input.options.duplicates,
    });
    let result = validator.validate(&def, registry());

    if !result.is_valid() {
        return TestResult::Invalid(result.diagnostics().to_vec());
    }

    let mut out = String::default();

    for diagnostic in result.diagnostics() {
        out += &format!("{diagnostic}\n");
    }

    out += match result {
        ValidationResult::Valid => "valid\n",
        _ => "valid with warnings\n",
    };

    TestResult::Output(out)
}

declare_subtest!(validate, validator_output);

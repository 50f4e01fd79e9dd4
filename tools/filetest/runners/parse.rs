//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::runners::{declare_subtest, parse_input};
use crate::subtest::{TestInput, TestResult};
use passpipe::text;

fn parser_output(input: &TestInput<'_>) -> TestResult {
    let def = match parse_input(input) {
        Ok(def) => def,
        Err(rejected) => return rejected,
    };

    let dumped = text::dump(&def);

    // anything we can print, we must be able to read back identically
    assert_eq!(
        text::parse(&dumped).as_ref(),
        Ok(&def),
        "dump of `{}` did not round-trip",
        input.name
    );

    TestResult::Output(dumped)
}

declare_subtest!(parse, parser_output);

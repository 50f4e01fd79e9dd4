//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! Checks pipelines against a frozen registry before they are run.
//!
//! The validator walks a pipeline depth-first, expanding sub-pipelines as it
//! goes, and keeps track of which sub-pipelines it is currently inside of.
//! It looks for:
//!
//! - Pass references that don't name a registered pass
//! - Sub-pipelines that (directly or transitively) contain themselves
//! - Transform passes that run more than once, depending on [`DuplicatePolicy`]
//! - Names that can't be written out in the textual format
//!
//! Problems are accumulated rather than returned early, so a single call
//! reports everything wrong with a pipeline.

mod diagnostics;
mod validator;

pub use diagnostics::*;
pub use validator::*;

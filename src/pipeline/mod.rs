//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! Pipeline definitions: ordered, possibly nested, sequences of passes.
//!
//! A pipeline only ever refers to passes by name. It can be built, printed,
//! parsed and compared without a registry in sight, the names are only
//! resolved by [`crate::validate`].
//!
//! Sub-pipelines are identified by name as well. A sub-pipeline that ends
//! up nested inside of a sub-pipeline with the same name is treated as
//! containing itself, and is rejected by the validator.

mod builder;
mod definition;
pub mod standard;

pub use builder::*;
pub use definition::*;

//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! The pass registry, the source of truth for "does this pass exist."
//!
//! A [`PassRegistry`] is built once when a tool starts up, usually from
//! [`crate::catalog`] or from a list the compiler dumped through a
//! [`TextSource`], and then frozen. After that it is only ever read.

mod errors;
mod source;
mod table;

pub use errors::*;
pub use source::*;
pub use table::*;

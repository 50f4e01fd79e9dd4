//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! The textual pipeline format, a hand-written reader and a writer for it.
//!
//! The format is line-oriented:
//!
//! ```text
//! # comments run until the end of the line
//! pipeline Mandatory
//! MandatoryInlining
//! Diagnostic {
//!   CapturePromotion
//!   AllocBoxToStack
//! }
//! SILCleanup
//! ```
//!
//! - `pipeline <name>` names the pipeline. It is optional, but if it is
//!   present it has to come before anything else.
//! - A line with a single name is a reference to a pass.
//! - `<name> {` opens a sub-pipeline, and `}` on its own line closes it.
//!
//! Indentation is ignored by [`parse`], [`dump`] indents by two spaces
//! for every level of nesting.
//!
//! Sub-pipelines may be nested at most [`MAX_NESTING`] levels deep, a block
//! opened any deeper is rejected at the line that opens it.

mod errors;
#[cfg(feature = "enable-serde")]
mod json;
mod lex;
mod reader;
mod writer;

pub use errors::*;
#[cfg(feature = "enable-serde")]
pub use json::*;
pub use lex::*;
pub use reader::*;
pub use writer::*;

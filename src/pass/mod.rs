//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022 Evan Cox <evanacox00@gmail.com>. All rights reserved.      //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! Defines how passes are identified.
//!
//! None of the code in this crate ever runs a pass, the transformations
//! themselves live inside of the compiler. What this crate deals with
//! is the *name* of a pass, and the little bit of metadata needed to
//! schedule it:
//!
//! ```
//! # use passpipe::pass::{PassIdentity, PassKind};
//! let dce = PassIdentity::new("DCE", PassKind::Transform).unwrap();
//!
//! assert_eq!(dce.name(), "DCE");
//! ```
//!
//! # Kinds
//! Passes are broken down into three categories:
//!
//! 1. Analyses, which only observe IR
//! 2. Transforms, which possibly change IR
//! 3. Utilities, which print or count things and have no optimization effect
//!
//! The kind is purely descriptive, a pass is identified by its name and
//! nothing else. The validator uses the kind to decide which repeated
//! passes are worth flagging.
//!
//! # Names
//! Names are plain data rather than symbols in the code, so a catalog can be
//! loaded from a compiler's own introspection output just as easily as from
//! the static list in [`crate::catalog`]. See [`is_valid_name`] for what
//! counts as a name.

mod identity;
mod kind;

pub use identity::*;
pub use kind::*;

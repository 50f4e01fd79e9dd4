//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::pass::InvalidPassName;
use thiserror::Error;

/// Everything that can go wrong while loading or querying a [`PassRegistry`].
///
/// Errors produced while loading are meant to be fatal, a registry that
/// is missing passes is worse than no registry at all.
///
/// [`PassRegistry`]: crate::registry::PassRegistry
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum RegistryError {
    /// One or more names were already registered, or appeared more than once
    /// in a single batch. Every offending name is listed once, in the order
    /// it was first seen.
    #[error("duplicate pass name(s): {}", .names.join(", "))]
    DuplicateName {
        /// The names that were duplicated
        names: Vec<String>,
    },
    /// The registry was already frozen when something tried to register a pass.
    #[error("pass registry is frozen, no more passes can be registered")]
    RegistryFrozen,
    /// The registry was queried before it was frozen.
    #[error("pass registry was queried before being frozen")]
    NotFrozen,
    /// A name that was looked up is not registered.
    #[error("unknown pass `{0}`")]
    UnknownPass(String),
    /// A pass name was not a valid name.
    #[error(transparent)]
    InvalidName(#[from] InvalidPassName),
    /// A textual pass list could not be read.
    #[error("malformed pass list at line {line}: {message}")]
    MalformedSource {
        /// The 1-based line the problem was found on
        line: usize,
        /// What was wrong with the line
        message: String,
    },
}

//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::pass::PassKind;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use thiserror::Error;

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

/// Checks whether `name` can be used as the name of a pass or a pipeline.
///
/// Names are non-empty and made up of ASCII letters, digits, `_`, `-` and `.`.
/// This is exactly what the textual pipeline format is able to represent, so
/// anything that passes this check can be dumped and parsed back.
///
/// ```
/// # use passpipe::pass::is_valid_name;
/// assert!(is_valid_name("SILCombine"));
/// assert!(is_valid_name("split-crit-edges"));
/// assert!(!is_valid_name("two words"));
/// assert!(!is_valid_name(""));
/// ```
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, b'_' | b'-' | b'.'))
}

/// Returned when trying to create a [`PassIdentity`] with a name that
/// fails [`is_valid_name`].
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("`{0}` is not a valid pass name")]
pub struct InvalidPassName(pub String);

/// The identity of a single compiler pass.
///
/// Identities are keyed purely by name: two identities with the same name
/// are equal even if their kinds disagree. The name is stored behind an [`Arc`]
/// so identities can be cheaply handed out by a registry that is shared
/// between threads.
///
/// Creating an identity does not register it anywhere, see
/// [`PassRegistry::register`](crate::registry::PassRegistry::register).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct PassIdentity {
    name: Arc<str>,
    kind: PassKind,
}

impl PassIdentity {
    /// Creates an identity for the pass `name`.
    pub fn new(name: &str, kind: PassKind) -> Result<Self, InvalidPassName> {
        if !is_valid_name(name) {
            return Err(InvalidPassName(name.to_owned()));
        }

        Ok(Self {
            name: Arc::from(name),
            kind,
        })
    }

    /// The name of the pass.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind of the pass.
    pub fn kind(&self) -> PassKind {
        self.kind
    }
}

impl PartialEq for PassIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for PassIdentity {}

impl Hash for PassIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state)
    }
}

impl fmt::Display for PassIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

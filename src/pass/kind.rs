//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

/// What a given pass does to the IR it runs over.
///
/// This is descriptive metadata only, it plays no part in the identity
/// of a pass.
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "enable-serde", serde(rename_all = "lowercase"))]
pub enum PassKind {
    /// Observes the IR and computes information, never changes it.
    Analysis,
    /// Possibly modifies the IR.
    Transform,
    /// Printers, dumpers and counters. They have no optimization effect,
    /// but they still need to be schedulable inside of a pipeline.
    Utility,
}

impl PassKind {
    /// Returns the textual spelling of the kind, as used in introspection dumps.
    pub fn as_str(self) -> &'static str {
        match self {
            PassKind::Analysis => "analysis",
            PassKind::Transform => "transform",
            PassKind::Utility => "utility",
        }
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not spell out a [`PassKind`].
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown pass kind `{0}`, expected one of 'analysis', 'transform', 'utility'")]
pub struct UnknownPassKind(pub String);

impl FromStr for PassKind {
    type Err = UnknownPassKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "analysis" => Ok(PassKind::Analysis),
            "transform" => Ok(PassKind::Transform),
            "utility" => Ok(PassKind::Utility),
            _ => Err(UnknownPassKind(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_their_own_spelling() {
        for kind in [PassKind::Analysis, PassKind::Transform, PassKind::Utility] {
            assert_eq!(kind.to_string().parse::<PassKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_kind() {
        let err = "Transform".parse::<PassKind>().unwrap_err();

        assert_eq!(err, UnknownPassKind("Transform".to_owned()));
    }

    #[cfg(feature = "enable-serde")]
    #[test]
    fn serde_uses_lowercase() {
        use serde_test::{assert_tokens, Token};

        assert_tokens(
            &PassKind::Utility,
            &[Token::UnitVariant {
                name: "PassKind",
                variant: "utility",
            }],
        );
    }
}

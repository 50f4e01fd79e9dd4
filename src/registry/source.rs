//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::pass::{is_valid_name, PassKind};
use crate::registry::RegistryError;

/// Something that is able to enumerate the passes a compiler provides.
///
/// The registry does not care where a list comes from, a list compiled into
/// the binary and a list dumped by the compiler at runtime both go through
/// [`PassRegistry::load`](crate::registry::PassRegistry::load) the same way.
pub trait PassSource {
    /// Produces every `(name, kind)` pair in the order they should be registered.
    fn entries(&self) -> Result<Vec<(String, PassKind)>, RegistryError>;
}

/// A pass list that is known at compile time.
#[derive(Copy, Clone, Debug)]
pub struct StaticSource {
    passes: &'static [(&'static str, PassKind)],
}

impl StaticSource {
    /// Wraps a static list of passes.
    pub const fn new(passes: &'static [(&'static str, PassKind)]) -> Self {
        Self { passes }
    }
}

impl PassSource for StaticSource {
    fn entries(&self) -> Result<Vec<(String, PassKind)>, RegistryError> {
        Ok(self
            .passes
            .iter()
            .map(|(name, kind)| (name.to_string(), *kind))
            .collect())
    }
}

/// A pass list in the textual format that a compiler prints when it is asked
/// to dump its registered passes.
///
/// Every line is `<name> <kind>`, where `<kind>` is one of `analysis`,
/// `transform` or `utility`. Blank lines are ignored, and `#` begins a
/// comment that runs until the end of the line.
///
/// ```text
/// # passes known to the optimizer
/// AADumper   utility
/// SILCombine transform
/// ```
#[derive(Copy, Clone, Debug)]
pub struct TextSource<'a> {
    text: &'a str,
}

impl<'a> TextSource<'a> {
    /// Creates a source that will read from `text`.
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

fn malformed(line: usize, message: impl Into<String>) -> RegistryError {
    RegistryError::MalformedSource {
        line,
        message: message.into(),
    }
}

impl PassSource for TextSource<'_> {
    fn entries(&self) -> Result<Vec<(String, PassKind)>, RegistryError> {
        let mut entries = Vec::default();

        for (i, line) in self.text.lines().enumerate() {
            let line_n = i + 1;
            let content = match line.find('#') {
                Some(idx) => &line[..idx],
                None => line,
            };

            let mut words = content.split_whitespace();

            let (name, kind) = match (words.next(), words.next(), words.next()) {
                (None, _, _) => continue,
                (Some(name), Some(kind), None) => (name, kind),
                _ => return Err(malformed(line_n, "expected `<name> <kind>`")),
            };

            if !is_valid_name(name) {
                return Err(malformed(line_n, format!("`{name}` is not a valid pass name")));
            }

            let kind = kind
                .parse::<PassKind>()
                .map_err(|e| malformed(line_n, e.to_string()))?;

            entries.push((name.to_owned(), kind));
        }

        Ok(entries)
    }
}

//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::text::TokPair;
use thiserror::Error;

/// A syntax error in a textual pipeline.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Error)]
#[error("{line}:{col}: {message}")]
pub struct MalformedPipelineTextError {
    /// 1-based line the error was found on
    pub line: usize,
    /// 1-based column the error starts at
    pub col: usize,
    /// How many bytes of the line the error covers, at least 1
    pub len: usize,
    /// What went wrong
    pub message: String,
}

impl MalformedPipelineTextError {
    pub(crate) fn at(pair: TokPair<'_>, message: impl Into<String>) -> Self {
        Self {
            line: pair.line,
            col: pair.col,
            len: pair.len.max(1),
            message: message.into(),
        }
    }
}

/// Formats a parse error into a human-readable diagnostic that points
/// at the offending part of `source`.
///
/// `name` is the name of the file `source` came from.
pub fn format_parse_error(name: &str, source: &str, err: &MalformedPipelineTextError) -> String {
    let line = source.lines().nth(err.line.saturating_sub(1)).unwrap_or_default();

    let (line_n, col_n) = (err.line.to_string(), err.col.to_string());
    let mut error = String::default();

    let num_padding = " ".repeat(line_n.len());
    let col_padding = " ".repeat(err.col.saturating_sub(1));
    let underline = "^".repeat(err.len);

    error += &format!("  --> {name}:{line_n}:{col_n}\n");
    error += &format!(" {num_padding} |\n");
    error += &format!(" {line_n} | {line}\n");
    error += &format!(" {num_padding} | {col_padding}{underline}\n");
    error += &format!(" {num_padding} |\n");
    error += &format!(" {num_padding} = {}", err.message);

    error
}

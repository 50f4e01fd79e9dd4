//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::pipeline::{PipelineBuilder, PipelineDefinition};
use crate::text::{Lex, MalformedPipelineTextError, TokPair, Token};
use smallvec::SmallVec;
use std::mem;

/// The name given to a parsed pipeline that has no `pipeline <name>` header.
pub const DEFAULT_NAME: &str = "main";

/// How deeply sub-pipelines may be nested inside of each other in text.
///
/// Everything that consumes a pipeline walks it recursively, so the reader
/// refuses anything deeper than this instead of producing a definition that
/// can't be validated, dumped or even dropped.
pub const MAX_NESTING: usize = 128;

/// Parses the textual form of a pipeline, see [`crate::text`] for the format.
///
/// ```
/// # use passpipe::text;
/// let def = text::parse("pipeline Main\nMem2Reg\nCleanup {\n  DCE\n}\n").unwrap();
///
/// assert_eq!(def.name(), "Main");
/// assert_eq!(def.flatten(), ["Mem2Reg", "DCE"]);
/// ```
pub fn parse(source: &str) -> Result<PipelineDefinition, MalformedPipelineTextError> {
    Reader::new(source).parse()
}

// a sub-pipeline that has been opened but not closed yet
struct OpenBlock<'a> {
    opener: TokPair<'a>,
    name: &'a str,
    builder: PipelineBuilder,
}

/// Parses a string containing a textual pipeline.
struct Reader<'a> {
    lex: Lex<'a>,
    name: Option<&'a str>,
    root: PipelineBuilder,
    open: Vec<OpenBlock<'a>>,
    seen_entry: bool,
}

impl<'a> Reader<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lex: Lex::new(source),
            name: None,
            root: PipelineBuilder::new(),
            open: Vec::default(),
            seen_entry: false,
        }
    }

    fn parse(mut self) -> Result<PipelineDefinition, MalformedPipelineTextError> {
        while !self.lex.is_at_end() {
            let line = self.next_line();

            self.parse_line(&line)?;
        }

        if let Some(block) = self.open.pop() {
            return Err(MalformedPipelineTextError::at(
                block.opener,
                format!("sub-pipeline `{}` is never closed", block.name),
            ));
        }

        let name = self.name.unwrap_or(DEFAULT_NAME);

        tracing::trace!(pipeline = name, "parsed pipeline");

        Ok(self.root.build(name))
    }

    // every token up to (but not including) the next newline
    fn next_line(&mut self) -> SmallVec<[TokPair<'a>; 3]> {
        let mut line = SmallVec::default();

        while let Some(pair) = self.lex.next_token() {
            if pair.tok == Token::Newline {
                break;
            }

            line.push(pair);
        }

        line
    }

    fn parse_line(&mut self, line: &[TokPair<'a>]) -> Result<(), MalformedPipelineTextError> {
        let toks: SmallVec<[Token<'a>; 3]> = line.iter().map(|pair| pair.tok).collect();

        match toks.as_slice() {
            [] => Ok(()),
            [Token::Ident("pipeline"), Token::Ident(name)] => self.header(line[0], *name),
            [Token::Ident(name)] => {
                self.seen_entry = true;
                self.with_current(|b| b.append_pass(*name));

                Ok(())
            }
            [Token::Ident(name), Token::LBrace] => {
                if self.open.len() == MAX_NESTING {
                    return Err(MalformedPipelineTextError::at(
                        line[0],
                        format!("sub-pipelines cannot be nested more than {MAX_NESTING} deep"),
                    ));
                }

                self.seen_entry = true;
                self.open.push(OpenBlock {
                    opener: line[0],
                    name: *name,
                    builder: PipelineBuilder::new(),
                });

                Ok(())
            }
            [Token::RBrace] => self.close(line[0]),
            _ => Err(unexpected(line)),
        }
    }

    fn header(&mut self, at: TokPair<'a>, name: &'a str) -> Result<(), MalformedPipelineTextError> {
        if self.name.is_some() {
            return Err(MalformedPipelineTextError::at(
                at,
                "pipeline already has a `pipeline` header",
            ));
        }

        if self.seen_entry {
            return Err(MalformedPipelineTextError::at(
                at,
                "the `pipeline` header must come before any passes",
            ));
        }

        self.name = Some(name);

        Ok(())
    }

    fn close(&mut self, at: TokPair<'a>) -> Result<(), MalformedPipelineTextError> {
        let block = match self.open.pop() {
            Some(block) => block,
            None => return Err(MalformedPipelineTextError::at(at, "unmatched `}`")),
        };

        let def = block.builder.build(block.name);

        self.with_current(|b| b.append_sub_pipeline(def));

        Ok(())
    }

    // applies `f` to the innermost open block, or the root if there isn't one
    fn with_current(&mut self, f: impl FnOnce(PipelineBuilder) -> PipelineBuilder) {
        let current = match self.open.last_mut() {
            Some(block) => &mut block.builder,
            None => &mut self.root,
        };

        *current = f(mem::take(current));
    }
}

fn unexpected(line: &[TokPair<'_>]) -> MalformedPipelineTextError {
    if let Some(pair) = line.iter().find(|p| matches!(p.tok, Token::Unknown(_))) {
        if let Token::Unknown(c) = pair.tok {
            return MalformedPipelineTextError::at(*pair, format!("unexpected character `{c}`"));
        }
    }

    let first = line[0];
    let last = line[line.len() - 1];
    let span = TokPair {
        len: last.col + last.len - first.col,
        ..first
    };

    MalformedPipelineTextError::at(
        span,
        "expected a pass name, `<name> {`, `}` or `pipeline <name>`",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineNode;

    #[test]
    fn nested() {
        let def = parse(
            "pipeline Normal
# the early stage
HighLevel {
  SSAPasses {
    SimplifyCFG
  }
  LICM
}
InstCount
",
        )
        .unwrap();

        let expected = PipelineBuilder::new()
            .append_sub_pipeline(
                PipelineBuilder::new()
                    .append_sub_pipeline(
                        PipelineBuilder::new()
                            .append_pass("SimplifyCFG")
                            .build("SSAPasses"),
                    )
                    .append_pass("LICM")
                    .build("HighLevel"),
            )
            .append_pass("InstCount")
            .build("Normal");

        assert_eq!(def, expected);
    }

    #[test]
    fn headerless() {
        let def = parse("DCE\nCSE").unwrap();

        assert_eq!(def.name(), DEFAULT_NAME);
        assert_eq!(def.flatten(), ["DCE", "CSE"]);
    }

    #[test]
    fn indentation_is_not_significant() {
        let a = parse("pipeline P\nA {\nDCE\n    }\n").unwrap();
        let b = parse("pipeline P\n  A {\n  DCE\n}\n").unwrap();

        assert_eq!(a, b);
        assert!(matches!(a.nodes()[0], PipelineNode::SubPipeline(_)));
    }

    #[test]
    fn empty_block() {
        let def = parse("Nothing {\n}\n").unwrap();

        match &def.nodes()[0] {
            PipelineNode::SubPipeline(inner) => assert!(inner.is_empty()),
            node => panic!("expected sub-pipeline, got {node:?}"),
        }
    }

    #[test]
    fn pipeline_as_a_name() {
        let def = parse("pipeline pipeline\npipeline\npipeline {\n}\n").unwrap();

        assert_eq!(def.name(), "pipeline");
        assert_eq!(def.nodes()[0], PipelineNode::Pass(crate::pipeline::PassRef::new("pipeline")));
        assert_eq!(def.nodes()[1].name(), "pipeline");
    }

    fn error(source: &str) -> (usize, usize, String) {
        let err = parse(source).unwrap_err();

        (err.line, err.col, err.message)
    }

    #[test]
    fn unmatched_close() {
        assert_eq!(
            error("DCE\n}\n"),
            (2, 1, "unmatched `}`".to_owned())
        );
    }

    #[test]
    fn unclosed_block() {
        assert_eq!(
            error("pipeline P\nOuter {\n  Inner {\n  DCE\n  }\n"),
            (2, 1, "sub-pipeline `Outer` is never closed".to_owned())
        );
    }

    #[test]
    fn bad_character() {
        assert_eq!(
            error("DCE\nSROA, Mem2Reg\n"),
            (2, 5, "unexpected character `,`".to_owned())
        );
    }

    #[test]
    fn too_many_names() {
        let err = parse("\n  Mem2Reg SROA\n").unwrap_err();

        assert_eq!((err.line, err.col, err.len), (2, 3, 12));
    }

    #[test]
    fn late_header() {
        assert_eq!(
            error("DCE\npipeline Late\n").2,
            "the `pipeline` header must come before any passes"
        );
    }

    #[test]
    fn double_header() {
        assert_eq!(error("pipeline A\npipeline B\n").0, 2);
    }

    fn nested_source(depth: usize) -> String {
        let mut source = String::default();

        for i in 0..depth {
            source += &format!("B{i} {{\n");
        }

        source += "DCE\n";
        source += &"}\n".repeat(depth);

        source
    }

    #[test]
    fn deepest_allowed_nesting() {
        let def = parse(&nested_source(MAX_NESTING)).unwrap();

        assert_eq!(def.flatten(), ["DCE"]);
    }

    #[test]
    fn nesting_too_deep() {
        let err = parse(&nested_source(10_000)).unwrap_err();

        assert_eq!(err.line, MAX_NESTING + 1);
        assert_eq!(err.col, 1);
        assert!(err.message.contains("nested more than 128 deep"));
    }

    #[test]
    fn brace_on_its_own_line() {
        assert_eq!(error("Block\n{\n}\n").0, 2);
    }
}

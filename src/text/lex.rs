//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use std::iter::Peekable;
use std::str::CharIndices;

/// A single token of the pipeline format.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum Token<'a> {
    /// A pass or pipeline name, or the `pipeline` keyword
    Ident(&'a str),
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// The end of a line
    Newline,
    /// A character that can't start any token
    Unknown(&'a str),
}

/// A token along with where it was found.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct TokPair<'a> {
    /// The token itself
    pub tok: Token<'a>,
    /// 1-based line number
    pub line: usize,
    /// 1-based column, in bytes
    pub col: usize,
    /// Length of the token, in bytes
    pub len: usize,
}

/// A lexer for the textual pipeline format that lazily produces tokens.
///
/// Comments (`#` until the end of the line) and whitespace other than
/// newlines are skipped entirely.
pub struct Lex<'a> {
    raw: RawLex<'a>,
    next: Option<TokPair<'a>>,
}

impl<'a> Lex<'a> {
    /// Creates a new [`Lex`] over a given source string.
    pub fn new(source: &'a str) -> Self {
        let mut raw = RawLex::new(source);
        let first = raw.next();

        Self { raw, next: first }
    }

    /// Produces the next token, if one exists. If `None` is returned,
    /// EOF has been reached.
    pub fn next_token(&mut self) -> Option<TokPair<'a>> {
        // staying one token ahead makes `peek_token` and `is_at_end` trivial
        let old = self.next.take();

        self.next = self.raw.next();

        old
    }

    /// Returns whether or not the lexer is able to yield more tokens via [`Self::next_token`]
    pub fn is_at_end(&self) -> bool {
        self.next.is_none()
    }

    /// Peek at the next token to be yielded, if there are any
    pub fn peek_token(&self) -> Option<TokPair<'a>> {
        self.next
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

struct RawLex<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    line_start: usize,
}

impl<'a> RawLex<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            line_start: 0,
        }
    }

    fn pair(&self, tok: Token<'a>, start: usize, len: usize) -> TokPair<'a> {
        TokPair {
            tok,
            line: self.line,
            col: start - self.line_start + 1,
            len,
        }
    }

    fn ident(&mut self, start: usize) -> TokPair<'a> {
        let mut end = start;

        while let Some(&(idx, c)) = self.chars.peek() {
            if !is_ident_char(c) {
                break;
            }

            end = idx + c.len_utf8();
            self.chars.next();
        }

        self.pair(Token::Ident(&self.source[start..end]), start, end - start)
    }

    fn skip_comment(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if c == '\n' {
                break;
            }

            self.chars.next();
        }
    }
}

impl<'a> Iterator for RawLex<'a> {
    type Item = TokPair<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let &(idx, c) = self.chars.peek()?;

            match c {
                '\n' => {
                    self.chars.next();

                    let pair = self.pair(Token::Newline, idx, 1);

                    self.line += 1;
                    self.line_start = idx + 1;

                    return Some(pair);
                }
                '#' => self.skip_comment(),
                '{' => {
                    self.chars.next();

                    return Some(self.pair(Token::LBrace, idx, 1));
                }
                '}' => {
                    self.chars.next();

                    return Some(self.pair(Token::RBrace, idx, 1));
                }
                c if c.is_whitespace() => {
                    self.chars.next();
                }
                c if is_ident_char(c) => return Some(self.ident(idx)),
                c => {
                    self.chars.next();

                    let text = &self.source[idx..idx + c.len_utf8()];

                    return Some(self.pair(Token::Unknown(text), idx, c.len_utf8()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token<'_>> {
        let mut lex = Lex::new(source);
        let mut out = Vec::default();

        while let Some(pair) = lex.next_token() {
            out.push(pair.tok);
        }

        out
    }

    #[test]
    fn block() {
        assert_eq!(
            tokens("Cleanup {\n  SimplifyCFG\n}\n"),
            [
                Token::Ident("Cleanup"),
                Token::LBrace,
                Token::Newline,
                Token::Ident("SimplifyCFG"),
                Token::Newline,
                Token::RBrace,
                Token::Newline,
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            tokens("# header\nDCE # trailing\n"),
            [Token::Newline, Token::Ident("DCE"), Token::Newline]
        );
    }

    #[test]
    fn positions() {
        let mut lex = Lex::new("A\r\n  split-crit-edges {\n");

        assert_eq!(lex.next_token().map(|p| (p.line, p.col)), Some((1, 1)));
        assert_eq!(lex.next_token().map(|p| p.tok), Some(Token::Newline));

        let ident = lex.next_token().unwrap();

        assert_eq!(ident.tok, Token::Ident("split-crit-edges"));
        assert_eq!((ident.line, ident.col, ident.len), (2, 3, 16));
        assert_eq!(lex.peek_token().map(|p| (p.tok, p.col)), Some((Token::LBrace, 20)));
    }

    #[test]
    fn unknown() {
        assert_eq!(
            tokens("DCE, CSE"),
            [Token::Ident("DCE"), Token::Unknown(","), Token::Ident("CSE")]
        );
        assert_eq!(tokens("λ"), [Token::Unknown("λ")]);
    }
}

//! Very small hand-written lexer for the argument list of one script line.
//!
//! A line looks like `keyword: arg, arg, "quoted text", arg`.  The caller
//! splits off the head at the first `:`; this lexer only breaks the rest
//! into comma-separated `Field`s.  Fields are not interpreted here – the
//! grammar decides whether `48.8` is a latitude or `blue` a color.
//
//  Lexical items (informal):
//
//      Field    ::= Quoted | Bare
//      Quoted   ::= '"' [^"]* '"'     (no escapes; '"' inside text forbidden)
//      Bare     ::= [^,]*             (surrounding whitespace trimmed)
//      Sep      ::= ','
//
//  A quoted field may contain commas.  Anything but whitespace between a
//  closing quote and the next ',' is an error.

use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Bare(String),
    Quoted(String), // everything between " … "
}

impl Field {
    /// Text of an unquoted field, `None` for quoted ones.
    pub fn bare(&self) -> Option<&str> {
        match self {
            Field::Bare(s) => Some(s),
            Field::Quoted(_) => None,
        }
    }

    pub fn quoted(&self) -> Option<&str> {
        match self {
            Field::Quoted(s) => Some(s),
            Field::Bare(_) => None,
        }
    }
}

#[derive(Clone)]
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().peekable(),
            finished: false,
        }
    }

    fn next_char(&mut self) -> Option<char> {
        self.chars.next()
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn read_bare(&mut self) -> String {
        let mut buf = String::new();
        while let Some(c) = self.peek_char() {
            if c == ',' {
                break;
            }
            buf.push(c);
            self.next_char();
        }
        buf.trim_end().to_string()
    }

    fn read_quoted(&mut self) -> Result<String, String> {
        let mut txt = String::new();
        while let Some(c) = self.next_char() {
            if c == '"' {
                return Ok(txt);
            }
            txt.push(c);
        }
        Err("no closing \" found".to_string())
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Field, String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.skip_whitespace();

        let field = if self.peek_char() == Some('"') {
            self.next_char();
            match self.read_quoted() {
                Ok(text) => Field::Quoted(text),
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        } else {
            Field::Bare(self.read_bare())
        };

        self.skip_whitespace();
        match self.next_char() {
            Some(',') => {}
            None => self.finished = true,
            Some(c) => {
                self.finished = true;
                return Some(Err(format!("unexpected character {c:?} after field")));
            }
        }

        Some(Ok(field))
    }
}

/// Lex a whole argument list.
pub fn fields(src: &str) -> Result<Vec<Field>, String> {
    Lexer::new(src).collect()
}

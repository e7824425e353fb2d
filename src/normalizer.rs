//! Query normalization.
//!
//! Rewrites raw query text into the canonical form the parser splits on:
//! no insignificant whitespace, no comments, and the keyword operators
//! `in`, `match`, `asc` and `desc` padded with exactly one space on each side
//! whenever they stand in operator position. String literals are copied
//! verbatim, escape sequences included.
//!
//! A keyword is in operator position when it is a whole word and the previous
//! significant character ends an operand (an identifier, a literal, or a
//! closing bracket). Everywhere else the word is an ordinary identifier, so
//! `{desc}`, `x.in` and `$match` keep their meaning, and `fooasc` is never
//! split into `foo` + `asc`.
//!
//! Normalization is idempotent: a normalized query normalizes to itself.

use crate::error::NormalizeError;

/// Words that act as operators when they follow an operand.
const KEYWORDS: &[&str] = &["in", "match", "asc", "desc"];

pub struct Normalizer {
    input: Vec<char>,
    position: usize,
    output: String,
}

impl Normalizer {
    pub fn new(input: &str) -> Self {
        Normalizer {
            input: input.chars().collect(),
            position: 0,
            output: String::with_capacity(input.len()),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn copy_string(&mut self, quote: char) -> Result<(), NormalizeError> {
        let start = self.position;
        self.output.push(quote);
        self.advance();

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.output.push(c);
                    self.advance();
                    return Ok(());
                }
                '\\' => {
                    let escaped = self
                        .peek_char(1)
                        .ok_or(NormalizeError::UnterminatedString(start))?;
                    if escaped == 'u' {
                        return Err(NormalizeError::UnsupportedEscape(self.position));
                    }
                    self.output.push('\\');
                    self.output.push(escaped);
                    self.advance();
                    self.advance();
                }
                c => {
                    self.output.push(c);
                    self.advance();
                }
            }
        }

        Err(NormalizeError::UnterminatedString(start))
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        word
    }

    /// Does the output so far end with a complete operand?
    fn follows_operand(&self) -> bool {
        self.output
            .trim_end_matches(' ')
            .chars()
            .next_back()
            .is_some_and(|c| {
                c.is_alphanumeric() || matches!(c, '_' | ')' | ']' | '}' | '"' | '\'' | '@' | '^')
            })
    }

    pub fn normalize(mut self) -> Result<String, NormalizeError> {
        while let Some(ch) = self.current_char() {
            match ch {
                '"' | '\'' => self.copy_string(ch)?,
                '/' if self.peek_char(1) == Some('/') => self.skip_comment(),
                c if c.is_whitespace() => self.advance(),
                c if c.is_alphabetic() || c == '_' => {
                    let is_operator_position = self.follows_operand();
                    let word = self.read_word();
                    if is_operator_position && KEYWORDS.contains(&word.as_str()) {
                        if !self.output.ends_with(' ') {
                            self.output.push(' ');
                        }
                        self.output.push_str(&word);
                        self.output.push(' ');
                    } else {
                        self.output.push_str(&word);
                    }
                }
                c if c.is_ascii_digit() => {
                    // digits glue to following letters (`1e5`, `3in` is one word)
                    let word = self.read_word();
                    self.output.push_str(&word);
                }
                c => {
                    self.output.push(c);
                    self.advance();
                }
            }
        }

        Ok(self.output)
    }
}

/// Normalize a raw query string.
pub fn normalize(query: &str) -> Result<String, NormalizeError> {
    Normalizer::new(query).normalize()
}

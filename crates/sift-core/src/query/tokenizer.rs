//! Query tokenizer
//!
//! Splits a raw query into words and the four reserved operator characters.
//! Operators always stand alone, so `site:google` is three tokens.

use std::fmt;

/// Characters with grammatical meaning in a query.
pub const OPERATOR_CHARS: [char; 4] = [':', '"', '+', '-'];

/// One unit of a tokenized query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// Lowercased, punctuation-stripped term
    Word(String),
    /// `:` separating a metadata key from its value
    Colon,
    /// `+` conjunction
    Plus,
    /// `-` negation
    Minus,
    /// `"` opening or closing a phrase
    Quote,
}

impl Token {
    /// Map an operator character to its token.
    pub fn from_operator(c: char) -> Option<Token> {
        match c {
            ':' => Some(Token::Colon),
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '"' => Some(Token::Quote),
            _ => None,
        }
    }

    pub fn is_operator(&self) -> bool {
        !matches!(self, Token::Word(_))
    }

    pub fn as_word(&self) -> Option<&str> {
        match self {
            Token::Word(w) => Some(w),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(w) => write!(f, "{}", w),
            Token::Colon => write!(f, ":"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Quote => write!(f, "\""),
        }
    }
}

fn is_kept(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c.is_whitespace() || OPERATOR_CHARS.contains(&c)
}

/// Tokenize a query string.
///
/// The input is lowercased and stripped of everything except word characters,
/// whitespace and operators. Whitespace only separates tokens.
pub fn tokenize(query: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    for c in query.to_lowercase().chars().filter(|&c| is_kept(c)) {
        if let Some(op) = Token::from_operator(c) {
            if !word.is_empty() {
                tokens.push(Token::Word(std::mem::take(&mut word)));
            }
            tokens.push(op);
        } else if c.is_whitespace() {
            if !word.is_empty() {
                tokens.push(Token::Word(std::mem::take(&mut word)));
            }
        } else {
            word.push(c);
        }
    }

    if !word.is_empty() {
        tokens.push(Token::Word(word));
    }

    tokens
}

/// Tokenize and keep only the words, dropping every operator.
pub fn word_only_tokenize(query: &str) -> Vec<String> {
    tokenize(query)
        .into_iter()
        .filter_map(|tok| match tok {
            Token::Word(w) => Some(w),
            _ => None,
        })
        .collect()
}

use crate::compiler_frontend::compiler_errors::ErrorLocation;
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::str::Chars;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CharPosition {
    pub line_number: i32,
    pub char_column: i32,
}

/// Source span of a token or node.
/// Lines start at 1, columns at 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TextLocation {
    pub start_pos: CharPosition,
    pub end_pos: CharPosition,
}

impl TextLocation {
    pub fn new(start: CharPosition, end: CharPosition) -> Self {
        Self {
            start_pos: start,
            end_pos: end,
        }
    }

    pub fn new_just_line(line: i32) -> Self {
        Self {
            start_pos: CharPosition {
                line_number: line,
                char_column: 0,
            },
            end_pos: CharPosition {
                line_number: line,
                char_column: 120, // Arbitrary number
            },
        }
    }

    /// Spans from the start of this location to the end of another.
    pub fn to(self, end: TextLocation) -> TextLocation {
        TextLocation {
            start_pos: self.start_pos,
            end_pos: end.end_pos,
        }
    }

    pub fn to_error_location(&self, scope: &Path) -> ErrorLocation {
        ErrorLocation {
            scope: scope.to_path_buf(),
            start_pos: self.start_pos,
            end_pos: self.end_pos,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileTokens {
    pub src_path: PathBuf,
    pub tokens: Vec<Token>,
}

impl FileTokens {
    pub fn new(src_path: PathBuf, tokens: Vec<Token>) -> Self {
        Self { src_path, tokens }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: TextLocation,
}

impl Token {
    pub fn new(kind: TokenKind, location: TextLocation) -> Self {
        Self { kind, location }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} ({}:{})",
            self.kind, self.location.start_pos.line_number, self.location.start_pos.char_column
        )
    }
}

pub struct TokenStream<'a> {
    pub chars: Peekable<Chars<'a>>,
    pub position: CharPosition,
    pub start_position: CharPosition,
}

impl<'a> TokenStream<'a> {
    pub fn new(source_code: &'a str) -> Self {
        let position = CharPosition {
            line_number: 1,
            char_column: 0,
        };

        Self {
            chars: source_code.chars().peekable(),
            position,
            start_position: position,
        }
    }

    pub fn next(&mut self) -> Option<char> {
        match self.chars.peek() {
            Some(c) => {
                if *c == '\n' {
                    self.position.line_number += 1;
                    self.position.char_column = 0;
                } else {
                    self.position.char_column += 1;
                }

                self.chars.next()
            }

            None => None,
        }
    }

    pub fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    /// Consumes the next char if it matches.
    pub fn next_if_eq(&mut self, expected: char) -> bool {
        if self.peek() == Some(&expected) {
            self.next();
            return true;
        }

        false
    }

    pub fn new_location(&mut self) -> TextLocation {
        let start_pos = self.start_position;
        self.update_start_position();
        TextLocation::new(start_pos, self.position)
    }

    pub fn update_start_position(&mut self) {
        self.start_position = self.position;
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum TokenKind {
    Eof,

    Symbol(String),
    NumberLiteral(f64),
    StringLiteral(String),

    // Keywords
    Var,
    Function,
    Return,
    If,
    Else,
    While,
    Do,
    For,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    New,
    True,
    False,
    Null,
    This,
    Typeof,
    Delete,
    Void,
    Throw,

    // Punctuation
    OpenParenthesis,
    CloseParenthesis,
    OpenCurly,
    CloseCurly,
    OpenBracket,
    CloseBracket,
    Semicolon,
    Comma,
    Dot,
    QuestionMark,
    Colon,

    // Operators
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    ModulusAssign,
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
    Not,
    Increment,
    Decrement,
    And,
    Or,
}

impl TokenKind {
    pub fn from_keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "var" => TokenKind::Var,
            "function" => TokenKind::Function,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "for" => TokenKind::For,
            "switch" => TokenKind::Switch,
            "case" => TokenKind::Case,
            "default" => TokenKind::Default,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "new" => TokenKind::New,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            "this" => TokenKind::This,
            "typeof" => TokenKind::Typeof,
            "delete" => TokenKind::Delete,
            "void" => TokenKind::Void,
            "throw" => TokenKind::Throw,
            _ => return None,
        };

        Some(kind)
    }
}

use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::tokenizer::tokens::{FileTokens, Token, TokenKind, TokenStream};
use crate::projects::settings;
use crate::{return_syntax_error, token_log};
use std::path::Path;

#[macro_export]
macro_rules! return_token {
    ($kind:expr, $stream:expr $(,)?) => {
        return Ok(Token::new($kind, $stream.new_location()))
    };
}

pub fn tokenize(source_code: &str, src_path: &Path) -> Result<FileTokens, CompilerError> {
    let initial_capacity = source_code.len() / settings::SRC_TO_TOKEN_RATIO;

    let mut tokens: Vec<Token> = Vec::with_capacity(initial_capacity);
    let mut stream = TokenStream::new(source_code);

    loop {
        let token = get_token_kind(&mut stream)
            .map_err(|e| e.with_file_path(src_path.to_path_buf()))?;
        token_log!(#token);

        if token.kind == TokenKind::Eof {
            tokens.push(token);
            break;
        }

        tokens.push(token);
    }

    Ok(FileTokens::new(src_path.to_path_buf(), tokens))
}

pub fn get_token_kind(stream: &mut TokenStream) -> Result<Token, CompilerError> {
    skip_whitespace_and_comments(stream)?;
    stream.update_start_position();

    let current_char = match stream.next() {
        Some(ch) => ch,
        None => return_token!(TokenKind::Eof, stream),
    };

    // Names and keywords
    if is_name_start_char(current_char) {
        let mut token_value = String::from(current_char);
        while let Some(&ch) = stream.peek() {
            if !is_name_char(ch) {
                break;
            }
            token_value.push(ch);
            stream.next();
        }

        match TokenKind::from_keyword(&token_value) {
            Some(keyword) => return_token!(keyword, stream),
            None => return_token!(TokenKind::Symbol(token_value), stream),
        }
    }

    if current_char.is_ascii_digit() {
        return tokenize_number(current_char, stream);
    }

    if current_char == '"' || current_char == '\'' {
        return tokenize_string(current_char, stream);
    }

    let kind = match current_char {
        '(' => TokenKind::OpenParenthesis,
        ')' => TokenKind::CloseParenthesis,
        '{' => TokenKind::OpenCurly,
        '}' => TokenKind::CloseCurly,
        '[' => TokenKind::OpenBracket,
        ']' => TokenKind::CloseBracket,
        ';' => TokenKind::Semicolon,
        ',' => TokenKind::Comma,
        '.' => TokenKind::Dot,
        '?' => TokenKind::QuestionMark,
        ':' => TokenKind::Colon,

        '=' => {
            if stream.next_if_eq('=') {
                if stream.next_if_eq('=') {
                    TokenKind::StrictEqual
                } else {
                    TokenKind::Equal
                }
            } else {
                TokenKind::Assign
            }
        }

        '!' => {
            if stream.next_if_eq('=') {
                if stream.next_if_eq('=') {
                    TokenKind::StrictNotEqual
                } else {
                    TokenKind::NotEqual
                }
            } else {
                TokenKind::Not
            }
        }

        '<' => {
            if stream.next_if_eq('=') {
                TokenKind::LessThanOrEqual
            } else {
                TokenKind::LessThan
            }
        }

        '>' => {
            if stream.next_if_eq('=') {
                TokenKind::GreaterThanOrEqual
            } else {
                TokenKind::GreaterThan
            }
        }

        '+' => {
            if stream.next_if_eq('+') {
                TokenKind::Increment
            } else if stream.next_if_eq('=') {
                TokenKind::AddAssign
            } else {
                TokenKind::Add
            }
        }

        '-' => {
            if stream.next_if_eq('-') {
                TokenKind::Decrement
            } else if stream.next_if_eq('=') {
                TokenKind::SubtractAssign
            } else {
                TokenKind::Subtract
            }
        }

        '*' => {
            if stream.next_if_eq('=') {
                TokenKind::MultiplyAssign
            } else {
                TokenKind::Multiply
            }
        }

        '/' => {
            if stream.next_if_eq('=') {
                TokenKind::DivideAssign
            } else {
                TokenKind::Divide
            }
        }

        '%' => {
            if stream.next_if_eq('=') {
                TokenKind::ModulusAssign
            } else {
                TokenKind::Modulus
            }
        }

        '&' => {
            if stream.next_if_eq('&') {
                TokenKind::And
            } else {
                return_syntax_error!(
                    "Bitwise '&' is not supported",
                    stream.new_location().into(),
                    {
                        CompilationStage => "Tokenization",
                        PrimarySuggestion => "Did you mean the logical operator '&&'?",
                    }
                )
            }
        }

        '|' => {
            if stream.next_if_eq('|') {
                TokenKind::Or
            } else {
                return_syntax_error!(
                    "Bitwise '|' is not supported",
                    stream.new_location().into(),
                    {
                        CompilationStage => "Tokenization",
                        PrimarySuggestion => "Did you mean the logical operator '||'?",
                    }
                )
            }
        }

        _ => {
            return_syntax_error!(
                format!("Unexpected character '{current_char}'"),
                stream.new_location().into(),
                {
                    CompilationStage => "Tokenization",
                }
            )
        }
    };

    return_token!(kind, stream)
}

fn skip_whitespace_and_comments(stream: &mut TokenStream) -> Result<(), CompilerError> {
    loop {
        match stream.peek().copied() {
            Some(ch) if ch.is_whitespace() => {
                stream.next();
            }

            Some('/') => {
                // Need to look one char past the slash to know if this is a comment
                let mut lookahead = stream.chars.clone();
                lookahead.next();

                match lookahead.peek() {
                    Some('/') => {
                        while let Some(ch) = stream.next() {
                            if ch == '\n' {
                                break;
                            }
                        }
                    }

                    Some('*') => {
                        stream.update_start_position();
                        stream.next();
                        stream.next();

                        let mut previous = ' ';
                        loop {
                            match stream.next() {
                                Some('/') if previous == '*' => break,
                                Some(ch) => previous = ch,
                                None => {
                                    return_syntax_error!(
                                        "Unterminated block comment",
                                        stream.new_location().into(),
                                        {
                                            CompilationStage => "Tokenization",
                                            SuggestedInsertion => "*/",
                                        }
                                    )
                                }
                            }
                        }
                    }

                    _ => return Ok(()),
                }
            }

            _ => return Ok(()),
        }
    }
}

fn tokenize_number(first_digit: char, stream: &mut TokenStream) -> Result<Token, CompilerError> {
    let mut token_value = String::from(first_digit);
    let mut seen_dot = false;

    while let Some(&ch) = stream.peek() {
        if ch.is_ascii_digit() {
            token_value.push(ch);
            stream.next();
            continue;
        }

        // A dot is only part of the number if a digit follows it
        if ch == '.' && !seen_dot {
            let mut lookahead = stream.chars.clone();
            lookahead.next();
            if lookahead.peek().is_some_and(|next| next.is_ascii_digit()) {
                seen_dot = true;
                token_value.push(ch);
                stream.next();
                continue;
            }
        }

        break;
    }

    match token_value.parse::<f64>() {
        Ok(value) => return_token!(TokenKind::NumberLiteral(value), stream),
        Err(_) => {
            return_syntax_error!(
                format!("Invalid number literal '{token_value}'"),
                stream.new_location().into(),
                {
                    CompilationStage => "Tokenization",
                }
            )
        }
    }
}

fn tokenize_string(quote: char, stream: &mut TokenStream) -> Result<Token, CompilerError> {
    let mut token_value = String::new();

    while let Some(ch) = stream.next() {
        if ch == quote {
            return_token!(TokenKind::StringLiteral(token_value), stream);
        }

        if ch == '\n' {
            break;
        }

        if ch == '\\' {
            let escaped = match stream.next() {
                Some('n') => '\n',
                Some('t') => '\t',
                Some('r') => '\r',
                Some('0') => '\0',
                Some(other) => other,
                None => break,
            };
            token_value.push(escaped);
            continue;
        }

        token_value.push(ch);
    }

    return_syntax_error!(
        "Unterminated string literal",
        stream.new_location().into(),
        {
            CompilationStage => "Tokenization",
            PrimarySuggestion => "Close the string with a matching quote on the same line",
        }
    )
}

fn is_name_start_char(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

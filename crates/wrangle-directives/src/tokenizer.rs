//! Recipe step tokenizer.
//!
//! A step is a directive name followed by whitespace-separated arguments:
//!
//! - `:name` is a column name
//! - `'text'` or `"text"` is text (`\` escapes the next character)
//! - `12`, `-3.5` are numeric
//! - `true` / `false` are boolean
//! - `exp:{ ... }` is an expression (braces may nest)
//! - any other word is an identifier
//!
//! A trailing `;` is ignored.

use wrangle_model::{ParseError, Token};

/// A tokenized recipe step.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStep {
    pub directive: String,
    pub tokens: Vec<Token>,
}

/// Split `text` into a directive name and its argument tokens.
///
/// # Errors
///
/// Returns [`ParseError::EmptyStep`] for blank input and
/// [`ParseError::MalformedToken`] for unterminated quotes or expressions.
pub fn parse_step(text: &str) -> Result<ParsedStep, ParseError> {
    let text = text.trim();
    let text = text.strip_suffix(';').unwrap_or(text);
    let mut lexer = Lexer::new(text);

    let Some(directive) = lexer.next_word() else {
        return Err(ParseError::EmptyStep);
    };

    let mut tokens = Vec::new();
    loop {
        match lexer.next_token() {
            Ok(Some(token)) => tokens.push(token),
            Ok(None) => break,
            Err(LexError { token, reason }) => {
                return Err(ParseError::MalformedToken {
                    directive,
                    token,
                    reason: reason.to_string(),
                });
            }
        }
    }

    Ok(ParsedStep { directive, tokens })
}

#[derive(Debug)]
struct LexError {
    token: String,
    reason: &'static str,
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Next run of non-whitespace characters.
    fn next_word(&mut self) -> Option<String> {
        self.skip_whitespace();
        let start = self.pos;
        while self.peek().is_some_and(|ch| !ch.is_whitespace()) {
            self.bump();
        }
        (self.pos > start).then(|| self.input[start..self.pos].to_string())
    }

    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();
        let Some(first) = self.peek() else {
            return Ok(None);
        };

        if first == '\'' || first == '"' {
            return self.quoted(first).map(|text| Some(Token::Text(text)));
        }
        if self.rest().starts_with("exp:{") {
            return self.expression().map(|body| Some(Token::Expression(body)));
        }

        let Some(word) = self.next_word() else {
            return Ok(None);
        };
        if let Some(name) = word.strip_prefix(':') {
            if name.is_empty() {
                return Err(LexError {
                    token: word,
                    reason: "empty column name",
                });
            }
            return Ok(Some(Token::ColumnName(name.to_string())));
        }
        Ok(Some(classify_word(word)))
    }

    fn quoted(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        while let Some(ch) = self.bump() {
            match ch {
                '\\' => {
                    if let Some(escaped) = self.bump() {
                        out.push(escaped);
                    }
                }
                c if c == quote => return Ok(out),
                c => out.push(c),
            }
        }
        Err(LexError {
            token: self.input[start..].to_string(),
            reason: "unterminated quote",
        })
    }

    fn expression(&mut self) -> Result<String, LexError> {
        let start = self.pos;
        self.pos += "exp:{".len();
        let body_start = self.pos;
        let mut depth = 1usize;
        while let Some(ch) = self.bump() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let body = &self.input[body_start..self.pos - 1];
                        return Ok(body.trim().to_string());
                    }
                }
                _ => {}
            }
        }
        Err(LexError {
            token: self.input[start..].to_string(),
            reason: "unterminated expression",
        })
    }
}

fn classify_word(word: String) -> Token {
    match word.as_str() {
        "true" => return Token::Bool(true),
        "false" => return Token::Bool(false),
        _ => {}
    }
    if looks_numeric(&word) {
        if let Ok(value) = word.parse::<f64>() {
            return Token::Numeric(value);
        }
    }
    Token::Identifier(word)
}

fn looks_numeric(word: &str) -> bool {
    let digits = word.strip_prefix(['-', '+']).unwrap_or(word);
    digits.starts_with(|ch: char| ch.is_ascii_digit())
        || (digits.starts_with('.') && digits[1..].starts_with(|ch: char| ch.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_every_kind() {
        let step = parse_step(
            r#"demo :col 'it\'s' "dq" 42 -1.5 true exp:{ a + {b} } word;"#,
        )
        .unwrap();
        assert_eq!(step.directive, "demo");
        assert_eq!(
            step.tokens,
            vec![
                Token::ColumnName("col".into()),
                Token::Text("it's".into()),
                Token::Text("dq".into()),
                Token::Numeric(42.0),
                Token::Numeric(-1.5),
                Token::Bool(true),
                Token::Expression("a + {b}".into()),
                Token::Identifier("word".into()),
            ]
        );
    }

    #[test]
    fn blank_step_is_rejected() {
        assert_eq!(parse_step("   ;").unwrap_err(), ParseError::EmptyStep);
    }

    #[test]
    fn unterminated_tokens_are_malformed() {
        let error = parse_step("swap :a 'open").unwrap_err();
        assert_eq!(
            error,
            ParseError::MalformedToken {
                directive: "swap".into(),
                token: "'open".into(),
                reason: "unterminated quote".into(),
            }
        );

        let error = parse_step("filter exp:{ a > 1").unwrap_err();
        assert!(matches!(error, ParseError::MalformedToken { reason, .. } if reason == "unterminated expression"));
    }

    #[test]
    fn bare_colon_is_malformed() {
        let error = parse_step("swap : :b").unwrap_err();
        assert!(matches!(error, ParseError::MalformedToken { token, .. } if token == ":"));
    }

    #[test]
    fn words_that_only_start_like_numbers_stay_identifiers() {
        let step = parse_step("x 1st - .5").unwrap();
        assert_eq!(
            step.tokens,
            vec![
                Token::Identifier("1st".into()),
                Token::Identifier("-".into()),
                Token::Numeric(0.5),
            ]
        );
    }
}

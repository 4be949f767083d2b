use super::SignatureHeader;
use logos::{Lexer, Logos, Span};
use miette::Diagnostic;
use thiserror::Error;

/// Signature header parsing error
#[derive(Debug, Diagnostic, Error)]
pub enum ParseError {
    /// Signature value failed to decode
    #[error(transparent)]
    Base64(#[from] base64_simd::Error),

    /// A parameter carried an empty value
    #[error("Empty parameter value")]
    EmptyValue,

    /// Input didn't conform to the `key="value"` pair grammar
    #[error("Malformed signature header")]
    MalformedInput,

    /// One of `keyId`, `algorithm`, `headers`, `signature` is missing
    #[error("Missing required parameter")]
    MissingParameter,
}

#[derive(Debug, Logos)]
enum TokenTy {
    #[regex(r"\w+")]
    Key,

    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#)]
    Value,

    #[token(",")]
    Comma,
}

#[derive(Debug)]
struct Token {
    pub ty: TokenTy,
    pub span: Span,
}

impl Token {
    pub fn lex(input: &str) -> impl Iterator<Item = Result<Token, ()>> + '_ {
        Lexer::<'_, TokenTy>::new(input)
            .spanned()
            .map(|(ty, span)| ty.map(|ty| Token { ty, span }))
    }
}

macro_rules! ensure {
    ($self:expr, $value:expr, $pattern:pat) => {{
        let Ok(value) = $value else {
            $self.is_broken = true;
            return Some(Err(()));
        };

        if !matches!(value.ty, $pattern) {
            $self.is_broken = true;
            return Some(Err(()));
        }

        value
    }};
}

macro_rules! expect_next {
    ($self:expr) => {{
        let Some(token) = $self.inner.next() else {
            $self.is_broken = true;
            return Some(Err(()));
        };

        token
    }};
}

struct ParseIter<'a, I> {
    /// Stream of tokens wrapped into a result
    inner: I,

    /// Reference to the original input that was fed to the lexer
    input: &'a str,

    /// Marker whether we encountered any error or illegal token
    ///
    /// If we did, the iterator will stop yielding any results
    is_broken: bool,

    /// Whether the next pair is the first one (no leading comma)
    is_first: bool,
}

impl<'a, I> Iterator for ParseIter<'a, I>
where
    I: Iterator<Item = Result<Token, ()>>,
{
    type Item = Result<(&'a str, &'a str), ()>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_broken {
            return None;
        }

        let key = if self.is_first {
            self.is_first = false;
            ensure!(self, self.inner.next()?, TokenTy::Key)
        } else {
            // A separating comma commits the input to another pair.
            // A dangling comma or any other trailing token is rejected.
            ensure!(self, self.inner.next()?, TokenTy::Comma);
            ensure!(self, expect_next!(self), TokenTy::Key)
        };

        ensure!(self, expect_next!(self), TokenTy::Equals);
        let value = ensure!(self, expect_next!(self), TokenTy::Value);

        let key = &self.input[key.span];
        let value = self.input[value.span].trim_matches('"');

        Some(Ok((key, value)))
    }
}

/// Parse a cavage `Signature` header into its structured form
///
/// The tokenizer is strict: trailing input, unquoted values and
/// malformed pairs poison the parse instead of being skipped over.
/// Unknown parameters are ignored.
pub fn parse(input: &str) -> Result<SignatureHeader<'_>, ParseError> {
    let kv_iter = ParseIter {
        inner: Token::lex(input),
        input,
        is_broken: false,
        is_first: true,
    };

    let mut key_id = None;
    let mut algorithm = None;
    let mut headers = None;
    let mut signature = None;

    for kv in kv_iter {
        let (key, value) = kv.map_err(|()| ParseError::MalformedInput)?;
        if value.is_empty() {
            return Err(ParseError::EmptyValue);
        }

        match key {
            "keyId" => key_id = Some(value),
            "algorithm" => algorithm = Some(value),
            "headers" => headers = Some(value.split_whitespace().collect::<Vec<_>>()),
            "signature" => signature = Some(base64_simd::STANDARD.decode_to_vec(value)?),
            _ => continue,
        }
    }

    let headers = headers.ok_or(ParseError::MissingParameter)?;
    if headers.is_empty() {
        return Err(ParseError::EmptyValue);
    }

    Ok(SignatureHeader {
        key_id: key_id.ok_or(ParseError::MissingParameter)?,
        algorithm: algorithm.ok_or(ParseError::MissingParameter)?,
        headers,
        signature: signature.ok_or(ParseError::MissingParameter)?,
    })
}

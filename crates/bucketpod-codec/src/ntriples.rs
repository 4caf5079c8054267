//! Line-oriented N-Triples reader and writer.
//!
//! The reader also accepts two Turtle conveniences that sidecars written by
//! hand tend to contain: `#` comment lines and relative IRIs, which are
//! resolved against the base passed to [`parse`].

use std::fmt::Write as _;

use bucketpod_types::{Term, Triple};

use crate::error::{CodecError, CodecResult};

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Serialize triples, one statement per line.
pub fn write(triples: &[Triple]) -> String {
    let mut out = String::new();
    for t in triples {
        write_term(&mut out, &t.subject);
        out.push(' ');
        write_iri(&mut out, &t.predicate);
        out.push(' ');
        write_term(&mut out, &t.object);
        out.push_str(" .\n");
    }
    out
}

fn write_term(out: &mut String, term: &Term) {
    match term {
        Term::NamedNode { value } => write_iri(out, value),
        Term::BlankNode { value } => {
            out.push_str("_:");
            out.push_str(value);
        }
        Term::Literal {
            value,
            datatype,
            language,
        } => {
            out.push('"');
            for c in value.chars() {
                match c {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    '\t' => out.push_str("\\t"),
                    c if c.is_control() => {
                        let _ = write!(out, "\\u{:04X}", c as u32);
                    }
                    c => out.push(c),
                }
            }
            out.push('"');
            if let Some(lang) = language {
                out.push('@');
                out.push_str(lang);
            } else if let Some(dt) = datatype {
                out.push_str("^^");
                write_iri(out, dt);
            }
        }
    }
}

fn write_iri(out: &mut String, iri: &str) {
    out.push('<');
    for c in iri.chars() {
        if c <= ' ' || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\') {
            let _ = write!(out, "\\u{:04X}", c as u32);
        } else {
            out.push(c);
        }
    }
    out.push('>');
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Parse a document, resolving relative IRIs against `base`.
pub fn parse(input: &str, base: &str) -> CodecResult<Vec<Triple>> {
    let mut triples = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let mut cursor = Cursor {
            chars: line.chars().collect(),
            pos: 0,
            line: idx + 1,
            base,
        };
        cursor.skip_ws();
        if cursor.at_end() || cursor.peek() == Some('#') {
            continue;
        }
        triples.push(cursor.statement()?);
    }
    Ok(triples)
}

struct Cursor<'a> {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    base: &'a str,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn error(&self, reason: impl Into<String>) -> CodecError {
        CodecError::parse(self.line, reason)
    }

    fn expect(&mut self, expected: char) -> CodecResult<()> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.error(format!("expected {expected:?}, found {c:?}"))),
            None => Err(self.error(format!("expected {expected:?}, found end of line"))),
        }
    }

    fn statement(&mut self) -> CodecResult<Triple> {
        let subject = match self.peek() {
            Some('<') => Term::named(self.iri()?),
            Some('_') => self.blank()?,
            _ => return Err(self.error("subject must be an IRI or blank node")),
        };
        self.skip_ws();
        if self.peek() != Some('<') {
            return Err(self.error("predicate must be an IRI"));
        }
        let predicate = self.iri()?;
        self.skip_ws();
        let object = match self.peek() {
            Some('<') => Term::named(self.iri()?),
            Some('_') => self.blank()?,
            Some('"') => self.literal()?,
            _ => return Err(self.error("object must be an IRI, blank node, or literal")),
        };
        self.skip_ws();
        self.expect('.')?;
        self.skip_ws();
        if !(self.at_end() || self.peek() == Some('#')) {
            return Err(self.error("trailing characters after statement"));
        }
        Ok(Triple::new(subject, predicate, object))
    }

    fn iri(&mut self) -> CodecResult<String> {
        self.expect('<')?;
        let mut raw = String::new();
        loop {
            match self.bump() {
                Some('>') => break,
                Some('\\') => raw.push(self.unicode_escape()?),
                Some(c) if c == ' ' || c == '<' || c == '"' => {
                    return Err(self.error(format!("character {c:?} not allowed in IRI")))
                }
                Some(c) => raw.push(c),
                None => return Err(self.error("unterminated IRI")),
            }
        }
        Ok(resolve(self.base, &raw))
    }

    fn blank(&mut self) -> CodecResult<Term> {
        self.expect('_')?;
        self.expect(':')?;
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_' || c == '-') {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("empty blank node label"));
        }
        Ok(Term::blank(self.chars[start..self.pos].iter().collect::<String>()))
    }

    fn literal(&mut self) -> CodecResult<Term> {
        self.expect('"')?;
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => {
                    let c = match self.peek() {
                        Some('t') => '\t',
                        Some('b') => '\u{8}',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('f') => '\u{c}',
                        Some('"') => '"',
                        Some('\'') => '\'',
                        Some('\\') => '\\',
                        Some('u') | Some('U') => {
                            value.push(self.unicode_escape()?);
                            continue;
                        }
                        _ => return Err(self.error("invalid escape in literal")),
                    };
                    self.pos += 1;
                    value.push(c);
                }
                Some(c) => value.push(c),
                None => return Err(self.error("unterminated literal")),
            }
        }
        match self.peek() {
            Some('@') => {
                self.pos += 1;
                let start = self.pos;
                while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '-') {
                    self.pos += 1;
                }
                if self.pos == start {
                    return Err(self.error("empty language tag"));
                }
                let lang: String = self.chars[start..self.pos].iter().collect();
                Ok(Term::lang(value, lang))
            }
            Some('^') => {
                self.pos += 1;
                self.expect('^')?;
                let dt = self.iri()?;
                Ok(Term::typed(value, dt))
            }
            _ => Ok(Term::literal(value)),
        }
    }

    /// Reads `uXXXX` or `UXXXXXXXX`; the backslash is already consumed.
    fn unicode_escape(&mut self) -> CodecResult<char> {
        let width = match self.bump() {
            Some('u') => 4,
            Some('U') => 8,
            _ => return Err(self.error("expected \\u or \\U escape")),
        };
        if self.pos + width > self.chars.len() {
            return Err(self.error("truncated unicode escape"));
        }
        let hex: String = self.chars[self.pos..self.pos + width].iter().collect();
        self.pos += width;
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error(format!("invalid unicode escape {hex:?}")))
    }
}

/// Resolve `iri` against `base`.
///
/// Absolute IRIs (with a scheme) and absolute paths are returned unchanged;
/// `<>` is the base itself, `<#x>` is a fragment of it, anything else is
/// relative to the base's last `/`.
fn resolve(base: &str, iri: &str) -> String {
    if base.is_empty() || has_scheme(iri) || iri.starts_with('/') {
        return iri.to_string();
    }
    if iri.is_empty() {
        return base.to_string();
    }
    if iri.starts_with('#') {
        let stem = base.split('#').next().unwrap_or(base);
        return format!("{stem}{iri}");
    }
    match base.rfind('/') {
        Some(pos) => format!("{}{iri}", &base[..=pos]),
        None => iri.to_string(),
    }
}

fn has_scheme(iri: &str) -> bool {
    match iri.find(':') {
        Some(pos) if pos > 0 => {
            let scheme = &iri[..pos];
            scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

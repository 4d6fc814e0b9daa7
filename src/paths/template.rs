//! Path template evaluation.
//!
//! Supports the subset of the `$field` template language that library path
//! configurations use in practice:
//!
//! - `$field` and `${field}` substitute a metadata field
//! - `$$`, `$%` and `$,` produce a literal `$`, `%` and `,`
//! - `%func{arg,...}` calls one of the built-in functions below
//!
//! Functions: `lower`, `upper`, `title`, `left{text,n}`, `right{text,n}`,
//! `if{cond,then[,else]}`, `ifdef{field[,then[,else]]}` and
//! `aunique`/`sunique` (always empty, disambiguation needs the whole
//! library). Unknown functions evaluate to their first argument and unknown
//! fields are kept verbatim, so a malformed template still produces a usable
//! path.

use super::sanitize_component;

/// Provides field values to the template evaluator.
pub trait FieldSource {
    /// Value of `name`, or `None` if the field is unknown.
    fn field(&self, name: &str) -> Option<String>;
}

impl<F> FieldSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn field(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Evaluate `template` against `fields`.
///
/// Substituted values are sanitized as single path components, so a value
/// such as `AC/DC` never introduces an extra directory level.
pub fn evaluate(template: &str, fields: &dyn FieldSource) -> String {
    let chars: Vec<char> = template.chars().collect();
    let mut evaluator = Evaluator {
        chars: &chars,
        pos: 0,
        fields,
    };
    evaluator.expression(&[])
}

struct Evaluator<'a> {
    chars: &'a [char],
    pos: usize,
    fields: &'a dyn FieldSource,
}

impl Evaluator<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Evaluate until the end of input or one of `stop` (not consumed).
    fn expression(&mut self, stop: &[char]) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if stop.contains(&c) {
                break;
            }
            match c {
                '$' => self.substitution(&mut out),
                '%' => self.call(&mut out),
                _ => {
                    out.push(c);
                    self.pos += 1;
                }
            }
        }
        out
    }

    fn identifier(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn lookup(&self, name: &str) -> Option<String> {
        self.fields.field(name).map(|v| sanitize_component(&v))
    }

    fn substitution(&mut self, out: &mut String) {
        self.pos += 1;
        match self.peek() {
            Some(c @ ('$' | '%' | ',')) => {
                out.push(c);
                self.pos += 1;
            }
            Some('{') => {
                let close = self.chars[self.pos..].iter().position(|&c| c == '}');
                let name: Option<String> = close
                    .map(|len| self.chars[self.pos + 1..self.pos + len].iter().collect())
                    .filter(|n: &String| {
                        !n.is_empty() && n.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                    });
                match (name, close) {
                    (Some(name), Some(len)) => {
                        self.pos += len + 1;
                        match self.lookup(&name) {
                            Some(value) => out.push_str(&value),
                            None => {
                                out.push_str("${");
                                out.push_str(&name);
                                out.push('}');
                            }
                        }
                    }
                    _ => out.push('$'),
                }
            }
            Some(c) if c.is_ascii_alphanumeric() || c == '_' => {
                let name = self.identifier();
                match self.lookup(&name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('$');
                        out.push_str(&name);
                    }
                }
            }
            _ => out.push('$'),
        }
    }

    fn call(&mut self, out: &mut String) {
        self.pos += 1;
        let name = self.identifier();
        if name.is_empty() || self.peek() != Some('{') {
            out.push('%');
            out.push_str(&name);
            return;
        }
        self.pos += 1;

        let mut args = Vec::new();
        loop {
            args.push(self.expression(&[',', '}']));
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                _ => {
                    // Unterminated call: keep the text as written.
                    out.push('%');
                    out.push_str(&name);
                    out.push('{');
                    out.push_str(&args.join(","));
                    return;
                }
            }
        }

        out.push_str(&self.apply(&name, &args));
    }

    fn apply(&self, name: &str, args: &[String]) -> String {
        let arg = |i: usize| args.get(i).map(String::as_str).unwrap_or("");
        match name {
            "lower" => arg(0).to_lowercase(),
            "upper" => arg(0).to_uppercase(),
            "title" => title_case(arg(0)),
            "left" => match arg(1).trim().parse::<usize>() {
                Ok(n) => arg(0).chars().take(n).collect(),
                Err(_) => arg(0).to_string(),
            },
            "right" => match arg(1).trim().parse::<usize>() {
                Ok(n) => {
                    let count = arg(0).chars().count();
                    arg(0).chars().skip(count.saturating_sub(n)).collect()
                }
                Err(_) => arg(0).to_string(),
            },
            "if" => {
                if is_truthy(arg(0)) {
                    arg(1).to_string()
                } else {
                    arg(2).to_string()
                }
            }
            "ifdef" => {
                let value = self.lookup(arg(0).trim()).filter(|v| !v.is_empty());
                match value {
                    Some(value) if args.len() < 2 => value,
                    Some(_) => arg(1).to_string(),
                    None => arg(2).to_string(),
                }
            }
            "aunique" | "sunique" => String::new(),
            _ => arg(0).to_string(),
        }
    }
}

fn is_truthy(condition: &str) -> bool {
    let condition = condition.trim();
    match condition.parse::<i64>() {
        Ok(n) => n != 0,
        Err(_) => !condition.is_empty() && !condition.eq_ignore_ascii_case("false"),
    }
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    out
}

//! Lexical recognizer for Python list-of-strings literals
//!
//! Accepts what `ast.literal_eval` would turn into a `list` of `str`: string
//! literals with optional `r`/`u` prefixes, single or triple quotes, escapes,
//! implicit concatenation, trailing commas, comments and redundant
//! parentheses around the list or its elements. Nothing is ever evaluated.

struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Whitespace, newlines and `#` comments
    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += 1;
            } else if c == '#' {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn take_hex(&mut self, digits: usize) -> Option<u32> {
        let mut value: u32 = 0;
        for _ in 0..digits {
            let digit = self.bump()?.to_digit(16)?;
            value = value.checked_mul(16)?.checked_add(digit)?;
        }
        Some(value)
    }

    /// Escape sequence after a backslash in a non-raw string
    fn escape(&mut self) -> Option<()> {
        match self.bump()? {
            'x' => self.take_hex(2).map(|_| ()),
            'u' => self.take_hex(4).map(|_| ()),
            'U' => self.take_hex(8).filter(|v| char::from_u32(*v).is_some()).map(|_| ()),
            'N' => {
                if !self.eat('{') {
                    return None;
                }
                let mut name_len = 0;
                loop {
                    match self.bump()? {
                        '}' if name_len > 0 => return Some(()),
                        '}' | '\n' => return None,
                        _ => name_len += 1,
                    }
                }
            }
            _ => Some(()),
        }
    }

    /// One string literal including its prefix
    fn string_literal(&mut self) -> Option<()> {
        let mut raw = false;

        if let Some(c) = self.peek().filter(|c| c.is_alphabetic()) {
            match c {
                'r' | 'R' => raw = true,
                'u' | 'U' => {}
                _ => return None,
            }
            self.pos += 1;
        }

        let quote = self.bump().filter(|c| *c == '\'' || *c == '"')?;
        let triple = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if triple {
            self.pos += 2;
        }

        loop {
            let c = self.bump()?;

            if c == '\\' {
                if raw {
                    self.bump()?;
                } else {
                    self.escape()?;
                }
                continue;
            }

            if c == quote {
                if !triple {
                    return Some(());
                }
                if self.peek() == Some(quote) && self.peek_at(1) == Some(quote) {
                    self.pos += 2;
                    return Some(());
                }
                continue;
            }

            if !triple && (c == '\n' || c == '\r') {
                return None;
            }
        }
    }

    fn starts_string(&self) -> bool {
        match self.peek() {
            Some('\'' | '"') => true,
            Some('r' | 'R' | 'u' | 'U') => matches!(self.peek_at(1), Some('\'' | '"')),
            _ => false,
        }
    }

    /// Adjacent literals concatenate into one element
    fn string_element(&mut self) -> Option<()> {
        self.string_literal()?;
        loop {
            self.skip_trivia();
            if !self.starts_string() {
                return Some(());
            }
            self.string_literal()?;
        }
    }

    /// A string element, possibly wrapped in grouping parentheses
    fn element(&mut self) -> Option<()> {
        if self.eat('(') {
            self.skip_trivia();
            self.element()?;
            self.skip_trivia();
            return self.eat(')').then_some(());
        }

        self.string_element()
    }

    fn list(&mut self) -> Option<()> {
        if !self.eat('[') {
            return None;
        }

        self.skip_trivia();
        if self.eat(']') {
            return Some(());
        }

        loop {
            self.element()?;
            self.skip_trivia();

            if self.eat(']') {
                return Some(());
            }
            if !self.eat(',') {
                return None;
            }

            self.skip_trivia();
            if self.eat(']') {
                return Some(());
            }
        }
    }

    fn expression(&mut self) -> Option<()> {
        self.skip_trivia();

        if self.eat('(') {
            self.expression()?;
            self.skip_trivia();
            return self.eat(')').then_some(());
        }

        self.list()
    }
}

/// True if `source` is a Python list literal whose elements are all strings
pub fn is_string_list_literal(source: &str) -> bool {
    let mut cursor = Cursor::new(source);

    if cursor.expression().is_none() {
        return false;
    }

    cursor.skip_trivia();
    cursor.at_end()
}

/// Forward-only position over a section's lines.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    lines: &'a [String],
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(lines: &'a [String]) -> Self {
        Self { lines, pos: 0 }
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).map(String::as_str)
    }

    pub fn advance(&mut self) {
        self.advance_by(1);
    }

    /// Never moves past the end.
    pub fn advance_by(&mut self, count: usize) {
        self.pos = (self.pos + count).min(self.lines.len());
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// Lines from the cursor to the end of the section.
    pub fn remaining(&self) -> &'a [String] {
        &self.lines[self.pos..]
    }
}

//! Continuation-token stack for paged listings

/// Forward/backward paging state of one listing.
///
/// The bottom element is always the empty first-page token, so the stack is
/// never empty and [`current`](Self::current) always has an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorStack {
    tokens: Vec<String>,
}

impl Default for CursorStack {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorStack {
    pub fn new() -> Self {
        Self {
            tokens: vec![String::new()],
        }
    }

    /// Token of the page currently shown
    pub fn current(&self) -> &str {
        self.tokens.last().map(String::as_str).unwrap_or("")
    }

    /// Advance to the page behind `token`. Empty tokens (no more results)
    /// are ignored; returns whether the stack moved.
    pub fn push(&mut self, token: impl Into<String>) -> bool {
        let token = token.into();
        if token.is_empty() {
            return false;
        }
        self.tokens.push(token);
        true
    }

    /// Step back one page. Never removes the first-page token; returns
    /// whether the stack moved.
    pub fn pop(&mut self) -> bool {
        if self.tokens.len() > 1 {
            self.tokens.pop();
            true
        } else {
            false
        }
    }

    /// Back to the first page
    pub fn reset(&mut self) {
        self.tokens.truncate(1);
        if let Some(first) = self.tokens.first_mut() {
            first.clear();
        }
    }

    /// One-based number of the page currently shown
    pub fn page_number(&self) -> usize {
        self.tokens.len()
    }

    pub fn has_previous(&self) -> bool {
        self.tokens.len() > 1
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

//! Bounded buffer for the keystrokes of one mode run
//!
//! Holds rendered fragments rather than raw codes so the logged line is
//! exactly what was measured against the bound. Once the bound is reached
//! further characters are dropped, not buffered; a fragment that only partly
//! fits is cut at the character level.

/// Escaped keystrokes of the current uninterrupted state run
#[derive(Debug, Clone)]
pub struct RunBuffer {
    /// Rendered fragments in push order
    fragments: Vec<String>,

    /// Total characters across all fragments
    len: usize,

    /// Maximum characters kept
    max_len: usize,

    /// Whether anything was dropped since the last clear
    truncated: bool,
}

impl RunBuffer {
    /// Create an empty buffer holding at most `max_len` characters
    pub fn new(max_len: usize) -> Self {
        Self {
            fragments: Vec::new(),
            len: 0,
            max_len,
            truncated: false,
        }
    }

    /// Append a rendered fragment, keeping only what fits
    ///
    /// Returns the number of characters kept.
    pub fn push(&mut self, rendered: &str) -> usize {
        let room = self.max_len - self.len;
        let count = rendered.chars().count();

        if count <= room {
            if count > 0 {
                self.fragments.push(rendered.to_string());
                self.len += count;
            }
            return count;
        }

        self.truncated = true;
        if room > 0 {
            self.fragments.push(rendered.chars().take(room).collect());
            self.len += room;
        }
        room
    }

    /// The buffered run as one string
    pub fn contents(&self) -> String {
        self.fragments.concat()
    }

    /// Fragments in push order (the last one may be cut short)
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Number of buffered characters
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether characters were dropped since the last clear
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Maximum number of characters kept
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Drop everything and reset the truncation flag
    pub fn clear(&mut self) {
        self.fragments.clear();
        self.len = 0;
        self.truncated = false;
    }

    /// Take the buffered run, leaving the buffer empty
    pub fn take(&mut self) -> String {
        let contents = self.contents();
        self.clear();
        contents
    }
}

impl Default for RunBuffer {
    fn default() -> Self {
        Self::new(cmdlog_config::DEFAULT_MAX_RUN_LEN)
    }
}

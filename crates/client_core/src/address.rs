/// The shareable address of the current view, reduced to its query string.
///
/// Writes record a history entry; they never trigger a reload.
pub trait AddressState: Send {
    /// Current query string, without the leading `?`.
    fn read(&self) -> String;
    fn push(&mut self, query: &str);
}

/// In-memory browser-style history for one path.
#[derive(Debug, Clone)]
pub struct HistoryAddress {
    path: String,
    entries: Vec<String>,
    cursor: usize,
}

impl HistoryAddress {
    pub fn new(path: impl Into<String>, initial_query: &str) -> Self {
        Self {
            path: path.into(),
            entries: vec![initial_query.trim_start_matches('?').to_string()],
            cursor: 0,
        }
    }

    pub fn href(&self) -> String {
        let query = self.read();
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{query}", self.path)
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }
}

impl AddressState for HistoryAddress {
    fn read(&self) -> String {
        self.entries[self.cursor].clone()
    }

    fn push(&mut self, query: &str) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(query.to_string());
        self.cursor = self.entries.len() - 1;
    }
}

#[cfg(test)]
#[path = "tests/address_tests.rs"]
mod tests;

//! Info/log sink: the ordered selection log and the live info-panel record.

use std::collections::VecDeque;

use serde_json::Value;

use crate::scene::Node;

/// One logged line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Category shown next to the message (e.g. `"Selected"`).
    pub category: String,
    /// Message text.
    pub message: String,
}

/// Bounded, ordered log for the info panel.
///
/// Every entry is also forwarded to the `log` facade at info level.
#[derive(Debug, Clone)]
pub struct InfoLogger {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for InfoLogger {
    fn default() -> Self {
        Self::new(256)
    }
}

impl InfoLogger {
    /// Logger keeping at most `capacity` entries (oldest dropped first).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
        }
    }

    /// Append a message under `category`.
    pub fn add(&mut self, message: &str, category: &str) {
        log::info!("[{category}] {message}");
        if self.entries.len() == self.capacity {
            let _ = self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            category: category.to_owned(),
            message: message.to_owned(),
        });
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Most recent entry.
    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// Entries with the given category, oldest first.
    pub fn in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a LogEntry> + 'a {
        self.entries.iter().filter(move |e| e.category == category)
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Live display record for the object under inspection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedObjectInfo {
    /// Object name, empty when nothing is shown.
    pub name: String,
    /// `(key, value)` pairs from the object's scalar custom properties.
    pub attributes: Vec<(String, String)>,
}

impl SelectedObjectInfo {
    /// Record describing `node`.
    #[must_use]
    pub fn from_node(node: &Node) -> Self {
        Self {
            name: node.name.clone(),
            attributes: scalar_properties(node),
        }
    }

    /// Reset to the empty record.
    pub fn clear(&mut self) {
        self.name.clear();
        self.attributes.clear();
    }

    /// Whether nothing is shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.attributes.is_empty()
    }
}

/// String, number and bool custom properties of a node, formatted for
/// display.
#[must_use]
pub fn scalar_properties(node: &Node) -> Vec<(String, String)> {
    node.user_data
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.clone(), text))
        })
        .collect()
}

/// Log line for a selection: `name with k=v, k2=v2`.
///
/// Only string and number properties are included.
#[must_use]
pub fn selection_message(node: &Node) -> String {
    let props: Vec<String> = node
        .user_data
        .iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some(format!("{key}={s}")),
            Value::Number(n) => Some(format!("{key}={n}")),
            _ => None,
        })
        .collect();
    if props.is_empty() {
        node.name.clone()
    } else {
        format!("{} with {}", node.name, props.join(", "))
    }
}

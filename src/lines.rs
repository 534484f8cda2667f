//! Line deduplication by whole line or by delimited field.

use crate::queue::DedupQueue;

/// How to derive the deduplication key of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpec {
    /// 1-based field index. `None` keys on the whole line.
    pub field: Option<usize>,
    pub delimiter: char,
}

impl Default for KeySpec {
    fn default() -> Self {
        Self {
            field: None,
            delimiter: '\t',
        }
    }
}

impl KeySpec {
    /// Key of `line`. A line with fewer fields than `field` is keyed on
    /// the whole line.
    pub fn key(&self, line: &str) -> String {
        match self.field {
            Some(n) if n > 0 => line
                .split(self.delimiter)
                .nth(n - 1)
                .unwrap_or(line)
                .to_string(),
            _ => line.to_string(),
        }
    }
}

/// Keep the first line for each key, in input order.
pub fn unique_lines<I>(lines: I, spec: KeySpec) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut queue = DedupQueue::empty(move |line: &String| spec.key(line)).with_name("lines");
    queue.extend(lines);

    let mut out = Vec::with_capacity(queue.len());
    queue.process(|_, line| out.push(line));
    out
}

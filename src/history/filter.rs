use std::collections::HashMap;

use crate::model::Record;

/// Group records by the qualifier before the first `#` or `.` in their name.
///
/// Keys keep first-seen order and each group keeps the records in their
/// original order, so the dropdown renders deterministically. A name without
/// a separator groups under itself.
pub fn group_by_qualifier(records: &[Record]) -> Vec<(String, Vec<usize>)> {
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();

    for (idx, record) in records.iter().enumerate() {
        let key = record
            .name
            .split(['#', '.'])
            .next()
            .unwrap_or(&record.name)
            .to_string();
        match by_key.get(&key) {
            Some(&slot) => groups[slot].1.push(idx),
            None => {
                by_key.insert(key.clone(), groups.len());
                groups.push((key, vec![idx]));
            }
        }
    }

    groups
}

/// Case-insensitive substring filter over record names.
///
/// Empty filter text is a sentinel meaning "restore the cursor-anchored
/// window" rather than "match everything", so it returns `None` and the
/// caller falls back to the windower.
pub fn matching(records: &[Record], text: &str) -> Option<Vec<Record>> {
    if text.is_empty() {
        return None;
    }
    let needle = text.to_lowercase();
    Some(
        records
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .cloned()
            .collect(),
    )
}

//! PCF file scanning.
//!
//! A PCF file is line-oriented: data lines look like
//! `identifier,"description"[,rest]`, interleaved with `#` comments and
//! `[Section]` headers. Only the first two comma fields are interpreted.

use crate::domain::model::ConflictRecord;
use std::collections::{HashMap, HashSet};

/// Scans PCF text and returns one record per (ObjectID, description) pair
/// for every ObjectID that carries two or more distinct descriptions.
///
/// Malformed lines (fewer than two comma fields) are tolerated and skipped.
pub fn scan(pcf_text: &str) -> Vec<ConflictRecord> {
    let mut descriptions_by_id: HashMap<&str, HashSet<String>> = HashMap::new();
    let mut skipped = 0usize;

    for line in pcf_text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
            continue;
        }

        let mut parts = line.splitn(3, ',');
        let (object_id, description) = match (parts.next(), parts.next()) {
            (Some(id), Some(desc)) => (id.trim(), clean_description(desc)),
            _ => {
                skipped += 1;
                continue;
            }
        };

        descriptions_by_id
            .entry(object_id)
            .or_default()
            .insert(description);
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} malformed PCF lines", skipped);
    }

    let mut conflicts = Vec::new();
    for (object_id, descriptions) in descriptions_by_id {
        if descriptions.len() > 1 {
            for description in descriptions {
                conflicts.push(ConflictRecord {
                    object_id: object_id.to_string(),
                    description,
                });
            }
        }
    }

    conflicts
}

// Descriptions arrive as ` "Temp" ` or `"Temp"`; strip the surrounding
// quotes and whitespace in either order.
fn clean_description(raw: &str) -> String {
    raw.trim().trim_matches('"').trim().to_string()
}

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One (ObjectID, description) pair belonging to an identifier that carries
/// two or more distinct descriptions in the scanned PCF file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub object_id: String,
    pub description: String,
}

/// ObjectIDs extracted from the reference workbook's "Dictionary" sheet.
///
/// `used_fallback` is set when the configured column had no data and the
/// first column was used instead; callers surface that as a warning.
#[derive(Debug, Clone, Default)]
pub struct ReferenceList {
    pub object_ids: Vec<String>,
    pub used_fallback: bool,
}

impl ReferenceList {
    pub fn id_set(&self) -> HashSet<&str> {
        self.object_ids.iter().map(|s| s.as_str()).collect()
    }
}

/// Raw bytes of both inputs, read during the extract stage. The PCF stream
/// is decoded to UTF-8 here; the workbook stays opaque until transform.
#[derive(Debug, Clone)]
pub struct RawInputs {
    pub pcf_text: String,
    pub reference_bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub all_conflicts: Vec<ConflictRecord>,
    pub dictionary_conflicts: Vec<ConflictRecord>,
    pub reference: ReferenceList,
    /// Set when the reference workbook could not be read; the analysis
    /// still completes with an empty reference list.
    pub reference_error: Option<String>,
}

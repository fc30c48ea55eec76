use crate::core::{export, pcf, reference};
use crate::domain::model::{AnalysisResult, RawInputs, ReferenceList};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;

pub struct ConflictPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ConflictPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for ConflictPipeline<S, C> {
    fn extract(&self) -> Result<RawInputs> {
        tracing::debug!("Reading PCF file: {}", self.config.pcf_file());
        let pcf_bytes = self.storage.read_file(self.config.pcf_file())?;
        // invalid UTF-8 is a hard failure, surfaced to the caller
        let pcf_text = String::from_utf8(pcf_bytes)?;

        tracing::debug!("Reading reference workbook: {}", self.config.reference_file());
        let reference_bytes = self.storage.read_file(self.config.reference_file())?;

        Ok(RawInputs {
            pcf_text,
            reference_bytes,
        })
    }

    fn transform(&self, inputs: RawInputs) -> Result<AnalysisResult> {
        let all_conflicts = pcf::scan(&inputs.pcf_text);
        tracing::debug!("Found {} conflicting entries", all_conflicts.len());

        // A broken workbook must not sink the analysis: fall back to an
        // empty reference list and carry the message for display.
        let (reference, reference_error) =
            match reference::extract(&inputs.reference_bytes, self.config.reference_column()) {
                Ok(list) => (list, None),
                Err(e) => {
                    tracing::warn!("Error reading reference workbook: {}", e);
                    (ReferenceList::default(), Some(e.to_string()))
                }
            };

        if reference.used_fallback && reference_error.is_none() {
            tracing::warn!(
                "Reference column {} has no data; using first column instead",
                self.config.reference_column()
            );
        }

        let id_set = reference.id_set();
        let dictionary_conflicts = all_conflicts
            .iter()
            .filter(|record| id_set.contains(record.object_id.as_str()))
            .cloned()
            .collect();

        Ok(AnalysisResult {
            all_conflicts,
            dictionary_conflicts,
            reference,
            reference_error,
        })
    }

    fn load(&self, result: &AnalysisResult) -> Result<String> {
        let workbook =
            export::write_workbook(&result.all_conflicts, &result.dictionary_conflicts)?;

        tracing::debug!(
            "Writing export workbook ({} bytes) to storage",
            workbook.len()
        );
        self.storage.write_file(export::EXPORT_FILE_NAME, &workbook)?;

        Ok(format!(
            "{}/{}",
            self.config.output_path(),
            export::EXPORT_FILE_NAME
        ))
    }
}

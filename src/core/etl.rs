use crate::core::Pipeline;
use crate::domain::model::AnalysisResult;
use crate::utils::error::Result;

pub struct AnalysisEngine<P: Pipeline> {
    pipeline: P,
}

pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub output_path: String,
}

impl<P: Pipeline> AnalysisEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn run(&self) -> Result<AnalysisOutcome> {
        tracing::info!("Starting conflict analysis...");

        tracing::info!("Reading input files...");
        let raw_inputs = self.pipeline.extract()?;

        tracing::info!("Scanning for conflicting ObjectIDs...");
        let result = self.pipeline.transform(raw_inputs)?;
        tracing::info!(
            "Found {} conflicting entries ({} matching the reference list)",
            result.all_conflicts.len(),
            result.dictionary_conflicts.len()
        );

        tracing::info!("Writing export workbook...");
        let output_path = self.pipeline.load(&result)?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(AnalysisOutcome {
            result,
            output_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{RawInputs, ReferenceList};
    use crate::utils::error::AnalysisError;

    struct StubPipeline {
        fail_extract: bool,
    }

    impl Pipeline for StubPipeline {
        fn extract(&self) -> Result<RawInputs> {
            if self.fail_extract {
                return Err(AnalysisError::ProcessingError {
                    message: "boom".to_string(),
                });
            }
            Ok(RawInputs {
                pcf_text: String::new(),
                reference_bytes: Vec::new(),
            })
        }

        fn transform(&self, _inputs: RawInputs) -> Result<AnalysisResult> {
            Ok(AnalysisResult {
                all_conflicts: vec![],
                dictionary_conflicts: vec![],
                reference: ReferenceList::default(),
                reference_error: None,
            })
        }

        fn load(&self, _result: &AnalysisResult) -> Result<String> {
            Ok("out/conflicting_descriptions.xlsx".to_string())
        }
    }

    #[test]
    fn test_run_chains_all_stages() {
        let engine = AnalysisEngine::new(StubPipeline {
            fail_extract: false,
        });
        let outcome = engine.run().unwrap();
        assert_eq!(outcome.output_path, "out/conflicting_descriptions.xlsx");
        assert!(outcome.result.all_conflicts.is_empty());
    }

    #[test]
    fn test_run_stops_on_extract_failure() {
        let engine = AnalysisEngine::new(StubPipeline { fail_extract: true });
        assert!(engine.run().is_err());
    }
}

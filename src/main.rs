use clap::Parser;
use pcf_conflicts::utils::{logger, validation::Validate};
use pcf_conflicts::{AnalysisEngine, CliConfig, ConflictPipeline, LocalStorage};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting pcf-conflicts CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = ConflictPipeline::new(storage, config);
    let engine = AnalysisEngine::new(pipeline);

    match engine.run() {
        Ok(outcome) => {
            let result = &outcome.result;

            if let Some(message) = &result.reference_error {
                eprintln!("⚠️  Error reading reference workbook: {}", message);
                eprintln!("⚠️  Proceeding without a reference list");
            } else if result.reference.used_fallback {
                eprintln!(
                    "⚠️  Configured reference column had no data; used the first column instead"
                );
            }

            if result.all_conflicts.is_empty() {
                println!("✅ No conflicting ObjectIDs found - all descriptions are unique!");
            } else {
                println!("✅ Analysis complete!");
                println!("📋 Total conflicts found: {}", result.all_conflicts.len());
                if result.dictionary_conflicts.is_empty() {
                    println!("⚠️  No matching ObjectIDs found in the reference list");
                    println!("💡 Check if ObjectID formats match between files");
                } else {
                    println!(
                        "📋 Matching conflicts found: {}",
                        result.dictionary_conflicts.len()
                    );
                }
            }
            println!("📁 Output saved to: {}", outcome.output_path);
        }
        Err(e) => {
            tracing::error!("❌ Analysis failed: {}", e);
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}

//! Effective configuration display.

use gridstudy_core::config::AppConfig;
use gridstudy_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Print the merged configuration
pub fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => output::print_item(config, format),
        OutputFormat::Table => {
            println!("Configuration:");
            output::print_kv("logging.level", &config.logging.level);
            output::print_kv("logging.format", &config.logging.format);
            let kept: Vec<_> = config
                .equipment
                .post_computation_kept_types
                .iter()
                .map(|t| t.as_str())
                .collect();
            output::print_kv("equipment.post_computation_kept_types", &kept.join(","));
            output::print_kv(
                "realtime.max_message_size",
                &config.realtime.max_message_size.to_string(),
            );
            output::print_kv(
                "realtime.dedup_window_ms",
                &config.realtime.dedup_window_ms.to_string(),
            );
            output::print_kv(
                "directory.purge_on_root_removal",
                &config.directory.purge_on_root_removal.to_string(),
            );
        }
    }
    Ok(())
}

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// 彩色文本
    Text,
    /// 每个缩放级别一行 JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "declutter-cli",
    about = "Collision-avoiding placement of map labels and markers",
    long_about = "declutter-cli loads a scene of static and candidate elements, runs the greedy\ncollision-avoidance placement for each requested zoom level and reports which\nelements are visible."
)]
pub struct CliArgs {
    /// Scene file (JSON)
    #[arg(short = 's', long = "scene")]
    pub scene: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", default_value = "declutter.toml")]
    pub config: String,

    /// Generate a default configuration file and exit
    #[arg(long = "generate-config")]
    pub generate_config: bool,

    /// Zoom levels to evaluate, in order
    #[arg(short = 'z', long = "zoom", num_args = 1.., allow_negative_numbers = true, default_values_t = [0])]
    pub zoom: Vec<i32>,

    /// Margin added around every footprint box (overrides config)
    #[arg(long = "margin")]
    pub margin: Option<f64>,

    /// Maximum entries per index node (overrides config)
    #[arg(long = "max-entries")]
    pub max_entries: Option<usize>,

    /// Static elements occupy space in the index (overrides config)
    #[arg(long = "static-obstructs")]
    pub static_obstructs: bool,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Dump the index after the last zoom level to this file (.json or .bin)
    #[arg(long = "dump-index")]
    pub dump_index: Option<PathBuf>,

    /// Log level (overrides config)
    #[arg(long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.generate_config {
            return Ok(());
        }

        if self.scene.is_none() {
            return Err("No scene specified. Use --scene <FILE>.".to_string());
        }

        if let Some(margin) = self.margin {
            if !margin.is_finite() || margin < 0.0 {
                return Err(format!("Margin {} must be a finite, non-negative number", margin));
            }
        }

        if let Some(max_entries) = self.max_entries {
            if max_entries < 4 {
                return Err(format!("max-entries {} is below the minimum of 4", max_entries));
            }
        }

        Ok(())
    }
}

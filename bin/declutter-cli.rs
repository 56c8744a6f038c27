use std::sync::Mutex;

use declutter::client::{CliArgs, OutputFormat, OutputFormatter, Scene, TransitionSummary};
use declutter::placement::PlacementOptions;
use declutter::{DeclutterConfig, Result};
use tracing::{info, Level};

fn main() -> Result<()> {
    let args = CliArgs::parse_args();

    // 验证参数
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // 生成默认配置文件
    if args.generate_config {
        let config = DeclutterConfig::default();
        config.save_to_file(&args.config)?;
        println!("✅ Generated default configuration: {}", args.config);
        println!("📝 You can edit this file and run again.");
        return Ok(());
    }

    // 加载配置
    let mut config = DeclutterConfig::from_file(&args.config)?;

    // 命令行参数覆盖配置文件
    if let Some(margin) = args.margin {
        config.placement.margin = margin;
    }
    if let Some(max_entries) = args.max_entries {
        config.index.max_entries = max_entries;
    }
    if args.static_obstructs {
        config.placement.static_obstructs = true;
    }
    if let Some(log_level) = &args.log_level {
        config.logging.level = log_level.clone();
    }

    // 验证配置
    config.validate()?;

    // 初始化日志系统
    init_logging(&config.logging)?;

    info!("📦 Version: {}", env!("CARGO_PKG_VERSION"));

    if args.format == OutputFormat::Text {
        config.print_summary();
    }

    let Some(scene_path) = &args.scene else {
        return Ok(());
    };
    let scene = Scene::from_file(scene_path)?;
    info!(
        statics = scene.statics.len(),
        candidates = scene.candidates.len(),
        "scene loaded from {}",
        scene_path.display()
    );

    let (mut layer, load_failures) = scene.build_layer(PlacementOptions::from(&config));
    if args.format == OutputFormat::Text {
        for (element, error) in &load_failures {
            println!("{}", OutputFormatter::format_load_failure(element, error));
        }
    }

    for &zoom in &args.zoom {
        layer.measure_mut().set_zoom(zoom);
        let report = layer.on_viewport_change();
        let summary = TransitionSummary::new(zoom, layer.visible().cloned().collect(), &report);

        match args.format {
            OutputFormat::Text => println!("{}", OutputFormatter::format_transition(&summary)),
            OutputFormat::Json => println!("{}", OutputFormatter::format_json(&summary)?),
        }
    }

    // 导出最后一个缩放级别的索引
    if let Some(path) = &args.dump_index {
        layer.index().dump_to_file(path)?;
        if args.format == OutputFormat::Text {
            println!(
                "{}",
                OutputFormatter::format_dump_message(&path.display().to_string(), layer.index().len())
            );
        }
    }

    Ok(())
}

/// 初始化日志系统
fn init_logging(config: &declutter::config::LoggingConfig) -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    match config.output.as_str() {
        "stdout" => {
            tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().with_target(false))
                .with(tracing_subscriber::filter::LevelFilter::from_level(filter))
                .init();
        }
        "file" => {
            let log_file = config
                .log_file
                .as_ref()
                .ok_or("Log output is 'file' but log_file path is not specified")?;

            // 确保日志目录存在
            if let Some(parent) = log_file.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .map_err(|e| format!("Failed to open log file '{}': {}", log_file.display(), e))?;

            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(false),
                )
                .with(tracing_subscriber::filter::LevelFilter::from_level(filter))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false),
                )
                .with(tracing_subscriber::filter::LevelFilter::from_level(filter))
                .init();
        }
    }

    Ok(())
}

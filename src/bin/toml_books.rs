use book_etl::core::ConfigProvider;
use book_etl::utils::{logger, validation::Validate};
use book_etl::{BookPipeline, EtlEngine, LocalStorage, TomlConfig, ValidationReport};
use clap::Parser;

#[derive(Parser)]
#[command(name = "book-etl-toml")]
#[command(about = "Book ETL driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "book-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Validate the input and report, without writing output
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    let pipeline = BookPipeline::new(LocalStorage::default(), config);
    let engine = EtlEngine::new(pipeline);

    let outcome = if args.dry_run {
        engine.dry_run().await.map(|report| print_report(&report))
    } else {
        engine.run().await.map(|summary| {
            println!(
                "✅ {} books written, {} rejected",
                summary.accepted, summary.rejected
            );
            println!("📁 Output saved to: {}", summary.output_path);
        })
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ Book ETL failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Input: {}", config.input_path());
    println!("  Output: {} ({})", config.output_path(), config.output_format());
    println!("  ISBN presence: {}", config.presence_mode());
    println!("  On invalid record: {}", config.error_policy());

    let columns = config.field_selection().columns();
    println!(
        "  Fields: {}",
        columns.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(", ")
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn print_report(report: &ValidationReport) {
    println!("🔍 {} of {} records are valid", report.books.len(), report.total());
    for book in &report.books {
        println!("  ✅ {}", book);
    }
    for rejected in &report.rejected {
        println!(
            "  ❌ #{} {}: {}",
            rejected.index,
            rejected.title.as_deref().unwrap_or("untitled"),
            rejected.error.user_friendly_message()
        );
    }
}

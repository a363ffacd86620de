use anyhow::Context;
use clap::Parser;
use smart_shop::app::render;
use smart_shop::utils::error::ErrorSeverity;
use smart_shop::utils::logger;
use smart_shop::{CliConfig, GeminiClient, OutputFormat, SearchSession, ShopError};

fn exit_with(e: &ShopError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    if config.list_locations {
        println!("{}", render::render_locations());
        return Ok(());
    }

    let file = config.load_file().unwrap_or_else(|e| exit_with(&e));
    let service = config
        .service_config(file.as_ref())
        .unwrap_or_else(|e| exit_with(&e));
    let selection = config.selection(file.as_ref());

    tracing::info!("🚀 Using model {} at {}", service.model, service.api_base);

    let mut session = SearchSession::new(GeminiClient::from_config(&service));
    if let Err(e) = session
        .search(
            selection.country.as_deref(),
            selection.city.as_deref(),
            selection.grocery_list.as_deref(),
        )
        .await
    {
        exit_with(&e);
    }

    match config.format {
        OutputFormat::Text => println!("{}", render::render_view(&session.view())),
        OutputFormat::Json => {
            let response = session
                .state()
                .last_result
                .as_ref()
                .context("search finished without a result")?;
            println!("{}", render::render_json(response)?);
        }
    }

    Ok(())
}

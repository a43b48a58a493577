use clap::Parser;
use cold_mail::config::LogFormat;
use cold_mail::utils::error::ErrorCategory;
use cold_mail::utils::logger;
use cold_mail::{
    app::render, load_portfolio, ChatCompletionModel, CliConfig, ColdMailError, ColdMailPipeline,
    HttpPageFetcher, Shell,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting cold-mail");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let shell = match build_shell(&cli) {
        Ok(shell) => shell,
        Err(e) => {
            tracing::error!("❌ Startup failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(exit_code(e.category()));
        }
    };

    match &cli.url {
        Some(url) => {
            let submission = shell.handle_submit(url).await;
            print!("{}", render(&submission));
            if let Err(e) = submission {
                std::process::exit(exit_code(e.category()));
            }
        }
        None => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let handled = shell.run_session(stdin, tokio::io::stdout()).await?;
            tracing::info!("Session finished after {} submission(s)", handled);
        }
    }

    Ok(())
}

fn build_shell(
    cli: &CliConfig,
) -> Result<Shell<HttpPageFetcher, ChatCompletionModel>, ColdMailError> {
    let config = cli.resolve()?;

    let portfolio = Arc::new(load_portfolio(&config.portfolio.path)?);
    let fetcher = HttpPageFetcher::new(&config.fetch.user_agent, config.fetch_timeout())?;
    let model = ChatCompletionModel::new(config.chat_model_settings()?).map_err(|e| {
        ColdMailError::ConfigValidation {
            field: "model".to_string(),
            message: e.to_string(),
        }
    })?;

    let pipeline = ColdMailPipeline::new(fetcher, model, portfolio)
        .with_sender(config.composer.clone())
        .with_match_limit(config.portfolio.match_limit);

    Ok(Shell::new(pipeline))
}

// 根據錯誤類別決定退出碼
fn exit_code(category: ErrorCategory) -> i32 {
    match category {
        ErrorCategory::Input => 2,
        ErrorCategory::Configuration => 3,
        ErrorCategory::Network | ErrorCategory::Model | ErrorCategory::Data => 1,
        ErrorCategory::System => 4,
    }
}

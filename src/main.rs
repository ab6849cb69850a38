mod cli;
mod prompts;
mod session;

use std::process::ExitCode;

use anyhow::Result;
use calpeek_auth::{AuthError, BrowserConsent, CredentialStore};
use calpeek_calendar::CalendarClient;
use calpeek_core::Config;
use clap::Parser;

use cli::Cli;
use prompts::Prompts;
use session::{Session, SessionSettings};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let code = runtime.block_on(start(cli));

    // A pending stdin read holds a blocking thread; don't wait for it.
    runtime.shutdown_background();
    code
}

async fn start(cli: Cli) -> ExitCode {
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            report(&e);
            return ExitCode::FAILURE;
        }
    };
    let prompts = Prompts::for_locale(config.display.locale);

    tokio::select! {
        result = run(&config) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                report(&e);
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
            println!("\n{}", prompts.exiting);
            ExitCode::SUCCESS
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    calpeek_core::init(&config.logging.filter)?;
    config.ensure_valid()?;
    Ok(config)
}

async fn run(config: &Config) -> Result<()> {
    let prompts = Prompts::for_locale(config.display.locale);
    println!("{}", prompts.banner);
    println!("{}", "-".repeat(40));

    let store = CredentialStore::new(
        config.token_file.clone(),
        config.credentials_file.clone(),
        config.auth.scopes.clone(),
        BrowserConsent::new(config.auth.open_browser),
    );
    let credential = store.obtain().await?;
    tracing::info!("Authorized, token cached at {}", store.token_path().display());

    let client = CalendarClient::with_base_url(
        &credential.access_token,
        &config.calendar.api_base_url,
    );
    let input = tokio::io::BufReader::new(tokio::io::stdin());

    Session::new(&client, input, std::io::stdout(), SessionSettings::from(config))
        .run()
        .await
}

fn report(error: &anyhow::Error) {
    tracing::error!("{:#}", error);
    if let Some(auth) = error.downcast_ref::<AuthError>() {
        eprintln!("{}", auth.user_message());
    }
    eprintln!("Error: {:#}", error);
}

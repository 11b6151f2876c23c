use anyhow::{bail, Result};
use greetr::{config, Greeter};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("greetr=info".parse()?)
        )
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(first_name), Some(last_name)) = (args.next(), args.next()) else {
        bail!("usage: greetr <first-name> <last-name> [language]");
    };

    // Load configuration from environment
    let mut config = config::Config::from_env()?;
    if let Some(language) = args.next() {
        config.language = language;
    }

    info!("Greeting {} {} in '{}'", first_name, last_name, config.language);
    let greeter = Greeter::from_config(first_name, last_name, &config);

    greeter.greet(false).await?;
    let formal = greeter.formal_greeting_settled().await?;
    info!("{}", formal);

    Ok(())
}

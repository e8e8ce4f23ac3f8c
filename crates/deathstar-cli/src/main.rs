//! # Death Star CLI
//!
//! Command-line access to the Death Star API and the droidspeak codec.

use anyhow::{bail, Context, Result};
use deathstar_client::{DeathStarApi, TokenProvider, TransportClient};
use deathstar_core::{encode_droidspeak, Decoder, DroidspeakDecoder};
use std::env;
use tracing_subscriber::EnvFilter;

mod config;

use config::CliConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "encode" => {
            let text = required_arg(&args, 2, "encode <text>")?;
            println!("{}", encode_droidspeak(text));
        }
        "decode" => {
            let encoded = required_arg(&args, 2, "decode <droidspeak>")?;
            let decoded = DroidspeakDecoder::new()
                .decode(encoded)
                .context("Failed to decode")?;
            println!("{decoded}");
        }
        "token" => {
            let config = CliConfig::from_env()?;
            let (client_id, client_secret) = config.credentials()?;
            let provider = TokenProvider::new(TransportClient::new(&config.client)?);
            let token = provider.get_token(client_id, client_secret).await?;
            println!(
                "{}",
                serde_json::json!({
                    "access_token": token.access_token(),
                    "expires_in": token.expires_in(),
                    "token_type": token.token_type(),
                    "scope": token.scope(),
                })
            );
        }
        "prisoner" => {
            let name = required_arg(&args, 2, "prisoner <name>")?;
            let config = CliConfig::from_env()?;
            let (client_id, client_secret) = config.credentials()?;
            let client = TransportClient::new(&config.client)?;

            let token = TokenProvider::new(client.clone())
                .get_token(client_id, client_secret)
                .await?;
            let api = DeathStarApi::new(client);

            match api.get_prisoner(&token, name).await? {
                Some(prisoner) => println!("{}", serde_json::to_string_pretty(&prisoner)?),
                None => bail!("Prisoner {name} not found"),
            }
        }
        "exhaust" => {
            let id: u64 = required_arg(&args, 2, "exhaust <id> <torpedoes>")?
                .parse()
                .context("Invalid exhaust id")?;
            let torpedoes: u32 = required_arg(&args, 3, "exhaust <id> <torpedoes>")?
                .parse()
                .context("Invalid torpedo count")?;
            let config = CliConfig::from_env()?;
            let (client_id, client_secret) = config.credentials()?;
            let client = TransportClient::new(&config.client)?;

            let token = TokenProvider::new(client.clone())
                .get_token(client_id, client_secret)
                .await?;
            DeathStarApi::new(client)
                .delete_exhaust(&token, id, torpedoes)
                .await?;
            println!("Fired {torpedoes} torpedoes into reactor exhaust {id}");
        }
        "help" | "--help" | "-h" => {
            print_help();
        }
        cmd => {
            eprintln!("Unknown command: {cmd}");
            print_help();
            std::process::exit(1);
        }
    }

    Ok(())
}

fn required_arg<'a>(args: &'a [String], index: usize, usage: &str) -> Result<&'a str> {
    match args.get(index) {
        Some(arg) => Ok(arg.as_str()),
        None => bail!("Usage: deathstar {usage}"),
    }
}

fn print_help() {
    println!(
        r#"Death Star CLI

USAGE:
    deathstar <COMMAND> [OPTIONS]

COMMANDS:
    encode <text>             Encode text as droidspeak
    decode <droidspeak>       Decode droidspeak into text
    token                     Exchange client credentials for an access token
    prisoner <name>           Look up a prisoner
    exhaust <id> <torpedoes>  Fire torpedoes into a reactor exhaust
    help                      Show this help message

ENVIRONMENT:
    DEATHSTAR_BASE_URL        URL prefix for every endpoint
    DEATHSTAR_SSL_CERT        Client certificate (PEM)
    DEATHSTAR_SSL_KEY         Client private key (PEM)
    DEATHSTAR_CA_CERT         CA bundle for the server certificate (PEM)
    DEATHSTAR_TIMEOUT_SECS    Request timeout in seconds
    DEATHSTAR_CLIENT_ID       OAuth client identifier
    DEATHSTAR_CLIENT_SECRET   OAuth client secret
    RUST_LOG                  Log filter (default: warn)

EXAMPLES:
    deathstar encode "leia"
    deathstar decode "01101100 01100101 01101001 01100001"
    deathstar prisoner leia
"#
    );
}

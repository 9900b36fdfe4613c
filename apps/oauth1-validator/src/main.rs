//! oauth1-validator - sign and verify OAuth 1.0a HMAC-SHA1 headers.
//!
//! # Usage
//!
//! ```text
//! oauth1-validator sign <METHOD> <URL> [PARAMS] [--multipart]
//! oauth1-validator verify <AUTHORIZATION> <METHOD> <URL> [PARAMS] [--multipart]
//! oauth1-validator --version
//! ```
//!
//! `PARAMS` is either a JSON object (`{"status":"hi","ids":[1,2]}`) or a query
//! string (`status=hi&ids[]=1&ids[]=2`).
//!
//! `verify` prints `valid` and exits 0, or prints `invalid: <reason>` and
//! exits 1. Usage and configuration errors exit 2.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OAUTH_CONSUMER_KEY` | *(unset)* | Consumer key |
//! | `OAUTH_CONSUMER_SECRET` | *(unset)* | Consumer secret |
//! | `OAUTH_TOKEN` | *(unset)* | Request or access token |
//! | `OAUTH_TOKEN_SECRET` | *(unset)* | Token secret |
//! | `OAUTH_MAX_CLOCK_SKEW` | `180` | Accepted clock difference in seconds |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use oauth1_auth::{ApiRequest, RawParams, RequestParams, Validator, Verdict, sign_request};
use oauth1_core::ValidatorConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
usage:
  oauth1-validator sign <METHOD> <URL> [PARAMS] [--multipart]
  oauth1-validator verify <AUTHORIZATION> <METHOD> <URL> [PARAMS] [--multipart]
  oauth1-validator --version";

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
/// Logs go to stderr so stdout only carries command output.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// A parsed command line.
#[derive(Debug, PartialEq)]
enum Command {
    Version,
    Sign {
        request: ApiRequest,
    },
    Verify {
        authorization: String,
        request: ApiRequest,
    },
}

/// Parse the arguments following the program name.
fn parse_args<I, S>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut multipart = false;
    let mut positional = Vec::new();
    for arg in args {
        let arg = arg.into();
        match arg.as_str() {
            "--multipart" => multipart = true,
            "--version" | "-V" => return Ok(Command::Version),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let Some(subcommand) = positional.next() else {
        bail!("missing subcommand");
    };
    let rest: Vec<String> = positional.collect();

    let build = |method: &str, url: &str, params: Option<&String>| -> Result<ApiRequest> {
        let params = match params {
            Some(raw) => parse_params(raw)?,
            None => RawParams::default(),
        };
        Ok(ApiRequest::new(method, url, params).with_multipart(multipart))
    };

    match (subcommand.as_str(), rest.as_slice()) {
        ("sign", [method, url]) => Ok(Command::Sign {
            request: build(method, url, None)?,
        }),
        ("sign", [method, url, params]) => Ok(Command::Sign {
            request: build(method, url, Some(params))?,
        }),
        ("verify", [authorization, method, url]) => Ok(Command::Verify {
            authorization: authorization.clone(),
            request: build(method, url, None)?,
        }),
        ("verify", [authorization, method, url, params]) => Ok(Command::Verify {
            authorization: authorization.clone(),
            request: build(method, url, Some(params))?,
        }),
        ("sign" | "verify", _) => bail!("wrong number of arguments for {subcommand}"),
        _ => bail!("unknown subcommand: {subcommand}"),
    }
}

/// Read request parameters as a JSON object or, failing that, a query string.
fn parse_params(raw: &str) -> Result<RawParams> {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('{') {
        let params: RequestParams =
            serde_json::from_str(trimmed).context("PARAMS is not a valid JSON object")?;
        Ok(params.into())
    } else {
        Ok(RawParams::from(raw))
    }
}

/// Sign `request` with a fresh timestamp and nonce.
fn sign(validator: &Validator, request: &ApiRequest) -> Result<String> {
    let consumer = validator
        .consumers()
        .require()
        .context("set OAUTH_CONSUMER_KEY and OAUTH_CONSUMER_SECRET to sign requests")?;
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let nonce = uuid::Uuid::new_v4().simple().to_string();

    sign_request(request, &consumer, validator.actor(), &timestamp, &nonce)
        .context("failed to sign request")
}

/// Render a verdict as the line printed on stdout.
fn describe(verdict: &Verdict) -> String {
    match verdict.reason() {
        None => "valid".to_owned(),
        Some(reason) => format!("invalid: {reason}"),
    }
}

/// Load configuration, start logging and build the validator.
fn load_validator() -> Result<Validator> {
    let config = ValidatorConfig::from_env().context("failed to load configuration")?;
    init_tracing(&config.log_level)?;

    info!(
        version = oauth1_auth::VERSION,
        max_clock_skew = config.max_clock_skew,
        consumer_configured = config.consumer.is_some(),
        "oauth1-validator starting"
    );
    Ok(Validator::from_config(&config))
}

fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Version => {
            println!("oauth1-validator {}", oauth1_auth::VERSION);
            Ok(ExitCode::SUCCESS)
        }
        Command::Sign { request } => {
            let validator = load_validator()?;
            println!("{}", sign(&validator, &request)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify {
            authorization,
            request,
        } => {
            let validator = load_validator()?;
            let verdict = validator
                .verify(&authorization, &request)
                .context("cannot verify without a consumer credential")?;
            println!("{}", describe(&verdict));
            Ok(if verdict.is_accepted() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn main() -> ExitCode {
    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("error: {e:#}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

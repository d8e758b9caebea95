//! AIGC Relay - room grants and signed voice-agent control plane requests.
//!
//! Loads the relay configuration once, then runs a single command and prints
//! its result as JSON on stdout. Nothing is sent over the network: signed
//! requests are printed so they can be dispatched by any HTTP client.
//!
//! # Usage
//!
//! ```text
//! aigc-relay issue-room '{"audio_codec":"OPUS","room_identifier":"demo"}'
//! aigc-relay start '{"AppId":"...","RoomId":"...","TaskId":"...","Config":{}}'
//! aigc-relay stop <room_id> <task_id>
//! aigc-relay update <room_id> <task_id> <command> [message] [interrupt_mode]
//! aigc-relay verify-token <token>
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `VOLC_ACCESS_KEY_ID` | *(required)* | Access key id for request signing |
//! | `VOLC_SECRET_ACCESS_KEY` | *(required)* | Secret key for request signing |
//! | `RTC_APP_ID` | *(required)* | RTC application id |
//! | `RTC_APP_KEY` | *(required)* | RTC application key signing room tokens |
//! | `RTC_API_HOST` | `rtc.volcengineapi.com` | Control plane host |
//! | `RTC_API_VERSION` | `2024-12-01` | Control plane API version |
//! | `RTC_REGION` | `cn-north-1` | Signing region |
//! | `RTC_SERVICE` | `rtc` | Signing service |
//! | `RTC_TOKEN_TTL_SECS` | `172800` | Room token lifetime |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::sync::Arc;

use aigc_relay_auth::{
    Action, Credentials, OpenApiClient, RequestSigner, SigningContext, StopVoiceChatBody,
    UpdateCommand, UpdateVoiceChatBody,
};
use aigc_relay_core::RelayConfig;
use aigc_relay_token::{RoomGrantIssuer, RoomRequest, TokenCodec};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Relay version.
const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "\
usage:
  aigc-relay issue-room [REQUEST_JSON]
  aigc-relay start BODY_JSON
  aigc-relay stop ROOM_ID TASK_ID
  aigc-relay update ROOM_ID TASK_ID COMMAND [MESSAGE] [INTERRUPT_MODE]
  aigc-relay verify-token TOKEN";

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
/// Logs go to stderr so stdout carries only command output.
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

/// One invocation of the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    IssueRoom {
        request: Option<String>,
    },
    Start {
        body: String,
    },
    Stop {
        room_id: String,
        task_id: String,
    },
    Update {
        room_id: String,
        task_id: String,
        command: UpdateCommand,
        message: Option<String>,
        interrupt_mode: Option<u8>,
    },
    VerifyToken {
        token: String,
    },
}

/// Parse the arguments after the program name.
fn parse_command(args: &[String]) -> Result<Command> {
    let arg = |i: usize, name: &str| {
        args.get(i)
            .cloned()
            .with_context(|| format!("missing {name}\n{USAGE}"))
    };

    let name = arg(0, "command")?;
    let command = match name.as_str() {
        "issue-room" => Command::IssueRoom {
            request: args.get(1).cloned(),
        },
        "start" => Command::Start {
            body: arg(1, "BODY_JSON")?,
        },
        "stop" => Command::Stop {
            room_id: arg(1, "ROOM_ID")?,
            task_id: arg(2, "TASK_ID")?,
        },
        "update" => {
            let command: UpdateCommand = arg(3, "COMMAND")?.parse()?;
            let interrupt_mode = args
                .get(5)
                .map(|raw| {
                    raw.parse::<u8>()
                        .with_context(|| format!("invalid interrupt mode: {raw}"))
                })
                .transpose()?;
            Command::Update {
                room_id: arg(1, "ROOM_ID")?,
                task_id: arg(2, "TASK_ID")?,
                command,
                message: args.get(4).cloned(),
                interrupt_mode,
            }
        }
        "verify-token" => Command::VerifyToken {
            token: arg(1, "TOKEN")?,
        },
        other => anyhow::bail!("unknown command: {other}\n{USAGE}"),
    };
    Ok(command)
}

/// A signed request as printed for the caller to dispatch.
#[derive(Debug, Serialize)]
struct PrintedRequest {
    method: String,
    uri: String,
    headers: Vec<(String, String)>,
    body: serde_json::Value,
}

impl PrintedRequest {
    fn from_request(request: &http::Request<Vec<u8>>) -> Result<Self> {
        let headers = request
            .headers()
            .iter()
            .map(|(name, value)| {
                value
                    .to_str()
                    .map(|v| (name.as_str().to_owned(), v.to_owned()))
                    .with_context(|| format!("non-ASCII header value for {name}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            method: request.method().to_string(),
            uri: request.uri().to_string(),
            headers,
            body: serde_json::from_slice(request.body()).context("request body is not JSON")?,
        })
    }
}

/// Everything a command needs, built once from the configuration.
#[derive(Debug)]
struct Relay {
    config: RelayConfig,
    signer: RequestSigner,
    client: OpenApiClient,
    issuer: RoomGrantIssuer,
}

impl Relay {
    fn new(config: RelayConfig) -> Result<Self> {
        let credentials = Arc::new(Credentials::from_config(&config));
        let issuer =
            RoomGrantIssuer::from_config(&config).context("invalid RTC app credentials")?;
        Ok(Self {
            signer: RequestSigner::new(credentials),
            client: OpenApiClient::from_config(&config),
            issuer,
            config,
        })
    }

    fn run(&self, command: Command) -> Result<serde_json::Value> {
        let output = match command {
            Command::IssueRoom { request } => {
                let request: RoomRequest = match request {
                    Some(raw) => serde_json::from_str(&raw).context("invalid room request JSON")?,
                    None => RoomRequest::default(),
                };
                let grant = self.issuer.issue(&request, Utc::now())?;
                serde_json::to_value(grant)?
            }
            Command::Start { body } => {
                let body: serde_json::Value =
                    serde_json::from_str(&body).context("invalid StartVoiceChat body JSON")?;
                self.signed(Action::StartVoiceChat, &body)?
            }
            Command::Stop { room_id, task_id } => {
                let body = StopVoiceChatBody {
                    app_id: self.config.rtc_app_id.clone(),
                    room_id,
                    task_id,
                };
                self.signed(Action::StopVoiceChat, &body)?
            }
            Command::Update {
                room_id,
                task_id,
                command,
                message,
                interrupt_mode,
            } => {
                let body = UpdateVoiceChatBody::new(
                    self.config.rtc_app_id.as_str(),
                    room_id,
                    task_id,
                    command,
                    message,
                    interrupt_mode,
                )?;
                self.signed(Action::UpdateVoiceChat, &body)?
            }
            Command::VerifyToken { token } => self.verify_token(&token)?,
        };
        Ok(output)
    }

    fn signed<T: Serialize>(&self, action: Action, body: &T) -> Result<serde_json::Value> {
        let request = self.client.build_request(action, body)?;
        let context = SigningContext::new(
            Utc::now(),
            self.config.region.clone(),
            self.config.service.clone(),
        );
        let signed = self
            .signer
            .sign_http_request(request, &context)
            .with_context(|| format!("failed to sign {action} request"))?;
        info!(%action, host = %self.client.host(), "signed control plane request");
        Ok(serde_json::to_value(PrintedRequest::from_request(&signed)?)?)
    }

    fn verify_token(&self, token: &str) -> Result<serde_json::Value> {
        let codec: &TokenCodec = self.issuer.codec();
        let verified = codec.verify(token, Utc::now())?;
        let claims = verified.token();
        debug!(room_id = %claims.room_id(), "verified room token");

        let privileges: serde_json::Map<String, serde_json::Value> = claims
            .privileges()
            .iter()
            .map(|(kind, expiry)| (kind.to_string(), expiry.to_rfc3339().into()))
            .collect();
        Ok(serde_json::json!({
            "app_id": verified.app_id(),
            "room_id": claims.room_id(),
            "uid": claims.user_id(),
            "issued_at": claims.issued_at().to_rfc3339(),
            "expire_at": claims.expire_at().to_rfc3339(),
            "privileges": privileges,
        }))
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{USAGE}");
        return Ok(());
    }

    let config = RelayConfig::from_env().context("failed to load relay configuration")?;
    init_tracing(&config.log_level)?;
    info!(version = VERSION, api_host = %config.api_host, "starting AIGC relay");

    let command = parse_command(&args)?;
    let relay = Relay::new(config)?;
    let output = relay.run(command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

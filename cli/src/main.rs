#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use clap::{Args, Parser, Subcommand};
use clinic_client::config::{ClientConfig, ConfigError};
use clinic_client::net::api::ApiClient;
use clinic_client::net::error::{ApiError, RequestFailure, is_auth_error, is_retryable_error, parse_error};
use clinic_client::state::appointments::{AppointmentFilter, StatusFilter, filter_appointments, sample_appointments};
use clinic_client::util::navigation::{Panel, active_item, dashboard_route, navigation_items, sidebar};
use clinic_client::util::roles::{Feature, Role, accessible_features, can_access_feature};
use clinic_client::util::token::{TokenService, is_token_expired, now_secs, token_claims, token_expiration_ms};
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{}", describe_api_error(.0))]
    Api(#[from] ApiError),
    #[error("invalid token: {0}")]
    Token(#[from] clinic_client::util::token::TokenError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

fn describe_api_error(err: &ApiError) -> String {
    if err.status() == 0 {
        format!("{} ({})", err.message(), err.code())
    } else {
        format!("HTTP {}: {} ({})", err.status(), err.message(), err.code())
    }
}

#[derive(Parser, Debug)]
#[command(name = "clinic-cli", about = "Clinic portal access rules and API CLI")]
struct Cli {
    /// Overrides the configured API base URL.
    #[arg(long, env = "CLINIC_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "CLINIC_ACCESS_TOKEN")]
    access_token: Option<String>,

    #[arg(long, env = "CLINIC_REFRESH_TOKEN")]
    refresh_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Role-based access and navigation rules.
    Access(AccessCommand),
    /// Filter the sample appointment history.
    Appointments(AppointmentsArgs),
    Error(ErrorCommand),
    Token(TokenCommand),
    Api(ApiCommand),
}

#[derive(Args, Debug)]
struct AccessCommand {
    #[command(subcommand)]
    command: AccessSubcommand,
}

#[derive(Subcommand, Debug)]
enum AccessSubcommand {
    Features {
        #[arg(long)]
        role: Role,
    },
    Check {
        #[arg(long)]
        role: Role,
        #[arg(long)]
        feature: Feature,
    },
    Dashboard {
        #[arg(long)]
        role: Role,
    },
    Nav {
        #[arg(long)]
        role: Role,
        /// Current path, to report the highlighted sidebar entry.
        #[arg(long)]
        path: Option<String>,
    },
}

#[derive(Args, Debug)]
struct AppointmentsArgs {
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, default_value = "all")]
    status: StatusFilter,
    #[arg(long)]
    department: Option<String>,
}

#[derive(Args, Debug)]
struct ErrorCommand {
    #[command(subcommand)]
    command: ErrorSubcommand,
}

#[derive(Subcommand, Debug)]
enum ErrorSubcommand {
    /// Normalize an HTTP failure the way the client does.
    Classify {
        /// HTTP status; 0 means no response was received.
        #[arg(long)]
        status: u16,
        #[arg(long, help = "Response body as JSON")]
        body: Option<String>,
    },
}

#[derive(Args, Debug)]
struct TokenCommand {
    #[command(subcommand)]
    command: TokenSubcommand,
}

#[derive(Subcommand, Debug)]
enum TokenSubcommand {
    /// Decode a JWT payload without verifying it.
    Inspect {
        token: String,
        #[arg(long, help = "Evaluate expiry at this Unix time instead of now")]
        now: Option<i64>,
    },
}

#[derive(Args, Debug)]
struct ApiCommand {
    #[command(subcommand)]
    command: ApiSubcommand,
}

#[derive(Subcommand, Debug)]
enum ApiSubcommand {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CLINIC_PASSWORD")]
        password: String,
    },
    VerifyOtp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        otp: String,
    },
    Me,
    Doctors {
        /// Fetch one doctor instead of the list.
        #[arg(long)]
        id: Option<String>,
    },
    /// GET an arbitrary path relative to the base URL.
    Get {
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Access(access) => run_access(access.command),
        Command::Appointments(args) => run_appointments(args),
        Command::Error(error) => run_error(error.command),
        Command::Token(token) => run_token(token.command),
        Command::Api(api) => {
            let client = build_client(cli.base_url, cli.access_token, cli.refresh_token)?;
            run_api(&client, api.command).await
        }
    }
}

fn run_access(command: AccessSubcommand) -> Result<(), CliError> {
    let json = match command {
        AccessSubcommand::Features { role } => json!({ "role": role, "features": accessible_features(role) }),
        AccessSubcommand::Check { role, feature } => {
            json!({ "role": role, "feature": feature, "allowed": can_access_feature(role, feature) })
        }
        AccessSubcommand::Dashboard { role } => json!({ "role": role, "route": dashboard_route(role) }),
        AccessSubcommand::Nav { role, path } => nav_json(role, path.as_deref()),
    };
    print_json(&json)
}

fn nav_json(role: Role, path: Option<&str>) -> Value {
    let panel = Panel::for_role(role);
    let active = path.and_then(|p| active_item(panel, p)).map(|entry| entry.label);
    json!({
        "role": role,
        "items": navigation_items(role),
        "panel": panel,
        "sidebar": sidebar(panel),
        "active": active,
    })
}

fn run_appointments(args: AppointmentsArgs) -> Result<(), CliError> {
    let rows = sample_appointments();
    let filter = AppointmentFilter { search: args.search, status: args.status, department: args.department };
    let visible = filter_appointments(&rows, &filter);
    tracing::debug!(total = rows.len(), visible = visible.len(), "filtered appointments");
    print_json(&serde_json::to_value(visible)?)
}

fn run_error(command: ErrorSubcommand) -> Result<(), CliError> {
    let ErrorSubcommand::Classify { status, body } = command;
    print_json(&classify_json(status, body.as_deref())?)
}

fn classify_json(status: u16, body: Option<&str>) -> Result<Value, CliError> {
    let failure = if status == 0 {
        RequestFailure::NoResponse { reason: "no response".to_owned() }
    } else {
        let body = body.map(serde_json::from_str::<Value>).transpose()?;
        RequestFailure::Response { status, body }
    };
    let err = parse_error(failure);
    Ok(json!({
        "error": err,
        "kind": err.kind(),
        "retryable": is_retryable_error(&err),
        "auth": is_auth_error(&err),
    }))
}

fn run_token(command: TokenSubcommand) -> Result<(), CliError> {
    let TokenSubcommand::Inspect { token, now } = command;
    print_json(&inspect_json(&token, now.unwrap_or_else(now_secs))?)
}

fn inspect_json(token: &str, now: i64) -> Result<Value, CliError> {
    let claims = token_claims(token)?;
    Ok(json!({
        "exp": claims.exp,
        "user_id": claims.user_id,
        "role": claims.role,
        "email": claims.email,
        "expires_at_ms": token_expiration_ms(token),
        "expired": is_token_expired(Some(token), now),
    }))
}

fn build_client(
    base_url: Option<String>,
    access_token: Option<String>,
    refresh_token: Option<String>,
) -> Result<ApiClient, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = base_url {
        config.api.base_url = base_url;
    }
    tracing::debug!(base_url = %config.api.base_url, env = config.app.environment.as_str(), "api client configured");

    let tokens = TokenService::in_memory();
    tokens.set_tokens(access_token.as_deref(), refresh_token.as_deref());
    Ok(ApiClient::new(&config.api, tokens)?)
}

async fn run_api(client: &ApiClient, command: ApiSubcommand) -> Result<(), CliError> {
    let json = match command {
        ApiSubcommand::Login { email, password } => serde_json::to_value(client.login(&email, &password).await?.data)?,
        ApiSubcommand::VerifyOtp { email, otp } => {
            let session = client.verify_otp(&email, &otp).await?;
            json!({
                "access": session.access,
                "refresh": session.refresh,
                "role": session.role,
                "user_id": session.user_id,
                "email": session.email,
            })
        }
        ApiSubcommand::Me => serde_json::to_value(client.current_user().await?)?,
        ApiSubcommand::Doctors { id: Some(id) } => serde_json::to_value(client.doctor(&id).await?)?,
        ApiSubcommand::Doctors { id: None } => serde_json::to_value(client.doctors().await?)?,
        ApiSubcommand::Get { path } => client.get_json::<Value>(&path).await?,
    };
    print_json(&json)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

use clap::{Arg, ArgAction, Command, ValueHint};

/// CLI arguments for kith-server
#[derive(Debug, Clone)]
pub struct CliArgs {
    pub port: Option<u16>,
    pub enable_auth: Option<bool>,
    pub allow_signup: Option<bool>,
    pub jwt_secret: Option<String>,
    pub jwt_expiration_hours: Option<u64>,
    pub base_url: Option<String>,
    pub strict_guards: Option<bool>,
    pub mail_relay_url: Option<String>,
    pub max_request_size: Option<usize>,
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Parse command line arguments
    pub fn parse() -> Self {
        let matches = Command::new("kith-server")
            .version(kith::VERSION)
            .author("Kith Contributors")
            .about("HTTP API server for the Kith social graph")
            .long_about(
                r#"Kith Server exposes account registration, JWT authentication and the
social relationship graph (follows, friend requests, friendships) over a
REST API.

The server can be configured through command line arguments or environment
variables. Command line arguments take precedence over environment
variables.

Examples:
  kith-server --port 8080
  kith-server --no-auth --allow-signup=false
  kith-server --strict-guards --log-level debug"#,
            )
            .arg(
                Arg::new("port")
                    .short('p')
                    .long("port")
                    .value_name("PORT")
                    .help("Port to listen on")
                    .long_help(
                        "Port number for the HTTP server to listen on.
Environment variable: KITH_PORT",
                    )
                    .value_hint(ValueHint::Other)
                    .value_parser(clap::value_parser!(u16)),
            )
            .arg(
                Arg::new("enable_auth")
                    .long("enable-auth")
                    .help("Enable authentication system")
                    .long_help(
                        "Enable JWT-based authentication. When enabled, all
endpoints other than register, login and health require a valid bearer
token.
Environment variable: KITH_ENABLE_AUTH",
                    )
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("no_auth")
                    .long("no-auth")
                    .help("Disable authentication system")
                    .long_help(
                        "Disable authentication entirely. WARNING: Only use
this in development or trusted environments.",
                    )
                    .action(ArgAction::SetTrue)
                    .conflicts_with("enable_auth"),
            )
            .arg(
                Arg::new("allow_signup")
                    .long("allow-signup")
                    .value_name("BOOL")
                    .help("Allow user registration")
                    .long_help(
                        "Allow new accounts to register via the API. Set to
false in production environments where you want to control account
creation.
Environment variable: KITH_ALLOW_SIGNUP",
                    )
                    .value_parser(clap::value_parser!(bool)),
            )
            .arg(
                Arg::new("jwt_secret")
                    .long("jwt-secret")
                    .value_name("SECRET")
                    .help("JWT signing secret")
                    .long_help(
                        "Secret key used for signing JWT tokens. Should be a
long, random string. If not provided, one will be generated automatically.
Environment variable: KITH_JWT_SECRET",
                    )
                    .value_hint(ValueHint::Other),
            )
            .arg(
                Arg::new("jwt_expiration")
                    .long("jwt-expiration")
                    .value_name("HOURS")
                    .help("Session token expiration time in hours")
                    .long_help(
                        "How long session tokens remain valid before
expiring. Default is 168 hours (7 days).
Environment variable: KITH_JWT_EXPIRATION_HOURS",
                    )
                    .value_parser(clap::value_parser!(u64)),
            )
            .arg(
                Arg::new("base_url")
                    .long("base-url")
                    .value_name("URL")
                    .help("Public base URL for activation links")
                    .long_help(
                        "Base URL prepended to email activation links sent
to new accounts.
Environment variable: KITH_BASE_URL",
                    )
                    .value_hint(ValueHint::Url),
            )
            .arg(
                Arg::new("strict_guards")
                    .long("strict-guards")
                    .help("Use the stricter friend-request guard variant")
                    .long_help(
                        "Make send-friend-request reject when the actor
already follows the target or the pair is already friends, instead of the
default permissive guard.
Environment variable: KITH_STRICT_GUARDS",
                    )
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("mail_relay_url")
                    .long("mail-relay-url")
                    .value_name("URL")
                    .help("Mail relay endpoint for verification email")
                    .long_help(
                        "HTTP endpoint that delivers verification email.
When unset, mail is logged instead of sent.
Environment variable: KITH_MAIL_RELAY_URL",
                    )
                    .value_hint(ValueHint::Url),
            )
            .arg(
                Arg::new("max_request_size")
                    .long("max-request-size")
                    .value_name("BYTES")
                    .help("Maximum request body size in bytes")
                    .long_help(
                        "Maximum size allowed for HTTP request bodies.
Larger requests will be rejected.
Environment variable: KITH_MAX_REQUEST_SIZE",
                    )
                    .value_parser(clap::value_parser!(usize)),
            )
            .arg(
                Arg::new("log_level")
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Logging level")
                    .long_help(
                        "Set the logging level. Valid values: error, warn, info, debug, trace
Environment variable: RUST_LOG",
                    )
                    .value_parser(["error", "warn", "info", "debug", "trace"]),
            )
            .arg(
                Arg::new("help_env")
                    .long("help-env")
                    .help("Show all environment variables")
                    .long_help(
                        "Display a comprehensive list of all environment variables
that can be used to configure the server.",
                    )
                    .action(ArgAction::SetTrue),
            )
            .get_matches();

        if matches.get_flag("help_env") {
            Self::print_env_help();
            std::process::exit(0);
        }

        Self {
            port: matches.get_one::<u16>("port").copied(),
            enable_auth: if matches.get_flag("enable_auth") {
                Some(true)
            } else if matches.get_flag("no_auth") {
                Some(false)
            } else {
                None
            },
            allow_signup: matches.get_one::<bool>("allow_signup").copied(),
            jwt_secret: matches.get_one::<String>("jwt_secret").cloned(),
            jwt_expiration_hours: matches.get_one::<u64>("jwt_expiration").copied(),
            base_url: matches.get_one::<String>("base_url").cloned(),
            strict_guards: if matches.get_flag("strict_guards") {
                Some(true)
            } else {
                None
            },
            mail_relay_url: matches.get_one::<String>("mail_relay_url").cloned(),
            max_request_size: matches.get_one::<usize>("max_request_size").copied(),
            log_level: matches.get_one::<String>("log_level").cloned(),
        }
    }

    /// Print comprehensive environment variable help
    fn print_env_help() {
        println!("Kith Server Environment Variables");
        println!("==================================");
        println!();
        println!("Server Configuration:");
        println!("  KITH_PORT                     - Server port (default: 3000)");
        println!("  KITH_MAX_REQUEST_SIZE         - Max request body size in bytes (default: 1MB)");
        println!("  KITH_BASE_URL                 - Public base URL for activation links");
        println!();
        println!("Authentication:");
        println!("  KITH_ENABLE_AUTH              - Enable authentication (default: true)");
        println!("  KITH_JWT_SECRET               - JWT signing secret (auto-generated if not set)");
        println!("  KITH_JWT_EXPIRATION_HOURS     - Session token expiration in hours (default: 168)");
        println!("  KITH_VERIFICATION_TOKEN_HOURS - Verification token expiration (default: 24)");
        println!("  KITH_ALLOW_SIGNUP             - Allow account registration (default: true)");
        println!();
        println!("Relationship Graph:");
        println!("  KITH_STRICT_GUARDS            - Strict send-friend-request guard (default: false)");
        println!();
        println!("Mail:");
        println!("  KITH_MAIL_RELAY_URL           - Mail relay endpoint (mail is logged when unset)");
        println!();
        println!("Logging:");
        println!("  RUST_LOG                      - Logging level (error, warn, info, debug, trace)");
        println!();
        println!("Note: Command line arguments take precedence over environment variables.");
        println!("Use --help for CLI argument documentation.");
    }
}

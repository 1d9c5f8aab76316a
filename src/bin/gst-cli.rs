use clap::{Args, Parser, Subcommand};
use gst_gateway_sdk::{Credentials, GatewayClient, GatewayReply, ReturnsQuery};

#[derive(Parser)]
#[command(name = "gst-cli")]
#[command(about = "Command-line client for the GST gateway", long_about = None)]
struct Cli {
    #[arg(short, long, env = "GST_GATEWAY_URL", default_value = "http://127.0.0.1:8001")]
    url: String,

    #[command(flatten)]
    creds: CredentialArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CredentialArgs {
    #[arg(long, env = "GST_USERNAME")]
    gst_username: String,
    #[arg(long, env = "GST_STATE_CD")]
    state_cd: String,
    #[arg(long, env = "GST_IP_ADDRESS", default_value = "127.0.0.1")]
    ip_address: String,
    #[arg(long, env = "GST_CLIENT_ID")]
    client_id: String,
    #[arg(long, env = "GST_CLIENT_SECRET")]
    client_secret: String,
}

impl From<CredentialArgs> for Credentials {
    fn from(args: CredentialArgs) -> Self {
        Credentials {
            gst_username: args.gst_username,
            state_cd: args.state_cd,
            ip_address: args.ip_address,
            client_id: args.client_id,
            client_secret: args.client_secret,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Request an OTP for the user
    Otp {
        #[arg(long)]
        email: String,
    },
    /// Exchange an OTP for an auth token
    AuthToken {
        #[arg(long)]
        email: String,
        #[arg(long)]
        otp: String,
        #[arg(long)]
        txn: String,
    },
    /// Refresh an existing session
    Refresh {
        #[arg(long)]
        email: String,
        #[arg(long)]
        txn: String,
    },
    /// End a session
    Logout {
        #[arg(long)]
        email: String,
        #[arg(long)]
        txn: String,
    },
    /// Fetch GSTR-1A sections in one call
    Returns {
        #[arg(long)]
        gstin: String,
        /// Return period, MMYYYY
        #[arg(long)]
        retperiod: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        txn: String,
        #[arg(long, default_value = "https://api.whitebooks.in")]
        base_url: String,
        /// Comma-separated sections; all when omitted
        #[arg(long, value_delimiter = ',')]
        endpoints: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = GatewayClient::new(&cli.url);
    let creds = Credentials::from(cli.creds);

    let reply = match cli.command {
        Commands::Otp { email } => client.request_otp(&email, &creds).await?,
        Commands::AuthToken { email, otp, txn } => {
            client.request_auth_token(&email, &otp, &txn, &creds).await?
        }
        Commands::Refresh { email, txn } => client.refresh_token(&email, &txn, &creds).await?,
        Commands::Logout { email, txn } => client.logout(&email, &txn, &creds).await?,
        Commands::Returns {
            gstin,
            retperiod,
            email,
            txn,
            base_url,
            endpoints,
        } => {
            let query = ReturnsQuery {
                gstin,
                retperiod,
                email,
                base_url,
                endpoints,
            };
            client.json_returns(&query, &txn, &creds).await?
        }
    };

    print_reply(&reply)
}

fn print_reply(reply: &GatewayReply) -> Result<(), Box<dyn std::error::Error>> {
    if reply.status >= 400 {
        if let Some(detail) = reply.detail() {
            eprintln!("Detail: {}", detail);
        }
        return Err(format!("gateway returned status {}", reply.status).into());
    }

    println!("{}", serde_json::to_string_pretty(&reply.body)?);
    Ok(())
}

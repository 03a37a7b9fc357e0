use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "wallet-cli")]
#[command(about = "Command-line client for the multichain wallet gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Native or token balance of an address
    Balance {
        #[arg(short, long)]
        network: String,
        #[arg(long)]
        rpc_url: String,
        #[arg(short, long)]
        address: String,
        /// ERC-20 contract or SPL mint
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Generate a new wallet
    Create {
        #[arg(short, long)]
        network: String,
    },
    /// Derive the address of a private key
    Address {
        #[arg(short, long)]
        network: String,
        #[arg(short, long)]
        private_key: String,
    },
    /// Recover a wallet from its mnemonic
    Mnemonic {
        #[arg(short, long)]
        network: String,
        #[arg(short, long)]
        mnemonic: String,
    },
    /// Send native currency or tokens
    Transfer {
        #[arg(short, long)]
        network: String,
        #[arg(long)]
        rpc_url: String,
        #[arg(short, long)]
        private_key: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: f64,
        #[arg(short, long)]
        token: Option<String>,
        /// Gwei on ethereum, micro-lamports per compute unit on solana
        #[arg(long)]
        gas_price: Option<f64>,
        #[arg(long)]
        nonce: Option<u64>,
    },
    /// Check gateway status
    Health,
}

/// Drop `null` entries so optional fields are omitted rather than sent as null.
fn compact(mut body: Value) -> Value {
    if let Value::Object(map) = &mut body {
        map.retain(|_, v| !v.is_null());
    }
    body
}

fn request(command: Commands) -> (&'static str, Option<Value>) {
    match command {
        Commands::Balance { network, rpc_url, address, token } => (
            "/wallet/balance",
            Some(json!({ "network": network, "rpcUrl": rpc_url, "address": address, "tokenAddress": token })),
        ),
        Commands::Create { network } => ("/wallet/create", Some(json!({ "network": network }))),
        Commands::Address { network, private_key } => (
            "/wallet/address",
            Some(json!({ "network": network, "privateKey": private_key })),
        ),
        Commands::Mnemonic { network, mnemonic } => (
            "/wallet/mnemonic",
            Some(json!({ "network": network, "mnemonic": mnemonic })),
        ),
        Commands::Transfer { network, rpc_url, private_key, to, amount, token, gas_price, nonce } => (
            "/wallet/transfer",
            Some(json!({
                "network": network,
                "rpcUrl": rpc_url,
                "privateKey": private_key,
                "recipientAddress": to,
                "amount": amount,
                "tokenAddress": token,
                "gasPrice": gas_price,
                "nonce": nonce,
            })),
        ),
        Commands::Health => ("/health", None),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/').to_string();

    let (path, body) = request(cli.command);
    let url = format!("{}{}", base, path);
    let res = match body {
        Some(body) => client.post(url).json(&compact(body)).send().await?,
        None => client.get(url).send().await?,
    };
    print_response(res).await?;

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if status == reqwest::StatusCode::NO_CONTENT {
        eprintln!("No result: the gateway does not serve that network");
        return Ok(());
    }
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

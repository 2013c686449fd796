use clap::{Parser, Subcommand};

use splendid::Command;

#[derive(Parser)]
#[command(name = "splendid-ctl")]
#[command(about = "Send switch commands to a splendid relay", long_about = None)]
struct Cli {
    #[arg(short, long, env = "SPLENDID_URL", default_value = "https://localhost:8443/gghr/")]
    url: String,

    #[arg(short, long, env = "SPLENDID_KEY")]
    key: String,

    /// Accept a self-signed relay certificate
    #[arg(long)]
    insecure: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Switch a device on
    On { name: String },
    /// Switch a device off
    Off { name: String },
}

impl Cli {
    fn to_command(&self) -> Command {
        let (name, value) = match &self.command {
            Commands::On { name } => (name, "1"),
            Commands::Off { name } => (name, "0"),
        };
        Command {
            key: self.key.clone(),
            device: "switch".into(),
            name: name.clone(),
            action: "set".into(),
            value: value.into(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .danger_accept_invalid_certs(cli.insecure)
        .build()?;

    let res = client.post(&cli.url).json(&cli.to_command()).send().await?;

    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        eprintln!("Response: {}", text);
        std::process::exit(1);
    }

    println!("{}", text);
    Ok(())
}

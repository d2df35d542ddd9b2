// src/bin/transaksi-server.rs
use clap::{Parser, Subcommand};
use std::env;
use yansi::Paint;

#[derive(Parser)]
#[command(name = "transaksi-server", about = "Payment confirmation API server", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Start {
        /// HTTP port (default: 3000)
        #[arg(long, default_value_t = 3000)]
        port: u16,

        /// Path of the JSON document holding all records
        #[arg(long)]
        data_path: Option<String>,

        /// Directory for uploaded proof images
        #[arg(long)]
        upload_dir: Option<String>,

        /// Keep records in memory only (lost on exit)
        #[arg(long)]
        in_memory: bool,
    },
}

fn banner() {
    println!(
        "{} {}",
        Paint::green("Transaksi API").bold(),
        Paint::white("— penyimpanan konfirmasi pembayaran & bukti transfer").dimmed()
    );
    println!();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    banner();

    match cli.command {
        Commands::Start {
            port,
            data_path,
            upload_dir,
            in_memory,
        } => {
            // Set env variables the rest of the service expects
            env::set_var("API_ADDR", format!("0.0.0.0:{}", port));
            if let Some(p) = data_path {
                env::set_var("DATA_PATH", p);
            }
            if let Some(d) = upload_dir {
                env::set_var("UPLOAD_DIR", d);
            }
            if in_memory {
                env::set_var("STORE_MODE", "memory");
            }

            println!(
                "{} API -> http://127.0.0.1:{}",
                Paint::blue("[starting]").bold(),
                port
            );

            transaksi_api::run().await?;
        }
    }

    Ok(())
}

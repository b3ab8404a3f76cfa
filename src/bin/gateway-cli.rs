use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Operator CLI for the Predict Gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Gateway liveness
    Health,
    /// Gateway metadata and configured downstream
    Info,
    /// Check whether the downstream is reachable
    Status,
    /// Send one image for prediction
    Predict {
        file: PathBuf,
        /// Multipart field name expected by the gateway
        #[arg(long, default_value = "file")]
        field: String,
    },
    /// Send several images in one batch request
    PredictBatch {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long, default_value = "files")]
        field: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Info => {
            let res = client.get(format!("{}/", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Status => {
            let res = client
                .get(format!("{}/debug/downstream-status", base))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Predict { file, field } => {
            let form = Form::new().part(field, file_part(&file).await?);
            let res = client
                .post(format!("{}/predict", base))
                .multipart(form)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::PredictBatch { files, field } => {
            let mut form = Form::new();
            for file in &files {
                form = form.part(field.clone(), file_part(file).await?);
            }
            let res = client
                .post(format!("{}/predict_batch", base))
                .multipart(form)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn file_part(path: &Path) -> Result<Part, Box<dyn std::error::Error>> {
    let data = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    Ok(Part::bytes(data).file_name(name.clone()).mime_str(guess_mime(&name))?)
}

fn guess_mime(name: &str) -> &'static str {
    let ext = name.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
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

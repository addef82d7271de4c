//! Sends a small text-only grading request to a running server.
//!
//! `GEMINI_API_KEY=... cargo run -p grader --example client`

use reqwest::Client;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();
    let base_url = std::env::var("GRADER_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
    let api_key = std::env::var("GEMINI_API_KEY")?;

    println!("Health Check:");
    let health_response = client.get(format!("{}/health", base_url)).send().await?;
    println!("Status: {}", health_response.status());

    println!("\nGrading:");
    let payload = json!({
        "apiKey": api_key,
        "qInput": {"mode": "text", "data": "Q1. What is the capital of France?\nQ2. What is 2 + 2?"},
        "mInput": {"mode": "text", "data": "Answer 1: Paris\nAnswer 2: 4"},
        "sInput": {"mode": "text", "data": "1) Paris is the capital.\n2) 5"},
        "personaProfile": "balanced",
        "includeSimilarity": true
    });

    let response = client
        .post(format!("{}/grade", base_url))
        .json(&payload)
        .send()
        .await?;

    println!("Status: {}", response.status());
    let body: serde_json::Value = response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&body)?);

    Ok(())
}

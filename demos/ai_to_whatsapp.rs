//! Ask an AI agent and forward its reply over WhatsApp.
use apipedia::prelude::*;

use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::default())?;

    let appkey = arg_or_env("--appkey", "APIPEDIA_APPKEY");
    let authkey = arg_or_env("--authkey", "APIPEDIA_AUTHKEY");
    let agent = arg_or_env("--agent", "APIPEDIA_AGENT_ID");
    let to = arg_or_env("--to", "APIPEDIA_TO");
    let prompt = arg_or_env("--prompt", "APIPEDIA_PROMPT");

    let client = Apipedia::new(appkey, authkey);
    let reply = client.ai_chat(&prompt, &agent, ChatFormat::Text).await?;
    tracing::info!("Agent replied: {}", reply.text());

    let sent = client.to_whatsapp(&reply, &to, "Bot: ").await?;
    println!(
        "Forwarded to {}\nRaw: {}",
        to,
        serde_json::to_string_pretty(&sent.body)?
    );
    Ok(())
}

fn arg_or_env(flag: &str, env_key: &str) -> String {
    let args: Vec<String> = std::env::args().collect();
    if let Some(idx) = args.iter().position(|a| a == flag) {
        if idx + 1 < args.len() {
            return args[idx + 1].clone();
        }
    }
    env::var(env_key)
        .unwrap_or_else(|_| panic!("missing {} (arg {} or env {})", flag, flag, env_key))
}

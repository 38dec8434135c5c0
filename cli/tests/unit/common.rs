//! Shared helpers

use coolifyme::config::EffectiveConfig;
use coolifyme::http::client::HttpClient;
use coolifyme::logs::LogLevel;
use coolifyme::output::OutputFormat;
use httpmock::MockServer;
use secrecy::SecretString;

pub const TOKEN: &str = "test-token";

/// Client pointed at the mock server's `/api/v1`
pub fn client_for(server: &MockServer) -> HttpClient {
    let config = EffectiveConfig {
        api_token: Some(SecretString::from(TOKEN.to_string())),
        base_url: server.url("/api/v1"),
        profile_name: "test".to_string(),
        output_format: OutputFormat::Json,
        log_level: LogLevel::Warn,
        color: Some(false),
    };
    HttpClient::new(&config).unwrap()
}

pub fn bearer() -> String {
    format!("Bearer {}", TOKEN)
}

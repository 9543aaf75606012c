//! Stubs a small users API on localhost:3000 and calls it once.

use stub_server::{observability, MockServer, MockServerConfig, RequestPattern, StubResponse};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = MockServerConfig::default();
    observability::init_logging(&config.logging);

    let mut server = MockServer::new(config);
    server.register(
        RequestPattern::new("/users").param("id", "42"),
        StubResponse::json(200, &serde_json::json!({ "id": 42, "name": "Ada" }))?,
    )?;
    server.register(
        RequestPattern::new("/users").body(r#"{"name":"Grace"}"#),
        StubResponse::new(201, "").with_header("Location", "/users/43"),
    )?;
    server.start().await?;

    let res = reqwest::get(server.url("users?id=42")).await?;
    println!("GET /users?id=42 -> {} {}", res.status(), res.text().await?);

    let res = reqwest::get(server.url("users?id=7")).await?;
    println!("GET /users?id=7  -> {}", res.status());

    server.stop().await?;
    Ok(())
}

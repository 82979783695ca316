use anyhow::Context;

use supplychain_api::config::ApiConfig;
use supplychain_auth::PolicyKind;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    supplychain_observability::init();

    let config = ApiConfig::from_env()?;
    if config.auth_policy == PolicyKind::Trust {
        tracing::warn!("authorization policy is 'trust'; acting participant ids are not verified");
    }

    let app = supplychain_api::app::build_app(config.auth_policy);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        policy = %config.auth_policy,
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

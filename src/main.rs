use procurement_gateway::{router, AppConfig, AppState, BackendClient, DocumentIntake};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式, RUST_LOG 控制级别 (默认 info)
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting gateway with config: {:?}", config);

    let backend = BackendClient::new(&config.backend.base_url)?;
    let intake = DocumentIntake::new(backend.clone(), &config.intake);
    info!("Forwarding to backend at {}", backend.base_url());

    let app = router(AppState::new(backend, intake))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    // 启动服务器
    let addr = config.listen_addr();
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET    /api/requests             - list (relayed)");
    info!("  POST   /api/requests             - create");
    info!("  PATCH  /api/requests/:id/status  - change status");
    info!("  DELETE /api/requests/:id         - delete");
    info!("  GET    /api/requests/view        - filtered & sorted list");
    info!("  POST   /api/process-document     - document intake");
    info!("  GET    /api/categories, /api/dashboard, /docs, /openapi.json");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

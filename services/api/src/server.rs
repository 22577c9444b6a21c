use crate::cli::{SeedArgs, ServeArgs};
use crate::infra::AppState;
use crate::routes::with_ledger_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lms::config::AppConfig;
use lms::error::AppError;
use lms::ledger::{seed_ledger, ErrorExposure, Ledger};
use lms::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

async fn open_ledger(config: &AppConfig) -> Result<Ledger, AppError> {
    let ledger = Ledger::open(&config.database)?;
    ledger.ensure_schema().await?;
    Ok(ledger)
}

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if args.skip_seed {
        config.seed.enabled = false;
    }

    telemetry::init(&config.telemetry)?;

    let ledger = open_ledger(&config).await?;
    if config.seed.enabled {
        if let Err(err) = seed_ledger(&ledger, &config.seed.directory).await {
            ledger.close().await;
            return Err(err.into());
        }
    } else {
        info!("seeding disabled");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let exposure = ErrorExposure::for_environment(config.environment);
    let app = with_ledger_routes(&ledger, exposure)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loan management service ready");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(readiness_flag))
        .await;

    ledger.close().await;
    info!("storage pools closed");
    served?;
    Ok(())
}

pub(crate) async fn seed(args: SeedArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let directory = args.dir.unwrap_or_else(|| config.seed.directory.clone());
    let ledger = open_ledger(&config).await?;
    let outcome = seed_ledger(&ledger, &directory).await;
    ledger.close().await;

    let summary = outcome?;
    info!(
        applicants = summary.applicants,
        submissions = summary.submissions,
        payments = summary.payments,
        "seed command finished"
    );
    Ok(())
}

async fn shutdown_signal(readiness: Arc<AtomicBool>) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    readiness.store(false, Ordering::Release);
    info!("shutdown requested, draining connections");
}

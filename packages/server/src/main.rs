use std::error::Error;
use std::sync::Arc;

use actors::{SupervisorMessage, start_supervisor};
use pipeline::Pipeline;
use pipeline_core::Settings;
use spectr_client::SpectrClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!(
        "Working directory root {:?}, final storage {:?}, cleanup {:?}",
        settings.pipeline.work_root,
        settings.pipeline.final_root,
        settings.pipeline.cleanup
    );

    let spectr = SpectrClient::from_settings(reqwest::Client::new(), &settings.spectr);
    let pipeline = Pipeline::new(settings.pipeline.clone(), Arc::new(spectr));
    let (supervisor, queue) = start_supervisor(pipeline, settings.poll_interval).await?;

    let address = settings.listen_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Listening on {}", address);

    axum::serve(listener, api::router(queue))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown requested");
        })
        .await?;

    let _ = supervisor.send_message(SupervisorMessage::Shutdown);
    Ok(())
}

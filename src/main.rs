use tracing::Level;
use visionline::app::MonitorApp;
use visionline::config::Settings;
use visionline::error::AppError;

fn init_logging() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_logging();
    let settings = Settings::load()?;
    MonitorApp::start_gui(settings)
}

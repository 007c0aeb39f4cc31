use sensei_report::config::{self, RendererConfig};
use sensei_report::module::report::{FontResolver, ReportRenderer, sample_input};

use anyhow::Result;

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    // Load configuration
    let config = RendererConfig::load_or_default(CONFIG_PATH)?;

    // Initialize logging
    let _logging_guard =
        sensei_report::logging::init_logging(&config.log_dir, "sensei-report", &config.log_level);

    tracing::info!("Cierre Sensei report renderer starting...");

    let fonts = FontResolver::load(Some(config.fonts_dir.as_path()), config.load_system_fonts);

    let input = match &config.input {
        Some(path) => {
            tracing::info!("Loading report input from {:?}", path);
            config::load_input(path)?
        }
        None => {
            tracing::info!("No input configured, rendering the sample report");
            sample_input()
        }
    };

    let options = config.render_options();
    let image = ReportRenderer::new(fonts).render(&input, &options)?;

    match image.output_path() {
        Some(path) => tracing::info!("Report written to {}", path.display()),
        None => tracing::info!("Report rendered"),
    }

    Ok(())
}

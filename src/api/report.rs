use anyhow::{Context, Result};
use reqwest::Url;

/// Opens the PDF report somewhere outside this process.
pub trait ReportLauncher: Send + Sync {
    fn launch(&self, url: &Url) -> Result<()>;
}

/// Hands the URL to the platform's default handler (usually the browser).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl ReportLauncher for SystemLauncher {
    fn launch(&self, url: &Url) -> Result<()> {
        open::that(url.as_str()).with_context(|| format!("Failed to open report at {url}"))
    }
}

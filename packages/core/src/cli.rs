use clap::Parser;

/// Remedi backend CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "remedi-backend",
    version,
    about = "Health-assistant chat backend with emergency email alerts"
)]
pub struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Emergency email transport (smtp or api)
    #[arg(long)]
    pub email_transport: Option<String>,

    /// Gemini model path, e.g. models/gemini-2.0-flash
    #[arg(long)]
    pub model: Option<String>,

    /// Print the models that support generateContent, then exit
    #[arg(long)]
    pub list_models: bool,
}

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "tensorforge-server",
    about = "Tensorforge Billing Server - Headless billing daemon",
    version = env!("CARGO_PKG_VERSION"),
    propagate_version = true
)]
pub struct Cli {
    #[arg(short, long, env = "TENSORFORGE_PORT", default_value = "8070")]
    pub port: u16,

    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

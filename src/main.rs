use clap::Parser;

use portfolio_site::commands::{self, Cli};

#[actix_web::main]
async fn main() {
    let cli = Cli::parse();
    let code = commands::run(cli).await;
    std::process::exit(code);
}

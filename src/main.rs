use log::error;

mod cli;

#[tokio::main]
async fn main() {
    // Credentials may live in a local .env file
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = cli::run().await {
        error!("{e}");
        std::process::exit(1);
    }
}

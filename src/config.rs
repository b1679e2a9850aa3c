use clap::Parser;

#[derive(Parser, Clone)]
pub struct Config {
    #[clap(env, long)]
    pub environment: String,

    #[clap(env, long)]
    pub database_url: String,

    #[clap(env, long)]
    pub google_maps_api_key: String,

    /// Comma-separated list of allowed CORS origins
    #[clap(env, long, default_value = "http://localhost:5173")]
    pub origin_urls: String,

    #[clap(env, long, default_value_t = 3000)]
    pub port: u16,
}

use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(about = "Query a running arythm-server instance", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000", env = "CATALOG_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service status
    Status,
    /// List songs matching the given filters
    Songs {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        artist: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        album: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Show one song by id
    Song { id: String },
    /// Draw a random song
    RandomSong {
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        artist: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Status => client.get(format!("{}/status", base)),
        Commands::Songs {
            name,
            artist,
            genre,
            album,
            limit,
            offset,
        } => {
            let mut query = vec![("limit", limit.to_string()), ("offset", offset.to_string())];
            push_opt(&mut query, "original_name", name);
            push_opt(&mut query, "artist_name", artist);
            push_opt(&mut query, "genre_name", genre);
            push_opt(&mut query, "album_title", album);
            client.get(format!("{}/songs", base)).query(&query)
        }
        Commands::Song { id } => client.get(format!("{}/song/{}", base, id)),
        Commands::RandomSong { genre, artist } => {
            let mut query = Vec::new();
            push_opt(&mut query, "genre_name", genre);
            push_opt(&mut query, "artist_name", artist);
            client.get(format!("{}/random-song", base)).query(&query)
        }
    };

    print_response(request.send().await?).await
}

fn push_opt(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<String>) {
    if let Some(value) = value {
        query.push((key, value));
    }
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

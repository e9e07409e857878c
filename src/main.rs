use std::{path::PathBuf, sync::Arc};

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use albumcrate::{cli, config, error, types::PkceToken};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Remove stored Spotify tokens
    Logout,

    /// Show the logged in Spotify profile
    Me,

    /// Search the Spotify catalog
    #[command(subcommand)]
    Search(SearchCommand),

    /// List every track of an album
    AlbumTracks(AlbumTracksOptions),

    /// Create, inspect and edit playlists
    #[command(subcommand)]
    Playlist(PlaylistCommand),

    /// Album recommendations scraped from review sites
    Recommend(RecommendOptions),

    /// Import a favorites CSV (Artist, Album, Year, Rating)
    Import(FileOption),

    /// Show the imported favorites
    Favorites,

    /// Write an example favorites CSV
    ExportSample(FileOption),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SearchTerms {
    /// Restrict to this artist
    #[clap(long, default_value = "")]
    pub artist: String,

    /// Restrict to this album
    #[clap(long, default_value = "")]
    pub album: String,

    #[clap(flatten)]
    pub page: PageOptions,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SearchCommand {
    /// Search albums
    Albums(SearchTerms),

    /// Search tracks
    Tracks(SearchTerms),
}

#[derive(Parser, Debug, Clone)]
pub struct AlbumTracksOptions {
    pub album_id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct PageOptions {
    /// Index of the first result
    #[clap(long, default_value_t = 0)]
    pub offset: u32,

    /// Number of results
    #[clap(long, default_value_t = 20)]
    pub limit: u32,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlaylistCommand {
    /// Create a playlist for the logged in user
    Create {
        name: String,

        #[clap(long)]
        description: Option<String>,

        /// Make the playlist public
        #[clap(long)]
        public: bool,
    },

    /// List your playlists
    List(PageOptions),

    /// Show one page of a playlist
    Show {
        playlist_id: String,

        #[clap(flatten)]
        page: PageOptions,
    },

    /// Append tracks by URI
    Add {
        playlist_id: String,

        #[clap(required = true)]
        uris: Vec<String>,
    },

    /// Append every track of an album, in album order
    AddAlbum {
        playlist_id: String,
        album_id: String,
    },

    /// Remove tracks by URI
    Remove {
        playlist_id: String,

        #[clap(required = true)]
        uris: Vec<String>,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct RecommendOptions {
    /// Source id; all sources when omitted
    pub source: Option<String>,

    /// Ignore cached results
    #[clap(long)]
    pub refresh: bool,

    /// List the available sources
    #[clap(long, conflicts_with_all = ["source", "refresh"])]
    pub list: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct FileOption {
    pub file: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Logout => cli::logout().await,
        Command::Me => cli::me().await,

        Command::Search(SearchCommand::Albums(t)) => {
            cli::search_albums(t.artist, t.album, t.page.offset, t.page.limit).await
        }
        Command::Search(SearchCommand::Tracks(t)) => {
            cli::search_tracks(t.artist, t.album, t.page.offset, t.page.limit).await
        }
        Command::AlbumTracks(opt) => cli::album_tracks(opt.album_id).await,

        Command::Playlist(cmd) => match cmd {
            PlaylistCommand::Create {
                name,
                description,
                public,
            } => cli::playlist::create(name, description, public).await,
            PlaylistCommand::List(page) => cli::playlist::list(page.offset, page.limit).await,
            PlaylistCommand::Show { playlist_id, page } => {
                cli::playlist::show(playlist_id, page.offset, page.limit).await
            }
            PlaylistCommand::Add { playlist_id, uris } => {
                cli::playlist::add(playlist_id, uris).await
            }
            PlaylistCommand::AddAlbum {
                playlist_id,
                album_id,
            } => cli::playlist::add_album(playlist_id, album_id).await,
            PlaylistCommand::Remove { playlist_id, uris } => {
                cli::playlist::remove(playlist_id, uris).await
            }
        },

        Command::Recommend(opt) => {
            if opt.list {
                cli::sources();
            } else {
                cli::recommend(opt.source, opt.refresh).await
            }
        }

        Command::Import(opt) => cli::import(opt.file).await,
        Command::Favorites => cli::favorites().await,
        Command::ExportSample(opt) => cli::export_sample(opt.file).await,

        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

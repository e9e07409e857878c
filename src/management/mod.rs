mod cache;
mod credentials;
pub mod favorites;
mod playlist;
mod store;

pub use cache::CacheEntry;
pub use cache::DEFAULT_TTL;
pub use cache::FileCache;
pub use cache::StorageCache;
pub use credentials::ACCESS_TOKEN_KEY;
pub use credentials::CredentialStore;
pub use credentials::REFRESH_TOKEN_KEY;
pub use credentials::StoredCredentials;
pub use credentials::credentials_path;
pub use playlist::AlbumAddReport;
pub use playlist::PlaylistEditor;
pub use store::JsonFileStore;
pub use store::KeyValueStore;
pub use store::MemoryStore;

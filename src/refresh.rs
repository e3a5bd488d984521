use std::path::PathBuf;

use chrono::NaiveDate;
use log::{debug, info};

use crate::catalog::CatalogFetcher;
use crate::clients::{
    CatalogApi, ResponseCache, SpotifyClient,
    errors::Result,
};
use crate::playlists::assemble;
use crate::publisher::PlaylistPublisher;
use crate::settings::Settings;

// Configuration for the Refresher struct
pub struct Config<C> {
    pub api: C,
    pub cache: ResponseCache,
    pub settings: Settings,
}

pub struct ConfigBuilder {
    spotify: Option<SpotifyClient>,
    cache: Option<ResponseCache>,
    settings: Option<Settings>,
    settings_path: Option<PathBuf>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            spotify: None,
            cache: None,
            settings: None,
            settings_path: None,
        }
    }

    #[must_use]
    pub fn spotify(mut self, spotify: SpotifyClient) -> Self {
        self.spotify = Some(spotify);
        self
    }

    #[must_use]
    pub fn cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    #[must_use]
    pub fn settings_path(mut self, path: Option<PathBuf>) -> Self {
        self.settings_path = path;
        self
    }

    pub async fn load_settings(&mut self) -> Result<&Settings> {
        let settings = match self.settings.take() {
            Some(settings) => settings,
            None => Settings::load(&Settings::resolve_path(self.settings_path.take())).await?,
        };
        Ok(self.settings.insert(settings))
    }

    // The cache location comes from the settings unless set explicitly
    pub async fn build_cache(&mut self) -> Result<ResponseCache> {
        if let Some(cache) = self.cache.take() {
            return Ok(cache);
        }
        let cache = match &self.load_settings().await?.cache_path {
            Some(path) => ResponseCache::new(path.clone()),
            None => ResponseCache::try_default(),
        };
        debug!("Using response cache at {:?}", cache.path());
        Ok(cache)
    }

    pub async fn build(mut self) -> Result<Config<SpotifyClient>> {
        let cache = self.build_cache().await?;
        let settings = self.load_settings().await?.clone();
        let api = match self.spotify {
            Some(s) => s,
            None => SpotifyClient::try_default()?,
        };
        Ok(Config {
            api,
            cache,
            settings,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RefreshOptions {
    /// Assemble and report without touching remote playlists
    pub dry_run: bool,
    /// Date stamped into playlist descriptions
    pub updated: NaiveDate,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        RefreshOptions {
            dry_run: false,
            updated: chrono::Local::now().date_naive(),
        }
    }
}

/// What was (or, on a dry run, would have been) published for one definition
#[derive(Debug, Clone)]
pub struct PublishedPlaylist {
    pub label: String,
    pub playlist_id: String,
    pub name: String,
    pub description: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub artist_name: String,
    pub album_count: usize,
    pub track_count: usize,
    pub playlists: Vec<PublishedPlaylist>,
}

// Runs fetch -> assemble -> publish for every configured playlist
pub struct Refresher<C> {
    config: Config<C>,
}

impl<C: CatalogApi> Refresher<C> {
    pub fn new(config: Config<C>) -> Self {
        Refresher { config }
    }

    pub fn config(&self) -> &Config<C> {
        &self.config
    }

    pub async fn refresh(&self, options: RefreshOptions) -> Result<RefreshReport> {
        let Config {
            api,
            cache,
            settings,
        } = &self.config;
        info!("Starting refresh for artist {} ...", settings.artist_id);

        let blacklist = settings.blacklist();
        let fetcher = CatalogFetcher::new(api, cache, &blacklist, settings.fetch_options());
        let catalog = fetcher.fetch(&settings.artist_id).await?;
        let artist_name = catalog.artist_name.as_str();

        let publisher = PlaylistPublisher::new(api);
        let mut published = Vec::with_capacity(settings.playlists.len());

        for definition in &settings.playlists {
            let view = assemble(&catalog, definition);

            info!("** Track list: {} **", view.label);
            for line in &view.listing {
                info!("{line}");
            }

            let name = view.playlist_name(artist_name);
            let description = view.description(artist_name, catalog.albums.len(), options.updated);

            if options.dry_run {
                info!("==> Dry run, not updating playlist <{name}>: {description}");
            } else {
                publisher
                    .update(
                        &view.playlist_id,
                        &view.items,
                        &name,
                        &description,
                        settings.public,
                    )
                    .await?;
                info!("==> Updated playlist <{name}>: {description}");
            }

            published.push(PublishedPlaylist {
                label: view.label,
                playlist_id: view.playlist_id,
                name,
                description,
                items: view.items,
            });
        }

        info!(
            "Refresh completed. {} playlists from {} albums, {} tracks",
            published.len(),
            catalog.albums.len(),
            catalog.tracks.len()
        );
        Ok(RefreshReport {
            artist_name: catalog.artist_name.clone(),
            album_count: catalog.albums.len(),
            track_count: catalog.tracks.len(),
            playlists: published,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playlists::{PlaylistDefinition, TrackFilter};
    use rspotify::AuthCodeSpotify;

    fn settings() -> Settings {
        Settings {
            artist_id: "artist1".into(),
            blacklist: Vec::new(),
            playlists: vec![PlaylistDefinition {
                label: "everything".into(),
                playlist_id: "pl".into(),
                sort: None,
                filter: TrackFilter::All,
            }],
            cache_path: None,
            album_type: "album".into(),
            page_limit: 50,
            public: true,
        }
    }

    #[tokio::test]
    async fn explicit_parts_skip_file_and_environment() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigBuilder::new()
            .settings_path(Some(dir.path().join("absent.json")))
            .settings(settings())
            .cache(ResponseCache::new(dir.path()))
            .spotify(SpotifyClient::new(AuthCodeSpotify::default()))
            .build()
            .await
            .unwrap();

        assert_eq!(config.settings.artist_id, "artist1");
        assert_eq!(config.cache.path(), dir.path());
    }

    #[tokio::test]
    async fn cache_follows_the_settings_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut with_path = settings();
        with_path.cache_path = Some(dir.path().join("responses"));

        let cache = ConfigBuilder::new()
            .settings(with_path)
            .build_cache()
            .await
            .unwrap();
        assert_eq!(cache.path(), dir.path().join("responses"));
    }

    #[tokio::test]
    async fn missing_settings_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigBuilder::new()
            .settings_path(Some(dir.path().join("absent.json")))
            .build_cache()
            .await;
        assert!(matches!(
            result,
            Err(crate::clients::errors::Error::ConfigurationError(_))
        ));
    }
}

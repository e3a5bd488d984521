//! Sorted playlists - republish an artist's catalog as sorted Spotify playlists
//!
//! The catalog is read through an on-disk response cache, filtered against a
//! name blacklist, ordered per playlist definition and pushed back to Spotify.

/// Fetching an artist's albums and tracks
pub mod catalog;
/// Client modules for interacting with Spotify and the response cache
pub mod clients;
/// Playlist definitions and assembly
pub mod playlists;
/// Rewriting remote playlists
pub mod publisher;
/// Pipeline configuration and driver
pub mod refresh;
/// Settings file
pub mod settings;

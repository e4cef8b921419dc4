use sha2::{Digest, Sha256};
use std::time::Instant;

// Cache lifetimes in seconds, per upstream content class
pub const TILES_VECTOR_TTL: u64 = 60 * 60 * 24 * 14; // vector tiles change rarely
pub const TILES_RASTER_TTL: u64 = 60 * 60 * 24 * 7;
pub const FONTS_TTL: u64 = 60 * 60 * 24 * 30; // glyph ranges are effectively static
pub const MAPS_TTL: u64 = 60 * 60;
pub const GEOCODING_TTL: u64 = 60 * 30;
pub const DATA_TTL: u64 = 60 * 5; // short default for dynamic data

/// Pick the cache lifetime for a validated upstream path. Pure function of
/// the path; the value feeds both the outbound `cache-control` max-age and
/// the in-memory response cache expiry.
pub fn cache_duration(path: &str) -> u64 {
    if path.starts_with("/fonts") {
        return FONTS_TTL;
    }

    if path.starts_with("/tiles") {
        // vector tiles carry a pbf or mvt extension
        return if path.ends_with(".pbf") || path.ends_with(".mvt") {
            TILES_VECTOR_TTL
        } else {
            TILES_RASTER_TTL
        };
    }

    if path.starts_with("/maps") {
        return MAPS_TTL;
    }

    if path.starts_with("/geocoding") {
        return GEOCODING_TTL;
    }

    // /data and anything unmatched get the short default
    DATA_TTL
}

// Cached upstream response with timestamp
#[derive(Clone)]
pub struct CacheEntry {
    pub content_type: String,
    pub body: Vec<u8>,
    pub created_at: Instant,
}

// Create a cache key (hash of the validated path)
pub fn make_cache_key(path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_tiles_get_the_long_ttl() {
        assert_eq!(cache_duration("/tiles/0/0/0.pbf"), TILES_VECTOR_TTL);
        assert_eq!(cache_duration("/tiles/5/10/12.mvt"), TILES_VECTOR_TTL);
        assert_eq!(cache_duration("/tiles/0/0/0.pbf"), 1_209_600);
    }

    #[test]
    fn raster_tiles_get_the_shorter_tile_ttl() {
        assert_eq!(cache_duration("/tiles/0/0/0.png"), TILES_RASTER_TTL);
        assert_eq!(cache_duration("/tiles/0/0/0.jpg"), TILES_RASTER_TTL);
    }

    #[test]
    fn remaining_prefixes_follow_the_table() {
        assert_eq!(cache_duration("/fonts/abc"), FONTS_TTL);
        assert_eq!(cache_duration("/maps/streets/style.json"), MAPS_TTL);
        assert_eq!(cache_duration("/geocoding/jakarta.json"), GEOCODING_TTL);
        assert_eq!(cache_duration("/data/v3/tiles.json"), DATA_TTL);
    }

    #[test]
    fn unmatched_paths_fall_back_to_the_short_default() {
        assert_eq!(cache_duration("/something-else"), DATA_TTL);
    }

    #[test]
    fn cache_keys_are_stable_and_distinct() {
        let a = make_cache_key("/tiles/0/0/0.pbf");
        let b = make_cache_key("/tiles/0/0/1.pbf");

        assert_eq!(a, make_cache_key("/tiles/0/0/0.pbf"));
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }
}

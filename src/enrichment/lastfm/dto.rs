//! Last.fm API Data Transfer Objects
//!
//! Only the parts of `artist.getInfo` the profile lookup reads.
//!
//! API Reference: https://www.last.fm/api/show/artist.getInfo

use serde::Deserialize;

/// Error code Last.fm uses for unknown artists.
pub const ERROR_INVALID_PARAMETERS: u32 = 6;

/// Error code Last.fm uses when throttling a key.
pub const ERROR_RATE_LIMITED: u32 = 29;

/// `artist.getInfo` response: either an artist or an API error
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArtistInfoResponse {
    Artist { artist: ArtistInfo },
    Error { error: u32, message: String },
}

/// Artist details
#[derive(Debug, Clone, Deserialize)]
pub struct ArtistInfo {
    pub name: String,
    /// Canonical profile page
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub mbid: Option<String>,
}

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_artist_info() {
        let json = r##"{
            "artist": {
                "name": "Cher",
                "mbid": "bfcc6d75-a6a5-4bc6-8282-47aec8531818",
                "url": "https://www.last.fm/music/Cher",
                "image": [{"#text": "", "size": "small"}],
                "streamable": "0",
                "ontour": "0",
                "stats": {"listeners": "1", "playcount": "2"}
            }
        }"##;

        let response: ArtistInfoResponse =
            serde_json::from_str(json).expect("Should parse artist info");

        match response {
            ArtistInfoResponse::Artist { artist } => {
                assert_eq!(artist.name, "Cher");
                assert_eq!(artist.url.as_deref(), Some("https://www.last.fm/music/Cher"));
            }
            other => panic!("expected artist, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_response() {
        let json = r#"{"error": 6, "message": "The artist you supplied could not be found", "links": []}"#;

        let response: ArtistInfoResponse =
            serde_json::from_str(json).expect("Should parse error response");

        assert!(matches!(
            response,
            ArtistInfoResponse::Error { error: ERROR_INVALID_PARAMETERS, .. }
        ));
    }

    #[test]
    fn test_parse_artist_without_url() {
        let json = r#"{"artist": {"name": "Nobody"}}"#;
        let response: ArtistInfoResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(response, ArtistInfoResponse::Artist { artist } if artist.url.is_none()));
    }
}

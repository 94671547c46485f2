use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The most recently played track, as served to the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTrack {
    pub track_name: String,
    pub artist_name: String,
    pub image_url: String,
    pub track_url: String,
    pub played_at: Option<String>,
}

impl RecentTrack {
    /// Picks the first item of a recently-played response. Absent strings
    /// become empty and an absent `played_at` becomes `None`. Artists with
    /// empty names are skipped.
    pub fn from_recently_played(body: &Value) -> Self {
        let item = &body["items"][0];
        let track = &item["track"];
        let text = |v: &Value| v.as_str().unwrap_or_default().to_string();

        let artist_name = track["artists"]
            .as_array()
            .map(|artists| {
                artists
                    .iter()
                    .filter_map(|a| a["name"].as_str())
                    .filter(|name| !name.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        Self {
            track_name: text(&track["name"]),
            artist_name,
            image_url: text(&track["album"]["images"][0]["url"]),
            track_url: text(&track["external_urls"]["spotify"]),
            played_at: item["played_at"].as_str().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn picks_first_item() {
        let body = json!({"items": [
            {
                "played_at": "2024-05-01T10:00:00Z",
                "track": {
                    "name": "Hana",
                    "artists": [{"name": "A"}, {"name": ""}, {"name": "B"}],
                    "album": {"images": [{"url": "https://img/1"}, {"url": "https://img/2"}]},
                    "external_urls": {"spotify": "https://open/track"}
                }
            },
            {"track": {"name": "Older"}}
        ]});
        let track = RecentTrack::from_recently_played(&body);
        assert_eq!(track.track_name, "Hana");
        assert_eq!(track.artist_name, "A, B");
        assert_eq!(track.image_url, "https://img/1");
        assert_eq!(track.track_url, "https://open/track");
        assert_eq!(track.played_at.as_deref(), Some("2024-05-01T10:00:00Z"));
    }

    #[test]
    fn empty_response_yields_blank_track() {
        let track = RecentTrack::from_recently_played(&json!({"items": []}));
        assert_eq!(track.track_name, "");
        assert_eq!(track.artist_name, "");
        assert_eq!(track.played_at, None);
    }

    #[test]
    fn serializes_camel_case_with_null_played_at() {
        let track = RecentTrack::from_recently_played(&json!({}));
        let value = serde_json::to_value(&track).unwrap();
        assert_eq!(
            value,
            json!({
                "trackName": "",
                "artistName": "",
                "imageUrl": "",
                "trackUrl": "",
                "playedAt": null
            })
        );
    }
}

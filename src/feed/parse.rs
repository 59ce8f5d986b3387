// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;

use crate::error::FeedError;

use super::name::FeedEndpoint;

/// A single post from the listing
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub id: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub url: String,
    pub permalink: Url,
    pub category: Option<String>,
    pub media: Vec<MediaReference>,
}

/// An image attached to a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaReference {
    pub url: String,
    /// Intrinsic width in pixels, if the listing reports one
    pub width: Option<u32>,
}

#[derive(Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    children: Vec<ListingChild>,
}

#[derive(Deserialize)]
struct ListingChild {
    data: RawPost,
}

#[derive(Deserialize)]
struct RawPost {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    created_utc: f64,
    #[serde(default)]
    url: String,
    #[serde(default)]
    permalink: String,
    link_flair_text: Option<String>,
    preview: Option<Preview>,
}

#[derive(Deserialize)]
struct Preview {
    #[serde(default)]
    images: Vec<PreviewImage>,
}

#[derive(Deserialize)]
struct PreviewImage {
    source: ImageSource,
}

#[derive(Deserialize)]
struct ImageSource {
    url: String,
    width: Option<u32>,
}

/// Decode a listing document into posts, newest first as delivered
///
/// A document without the `data.children` list is rejected. Individual posts
/// with an unusable permalink are skipped.
pub fn parse_listing(json: &[u8], endpoint: &FeedEndpoint) -> Result<Vec<FeedItem>, FeedError> {
    let listing: Listing = serde_json::from_slice(json)?;

    let items = listing
        .data
        .children
        .into_iter()
        .filter_map(|child| {
            let id = child.data.id.clone();
            parse_item(child.data, endpoint)
                .inspect_err(|e| tracing::debug!(id = %id, error = %e, "skipping post"))
                .ok()
        })
        .collect();

    Ok(items)
}

fn parse_item(post: RawPost, endpoint: &FeedEndpoint) -> Result<FeedItem, FeedError> {
    let permalink =
        endpoint
            .resolve(&post.permalink)
            .map_err(|source| FeedError::InvalidPermalink {
                permalink: post.permalink.clone(),
                source,
            })?;

    // Only the preview block carries media; the thumbnail field is ignored
    let media = post
        .preview
        .map(|preview| {
            preview
                .images
                .into_iter()
                .map(|image| MediaReference {
                    url: html_escape::decode_html_entities(&image.source.url).into_owned(),
                    width: image.source.width,
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(FeedItem {
        id: post.id,
        title: post.title,
        body: post.selftext,
        created_at: DateTime::from_timestamp(post.created_utc as i64, 0).unwrap_or_default(),
        url: post.url,
        permalink,
        category: post.link_flair_text.filter(|s| !s.trim().is_empty()),
        media,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LISTING: &str = r#"{
  "kind": "Listing",
  "data": {
    "after": "t3_p1",
    "children": [
      {
        "kind": "t3",
        "data": {
          "id": "p2",
          "title": "Ferris &amp; friends",
          "selftext": "",
          "created_utc": 1704110400.0,
          "url": "https://i.redd.it/ferris.png",
          "permalink": "/r/rust/comments/p2/ferris_friends/",
          "link_flair_text": "Meme",
          "thumbnail": "https://b.thumbs.redditmedia.com/x.jpg",
          "preview": {
            "images": [
              {
                "source": {
                  "url": "https://preview.redd.it/ferris.png?width=640&amp;s=abc",
                  "width": 640,
                  "height": 480
                },
                "resolutions": []
              }
            ],
            "enabled": true
          }
        }
      },
      {
        "kind": "t3",
        "data": {
          "id": "p1",
          "title": "Question about lifetimes",
          "selftext": "Why does this not compile?",
          "created_utc": 1704106800,
          "url": "https://www.reddit.com/r/rust/comments/p1/question/",
          "permalink": "/r/rust/comments/p1/question/",
          "link_flair_text": null,
          "thumbnail": "self"
        }
      }
    ]
  }
}"#;

    fn parse_sample() -> Vec<FeedItem> {
        parse_listing(SAMPLE_LISTING.as_bytes(), &FeedEndpoint::default()).unwrap()
    }

    #[test]
    fn parse_listing_keeps_delivery_order() {
        let items = parse_sample();
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["p2", "p1"]);
    }

    #[test]
    fn parse_listing_extracts_post_fields() {
        let items = parse_sample();
        let post = &items[1];

        assert_eq!(post.title, "Question about lifetimes");
        assert_eq!(post.body, "Why does this not compile?");
        assert_eq!(post.created_at.timestamp(), 1704106800);
        assert_eq!(
            post.permalink.as_str(),
            "https://www.reddit.com/r/rust/comments/p1/question/"
        );
        assert!(post.category.is_none());
    }

    #[test]
    fn parse_listing_reads_preview_media() {
        let items = parse_sample();
        let post = &items[0];

        assert_eq!(post.category.as_deref(), Some("Meme"));
        assert_eq!(
            post.media,
            vec![MediaReference {
                url: "https://preview.redd.it/ferris.png?width=640&s=abc".to_string(),
                width: Some(640),
            }]
        );
    }

    #[test]
    fn parse_listing_ignores_thumbnail_without_preview() {
        let items = parse_sample();
        assert!(items[1].media.is_empty());
    }

    #[test]
    fn parse_listing_rejects_missing_children() {
        let result = parse_listing(
            br#"{"kind": "Listing", "data": {"after": null}}"#,
            &FeedEndpoint::default(),
        );
        assert!(matches!(result, Err(FeedError::ParseFailed(_))));
    }

    #[test]
    fn parse_listing_rejects_non_json() {
        let result = parse_listing(b"<html>Too Many Requests</html>", &FeedEndpoint::default());
        assert!(matches!(result, Err(FeedError::ParseFailed(_))));
    }

    #[test]
    fn parse_listing_treats_blank_flair_as_absent() {
        let json = r#"{"data": {"children": [
            {"data": {"id": "a", "permalink": "/a/", "link_flair_text": "  "}}
        ]}}"#;
        let items = parse_listing(json.as_bytes(), &FeedEndpoint::default()).unwrap();
        assert!(items[0].category.is_none());
    }
}

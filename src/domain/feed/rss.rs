//! RSS 2.0 + iTunes 播客文档渲染

use serde::Serialize;

use super::entities::{Feed, FeedItem};
use super::errors::FeedError;

/// Feed 响应的 Content-Type
pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const RSS_VERSION: &str = "2.0";
const ITUNES_NAMESPACE: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";

#[derive(Serialize)]
#[serde(rename = "rss")]
struct RssDocument<'a> {
    #[serde(rename = "@version")]
    version: &'static str,
    #[serde(rename = "@xmlns:itunes")]
    xmlns_itunes: &'static str,
    channel: RssChannel<'a>,
}

#[derive(Serialize)]
struct RssChannel<'a> {
    title: &'a str,
    link: &'a str,
    description: &'a str,
    category: &'a str,
    language: &'a str,
    #[serde(rename = "lastBuildDate")]
    last_build_date: String,
    #[serde(rename = "pubDate")]
    pub_date: String,
    image: RssImage<'a>,
    #[serde(rename = "itunes:author")]
    itunes_author: &'a str,
    #[serde(rename = "itunes:subtitle")]
    itunes_subtitle: &'a str,
    #[serde(rename = "itunes:summary")]
    itunes_summary: &'a str,
    #[serde(rename = "itunes:image")]
    itunes_image: RssHref<'a>,
    #[serde(rename = "itunes:explicit")]
    itunes_explicit: &'a str,
    #[serde(rename = "item")]
    items: Vec<RssItem<'a>>,
}

#[derive(Serialize)]
struct RssImage<'a> {
    url: &'a str,
    title: &'a str,
    link: &'a str,
}

#[derive(Serialize)]
struct RssHref<'a> {
    #[serde(rename = "@href")]
    href: &'a str,
}

#[derive(Serialize)]
struct RssItem<'a> {
    title: &'a str,
    link: &'a str,
    description: &'a str,
    guid: RssGuid<'a>,
    #[serde(rename = "pubDate")]
    pub_date: String,
    enclosure: RssEnclosure<'a>,
    #[serde(rename = "itunes:image", skip_serializing_if = "Option::is_none")]
    itunes_image: Option<RssHref<'a>>,
    #[serde(rename = "itunes:summary")]
    itunes_summary: &'a str,
}

#[derive(Serialize)]
struct RssGuid<'a> {
    #[serde(rename = "@isPermaLink")]
    is_perma_link: &'static str,
    #[serde(rename = "$text")]
    value: &'a str,
}

#[derive(Serialize)]
struct RssEnclosure<'a> {
    #[serde(rename = "@url")]
    url: &'a str,
    #[serde(rename = "@length")]
    length: u64,
    #[serde(rename = "@type")]
    mime_type: &'a str,
}

impl<'a> From<&'a FeedItem> for RssItem<'a> {
    fn from(item: &'a FeedItem) -> Self {
        Self {
            title: &item.title,
            link: &item.link,
            description: &item.description,
            guid: RssGuid {
                is_perma_link: "false",
                value: &item.guid,
            },
            pub_date: item.pub_date.to_rfc2822(),
            enclosure: RssEnclosure {
                url: &item.enclosure.url,
                length: item.enclosure.length,
                mime_type: &item.enclosure.mime_type,
            },
            itunes_image: (!item.itunes_image.is_empty()).then(|| RssHref {
                href: &item.itunes_image,
            }),
            itunes_summary: &item.itunes_summary,
        }
    }
}

impl Feed {
    /// 渲染为 RSS XML 文档
    pub fn to_rss(&self) -> Result<String, FeedError> {
        let document = RssDocument {
            version: RSS_VERSION,
            xmlns_itunes: ITUNES_NAMESPACE,
            channel: RssChannel {
                title: &self.title,
                link: &self.link,
                description: &self.description,
                category: &self.category,
                language: &self.language,
                last_build_date: self.last_build_date.to_rfc2822(),
                pub_date: self.pub_date.to_rfc2822(),
                image: RssImage {
                    url: &self.image.url,
                    title: &self.image.title,
                    link: &self.image.link,
                },
                itunes_author: &self.itunes_author,
                itunes_subtitle: &self.itunes_subtitle,
                itunes_summary: &self.itunes_summary,
                itunes_image: RssHref {
                    href: &self.itunes_image,
                },
                itunes_explicit: &self.itunes_explicit,
                items: self.items().iter().map(RssItem::from).collect(),
            },
        };

        let body = quick_xml::se::to_string(&document)
            .map_err(|e| FeedError::Render(e.to_string()))?;

        Ok(format!("{}\n{}", XML_DECLARATION, body))
    }
}

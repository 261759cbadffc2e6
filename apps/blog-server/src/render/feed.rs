use std::io::{Cursor, Write};

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::RenderError;

pub struct FeedChannel<'a> {
    pub title: &'a str,
    pub link: &'a str,
    pub description: &'a str,
}

pub struct FeedItem {
    pub title: String,
    pub link: String,
    /// HTML, written escaped.
    pub description: String,
    pub pub_date: DateTime<Utc>,
}

/// Write an RSS 2.0 document.
pub fn render_rss(channel: &FeedChannel<'_>, items: &[FeedItem]) -> Result<String, RenderError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("rss").with_attributes([("version", "2.0")]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    text_element(&mut writer, "title", channel.title)?;
    text_element(&mut writer, "link", channel.link)?;
    text_element(&mut writer, "description", channel.description)?;
    if let Some(latest) = items.iter().map(|i| i.pub_date).max() {
        text_element(&mut writer, "lastBuildDate", &latest.to_rfc2822())?;
    }

    for item in items {
        writer.write_event(Event::Start(BytesStart::new("item")))?;
        text_element(&mut writer, "title", &item.title)?;
        text_element(&mut writer, "link", &item.link)?;
        text_element(&mut writer, "description", &item.description)?;
        text_element(&mut writer, "guid", &item.link)?;
        text_element(&mut writer, "pubDate", &item.pub_date.to_rfc2822())?;
        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

pub(super) fn text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), RenderError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rss_document_has_channel_and_items() {
        let channel = FeedChannel {
            title: "My blog",
            link: "https://blog.example.com/blog/",
            description: "New posts of my blog.",
        };
        let items = vec![FeedItem {
            title: "Tips & tricks".into(),
            link: "https://blog.example.com/blog/2024/3/9/tips/".into(),
            description: "<p>Hello …</p>".into(),
            pub_date: Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap(),
        }];

        let xml = render_rss(&channel, &items).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(xml.contains(r#"<rss version="2.0">"#));
        assert!(xml.contains("<title>My blog</title>"));
        assert!(xml.contains("<title>Tips &amp; tricks</title>"));
        assert!(xml.contains("<description>&lt;p&gt;Hello …&lt;/p&gt;</description>"));
        assert!(xml.contains("<pubDate>Sat, 9 Mar 2024 12:00:00 +0000</pubDate>"));
    }

    #[test]
    fn empty_feed_is_still_valid() {
        let channel = FeedChannel {
            title: "t",
            link: "l",
            description: "d",
        };
        let xml = render_rss(&channel, &[]).unwrap();
        assert!(!xml.contains("<item>"));
        assert!(!xml.contains("lastBuildDate"));
        assert!(xml.trim_end().ends_with("</rss>"));
    }
}

use std::io::Cursor;

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use super::RenderError;
use super::feed::text_element;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const CHANGEFREQ: &str = "weekly";
const PRIORITY: &str = "0.9";

pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: DateTime<Utc>,
}

/// Write a sitemap where every entry changes weekly with priority 0.9.
pub fn render_sitemap(entries: &[SitemapEntry]) -> Result<String, RenderError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NS)]),
    ))?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        text_element(&mut writer, "loc", &entry.loc)?;
        text_element(
            &mut writer,
            "lastmod",
            &entry.lastmod.format("%Y-%m-%d").to_string(),
        )?;
        text_element(&mut writer, "changefreq", CHANGEFREQ)?;
        text_element(&mut writer, "priority", PRIORITY)?;
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn entries_carry_weekly_priority() {
        let entries = vec![SitemapEntry {
            loc: "https://blog.example.com/blog/2024/1/2/hello/".into(),
            lastmod: Utc.with_ymd_and_hms(2024, 1, 5, 8, 30, 0).unwrap(),
        }];

        let xml = render_sitemap(&entries).unwrap();

        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(xml.contains("<loc>https://blog.example.com/blog/2024/1/2/hello/</loc>"));
        assert!(xml.contains("<lastmod>2024-01-05</lastmod>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>0.9</priority>"));
    }
}

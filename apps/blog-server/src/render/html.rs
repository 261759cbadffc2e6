use std::io::Cursor;

use quick_xml::events::{BytesEnd, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::RenderError;

const ELLIPSIS: &str = "…";

/// Render a post body written in GitHub-flavored Markdown.
pub fn markdown_to_html(source: &str) -> Result<String, RenderError> {
    markdown::to_html_with_options(source, &markdown::Options::gfm())
        .map_err(|e| RenderError::Markdown(e.to_string()))
}

/// Keep the first `limit` words of an HTML fragment.
///
/// When words are dropped an ellipsis follows the last kept word and every
/// element still open at that point is closed. Shorter input is returned
/// unchanged.
pub fn truncate_words_html(html: &str, limit: usize) -> Result<String, RenderError> {
    let mut reader = Reader::from_str(html);
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let mut open: Vec<String> = Vec::new();
    let mut words = 0;
    // text that used up the limit, plus the markup after it, until another word shows up
    let mut held: Option<(BytesText<'static>, Vec<Event<'static>>)> = None;

    loop {
        let event = reader.read_event()?;
        let count = word_count(&event)?;

        if let Some((last, mut rest)) = held.take() {
            match event {
                Event::Text(_) if count > 0 => {
                    let tail = format!("{} {ELLIPSIS}", last.unescape()?.trim_end());
                    writer.write_event(Event::Text(BytesText::new(&tail)))?;
                    close_open(&mut writer, &open)?;
                    break;
                }
                Event::Eof => {
                    writer.write_event(Event::Text(last))?;
                    for event in rest {
                        writer.write_event(event)?;
                    }
                    break;
                }
                other => {
                    rest.push(other.into_owned());
                    held = Some((last, rest));
                    continue;
                }
            }
        }

        match event {
            Event::Start(e) => {
                open.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                writer.write_event(Event::Start(e))?;
            }
            Event::End(e) => {
                open.pop();
                writer.write_event(Event::End(e))?;
            }
            Event::Text(e) if count == 0 || words + count < limit => {
                words += count;
                writer.write_event(Event::Text(e))?;
            }
            Event::Text(e) if words + count == limit => {
                words = limit;
                held = Some((e.into_owned(), Vec::new()));
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                let kept = first_words(&text, limit - words);
                let tail = if kept.is_empty() {
                    ELLIPSIS.to_string()
                } else {
                    format!("{kept} {ELLIPSIS}")
                };
                writer.write_event(Event::Text(BytesText::new(&tail)))?;
                close_open(&mut writer, &open)?;
                break;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

fn word_count(event: &Event<'_>) -> Result<usize, RenderError> {
    match event {
        Event::Text(e) => Ok(e.unescape()?.split_whitespace().count()),
        _ => Ok(0),
    }
}

fn close_open(writer: &mut Writer<Cursor<Vec<u8>>>, open: &[String]) -> Result<(), RenderError> {
    for name in open.iter().rev() {
        writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
    }
    Ok(())
}

/// Prefix of `text` holding its first `n` words, leading whitespace included.
fn first_words(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    let mut seen = 0;
    let mut in_word = false;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if in_word {
                seen += 1;
                if seen == n {
                    return &text[..i];
                }
            }
            in_word = false;
        } else {
            in_word = true;
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_renders_gfm() {
        let html = markdown_to_html("# Title\n\n*hi* ~~there~~").unwrap();
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>hi</em>"));
        assert!(html.contains("<del>there</del>"));
    }

    #[test]
    fn short_fragments_are_untouched() {
        let html = "<p>one two three</p>";
        assert_eq!(truncate_words_html(html, 3).unwrap(), html);
    }

    #[test]
    fn truncation_closes_open_tags() {
        let html = "<p>one <em>two three</em> four</p><p>five</p>";
        assert_eq!(
            truncate_words_html(html, 2).unwrap(),
            "<p>one <em>two …</em></p>"
        );
    }

    #[test]
    fn truncation_at_a_block_boundary() {
        let html = "<p>one two</p><p>three</p>";
        assert_eq!(truncate_words_html(html, 2).unwrap(), "<p>one two …</p>");

        let html = markdown_to_html("one two\n\nthree four").unwrap();
        assert_eq!(truncate_words_html(&html, 2).unwrap(), "<p>one two …</p>");
    }

    #[test]
    fn truncation_before_an_inline_element() {
        let html = "<p>one <em>two</em> three</p>";
        assert_eq!(
            truncate_words_html(html, 2).unwrap(),
            "<p>one <em>two …</em></p>"
        );

        let html = "<p>one two<sup><a href=\"#n\">1</a></sup></p>";
        assert_eq!(truncate_words_html(html, 2).unwrap(), "<p>one two …</p>");
    }

    #[test]
    fn exact_fit_keeps_trailing_markup() {
        let html = "<table><tr><td>1</td><td>2</td></tr></table>\n";
        assert_eq!(truncate_words_html(html, 2).unwrap(), html);
    }

    #[test]
    fn escaped_text_survives() {
        let html = "<p>a &amp; b c d</p>";
        assert_eq!(truncate_words_html(html, 3).unwrap(), "<p>a &amp; b …</p>");
    }
}

//! Sitemap XML serialization.
//!
//! Documents follow the sitemaps.org 0.9 schema. Image entries use the Google
//! image extension; its namespace is declared only when at least one URL has
//! images.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;

use crate::error::XmlError;
use crate::model::{ImageEntry, SitemapDocument, UrlEntry};

/// Sitemap protocol namespace.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Google image sitemap extension namespace.
pub const IMAGE_NAMESPACE: &str = "http://www.google.com/schemas/sitemap-image/1.1";

/// Render a document as UTF-8 sitemap XML.
///
/// # Errors
///
/// Returns [`XmlError::Write`] if writing to the buffer fails.
pub fn render_sitemap(document: &SitemapDocument) -> Result<Vec<u8>, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NAMESPACE));
    if document.has_images() {
        urlset.push_attribute(("xmlns:image", IMAGE_NAMESPACE));
    }
    writer.write_event(Event::Start(urlset))?;

    for url in &document.urls {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        write_text_element(&mut writer, "loc", &url.location)?;
        write_text_element(&mut writer, "lastmod", &url.last_modified)?;
        for image in &url.images {
            writer.write_event(Event::Start(BytesStart::new("image:image")))?;
            write_text_element(&mut writer, "image:loc", &image.location)?;
            if let Some(title) = &image.title {
                write_text_element(&mut writer, "image:title", title)?;
            }
            if let Some(caption) = &image.caption {
                write_text_element(&mut writer, "image:caption", caption)?;
            }
            writer.write_event(Event::End(BytesEnd::new("image:image")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    let mut output = writer.into_inner();
    output.push(b'\n');
    Ok(output)
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), XmlError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Parse sitemap XML back into a document.
///
/// Elements are matched by their qualified names as written by
/// [`render_sitemap`] (`url`, `loc`, `lastmod`, `image:image`, ...). Unknown
/// elements are ignored.
///
/// # Errors
///
/// Returns [`XmlError`] if the input is not well-formed XML or a `<url>` has
/// no `<loc>`.
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut document = SitemapDocument::default();
    let mut url: Option<UrlEntry> = None;
    let mut image: Option<ImageEntry> = None;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                text.clear();
                match e.name().as_ref() {
                    b"url" => url = Some(UrlEntry::default()),
                    b"image:image" => image = Some(ImageEntry::default()),
                    _ => {}
                }
            }
            Event::Text(e) => {
                text.push_str(&reader.decoder().decode(&e)?);
            }
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?;
                text.push_str(&decode_entity(&entity));
            }
            Event::CData(e) => {
                text.push_str(&String::from_utf8_lossy(&e));
            }
            Event::End(e) => {
                let value = text.trim().to_owned();
                text.clear();
                match e.name().as_ref() {
                    b"loc" => {
                        if let Some(url) = url.as_mut() {
                            url.location = value;
                        }
                    }
                    b"lastmod" => {
                        if let Some(url) = url.as_mut() {
                            url.last_modified = value;
                        }
                    }
                    b"image:loc" => {
                        if let Some(image) = image.as_mut() {
                            image.location = value;
                        }
                    }
                    b"image:title" => {
                        if let Some(image) = image.as_mut() {
                            image.title = (!value.is_empty()).then_some(value);
                        }
                    }
                    b"image:caption" => {
                        if let Some(image) = image.as_mut() {
                            image.caption = (!value.is_empty()).then_some(value);
                        }
                    }
                    b"image:image" => {
                        if let (Some(image), Some(url)) = (image.take(), url.as_mut()) {
                            url.images.push(image);
                        }
                    }
                    b"url" => {
                        if let Some(url) = url.take() {
                            if url.location.is_empty() {
                                return Err(XmlError::Malformed("<url> without <loc>".to_owned()));
                            }
                            document.urls.push(url);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(document)
}

/// Decode an XML entity reference (without `&` and `;`).
pub(crate) fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        _ => format!("&{entity};"),
    }
}

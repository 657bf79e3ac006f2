//! HTTP request handlers.

pub(crate) mod sitemap;

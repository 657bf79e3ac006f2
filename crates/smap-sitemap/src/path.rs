//! Public URL paths.

/// Public path of a node below a site root.
///
/// Strips `root_path` from the front of `full_path`, matching whole path
/// segments only, so `/shopping` keeps its path under the prefix `shop`.
/// Empty segments are ignored, which makes the result independent of leading
/// or trailing slashes on either argument. A path equal to the prefix becomes
/// the empty string (the site homepage). A path outside the prefix is kept
/// unchanged.
///
/// ```
/// use smap_sitemap::public_path;
///
/// assert_eq!(public_path("/shop/products/shoes", "/shop"), "/products/shoes");
/// assert_eq!(public_path("/shop/", "shop"), "");
/// assert_eq!(public_path("/shopping", "/shop"), "/shopping");
/// ```
#[must_use]
pub fn public_path(full_path: &str, root_path: &str) -> String {
    let prefix: Vec<&str> = segments(root_path).collect();
    let path: Vec<&str> = segments(full_path).collect();

    let remaining = match path.strip_prefix(prefix.as_slice()) {
        Some(rest) => rest,
        None => path.as_slice(),
    };

    if remaining.is_empty() {
        String::new()
    } else {
        format!("/{}", remaining.join("/"))
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_prefix_keeps_path() {
        assert_eq!(public_path("/about", ""), "/about");
        assert_eq!(public_path("/blog/post-1", "/"), "/blog/post-1");
    }

    #[test]
    fn test_root_is_homepage() {
        assert_eq!(public_path("/", ""), "");
        assert_eq!(public_path("", ""), "");
    }

    #[test]
    fn test_strips_prefix() {
        assert_eq!(public_path("/shop/products/shoes", "shop"), "/products/shoes");
        assert_eq!(public_path("/shop/products", "/shop/"), "/products");
    }

    #[test]
    fn test_prefix_only_path_is_homepage() {
        assert_eq!(public_path("/shop", "/shop"), "");
        assert_eq!(public_path("/shop/", "shop"), "");
    }

    #[test]
    fn test_partial_segment_is_not_a_prefix() {
        assert_eq!(public_path("/shopping", "/shop"), "/shopping");
        assert_eq!(public_path("/shopping/cart", "shop"), "/shopping/cart");
    }

    #[test]
    fn test_multi_segment_prefix() {
        assert_eq!(public_path("/sites/shop/cart", "/sites/shop"), "/cart");
        assert_eq!(public_path("/sites/blog/cart", "/sites/shop"), "/sites/blog/cart");
    }

    #[test]
    fn test_path_outside_prefix_unchanged() {
        assert_eq!(public_path("/about", "/shop"), "/about");
    }

    #[test]
    fn test_duplicate_slashes_collapsed() {
        assert_eq!(public_path("//shop//cart/", "shop"), "/cart");
    }
}

//! The viewer page, embedded into the binary at compile time using
//! [`rust-embed`](rust_embed).

use crate::error::{ErrorKind, Result};
use exn::OptionExt;
use rust_embed::Embed;
use std::borrow::Cow;

/// File name of the viewer page, both embedded and once installed.
pub const PAGE_FILE: &str = "books.html";

#[derive(Embed)]
#[folder = "../../assets/viewer/"]
pub(crate) struct Assets;
impl Assets {
    pub(crate) fn load(name: impl AsRef<str>) -> Result<Cow<'static, [u8]>> {
        Self::get(name.as_ref())
            .map(|f| f.data)
            .ok_or_raise(|| ErrorKind::AssetNotFound(name.as_ref().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_is_embedded() {
        let page = Assets::load(PAGE_FILE).unwrap();
        let page = String::from_utf8_lossy(&page);
        assert!(page.contains(r#"<script src="books.js"></script>"#));
        assert!(page.contains("metadata.js"));
        assert!(page.contains("booksLibraryData"));
    }

    #[test]
    fn unknown_asset() {
        let err = Assets::load("nope.html").unwrap_err();
        assert!(matches!(&*err, ErrorKind::AssetNotFound(n) if n == "nope.html"));
    }
}

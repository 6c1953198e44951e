// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Link helpers for document sends.

use std::sync::OnceLock;

use regex::Regex;

/// Rewrite a Google Drive viewer link (`/file/d/<id>/view`) to its direct
/// download form so the chat platform can fetch the file itself. Any other
/// URL is returned unchanged.
pub fn gdrive_direct_url(url: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"drive\.google\.com/file/d/([^/]+)/").unwrap());

    match re.captures(url) {
        Some(caps) => format!(
            "https://drive.google.com/uc?export=download&id={}",
            &caps[1]
        ),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_link_is_rewritten() {
        assert_eq!(
            gdrive_direct_url("https://drive.google.com/file/d/abc123/view?usp=sharing"),
            "https://drive.google.com/uc?export=download&id=abc123"
        );
    }

    #[test]
    fn other_urls_pass_through() {
        let url = "https://example.com/guide.pdf";
        assert_eq!(gdrive_direct_url(url), url);
    }
}

// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Markdown stripping for seller replies.
//!
//! The completion model tends to emit markdown even when asked not to;
//! chat messages are sent as plain text, so the basic markup is removed
//! before relaying.

use std::sync::OnceLock;

use regex::Regex;

struct StripRules {
    link: Regex,
    bold: Regex,
    italic: Regex,
    underline: Regex,
    emphasis: Regex,
    code: Regex,
}

fn rules() -> &'static StripRules {
    static RULES: OnceLock<StripRules> = OnceLock::new();
    RULES.get_or_init(|| StripRules {
        // [text](url) -> text
        link: Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap(),
        bold: Regex::new(r"\*\*(.*?)\*\*").unwrap(),
        italic: Regex::new(r"\*(.*?)\*").unwrap(),
        underline: Regex::new(r"__(.*?)__").unwrap(),
        emphasis: Regex::new(r"_(.*?)_").unwrap(),
        // `x` or ```x``` -> x
        code: Regex::new(r"(?s)`{1,3}(.*?)`{1,3}").unwrap(),
    })
}

/// Remove basic markdown markup, keeping the visible text.
pub fn strip(text: &str) -> String {
    let r = rules();
    let text = r.link.replace_all(text, "$1");
    let text = r.bold.replace_all(&text, "$1");
    let text = r.italic.replace_all(&text, "$1");
    let text = r.underline.replace_all(&text, "$1");
    let text = r.emphasis.replace_all(&text, "$1");
    let text = r.code.replace_all(&text, "$1");
    text.into_owned()
}

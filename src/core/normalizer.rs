use crate::domain::model::NormalizedText;
use regex::Regex;
use scraper::{Html, Node};
use std::sync::LazyLock;

/// 標籤必須以字母、`/`、`!` 或 `?` 開頭，所以 "a < b" 這類文字會被保留
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[A-Za-z/!?][^<>]*>").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Elements whose text never reaches the reader.
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Strips markup, entities and redundant whitespace from scraped page text.
///
/// Idempotent: `normalize(normalize(x).as_str()) == normalize(x)`. Each cleaning
/// pass is repeated until the text stops changing, because decoding an entity
/// such as `&lt;b&gt;` can reveal markup that the next pass has to remove.
pub fn normalize(raw: &str) -> NormalizedText {
    let mut current = clean_pass(raw);
    loop {
        let next = clean_pass(&current);
        if next == current {
            return NormalizedText(current);
        }
        current = next;
    }
}

fn clean_pass(input: &str) -> String {
    let document = Html::parse_document(&scrub_chars(input));

    // 每個文字節點之間補空白，"<p>a</p><p>b</p>" 才不會黏成 "ab"
    let mut text = String::with_capacity(input.len());
    for node in document.root_element().descendants() {
        let Node::Text(chunk) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| HIDDEN_ELEMENTS.contains(&e.name()))
        });
        if !hidden {
            text.push_str(chunk);
            text.push(' ');
        }
    }

    let text = scrub_chars(&text);
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// 控制字元換成空白，零寬字元直接移除（解析前後各做一次，數字實體也可能解出控制字元）
fn scrub_chars(input: &str) -> String {
    input
        .chars()
        .filter(|c| !is_invisible(*c))
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}'
    )
}

/// True when `text` contains something shaped like an HTML tag.
pub fn contains_tag(text: &str) -> bool {
    TAG.is_match(text)
}

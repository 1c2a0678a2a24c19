use deckpick_core::{normalize_decks, resolve_deck_array, Deck, DeckError, DECK_PATHS};
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::{debug, warn};

/// Script element that carries the server-rendered page state.
pub const EMBEDDED_DATA_MARKER: &str = "script#__NEXT_DATA__";

/// Upper bound on how much raw payload an error message may quote.
pub const PREVIEW_LIMIT: usize = 120;

fn embedded_data_selector() -> Selector {
    Selector::parse(EMBEDDED_DATA_MARKER).expect("static selector")
}

/// Text of the embedded data block, or `ExtractionFailed` if the page has none.
pub fn locate_embedded_data(html: &str) -> Result<String, DeckError> {
    let document = Html::parse_document(html);
    document
        .select(&embedded_data_selector())
        .next()
        .map(|script| script.text().collect::<String>())
        .ok_or_else(|| DeckError::ExtractionFailed {
            marker: EMBEDDED_DATA_MARKER.to_string(),
        })
}

/// Parses the block; failures quote at most [`PREVIEW_LIMIT`] characters
/// around the parser's error position.
pub fn parse_payload(text: &str) -> Result<Value, DeckError> {
    serde_json::from_str(text).map_err(|err| DeckError::MalformedPayload {
        message: err.to_string(),
        preview: preview_around(text, err.line(), err.column()),
    })
}

/// Page markup to normalized decks, in upstream order and unfiltered.
pub fn extract_folder(html: &str) -> Result<Vec<Deck>, DeckError> {
    let block = locate_embedded_data(html)?;
    let root = parse_payload(&block)?;
    let (path, raw) = resolve_deck_array(&root, DECK_PATHS)?;
    let (decks, skipped) = normalize_decks(raw);
    debug!(path = %path.dotted(), decks = decks.len(), "deck array resolved");
    if skipped > 0 {
        warn!(skipped, "skipped deck records without an id");
    }
    Ok(decks)
}

/// Window of the payload centred on 1-based `line`/`column`, on char
/// boundaries, never longer than [`PREVIEW_LIMIT`] characters.
pub fn preview_around(text: &str, line: usize, column: usize) -> String {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let offset = (line_start + column.saturating_sub(1)).min(text.len());
    let chars_before = text[..floor_char_boundary(text, offset)].chars().count();
    let start = chars_before.saturating_sub(PREVIEW_LIMIT / 2);
    text.chars().skip(start).take(PREVIEW_LIMIT).collect()
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckpick_core::Bracket;

    fn page(script_body: &str) -> String {
        format!(
            r#"<!DOCTYPE html><html><head><title>Folder</title>
<script src="/_next/static/chunks/main.js"></script></head>
<body><div id="__next"></div>
<script id="__NEXT_DATA__" type="application/json">{script_body}</script>
</body></html>"#
        )
    }

    #[test]
    fn extracts_folder_decks() {
        let html = page(
            r#"{"props":{"pageProps":{"folder":{"decks":[
                {"id":1,"name":"Yuriko","edhBracket":4},
                {"id":2,"name":"Kinnan <Combo>","edhBracket":null}
            ]}}}}"#,
        );
        let decks = extract_folder(&html).expect("decks");
        assert_eq!(decks.len(), 2);
        assert_eq!(decks[0].bracket, Bracket::rated("4"));
        assert_eq!(decks[1].name, "Kinnan <Combo>");
        assert_eq!(decks[1].bracket, Bracket::NotFound);
    }

    #[test]
    fn odd_ids_pass_through_and_only_idless_records_drop() {
        let html = page(
            r#"{"props":{"pageProps":{"folder":{"decks":[
                {"name":"no id","edhBracket":"3"},
                {"id":1.5,"name":"float id","edhBracket":"2"},
                {"id":-4,"name":"negative id"}
            ]}}}}"#,
        );
        let decks = extract_folder(&html).expect("decks");
        let ids: Vec<String> = decks.iter().map(|d| d.id.to_string()).collect();
        assert_eq!(ids, vec!["1.5", "-4"]);
        assert!(decks[0].has_bracket());
    }

    #[test]
    fn missing_marker_is_extraction_failure() {
        let html = "<html><body><script>window.x = 1</script></body></html>";
        assert_eq!(
            extract_folder(html),
            Err(DeckError::ExtractionFailed {
                marker: EMBEDDED_DATA_MARKER.to_string()
            })
        );
    }

    #[test]
    fn broken_json_is_malformed_with_bounded_preview() {
        let filler = "x".repeat(500);
        let html = page(&format!(r#"{{"props": {{"pad": "{filler}", oops}}}}"#));
        match extract_folder(&html) {
            Err(DeckError::MalformedPayload { message, preview }) => {
                assert!(message.contains("line 1"));
                assert!(preview.chars().count() <= PREVIEW_LIMIT);
                assert!(preview.contains("oops"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_shape_is_schema_mismatch() {
        let html = page(r#"{"props":{"pageProps":{"folders":[]}}}"#);
        assert!(matches!(
            extract_folder(&html),
            Err(DeckError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn preview_handles_multibyte_and_multiline() {
        let text = "{\n  \"name\": \"Ürzas Ünterwelt\",\n  bad\n}";
        let preview = preview_around(text, 3, 3);
        assert!(preview.contains("bad"));
        assert_eq!(preview_around("", 1, 1), "");
        assert_eq!(preview_around("äöü", 1, 2), "äöü");
    }
}

use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token as HtmlToken, TokenSink, TokenSinkResult, Tokenizer,
    TokenizerOpts, TokenizerResult,
};

use crate::parsing::token::{Attribute, Tag, Token};

const CHUNK_SIZE: usize = 8 * 1024;

const VOID_ELEMENTS: [&str; 15] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Collects html5ever tokens into our own [`Token`] values.
#[derive(Default)]
struct TokenCollector {
    queue: VecDeque<Token>,
    text: String,
}

impl TokenCollector {
    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.queue.push_back(Token::Text(std::mem::take(&mut self.text)));
        }
    }

    fn push_tag(&mut self, tag: html5ever::tokenizer::Tag) -> TokenSinkResult<()> {
        let name = tag.name.to_string();

        match tag.kind {
            TagKind::StartTag => {
                let attributes = tag
                    .attrs
                    .iter()
                    .map(|attr| Attribute {
                        key: attr.name.local.to_string(),
                        value: attr.value.to_string(),
                    })
                    .collect();

                self.queue.push_back(Token::StartTag(Tag {
                    name: name.clone(),
                    attributes,
                }));

                // Zero-width element, close it right away
                if tag.self_closing || is_void_element(&name) {
                    self.queue.push_back(Token::EndTag(Tag::new(&name)));
                    return TokenSinkResult::Continue;
                }

                match name.as_str() {
                    "script" => TokenSinkResult::RawData(RawKind::ScriptData),
                    "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => {
                        TokenSinkResult::RawData(RawKind::Rawtext)
                    }
                    "textarea" | "title" => TokenSinkResult::RawData(RawKind::Rcdata),
                    "plaintext" => TokenSinkResult::Plaintext,
                    _ => TokenSinkResult::Continue,
                }
            }
            TagKind::EndTag => {
                self.queue.push_back(Token::EndTag(Tag::new(&name)));
                TokenSinkResult::Continue
            }
        }
    }
}

impl TokenSink for TokenCollector {
    type Handle = ();

    fn process_token(&mut self, token: HtmlToken, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            HtmlToken::CharacterTokens(text) => {
                self.text.push_str(&text);
                TokenSinkResult::Continue
            }
            HtmlToken::NullCharacterToken | HtmlToken::ParseError(_) => TokenSinkResult::Continue,
            HtmlToken::TagToken(tag) => {
                // Void elements were already closed when they started
                if tag.kind == TagKind::EndTag && is_void_element(&tag.name) {
                    return TokenSinkResult::Continue;
                }
                self.flush_text();
                self.push_tag(tag)
            }
            // Comments, doctypes and EOF end the current text run
            _ => {
                self.flush_text();
                TokenSinkResult::Continue
            }
        }
    }
}

/// Decodes `bytes` up to the last complete character, replacing invalid
/// sequences with U+FFFD. An incomplete trailing sequence is left undecoded
/// unless `at_eof`. Returns the text and the number of bytes consumed.
fn decode_utf8_prefix(bytes: &[u8], at_eof: bool) -> (String, usize) {
    let mut text = String::with_capacity(bytes.len());
    let mut rest = bytes;

    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                text.push_str(valid);
                return (text, bytes.len());
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                text.push_str(&String::from_utf8_lossy(valid));

                match e.error_len() {
                    Some(invalid) => {
                        text.push(char::REPLACEMENT_CHARACTER);
                        rest = &after[invalid..];
                    }
                    None if at_eof => {
                        text.push(char::REPLACEMENT_CHARACTER);
                        return (text, bytes.len());
                    }
                    // Sequence cut by the chunk boundary, keep it for the next read
                    None => return (text, bytes.len() - after.len()),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Reading,
    Draining,
    Done,
}

/// Lazy, single-pass token sequence over a byte stream.
pub struct TokenStream<R> {
    reader: R,
    tokenizer: Tokenizer<TokenCollector>,
    input: BufferQueue,
    pending: Vec<u8>,
    chunk_size: usize,
    state: StreamState,
}

/// Tokenizes `reader` as HTML, one chunk at a time.
///
/// Void and self-closing elements come out as a start tag immediately followed
/// by an end tag, so every start tag has a matching end tag in a well-formed
/// document. The sequence always finishes with a single [`Token::End`].
pub fn tokenize<R: Read>(reader: R) -> TokenStream<R> {
    TokenStream::with_chunk_size(reader, CHUNK_SIZE)
}

impl<R: Read> TokenStream<R> {
    pub(crate) fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        TokenStream {
            reader,
            tokenizer: Tokenizer::new(TokenCollector::default(), TokenizerOpts::default()),
            input: BufferQueue::default(),
            pending: Vec::new(),
            chunk_size: chunk_size.max(1),
            state: StreamState::Reading,
        }
    }

    fn fill(&mut self) {
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            match self.reader.read(&mut buffer) {
                Ok(0) => {
                    self.push_text(true);
                    self.finish();
                    return;
                }
                Ok(read) => {
                    self.pending.extend_from_slice(&buffer[..read]);
                    self.push_text(false);
                    return;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => {
                    self.finish();
                    return;
                }
            }
        }
    }

    /// Moves the decodable prefix of `pending` into the tokenizer.
    fn push_text(&mut self, at_eof: bool) {
        let (text, consumed) = decode_utf8_prefix(&self.pending, at_eof);
        self.pending.drain(..consumed);

        if text.is_empty() {
            return;
        }

        self.input.push_back(StrTendril::from_slice(&text));
        match self.tokenizer.feed(&mut self.input) {
            TokenizerResult::Done => {}
            // The collector never hands out script handles
            TokenizerResult::Script(()) => {}
        }
    }

    fn finish(&mut self) {
        self.tokenizer.end();
        self.state = StreamState::Draining;
    }
}

impl<R: Read> Iterator for TokenStream<R> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.tokenizer.sink.queue.pop_front() {
                return Some(token);
            }

            match self.state {
                StreamState::Reading => self.fill(),
                StreamState::Draining => {
                    self.state = StreamState::Done;
                    return Some(Token::End);
                }
                StreamState::Done => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    fn collect(html: &str) -> Vec<Token> {
        tokenize(html.as_bytes()).collect()
    }

    fn start(name: &str) -> Token {
        Token::StartTag(Tag::new(name))
    }

    fn end(name: &str) -> Token {
        Token::EndTag(Tag::new(name))
    }

    fn text(content: &str) -> Token {
        Token::Text(content.to_string())
    }

    #[test]
    fn empty_input_yields_only_end() {
        assert_eq!(collect(""), vec![Token::End]);
    }

    #[test]
    fn end_is_emitted_once() {
        let mut stream = tokenize("<p>hi</p>".as_bytes());
        assert_eq!(stream.by_ref().last(), Some(Token::End));
        assert_eq!(stream.next(), None);
    }

    #[test]
    fn tags_carry_lowercased_names_and_ordered_attributes() {
        let tokens = collect(r#"<DIV Class="item-info wide" data-id="7">x</DIV>"#);

        assert_eq!(
            tokens,
            vec![
                Token::StartTag(
                    Tag::new("div")
                        .with_attribute("class", "item-info wide")
                        .with_attribute("data-id", "7")
                ),
                text("x"),
                end("div"),
                Token::End,
            ]
        );
    }

    #[test]
    fn void_elements_are_closed_immediately() {
        let tokens = collect(r#"<div><br><img src="a.png"></div>"#);

        assert_eq!(
            tokens,
            vec![
                start("div"),
                start("br"),
                end("br"),
                Token::StartTag(Tag::new("img").with_attribute("src", "a.png")),
                end("img"),
                end("div"),
                Token::End,
            ]
        );
    }

    #[test]
    fn self_closing_tags_are_closed_immediately() {
        let tokens = collect("<div><span/></div>");

        assert_eq!(
            tokens,
            vec![
                start("div"),
                start("span"),
                end("span"),
                end("div"),
                Token::End
            ]
        );
    }

    #[test]
    fn stray_void_end_tags_are_dropped() {
        let tokens = collect("<p>a</br>b</p>");

        assert_eq!(
            tokens,
            vec![start("p"), text("ab"), end("p"), Token::End]
        );
    }

    #[test]
    fn entity_references_do_not_split_text() {
        let tokens = collect("<span>&pound;1.35</span>");

        assert_eq!(
            tokens,
            vec![start("span"), text("£1.35"), end("span"), Token::End]
        );
    }

    #[test]
    fn comments_end_a_text_run() {
        let tokens = collect("a<!-- note -->b");

        assert_eq!(tokens, vec![text("a"), text("b"), Token::End]);
    }

    #[test]
    fn script_contents_are_text() {
        let tokens = collect("<script>if (a < b) { x('<div>'); }</script><p></p>");

        assert_eq!(
            tokens,
            vec![
                start("script"),
                text("if (a < b) { x('<div>'); }"),
                end("script"),
                start("p"),
                end("p"),
                Token::End,
            ]
        );
    }

    #[test]
    fn multibyte_characters_survive_chunk_boundaries() {
        let html = "<span>13,69 €</span><span>£1.35</span>";
        let tokens: Vec<Token> = TokenStream::with_chunk_size(html.as_bytes(), 1).collect();

        assert_eq!(
            tokens,
            vec![
                start("span"),
                text("13,69 €"),
                end("span"),
                start("span"),
                text("£1.35"),
                end("span"),
                Token::End,
            ]
        );
    }

    #[test]
    fn cut_character_survives_an_earlier_invalid_byte() {
        let bytes: &[u8] = b"\xff<span>13,69 \xe2\x82\xac</span>";
        let tokens: Vec<Token> = TokenStream::with_chunk_size(bytes, bytes.len() - 8).collect();

        assert_eq!(
            tokens,
            vec![
                text("\u{fffd}"),
                start("span"),
                text("13,69 €"),
                end("span"),
                Token::End,
            ]
        );
    }

    #[test]
    fn decodes_up_to_the_last_complete_character() {
        assert_eq!(
            decode_utf8_prefix(b"a\xffb\xe2\x82", false),
            ("a\u{fffd}b".to_string(), 3)
        );
        assert_eq!(
            decode_utf8_prefix(b"a\xe2\x82", true),
            ("a\u{fffd}".to_string(), 3)
        );
        assert_eq!(decode_utf8_prefix(b"\xe2", false), (String::new(), 0));
    }

    #[test]
    fn noscript_contents_are_text() {
        let tokens = collect(r#"<noscript><img src="x"></noscript>"#);

        assert_eq!(
            tokens,
            vec![
                start("noscript"),
                text(r#"<img src="x">"#),
                end("noscript"),
                Token::End,
            ]
        );
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let bytes: &[u8] = b"<p>a\xffb</p>";
        let tokens: Vec<Token> = tokenize(bytes).collect();

        assert_eq!(
            tokens,
            vec![start("p"), text("a\u{fffd}b"), end("p"), Token::End]
        );
    }

    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::new(ErrorKind::ConnectionReset, "reset"));
            }
            self.served = true;
            let chunk = b"<p>partial";
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    #[test]
    fn read_errors_end_the_stream() {
        let tokens: Vec<Token> = tokenize(FailingReader { served: false }).collect();

        assert_eq!(tokens.first(), Some(&start("p")));
        assert_eq!(tokens.last(), Some(&Token::End));
    }
}

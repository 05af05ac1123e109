use std::collections::VecDeque;
use std::str::Chars;

/// Filter id that closes the innermost open filter scope.
pub const CLOSE_FILTER: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawToken {
    /// Text spoken by `speaker`. May be empty or blank; validation drops those.
    Speech { speaker: String, text: String },
    /// `{id}`: opens a filter scope.
    OpenFilter(String),
    /// `{.}`: closes the innermost filter scope.
    CloseFilter,
    /// `[n]`: inserts sound effect `n`, in canonical integer form.
    SoundEffect(String),
}

/// Lazily scan `input` into raw tokens, starting with `default_speaker` as the current speaker.
pub fn lex<'a>(input: &'a str, default_speaker: &str) -> Lexer<'a> {
    Lexer {
        chars: input.chars(),
        speaker: default_speaker.to_owned(),
        text: String::new(),
        queued: VecDeque::new(),
        finished: false,
    }
}

/// Single-pass token stream over markup text. See [`lex`].
pub struct Lexer<'a> {
    chars: Chars<'a>,
    speaker: String,
    text: String,
    // A delimiter flushes speech and may produce a marker in the same step.
    queued: VecDeque<RawToken>,
    finished: bool,
}

impl Lexer<'_> {
    /// Speaker that text scanned from here on is attributed to.
    pub fn current_speaker(&self) -> &str {
        &self.speaker
    }

    fn flush(&mut self) -> RawToken {
        RawToken::Speech {
            speaker: self.speaker.clone(),
            text: std::mem::take(&mut self.text),
        }
    }

    /// `name:` — everything before the last word goes to the old speaker, the last word becomes
    /// the new speaker.
    fn switch_speaker(&mut self) -> RawToken {
        let text = std::mem::take(&mut self.text);
        let (before, name) = match text.rsplit_once(|c: char| c == ' ' || c == '\n') {
            Some((before, name)) => (before.replace('\n', " "), name.to_owned()),
            None => (String::new(), text),
        };
        let previous = std::mem::replace(&mut self.speaker, name);
        RawToken::Speech {
            speaker: previous,
            text: before,
        }
    }

    /// Consume up to and including `delim`. Returns `None` for an empty body or when input ends
    /// first; the consumed characters are gone either way.
    fn scan_to(&mut self, delim: char) -> Option<String> {
        let mut body = String::new();
        loop {
            match self.chars.next() {
                None => return None,
                Some(c) if c == delim => break,
                Some(c) => body.push(c),
            }
        }
        if body.is_empty() { None } else { Some(body) }
    }
}

impl Iterator for Lexer<'_> {
    type Item = RawToken;

    fn next(&mut self) -> Option<RawToken> {
        loop {
            if let Some(tok) = self.queued.pop_front() {
                return Some(tok);
            }
            if self.finished {
                return None;
            }

            match self.chars.next() {
                None => {
                    self.finished = true;
                    return Some(self.flush());
                }
                Some(':') => return Some(self.switch_speaker()),
                Some('{') => {
                    let speech = self.flush();
                    match self.scan_to('}') {
                        Some(id) if id == CLOSE_FILTER => {
                            self.queued.push_back(RawToken::CloseFilter);
                        }
                        Some(id) => self.queued.push_back(RawToken::OpenFilter(id)),
                        None => tracing::debug!("unterminated or empty filter marker dropped"),
                    }
                    return Some(speech);
                }
                Some('[') => {
                    let speech = self.flush();
                    if let Some(body) = self.scan_to(']') {
                        match canonical_integer(&body) {
                            Some(id) => self.queued.push_back(RawToken::SoundEffect(id)),
                            None => tracing::debug!(body = %body, "non-integer sound effect dropped"),
                        }
                    }
                    return Some(speech);
                }
                Some(c) => self.text.push(c),
            }
        }
    }
}

/// Canonical form of an integer literal of any size: optional sign, ASCII digits, surrounding
/// whitespace allowed. `" +007 "` becomes `"7"` and `"-0"` becomes `"0"`.
fn canonical_integer(body: &str) -> Option<String> {
    let body = body.trim();
    let (negative, digits) = match body.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, body.strip_prefix('+').unwrap_or(body)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits = match digits.trim_start_matches('0') {
        "" => return Some("0".to_owned()),
        d => d,
    };
    Some(if negative {
        format!("-{digits}")
    } else {
        digits.to_owned()
    })
}

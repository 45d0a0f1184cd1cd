//! Text segmentation for speech.
//!
//! Splits text into paragraphs and then into speakable parts bounded by a
//! maximum length, preferring to break at natural linguistic pauses.
//! Everything here is pure and deterministic.

/// Characters that end a paragraph. Runs of them count as one separator.
const LINE_BREAKS: [char; 4] = ['\n', '\r', '\u{2028}', '\u{2029}'];

/// Trailing characters that mark a natural pause in speech.
const PAUSE_PUNCTUATION: [char; 6] = ['.', ',', '!', '?', ':', ';'];

/// Split text into paragraphs at line breaks.
///
/// Consecutive line-break characters act as a single separator; paragraphs
/// that are empty (or whitespace only) are dropped.
#[must_use]
pub fn split_to_paragraphs(text: &str) -> Vec<String> {
    text.split(|c: char| LINE_BREAKS.contains(&c))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Whether a word closes a part on its own: a standalone dash (`-`, `--`)
/// or a word ending in pause punctuation.
#[must_use]
pub fn is_natural_pause(word: &str) -> bool {
    word == "-" || word == "--" || word.ends_with(PAUSE_PUNCTUATION)
}

/// Split text into parts of fewer than `max_length` characters.
///
/// Words are accumulated greedily, separated by single spaces. A word that
/// is a natural pause closes the current part immediately. Otherwise, when
/// appending the next word (plus its separating space) would make the part
/// reach `max_length` characters, the part is closed and the word starts a
/// new one. Words are never split: a word longer than `max_length` becomes
/// its own over-length part.
#[must_use]
pub fn split_to_bounded_parts(text: &str, max_length: usize) -> Vec<String> {
    let max_length = max_length.max(1);
    let mut parts: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len >= max_length {
            parts.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;

        if is_natural_pause(word) {
            parts.push(std::mem::take(&mut current));
            current_len = 0;
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }

    parts.retain(|p| !p.trim().is_empty());
    parts
}

/// Split text into the ordered parts a session speaks.
///
/// Paragraphs are always separated. With `speak_long_texts` each paragraph
/// is spoken whole; otherwise paragraphs are cut into bounded parts.
#[must_use]
pub fn speech_parts(text: &str, speak_long_texts: bool, max_length: usize) -> Vec<String> {
    let paragraphs = split_to_paragraphs(text);

    if speak_long_texts {
        return paragraphs;
    }

    paragraphs
        .iter()
        .flat_map(|p| split_to_bounded_parts(p, max_length))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tiny deterministic generator for the property-style tests.
    struct Lcg(u64);

    impl Lcg {
        fn next_u64(&mut self) -> u64 {
            self.0 = self
                .0
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            self.0 >> 33
        }

        fn below(&mut self, n: u64) -> usize {
            usize::try_from(self.next_u64() % n).unwrap()
        }
    }

    fn random_text(rng: &mut Lcg) -> String {
        const WORDS: &[&str] = &[
            "a", "speech", "engine", "word,", "pause.", "--", "-", "Ünïcödé", "why?", "list:",
            "semi;", "wow!", "extraordinarily-long-hyphenated-compound", "x", "the", "of",
        ];
        const GAPS: &[&str] = &[" ", "  ", "\t", " \u{a0}", "\n", " \r\n "];

        let count = rng.below(40);
        let mut text = String::new();
        for _ in 0..count {
            text.push_str(WORDS[rng.below(WORDS.len() as u64)]);
            text.push_str(GAPS[rng.below(GAPS.len() as u64)]);
        }
        text
    }

    #[test]
    fn test_paragraphs_split_on_all_line_breaks() {
        let text = "One\nTwo\r\nThree\u{2028}Four\u{2029}Five";
        assert_eq!(
            split_to_paragraphs(text),
            vec!["One", "Two", "Three", "Four", "Five"]
        );
    }

    #[test]
    fn test_paragraphs_collapse_runs_and_drop_empty() {
        let text = "\n\nFirst\n\n\n  \nSecond\r\r";
        assert_eq!(split_to_paragraphs(text), vec!["First", "Second"]);
        assert!(split_to_paragraphs("").is_empty());
        assert!(split_to_paragraphs("\n\r\n").is_empty());
    }

    #[test]
    fn test_natural_pause_detection() {
        assert!(is_natural_pause("-"));
        assert!(is_natural_pause("--"));
        assert!(is_natural_pause("end."));
        assert!(is_natural_pause("so,"));
        assert!(is_natural_pause("note:"));
        assert!(!is_natural_pause("---"));
        assert!(!is_natural_pause("well-known"));
        assert!(!is_natural_pause("word"));
    }

    #[test]
    fn test_short_text_is_one_part() {
        assert_eq!(
            split_to_bounded_parts("Hello world.", 100),
            vec!["Hello world."]
        );
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(split_to_bounded_parts("", 10).is_empty());
        assert!(split_to_bounded_parts(" \t\n ", 10).is_empty());
    }

    #[test]
    fn test_pause_closes_part_before_budget() {
        assert_eq!(
            split_to_bounded_parts("Hi, there friend. How are you", 100),
            vec!["Hi,", "there friend.", "How are you"]
        );
        assert_eq!(
            split_to_bounded_parts("wait -- what", 100),
            vec!["wait --", "what"]
        );
    }

    #[test]
    fn test_one_part_per_sentence_regardless_of_max_length() {
        for max in [1, 2, 5, 100, 10_000] {
            assert_eq!(
                split_to_bounded_parts("Hi. Bye. Ok.", max),
                vec!["Hi.", "Bye.", "Ok."],
                "max_length {max}"
            );
        }
    }

    #[test]
    fn test_budget_closes_part_when_reached() {
        // "aaa bbb" is 7 chars; adding " ccc" would make 11 >= 10.
        assert_eq!(
            split_to_bounded_parts("aaa bbb ccc ddd", 10),
            vec!["aaa bbb", "ccc ddd"]
        );
        // Exactly reaching the limit also closes.
        assert_eq!(split_to_bounded_parts("aaaa bbbb", 9), vec!["aaaa", "bbbb"]);
        assert_eq!(split_to_bounded_parts("aaaa bbbb", 10), vec!["aaaa bbbb"]);
    }

    #[test]
    fn test_long_word_is_never_split() {
        assert_eq!(
            split_to_bounded_parts("tiny supercalifragilistic end", 8),
            vec!["tiny", "supercalifragilistic", "end"]
        );
    }

    #[test]
    fn test_lengths_are_counted_in_characters() {
        // Five two-byte characters per word.
        assert_eq!(
            split_to_bounded_parts("ééééé ééééé", 12),
            vec!["ééééé ééééé"]
        );
    }

    #[test]
    fn test_every_part_is_bounded_or_a_single_long_word() {
        let mut rng = Lcg(0x5eed);
        for _ in 0..500 {
            let text = random_text(&mut rng);
            let max = rng.below(30) + 1;
            for part in split_to_bounded_parts(&text, max) {
                let len = part.chars().count();
                assert!(
                    len <= max || !part.contains(' '),
                    "part {part:?} exceeds {max} chars"
                );
                assert_eq!(part, part.trim());
                assert!(!part.is_empty());
            }
        }
    }

    #[test]
    fn test_splitting_keeps_every_word_in_order() {
        let mut rng = Lcg(42);
        for _ in 0..200 {
            let text = random_text(&mut rng);
            let max = rng.below(20) + 1;
            let rejoined: Vec<String> = split_to_bounded_parts(&text, max)
                .iter()
                .flat_map(|p| p.split(' ').map(ToString::to_string).collect::<Vec<_>>())
                .collect();
            let original: Vec<String> = text.split_whitespace().map(ToString::to_string).collect();
            assert_eq!(rejoined, original);
        }
    }

    #[test]
    fn test_speech_parts_long_texts_keep_paragraphs_whole() {
        let text = "First paragraph, with a pause.\nSecond one";
        assert_eq!(
            speech_parts(text, true, 5),
            vec!["First paragraph, with a pause.", "Second one"]
        );
        assert_eq!(
            speech_parts(text, false, 100),
            vec!["First paragraph,", "with a pause.", "Second one"]
        );
    }

    #[test]
    fn test_speech_parts_never_join_paragraphs() {
        assert_eq!(speech_parts("one\ntwo", false, 100), vec!["one", "two"]);
    }
}

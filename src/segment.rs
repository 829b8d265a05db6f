use unicode_segmentation::UnicodeSegmentation;

/// Locale-aware sentence boundary detection, treated as a black box.
///
/// Implementations must be pure and synchronous: same input, same output,
/// no side effects. Returned sentences are trimmed and non-empty.
pub trait SentenceSegmenter {
    fn split(&self, text: &str) -> Vec<String>;
}

/// Default oracle over UAX #29 sentence boundaries.
///
/// The locale is carried for API parity with locale-aware segmenters;
/// UAX #29 default rules apply regardless of its value.
#[derive(Clone, Debug)]
pub struct UnicodeSegmenter {
    locale: String,
}

impl UnicodeSegmenter {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }
}

impl Default for UnicodeSegmenter {
    fn default() -> Self {
        Self::new("en")
    }
}

impl SentenceSegmenter for UnicodeSegmenter {
    fn split(&self, text: &str) -> Vec<String> {
        text.split_sentence_bounds()
            .map(str::trim)
            .filter(|sentence| !sentence.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_two_sentences() {
        let segmenter = UnicodeSegmenter::default();
        assert_eq!(
            segmenter.split("Hello world. This is a test."),
            vec!["Hello world.", "This is a test."],
        );
    }

    #[test]
    fn trims_and_drops_empty_segments() {
        let segmenter = UnicodeSegmenter::default();
        assert_eq!(segmenter.split("   "), Vec::<String>::new());
        assert_eq!(segmenter.split(""), Vec::<String>::new());
        assert_eq!(segmenter.split("  One.  "), vec!["One."]);
    }

    #[test]
    fn single_sentence_without_terminator() {
        let segmenter = UnicodeSegmenter::default();
        assert_eq!(segmenter.split("New text here"), vec!["New text here"]);
    }

    #[test]
    fn carries_locale() {
        assert_eq!(UnicodeSegmenter::new("de").locale(), "de");
        assert_eq!(UnicodeSegmenter::default().locale(), "en");
    }
}

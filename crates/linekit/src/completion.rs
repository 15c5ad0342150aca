//! Completion providers for handlers.
//!
//! A handler answers completion requests with a [`Completion`]. The helpers here
//! build that answer from a word list, so a handler's `complete` can usually
//! delegate to a [`PrefixCompleter`].

use crate::Completion;

/// Something that completes the text before the cursor.
///
/// Closures taking `&str` and returning a [`Completion`] implement this trait.
///
/// ```
/// use linekit::completion::Completer;
/// use linekit::Completion;
///
/// let completer = |text: &str| {
///     if "quit".starts_with(text) {
///         Completion::unique(&"quit"[text.len()..], "quit")
///     } else {
///         Completion::none()
///     }
/// };
/// assert_eq!(completer.complete("qu").addendum, "it");
/// ```
pub trait Completer {
    fn complete(&self, text: &str) -> Completion;
}

impl<F> Completer for F
where
    F: Fn(&str) -> Completion,
{
    fn complete(&self, text: &str) -> Completion {
        self(text)
    }
}

/// Completes the last space-delimited word against a fixed vocabulary.
///
/// A single match yields the rest of that word as the addendum. Several matches
/// yield their longest common extension as the addendum and all matches as
/// candidates.
///
/// # Examples
///
/// ```
/// use linekit::completion::{Completer, PrefixCompleter};
///
/// let completer = PrefixCompleter::new(["print", "println", "quit"]);
///
/// let completion = completer.complete("qu");
/// assert_eq!(completion.addendum, "it");
/// assert!(completion.is_unambiguous());
///
/// let completion = completer.complete("let x = pr");
/// assert_eq!(completion.addendum, "int");
/// assert_eq!(completion.candidates, ["print", "println"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PrefixCompleter {
    words: Vec<String>,
}

impl PrefixCompleter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut completer = PrefixCompleter::default();
        completer.extend(words);
        completer
    }

    /// Add words to the vocabulary. Duplicates are ignored.
    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.words.extend(words.into_iter().map(Into::into));
        self.words.sort();
        self.words.dedup();
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

impl Completer for PrefixCompleter {
    fn complete(&self, text: &str) -> Completion {
        let word = last_word(text);
        let matches: Vec<String> = self
            .words
            .iter()
            .filter(|candidate| candidate.starts_with(word))
            .cloned()
            .collect();

        match matches.as_slice() {
            [] => Completion::none(),
            [only] => Completion::unique(&only[word.len()..], only.clone()),
            [first, rest @ ..] => {
                let common = rest
                    .iter()
                    .fold(first.as_str(), |prefix, candidate| {
                        common_prefix(prefix, candidate)
                    });
                Completion::ambiguous(&common[word.len()..], matches.clone())
            }
        }
    }
}

/// The text after the last space.
fn last_word(text: &str) -> &str {
    match text.rfind(' ') {
        Some(index) => &text[index + 1..],
        None => text,
    }
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map(|((index, _), _)| index)
        .unwrap_or_else(|| a.len().min(b.len()));
    &a[..end]
}

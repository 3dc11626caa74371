//! Recognizes items being handed to the bot in action messages.
//!
//! When someone writes `/me hands holdbot a rusty key`, the action text is
//! `hands holdbot a rusty key` and the bot should put `a rusty key` in the bag.

use std::sync::LazyLock;

use regex::Regex;

static GIFT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:hands|tosses|throws|gives)\s+(\S+)\s+(.+)").expect("valid gift regex")
});

/// Extracts the gifted item from the text of an action message, if the action hands something
/// to `nickname`.
///
/// The recipient is compared case-insensitively.
///
/// # Example
///
/// ```rust
/// use bag_of_holding::parse_gift_message;
///
/// assert_eq!(parse_gift_message("hands Bot a rusty key", "bot"), Some("a rusty key"));
/// assert_eq!(parse_gift_message("hands SomeoneElse a rusty key", "bot"), None);
/// ```
#[must_use]
pub fn parse_gift_message<'a>(text: &'a str, nickname: &str) -> Option<&'a str> {
    let captures = GIFT_RE.captures(text)?;
    let recipient = captures.get(1)?.as_str();

    if recipient.to_lowercase() != nickname.to_lowercase() {
        return None;
    }

    captures.get(2).map(|item| item.as_str())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("hands Bot a rusty key", Some("a rusty key"))]
    #[case("tosses bot a banana", Some("a banana"))]
    #[case("throws BOT   the kitchen sink", Some("the kitchen sink"))]
    #[case("gives Bot\tan idea", Some("an idea"))]
    #[case("hands SomeoneElse a rusty key", None)]
    #[case("hands Bot", None)]
    #[case("waves at Bot", None)]
    #[case("quickly hands Bot a key", None)]
    fn it_should_parse_gifts(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_gift_message(input, "Bot"), expected);
    }

    #[test]
    fn it_should_keep_trailing_text_verbatim() {
        assert_eq!(
            parse_gift_message("hands bot a box of  spaces ", "bot"),
            Some("a box of  spaces ")
        );
    }
}

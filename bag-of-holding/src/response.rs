//! Chat lines describing what happened to the bag.
//!
//! Functions that pick a flavour template take a [`RandomSource`]; the rest are deterministic.
//! Lines meant to be sent as actions are written in the third person, e.g. `picked up a key.`

use crate::RandomSource;

/// Ways of hitting `{who}` with `{what}`.
const HIT_TEMPLATES: &[&str] = &[
    "hits {who} around a bit with {what}",
    "smacks {who} with {what}",
    "grabs {who} and savagely beats them with {what}",
    "hits {what} around a bit with {who}",
    "bodyslams {who} and whails on them with {what}",
];

/// Ways of conjuring `{what}`.
const CONJURE_TEMPLATES: &[&str] = &[
    "spins up the LHC to create {what}",
    "pulls {what} out of your ear",
    "wills {what} into being",
    "conjures up {what} with the +3 staff of conjuring",
    "calls forth {what} from the void",
    "invents {what}",
    "ponders {what} into existance",
    "considers the set of all real numbers and reduces it to {what}",
    "casts a void*, resulting in {what}",
    "drags {what} out from behind a curtain",
    "orders an airstrike consisting of two nukes and {what}",
    "orders a 6\" BLT with a side of {what}",
    "pulls {what} out of his bag of holding",
    "ヽ（ ﾟヮﾟ）ﾉ.・ﾟ*｡・+☆ {what}",
    "(╯‵Д′)╯彡 {what}",
];

/// Ways of failing to conjure anything.
const CONJURE_FAILED_TEMPLATES: &[&str] = &[
    "thinks real hard to no avail",
    "calls out into the void with no result",
    "can't conjure anything when the bag is full",
    "needs more pylons",
];

/// Substitutes `{who}` and `{what}` in a template in a single pass, so placeholders inside the
/// substituted text are left alone.
fn fill(template: &str, who: &str, what: &str) -> String {
    let mut out = String::with_capacity(template.len() + who.len() + what.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        if let Some(tail) = tail.strip_prefix("{who}") {
            out.push_str(who);
            rest = tail;
        } else if let Some(tail) = tail.strip_prefix("{what}") {
            out.push_str(what);
            rest = tail;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}

/// Joins items as `a`, `a and b` or `a, b, and c`.
///
/// # Example
///
/// ```rust
/// use bag_of_holding::response::join_items;
///
/// assert_eq!(join_items(&["a", "b"]), "a and b");
/// assert_eq!(join_items(&["a", "b", "c"]), "a, b, and c");
/// ```
#[must_use]
pub fn join_items<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let init: Vec<&str> = init.iter().map(AsRef::as_ref).collect();

            format!("{}, and {}", init.join(", "), last.as_ref())
        }
    }
}

/// Appends what fell out of the bag to `line`, e.g. `derived a key from a lock, but dropped a
/// door.` The line is returned unchanged when nothing was dropped.
#[must_use]
pub fn but_dropped<S: AsRef<str>>(line: &str, dropped: &[S]) -> String {
    if dropped.is_empty() {
        return line.to_string();
    }

    let line = line.strip_suffix(['.', '!']).unwrap_or(line);

    match dropped {
        [] => line.to_string(),
        [only] => format!("{line}, but dropped {}.", only.as_ref()),
        // Always the serial comma here, even for two items.
        [init @ .., last] => {
            let init: Vec<&str> = init.iter().map(AsRef::as_ref).collect();

            format!("{line}, but dropped {}, and {}.", init.join(", "), last.as_ref())
        }
    }
}

/// Describes `item` being put in the bag and what fell out to make room for it.
#[must_use]
pub fn picked_up<S: AsRef<str>>(item: &str, dropped: &[S]) -> String {
    if dropped.is_empty() {
        format!("picked up {item}.")
    } else {
        but_dropped(&format!("picked up {item}"), dropped)
    }
}

/// Describes hitting `target` with `item`.
#[must_use]
pub fn hit(target: &str, item: &str, rng: &mut impl RandomSource) -> String {
    let template = rng.choose(HIT_TEMPLATES).copied().unwrap_or(HIT_TEMPLATES[0]);

    fill(template, target, item)
}

/// Describes `consumed` being transmogrified into `result`.
#[must_use]
pub fn derived(result: &str, consumed: &str) -> String {
    format!("derived {result} from {consumed}!")
}

/// Describes `items` being combined into `result`.
#[must_use]
pub fn combined<S: AsRef<str>>(items: &[S], result: &str) -> String {
    format!("combined {} to create {result}!", join_items(items))
}

/// Describes `item` being conjured.
#[must_use]
pub fn conjured(item: &str, rng: &mut impl RandomSource) -> String {
    let template = rng
        .choose(CONJURE_TEMPLATES)
        .copied()
        .unwrap_or(CONJURE_TEMPLATES[0]);

    fill(template, "", item)
}

/// Describes a conjuring attempt that produced nothing.
#[must_use]
pub fn conjure_failed(rng: &mut impl RandomSource) -> &'static str {
    rng.choose(CONJURE_FAILED_TEMPLATES)
        .copied()
        .unwrap_or(CONJURE_FAILED_TEMPLATES[0])
}

/// Describes an attempt to transmogrify an empty bag.
#[must_use]
pub const fn empty_transmogrify() -> &'static str {
    "can't transmogrify an empty bag"
}

/// Describes `item` being taken out of the bag on request.
#[must_use]
pub fn dropped(item: &str) -> String {
    format!("dropped {item}.")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always picks the same index.
    struct Fixed(usize);

    impl RandomSource for Fixed {
        fn pick_index(&mut self, len: usize) -> usize {
            self.0 % len
        }
    }

    #[test]
    fn picked_up_without_drops() {
        assert_eq!(picked_up::<&str>("a key", &[]), "picked up a key.");
    }

    #[test]
    fn picked_up_with_one_drop() {
        assert_eq!(
            picked_up("a key", &["a lock"]),
            "picked up a key, but dropped a lock."
        );
    }

    #[test]
    fn picked_up_with_many_drops() {
        assert_eq!(
            picked_up("a key", &["a lock", "a door"]),
            "picked up a key, but dropped a lock, and a door."
        );
        assert_eq!(
            picked_up("a key", &["a", "b", "c"]),
            "picked up a key, but dropped a, b, and c."
        );
    }

    #[test]
    fn but_dropped_replaces_final_punctuation() {
        assert_eq!(
            but_dropped("derived a key from a lock!", &["a door"]),
            "derived a key from a lock, but dropped a door."
        );
        assert_eq!(
            but_dropped("invents a cat", &["a", "b"]),
            "invents a cat, but dropped a, and b."
        );
        assert_eq!(
            but_dropped("derived wow!! from a lock!", &["x"]),
            "derived wow!! from a lock, but dropped x."
        );
        assert_eq!(
            but_dropped::<&str>("derived a key from a lock!", &[]),
            "derived a key from a lock!"
        );
    }

    #[test]
    fn combined_two_and_more() {
        assert_eq!(
            combined(&["sword", "shield"], "tea"),
            "combined sword and shield to create tea!"
        );
        assert_eq!(
            combined(&["a", "b", "c"], "tea"),
            "combined a, b, and c to create tea!"
        );
    }

    #[test]
    fn hit_fills_in_both_placeholders() {
        assert_eq!(
            hit("alice", "a trout", &mut Fixed(3)),
            "hits a trout around a bit with alice"
        );
        assert_eq!(
            hit("alice", "a trout", &mut Fixed(1)),
            "smacks alice with a trout"
        );
    }

    #[test]
    fn fill_ignores_placeholders_in_arguments() {
        assert_eq!(
            hit("{what}", "a {who}", &mut Fixed(1)),
            "smacks {what} with a {who}"
        );
    }

    #[test]
    fn conjured_uses_template() {
        assert_eq!(conjured("a cat", &mut Fixed(5)), "invents a cat");
    }

    #[test]
    fn conjure_failed_picks_from_pool() {
        assert_eq!(conjure_failed(&mut Fixed(3)), "needs more pylons");
    }

    #[test]
    fn join_single_item() {
        assert_eq!(join_items(&["a"]), "a");
        assert_eq!(join_items::<&str>(&[]), "");
    }
}

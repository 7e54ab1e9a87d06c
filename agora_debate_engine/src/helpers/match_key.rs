use ade_common::UserId;

/// Builds the deterministic pairing key for a matchmade debate.
///
/// The key is identical regardless of which of the two users ran the search, so two simultaneous
/// searchers resolve to the same key and the debate table's uniqueness on it collapses their
/// concurrent creates into a single row.
pub fn matchmaking_key(topic_name: &str, a: &UserId, b: &UserId) -> String {
    let (lo, hi) = if a.as_str() <= b.as_str() { (a, b) } else { (b, a) };
    format!("matchmaking:{topic_name}:{lo}:{hi}")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn key_is_symmetric_in_the_pair() {
        let alice = UserId::from("alice");
        let bob = UserId::from("bob");
        let k1 = matchmaking_key("AI ethics", &alice, &bob);
        let k2 = matchmaking_key("AI ethics", &bob, &alice);
        assert_eq!(k1, k2);
        assert_eq!(k1, "matchmaking:AI ethics:alice:bob");
    }

    #[test]
    fn key_separates_topics() {
        let alice = UserId::from("alice");
        let bob = UserId::from("bob");
        assert_ne!(matchmaking_key("cats", &alice, &bob), matchmaking_key("dogs", &alice, &bob));
    }
}

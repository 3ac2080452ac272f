// MIT License
//
// Copyright (c) 2025 Takatoshi Kondo
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! MQTT topic-filter wildcard matching: `+` (single level) and `#`
//! (multi-level), with the standard `$`-prefix exclusion rule.

/// Whether `topic` (a concrete, wildcard-free topic name from an inbound
/// PUBLISH) matches `filter` (a subscription topic filter, possibly
/// containing `+`/`#`).
pub fn filter_matches_topic(filter: &str, topic: &str) -> bool {
    let filter_starts_dollar = filter.starts_with('$');
    let topic_starts_dollar = topic.starts_with('$');

    let filter_levels: Vec<&str> = filter.split('/').collect();
    let topic_levels: Vec<&str> = topic.split('/').collect();

    // A leading wildcard (`+` or `#` as the first filter level) never
    // matches a topic starting with `$`, even if the filter itself doesn't
    // start with `$`.
    if topic_starts_dollar
        && !filter_starts_dollar
        && matches!(filter_levels.first(), Some(&"+") | Some(&"#"))
    {
        return false;
    }

    matches_levels(&filter_levels, &topic_levels)
}

fn matches_levels(filter_levels: &[&str], topic_levels: &[&str]) -> bool {
    match (filter_levels.first(), topic_levels.first()) {
        (Some(&"#"), _) => filter_levels.len() == 1,
        (Some(&"+"), Some(t)) if !t.is_empty() => {
            matches_levels(&filter_levels[1..], &topic_levels[1..])
        }
        (Some(f), Some(t)) if *f == *t => matches_levels(&filter_levels[1..], &topic_levels[1..]),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        assert!(filter_matches_topic("a/b/c", "a/b/c"));
        assert!(!filter_matches_topic("a/b/c", "a/b/d"));
    }

    #[test]
    fn plus_matches_single_level() {
        assert!(filter_matches_topic("sensors/+/temp", "sensors/room1/temp"));
        assert!(!filter_matches_topic("sensors/+/temp", "sensors/room1/hum"));
        assert!(!filter_matches_topic("sensors/+/temp", "sensors/room1/extra/temp"));
    }

    #[test]
    fn plus_does_not_match_empty_level() {
        assert!(!filter_matches_topic("a/+/b", "a//b"));
    }

    #[test]
    fn hash_matches_remaining_levels_including_zero() {
        assert!(filter_matches_topic("a/#", "a"));
        assert!(filter_matches_topic("a/#", "a/b"));
        assert!(filter_matches_topic("a/#", "a/b/c"));
        assert!(filter_matches_topic("#", "anything/at/all"));
    }

    #[test]
    fn dollar_prefixed_topics_excluded_from_leading_wildcards() {
        assert!(!filter_matches_topic("+/foo", "$SYS/foo"));
        assert!(!filter_matches_topic("#", "$SYS/foo"));
        assert!(filter_matches_topic("$SYS/+", "$SYS/foo"));
    }
}

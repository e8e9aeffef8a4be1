use std::collections::{BTreeMap, HashSet};

use crate::model::{HitRecord, ViewStats};

/// Keep only the first hit seen from every client address, across all endpoints.
///
/// A client that hit `/a` and then `/b` is only counted for `/a`.
pub fn unique_by_ip(hits: Vec<HitRecord>) -> Vec<HitRecord> {
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|hit| seen.insert(hit.ip.clone()))
        .collect()
}

/// Count hits per `(app, uri)`, most visited first.
///
/// Endpoints with the same count are ordered by `app`, then `uri`.
pub fn summarize(hits: &[HitRecord]) -> Vec<ViewStats> {
    let mut groups: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    for hit in hits {
        *groups.entry((hit.app.as_str(), hit.uri.as_str())).or_default() += 1;
    }

    let mut stats: Vec<ViewStats> = groups
        .into_iter()
        .map(|((app, uri), hits)| ViewStats::new(app.to_owned(), uri.to_owned(), hits))
        .collect();

    // stable, keeps the (app, uri) order of the map for ties
    stats.sort_by(|a, b| b.hits.cmp(&a.hits));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{HitId, NewHit, Timestamp};

    fn hit(id: u64, app: &str, uri: &str, ip: &str) -> HitRecord {
        let timestamp = Timestamp::parse("2023-01-01 00:00:00").unwrap();
        NewHit::new(app, uri, ip, timestamp).with_id(HitId(id))
    }

    fn view(app: &str, uri: &str, hits: u64) -> ViewStats {
        ViewStats::new(app.to_owned(), uri.to_owned(), hits)
    }

    #[test]
    fn first_hit_per_client_wins() {
        let hits = vec![
            hit(1, "A", "/u1", "X"),
            hit(2, "A", "/u2", "X"),
            hit(3, "A", "/u2", "Y"),
            hit(4, "B", "/u1", "Y"),
        ];

        let ids: Vec<u64> = unique_by_ip(hits).iter().map(|hit| hit.id.0).collect();
        assert_eq!(ids, [1, 3]);
    }

    #[test]
    fn groups_by_app_and_uri() {
        let hits = vec![
            hit(1, "A", "/u1", "X"),
            hit(2, "B", "/u1", "X"),
            hit(3, "A", "/u1", "Y"),
        ];

        assert_eq!(summarize(&hits), [view("A", "/u1", 2), view("B", "/u1", 1)]);
    }

    #[test]
    fn ranks_by_hits_descending() {
        let mut hits = Vec::new();
        let mut id = 0;
        for (uri, count) in [("/three", 3), ("/seven", 7), ("/one", 1)] {
            for _ in 0..count {
                id += 1;
                hits.push(hit(id, "A", uri, &format!("10.0.0.{id}")));
            }
        }

        let counts: Vec<u64> = summarize(&hits).iter().map(|view| view.hits).collect();
        assert_eq!(counts, [7, 3, 1]);
    }

    #[test]
    fn ties_are_ordered_by_app_then_uri() {
        let hits = vec![
            hit(1, "B", "/a", "X"),
            hit(2, "A", "/b", "X"),
            hit(3, "A", "/a", "X"),
        ];

        assert_eq!(
            summarize(&hits),
            [view("A", "/a", 1), view("A", "/b", 1), view("B", "/a", 1)]
        );
    }

    #[test]
    fn nothing_in_nothing_out() {
        assert!(summarize(&[]).is_empty());
        assert!(unique_by_ip(Vec::new()).is_empty());
    }
}

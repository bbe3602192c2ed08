//! Last.fm request signing
//!
//! Every write call carries an `api_sig` parameter: the MD5 digest of all
//! other parameters (minus `format`) concatenated as `<key><value>` pairs in
//! byte order of their keys, followed by the shared secret. The secret itself
//! never leaves the process.

/// Compute the `api_sig` for a set of request parameters.
///
/// Insertion order of `params` does not matter; keys are sorted before
/// hashing. The digest is taken over the UTF-8 bytes of the concatenation and
/// returned as 32 lowercase hex characters.
pub fn sign<'a, I>(params: I, secret: &str) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut pairs: Vec<(&str, &str)> = params.into_iter().collect();
    pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let mut payload = String::new();
    for (key, value) in pairs {
        payload.push_str(key);
        payload.push_str(value);
    }
    payload.push_str(secret);

    format!("{:x}", md5::compute(payload.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::{BTreeMap, HashMap};

    #[rstest]
    #[case(vec![], "", "d41d8cd98f00b204e9800998ecf8427e")]
    #[case(vec![], "asdf", "912ec803b2ce49e4a541068d495ab570")]
    #[case(
        vec![("do", "you"), ("like", "this"), ("test", "?")],
        "asdf",
        "96a9c2d1038f634570bc0e5270d0a5e2"
    )]
    #[case(
        vec![("some_utf8", "öäåáýíčůščé")],
        "asdf",
        "3f0bf720b8c73fc1409b029aa5ce7b13"
    )]
    fn test_known_vectors(
        #[case] params: Vec<(&str, &str)>,
        #[case] secret: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(sign(params, secret), expected);
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let forward = [("do", "you"), ("like", "this"), ("test", "?")];
        let expected = "96a9c2d1038f634570bc0e5270d0a5e2";

        // Every permutation of three entries
        let orders = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];
        for order in orders {
            let permuted: Vec<(&str, &str)> = order.iter().map(|&i| forward[i]).collect();
            assert_eq!(sign(permuted, "asdf"), expected, "order {:?}", order);
        }
    }

    #[test]
    fn test_map_kinds_agree() {
        let ordered: BTreeMap<&str, &str> = [("track", "Tom Sawyer"), ("artist", "Rush")]
            .into_iter()
            .collect();
        let unordered: HashMap<&str, &str> = ordered.iter().map(|(k, v)| (*k, *v)).collect();

        assert_eq!(
            sign(ordered.iter().map(|(k, v)| (*k, *v)), "secret"),
            sign(unordered.iter().map(|(k, v)| (*k, *v)), "secret"),
        );
    }

    #[test]
    fn test_signing_is_idempotent() {
        let params = [("method", "track.scrobble"), ("sk", "abc"), ("artist", "Rush")];
        let first = sign(params, "secret");
        let second = sign(params, "secret");
        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_keys_sort_by_bytes() {
        // "api_key" < "artist" < "method" byte-wise; uppercase sorts first
        let expected = format!("{:x}", md5::compute("Zzapi_keykartistamethodm".as_bytes()));
        let params = [("method", "m"), ("artist", "a"), ("Zz", ""), ("api_key", "k")];
        assert_eq!(sign(params, ""), expected);
    }
}

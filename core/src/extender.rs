//! Per-operation request customization.
//!
//! # Design
//! Every resource operation differs from its siblings in exactly two places:
//! which option keys become path segments and which remain query parameters.
//! `Extender` captures those two decision points. Resource descriptors
//! (`Cluster`, `Document`, `Index`, `Search`) implement it independently; the
//! request builder and transport stay shared.

use crate::params::Params;

pub trait Extender {
    /// Option keys forwarded as query parameters.
    fn recognized_keys(&self) -> &'static [&'static str];

    /// Option keys consumed by [`Extender::extend_url`].
    fn path_keys(&self) -> &'static [&'static str] {
        &[]
    }

    /// Append resource-identifying segments to `url`. The default leaves it
    /// untouched.
    fn extend_url(&self, url: String, _params: &Params) -> String {
        url
    }

    /// Restrict `params` to `recognized`. Keys outside the list are dropped
    /// without error.
    fn params(&self, params: &Params, recognized: &[&str]) -> Params {
        filter_params(params, recognized)
    }
}

/// Default filtering policy shared by every extender.
pub fn filter_params(params: &Params, recognized: &[&str]) -> Params {
    let kept = params.filtered(recognized);
    if kept.len() != params.len() {
        let dropped: Vec<&str> = params.keys().filter(|k| !kept.contains_key(k)).collect();
        tracing::debug!(?dropped, "ignoring unrecognized parameters");
    }
    kept
}

/// Extender for ad-hoc requests: no path keys, every option is forwarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Raw;

impl Extender for Raw {
    fn recognized_keys(&self) -> &'static [&'static str] {
        &[]
    }

    fn params(&self, params: &Params, _recognized: &[&str]) -> Params {
        params.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Plain;

    impl Extender for Plain {
        fn recognized_keys(&self) -> &'static [&'static str] {
            &["routing"]
        }
    }

    #[test]
    fn default_params_drop_unknown_keys() {
        let params = Params::from([("routing", "a"), ("bogus", "x")]);
        let filtered = Plain.params(&params, Plain.recognized_keys());
        assert_eq!(filtered, Params::from([("routing", "a")]));
    }

    #[test]
    fn raw_forwards_everything() {
        let params = Params::from([("anything", "goes"), ("pretty", "true")]);
        assert_eq!(Raw.params(&params, &[]), params);
    }

    static KEYS: [&str; 6] = ["routing", "refresh", "timeout", "index", "bogus", "q"];

    fn params_strategy() -> impl Strategy<Value = Params> {
        prop::collection::vec((prop::sample::select(&KEYS[..]), "[a-z]{0,5}"), 0..10)
            .prop_map(|pairs| pairs.into_iter().collect())
    }

    proptest! {
        #[test]
        fn default_extend_url_is_identity(url in "(/[a-z_]{1,6}){0,4}", params in params_strategy()) {
            prop_assert_eq!(Plain.extend_url(url.clone(), &params), url);
        }

        #[test]
        fn params_is_set_intersection(
            params in params_strategy(),
            recognized in prop::sample::subsequence(&KEYS[..], 0..KEYS.len()),
        ) {
            let filtered = Plain.params(&params, &recognized);
            for (key, value) in filtered.iter() {
                prop_assert!(recognized.iter().any(|r| *r == key));
                prop_assert_eq!(params.get(key), Some(value));
            }
            for (key, _) in params.iter() {
                prop_assert_eq!(filtered.contains_key(key), recognized.iter().any(|r| *r == key));
            }
        }
    }
}

//! Property tests for route registration and lookup.

use proptest::prelude::*;
use switchyard_router::{Lookup, Method, ParamList, Router, Status};

fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,6}"
}

fn literal_path() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..5).prop_map(|segs| format!("/{}", segs.join("/")))
}

proptest! {
    #[test]
    fn registered_literals_are_found(paths in prop::collection::hash_set(literal_path(), 1..40)) {
        let mut router = Router::new();
        for (i, path) in paths.iter().enumerate() {
            router.add(Method::Get, path, i).unwrap();
        }

        let mut params = ParamList::new();
        for (i, path) in paths.iter().enumerate() {
            prop_assert_eq!(router.find(Method::Get, path, &mut params), Lookup::Found(&i));
            prop_assert!(params.is_empty());
        }
        prop_assert_eq!(router.len(), paths.len());
    }

    #[test]
    fn root_param_binds_value(value in segment()) {
        let mut router = Router::new();
        router.add(Method::Get, "/:x", ()).unwrap();

        let mut params = ParamList::new();
        let path = format!("/{value}");
        prop_assert_eq!(router.find(Method::Get, path.as_str(), &mut params).status(), Status::Ok);
        prop_assert_eq!(params.get("x"), Some(value.as_str()));
    }

    #[test]
    fn wrong_method_is_not_allowed(paths in prop::collection::hash_set(literal_path(), 1..20)) {
        let mut router = Router::new();
        for path in &paths {
            router.add(Method::Get, path, ()).unwrap();
        }

        let mut params = ParamList::new();
        for path in &paths {
            prop_assert_eq!(
                router.find(Method::Post, path.as_str(), &mut params).status(),
                Status::MethodNotAllowed
            );
        }
    }

    #[test]
    fn unrelated_paths_are_not_found(
        paths in prop::collection::hash_set(literal_path(), 1..20),
        probe in "[A-Z]{1,8}",
    ) {
        let mut router = Router::new();
        for path in &paths {
            router.add(Method::Get, path, ()).unwrap();
        }

        let mut params = ParamList::new();
        let probe = format!("/{probe}");
        prop_assert_eq!(router.find(Method::Get, probe.as_str(), &mut params), Lookup::NotFound);
    }

    #[test]
    fn insertion_order_does_not_change_lookup(
        paths in prop::collection::hash_set(literal_path(), 1..30),
    ) {
        let ordered: Vec<_> = paths.iter().cloned().collect();
        let mut forward = Router::new();
        let mut backward = Router::new();
        for path in &ordered {
            forward.add(Method::Get, path, path.clone()).unwrap();
        }
        for path in ordered.iter().rev() {
            backward.add(Method::Get, path, path.clone()).unwrap();
        }

        let mut params = ParamList::new();
        for path in &ordered {
            prop_assert_eq!(forward.find(Method::Get, path.as_str(), &mut params).value(), Some(path));
            prop_assert_eq!(backward.find(Method::Get, path.as_str(), &mut params).value(), Some(path));
        }
    }

    #[test]
    fn params_follow_path_order(b in segment(), d in segment()) {
        let mut router = Router::new();
        router.add(Method::Get, "/a/:b/c/:d", ()).unwrap();

        let mut params = ParamList::new();
        let path = format!("/a/{b}/c/{d}");
        prop_assert!(router.find(Method::Get, path.as_str(), &mut params).is_found());
        let pairs: Vec<_> = params.iter().collect();
        prop_assert_eq!(pairs, vec![("b", b.as_str()), ("d", d.as_str())]);
    }
}

//! Property-based tests for PermissionChecker.

use proptest::prelude::*;

use super::{FileMetadata, PermissionChecker, RequesterContext};

/// Strategy for non-empty user identifiers.
fn arb_user_id() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,24}"
}

/// Strategy for any requester, anonymous included.
fn arb_requester() -> impl Strategy<Value = RequesterContext> {
    prop_oneof![
        Just(RequesterContext::anonymous()),
        (arb_user_id(), any::<bool>())
            .prop_map(|(id, trusted)| RequesterContext::new(Some(id), trusted)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Public files are downloadable by anyone.
    #[test]
    fn prop_public_always_downloadable(
        owner in arb_user_id(),
        requester in arb_requester(),
    ) {
        let file = FileMetadata::new(owner, true);
        prop_assert!(PermissionChecker::can_download(&file, &requester));
    }

    /// Private files are downloadable exactly by their owner.
    #[test]
    fn prop_private_only_owner(
        owner in arb_user_id(),
        requester in arb_requester(),
    ) {
        let file = FileMetadata::new(owner.clone(), false);
        let allowed = PermissionChecker::can_download(&file, &requester);
        prop_assert_eq!(allowed, requester.user_id() == Some(owner.as_str()));
    }

    /// Whoever may download a private file may also delete it.
    #[test]
    fn prop_private_download_implies_delete(
        owner in arb_user_id(),
        requester in arb_requester(),
    ) {
        let file = FileMetadata::new(owner, false);
        if PermissionChecker::can_download(&file, &requester) {
            prop_assert!(PermissionChecker::can_delete(&file, &requester));
        }
    }

    /// Decisions are deterministic.
    #[test]
    fn prop_decisions_are_pure(
        owner in arb_user_id(),
        is_public in any::<bool>(),
        requester in arb_requester(),
    ) {
        let file = FileMetadata::new(owner, is_public);
        prop_assert_eq!(
            PermissionChecker::can_download(&file, &requester),
            PermissionChecker::can_download(&file, &requester)
        );
        prop_assert_eq!(
            PermissionChecker::can_delete(&file, &requester),
            PermissionChecker::can_delete(&file, &requester)
        );
    }
}

//! Security tests for session handling
//!
//! These tests validate that the token and its cookie mirror stay consistent.

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::config::SessionsConfig;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_concurrent_revoke_clears_once() {
        let store = Arc::new(SessionStore::in_memory());
        store.save("shared").unwrap();

        let mut handles = vec![];
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move { store.revoke() }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(store.read(), None);
        assert!(!store.has_cookie());
    }

    #[test]
    fn test_token_and_cookie_written_together() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FileTokenStorage::new(dir.path().join("storage.json")));
        let store = SessionStore::with_storage(storage.clone(), &SessionsConfig::default());

        store.save("file-token").unwrap();

        // A fresh store over the same file sees both copies
        let reopened = SessionStore::with_storage(storage, &SessionsConfig::default());
        assert_eq!(reopened.read(), Some("file-token".to_string()));
        assert!(reopened.has_cookie());

        reopened.clear();
        assert_eq!(store.read(), None);
        assert!(!store.has_cookie());
    }

    #[test]
    fn test_custom_cookie_name_respected() {
        let config = SessionsConfig { cookie_name: "fb_session".to_string(), ..Default::default() };
        let store = SessionStore::with_storage(Arc::new(MemoryTokenStorage::new()), &config);

        store.save("abc").unwrap();
        assert_eq!(store.cookie_header(), Some("fb_session=abc".to_string()));
    }

    #[test]
    fn test_zero_max_age_persists_neither_copy() {
        let config = SessionsConfig { max_age_days: 0, ..Default::default() };
        let store = SessionStore::with_storage(Arc::new(MemoryTokenStorage::new()), &config);

        assert!(store.save("abc").is_err());
        assert_eq!(store.read(), None);
        assert!(!store.has_cookie());
    }

    #[test]
    fn test_unvalidated_huge_max_age_still_saves() {
        let config = SessionsConfig { max_age_days: 200_000_000, ..Default::default() };
        let store = SessionStore::with_storage(Arc::new(MemoryTokenStorage::new()), &config);

        store.save("tok").unwrap();
        assert_eq!(store.read(), Some("tok".to_string()));
        assert!(store.has_cookie());
    }
}

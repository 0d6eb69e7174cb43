use super::*;
use std::cell::RefCell;
use std::rc::Rc;

// =========================================================
// Helpers
// =========================================================

fn record(id: i64, role: i64) -> UserRecord {
    UserRecord {
        id,
        username: format!("user{id}"),
        email: format!("user{id}@example.com"),
        role,
        photo: None,
        photo_url: None,
    }
}

fn persisted_pair(storage: &MemoryStorage) -> (bool, bool) {
    (
        storage.read(STORAGE_TOKEN_KEY).is_some(),
        storage.read(STORAGE_USER_KEY).is_some(),
    )
}

/// Storage whose writes always fail, like a browser with storage disabled.
#[derive(Clone, Default)]
struct ReadOnlyStorage {
    inner: MemoryStorage,
}

impl SessionStorage for ReadOnlyStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.inner.read(key)
    }

    fn write(&self, _key: &str, _value: &str) -> bool {
        false
    }

    fn remove(&self, key: &str) -> bool {
        self.inner.remove(key)
    }
}

// =========================================================
// login / logout
// =========================================================

#[test]
fn login_populates_memory_and_storage() {
    let storage = MemoryStorage::new();
    let store = SessionStore::new(storage.clone());

    store.login("tok-1", record(3, 1));

    let session = store.current().expect("session after login");
    assert_eq!(session.token(), "tok-1");
    assert_eq!(session.role(), Role::ContentCreator);
    assert_eq!(session.bearer(), "Bearer tok-1");
    assert_eq!(storage.read(STORAGE_TOKEN_KEY).as_deref(), Some("tok-1"));
    assert_eq!(persisted_pair(&storage), (true, true));
}

#[test]
fn logout_clears_memory_and_storage() {
    let storage = MemoryStorage::new();
    let store = SessionStore::new(storage.clone());
    store.login("tok-1", record(3, 0));

    store.logout();

    assert!(store.current().is_none());
    assert!(!store.is_authenticated());
    assert_eq!(persisted_pair(&storage), (false, false));
}

#[test]
fn empty_token_login_is_ignored() {
    let storage = MemoryStorage::new();
    let store = SessionStore::new(storage.clone());

    store.login("", record(1, 0));

    assert!(store.current().is_none());
    assert_eq!(persisted_pair(&storage), (false, false));
}

#[test]
fn failed_persistence_keeps_in_memory_session_but_no_partial_copy() {
    let storage = ReadOnlyStorage::default();
    let store = SessionStore::new(storage.clone());

    store.login("tok", record(5, 0));

    assert!(store.is_authenticated());
    assert!(storage.read(STORAGE_TOKEN_KEY).is_none());
    assert!(storage.read(STORAGE_USER_KEY).is_none());
}

#[test]
fn profile_update_replaces_identity_but_keeps_token() {
    let storage = MemoryStorage::new();
    let store = SessionStore::new(storage.clone());
    store.login("tok-4", record(4, 1));

    let mut updated = record(4, 1);
    updated.username = "renamed".into();
    assert!(store.update_user(updated));

    let session = store.current().expect("session after update");
    assert_eq!(session.token(), "tok-4");
    assert_eq!(session.identity().username, "renamed");

    let reloaded = SessionStore::new(storage.clone()).restore().expect("restored");
    assert_eq!(reloaded.identity().username, "renamed");
}

#[test]
fn profile_update_for_another_user_or_guest_is_ignored() {
    let storage = MemoryStorage::new();
    let store = SessionStore::new(storage.clone());
    assert!(!store.update_user(record(4, 1)));
    assert_eq!(persisted_pair(&storage), (false, false));

    store.login("tok-4", record(4, 1));
    assert!(!store.update_user(record(5, 1)));
    assert_eq!(store.current().map(|s| s.identity().id), Some(4));
}

#[test]
fn profile_update_never_persists_a_user_without_token() {
    let storage = ReadOnlyStorage::default();
    let store = SessionStore::new(storage.clone());
    store.login("tok", record(5, 0));

    assert!(store.update_user(record(5, 0)));
    assert_eq!(store.current().map(|s| s.identity().id), Some(5));
    assert!(storage.read(STORAGE_USER_KEY).is_none());
}

// =========================================================
// restore
// =========================================================

#[test]
fn restore_reads_back_a_previous_login() {
    let storage = MemoryStorage::new();
    SessionStore::new(storage.clone()).login("tok-9", record(9, 0));

    let reloaded = SessionStore::new(storage.clone());
    let session = reloaded.restore().expect("restored session");

    assert_eq!(session.token(), "tok-9");
    assert_eq!(session.identity().id, 9);
    assert_eq!(session.role(), Role::Advertiser);
}

#[test]
fn restore_on_empty_storage_yields_no_session() {
    let store = SessionStore::new(MemoryStorage::new());
    assert!(store.restore().is_none());
    assert!(store.current().is_none());
}

#[test]
fn restore_treats_corrupt_user_record_as_no_session() {
    let storage = MemoryStorage::new();
    storage.write(STORAGE_TOKEN_KEY, "tok");
    storage.write(STORAGE_USER_KEY, "{not json");

    let store = SessionStore::new(storage.clone());

    assert!(store.restore().is_none());
    assert!(store.current().is_none());
    assert_eq!(persisted_pair(&storage), (false, false));
}

#[test]
fn restore_rejects_token_without_user_and_user_without_token() {
    let storage = MemoryStorage::new();
    storage.write(STORAGE_TOKEN_KEY, "tok");
    assert!(SessionStore::new(storage.clone()).restore().is_none());
    assert_eq!(persisted_pair(&storage), (false, false));

    let raw = serde_json::to_string(&record(1, 1)).unwrap();
    storage.write(STORAGE_USER_KEY, &raw);
    assert!(SessionStore::new(storage.clone()).restore().is_none());
    assert_eq!(persisted_pair(&storage), (false, false));
}

#[test]
fn restore_resolves_unknown_role_codes_to_content_creator() {
    let storage = MemoryStorage::new();
    storage.write(STORAGE_TOKEN_KEY, "tok");
    storage.write(
        STORAGE_USER_KEY,
        r#"{"id":2,"username":"x","email":"x@y.z","role":7}"#,
    );

    let session = SessionStore::new(storage).restore().unwrap();
    assert_eq!(session.role(), Role::ContentCreator);
}

// =========================================================
// invariant over operation sequences
// =========================================================

#[derive(Debug, Clone, Copy)]
enum Op {
    Login,
    Logout,
    Restore,
    CorruptUser,
    DropToken,
}

const OPS: [Op; 5] = [Op::Login, Op::Logout, Op::Restore, Op::CorruptUser, Op::DropToken];

fn apply(store: &SessionStore<MemoryStorage>, storage: &MemoryStorage, op: Op) {
    match op {
        Op::Login => store.login("tok", record(1, 1)),
        Op::Logout => store.logout(),
        Op::Restore => {
            store.restore();
        }
        Op::CorruptUser => {
            storage.write(STORAGE_USER_KEY, "garbage");
        }
        Op::DropToken => {
            storage.remove(STORAGE_TOKEN_KEY);
        }
    }
}

#[test]
fn token_and_user_are_always_set_together() {
    // 所有长度为 3 的操作序列，每一步后检查不变式
    for a in OPS {
        for b in OPS {
            for c in OPS {
                let storage = MemoryStorage::new();
                let store = SessionStore::new(storage.clone());
                for op in [a, b, c] {
                    apply(&store, &storage, op);

                    if let Some(session) = store.current() {
                        assert!(!session.token().is_empty(), "{:?}", [a, b, c]);
                    }
                    // 外部篡改之外的操作结束后，持久化副本必须成对出现
                    if matches!(op, Op::Login | Op::Logout | Op::Restore) {
                        let (token, user) = persisted_pair(&storage);
                        assert_eq!(token, user, "{:?} after {:?}", [a, b, c], op);
                    }
                    if matches!(op, Op::Restore) {
                        assert_eq!(
                            store.is_authenticated(),
                            persisted_pair(&storage) == (true, true),
                            "{:?}",
                            [a, b, c]
                        );
                    }
                }
            }
        }
    }
}

// =========================================================
// subscriptions
// =========================================================

#[test]
fn subscribers_see_every_mutation_in_order() {
    let store = SessionStore::new(MemoryStorage::new());
    let seen: Rc<RefCell<Vec<Option<i64>>>> = Rc::default();

    let log = Rc::clone(&seen);
    store.subscribe(move |s| log.borrow_mut().push(s.map(|s| s.identity().id)));

    store.restore();
    store.login("tok", record(4, 0));
    store.logout();

    assert_eq!(*seen.borrow(), vec![None, Some(4), None]);
}

#[test]
fn unsubscribe_and_teardown_stop_notifications() {
    let store = SessionStore::new(MemoryStorage::new());
    let count = Rc::new(Cell::new(0));

    let c1 = Rc::clone(&count);
    let first = store.subscribe(move |_| c1.set(c1.get() + 1));
    let c2 = Rc::clone(&count);
    store.subscribe(move |_| c2.set(c2.get() + 10));

    store.logout();
    assert_eq!(count.get(), 11);

    store.unsubscribe(first);
    store.logout();
    assert_eq!(count.get(), 21);

    store.teardown();
    store.logout();
    assert_eq!(count.get(), 21);
}

#[test]
fn subscriber_may_read_the_store_during_notification() {
    let store = Rc::new(SessionStore::new(MemoryStorage::new()));
    let observed = Rc::new(Cell::new(false));

    let inner = Rc::clone(&store);
    let flag = Rc::clone(&observed);
    store.subscribe(move |s| flag.set(s.is_some() && inner.is_authenticated()));

    store.login("tok", record(1, 0));
    assert!(observed.get());
}

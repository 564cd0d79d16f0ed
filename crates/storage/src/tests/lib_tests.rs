use super::*;
use chrono::TimeZone;
use shared::error::NotesError;

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0).single().expect("timestamp")
}

fn empty_store() -> PostStore<MemoryKeyValueStore> {
    PostStore::load(MemoryKeyValueStore::new(), DEFAULT_STORAGE_KEY)
}

fn stored_snapshot(store: &PostStore<MemoryKeyValueStore>) -> Option<String> {
    store
        .backend()
        .get_string(DEFAULT_STORAGE_KEY)
        .expect("read snapshot")
}

fn authors(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|post| post.author.as_str()).collect()
}

struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get_string(&self, _key: &str) -> NotesResult<Option<String>> {
        Ok(None)
    }

    fn set_string(&mut self, key: &str, _value: String) -> NotesResult<()> {
        Err(NotesError::InvalidKey(key.to_string()))
    }

    fn remove(&mut self, _key: &str) -> NotesResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct CountingStore {
    inner: MemoryKeyValueStore,
    writes: usize,
}

impl KeyValueStore for CountingStore {
    fn get_string(&self, key: &str) -> NotesResult<Option<String>> {
        self.inner.get_string(key)
    }

    fn set_string(&mut self, key: &str, value: String) -> NotesResult<()> {
        self.writes += 1;
        self.inner.set_string(key, value)
    }

    fn remove(&mut self, key: &str) -> NotesResult<()> {
        self.inner.remove(key)
    }
}

#[test]
fn created_posts_are_listed_newest_insertion_first() {
    let mut store = empty_store();
    for (i, author) in ["first", "second", "third"].iter().enumerate() {
        store.create_at(PostDraft::new("title", *author, "body"), at(i as i64));
    }

    assert_eq!(store.len(), 3);
    assert_eq!(authors(store.posts()), vec!["third", "second", "first"]);
}

#[test]
fn create_assigns_unique_ids_and_persists() {
    let mut store = empty_store();
    let first = store.create(PostDraft::new("a", "Ann", "x")).id.clone();
    let second = store.create(PostDraft::new("b", "Bob", "y")).id.clone();

    assert_ne!(first, second);
    let snapshot = stored_snapshot(&store).expect("snapshot written");
    let decoded = decode_snapshot(&snapshot).expect("decode");
    assert_eq!(decoded, store.posts());
}

#[test]
fn update_overwrites_text_and_keeps_id_and_timestamp() {
    let mut store = empty_store();
    let id = store
        .create_at(PostDraft::new("old", "Ann", "old body"), at(10))
        .id
        .clone();

    assert!(store.update(&id, PostDraft::new("new", "Anna", "new body")));

    let post = store.get(&id).expect("post");
    assert_eq!(post.title, "new");
    assert_eq!(post.author, "Anna");
    assert_eq!(post.body, "new body");
    assert_eq!(post.timestamp, at(10));

    let reloaded = PostStore::load(store.backend().clone(), DEFAULT_STORAGE_KEY);
    assert_eq!(reloaded.get(&id).expect("reloaded").title, "new");
}

#[test]
fn update_of_unknown_id_changes_nothing() {
    let mut store = empty_store();
    store.create_at(PostDraft::new("t", "Ann", "b"), at(1));
    let before_posts = store.posts().to_vec();
    let before_snapshot = stored_snapshot(&store);

    assert!(!store.update(&PostId::from("missing"), PostDraft::new("x", "y", "z")));

    assert_eq!(store.posts(), before_posts.as_slice());
    assert_eq!(stored_snapshot(&store), before_snapshot);
}

#[test]
fn update_of_unknown_id_on_fresh_store_writes_nothing() {
    let mut store = empty_store();
    assert!(!store.update(&PostId::from("missing"), PostDraft::new("x", "y", "z")));
    assert_eq!(stored_snapshot(&store), None);
}

#[test]
fn delete_removes_only_the_matching_post_and_keeps_order() {
    let mut store = empty_store();
    store.create_at(PostDraft::new("t", "a", "b"), at(1));
    let doomed = store.create_at(PostDraft::new("t", "b", "b"), at(2)).id.clone();
    store.create_at(PostDraft::new("t", "c", "b"), at(3));
    store.create_at(PostDraft::new("t", "d", "b"), at(4));

    let removed = store.delete(&doomed).expect("removed");

    assert_eq!(removed.author, "b");
    assert_eq!(authors(store.posts()), vec!["d", "c", "a"]);
    let reloaded = PostStore::load(store.backend().clone(), DEFAULT_STORAGE_KEY);
    assert_eq!(authors(reloaded.posts()), vec!["d", "c", "a"]);
}

#[test]
fn delete_of_unknown_id_is_a_no_op() {
    let mut store = empty_store();
    store.create_at(PostDraft::new("t", "Ann", "b"), at(1));
    let before_snapshot = stored_snapshot(&store);

    assert!(store.delete(&PostId::from("missing")).is_none());
    assert_eq!(store.len(), 1);
    assert_eq!(stored_snapshot(&store), before_snapshot);
}

#[test]
fn snapshot_round_trip_reproduces_equal_list() {
    let mut store = empty_store();
    store.create(PostDraft::new("Hello", "Ann", "first body"));
    store.create(PostDraft::new("Again", "Bob", "second\nbody with \"quotes\""));

    let reloaded = PostStore::load(store.backend().clone(), DEFAULT_STORAGE_KEY);

    assert_eq!(reloaded.posts(), store.posts());
}

#[test]
fn missing_snapshot_loads_empty() {
    let store = empty_store();
    assert!(store.is_empty());
    assert_eq!(store.storage_key(), DEFAULT_STORAGE_KEY);
}

#[test]
fn malformed_snapshot_loads_empty() {
    for raw in ["not json", "{\"id\":1}", "[{\"id\":\"a\"}]", ""] {
        let backend = MemoryKeyValueStore::with_entry(DEFAULT_STORAGE_KEY, raw);
        let store = PostStore::load(backend, DEFAULT_STORAGE_KEY);
        assert!(store.is_empty(), "expected empty list for {raw:?}");
    }
}

#[test]
fn malformed_snapshot_is_overwritten_by_next_mutation() {
    let backend = MemoryKeyValueStore::with_entry(DEFAULT_STORAGE_KEY, "garbage");
    let mut store = PostStore::load(backend, DEFAULT_STORAGE_KEY);

    store.create(PostDraft::new("t", "Ann", "b"));

    let snapshot = stored_snapshot(&store).expect("snapshot");
    assert_eq!(decode_snapshot(&snapshot).expect("decode").len(), 1);
}

#[test]
fn loads_snapshot_with_string_timestamps() {
    let raw = r#"[
        {"id":"1700000000000","title":"Hi","author":"Ann","body":"x","timestamp":"2024-01-02T03:04:05.678Z"}
    ]"#;
    let backend = MemoryKeyValueStore::with_entry(DEFAULT_STORAGE_KEY, raw);

    let store = PostStore::load(backend, DEFAULT_STORAGE_KEY);

    assert_eq!(store.len(), 1);
    let post = &store.posts()[0];
    assert_eq!(post.id, PostId::from("1700000000000"));
    assert_eq!(post.timestamp.to_rfc3339(), "2024-01-02T03:04:05.678+00:00");
}

#[test]
fn duplicate_ids_in_snapshot_keep_first_occurrence() {
    let raw = r#"[
        {"id":"same","title":"first","author":"Ann","body":"x","timestamp":"2024-01-02T00:00:00Z"},
        {"id":"same","title":"second","author":"Bob","body":"y","timestamp":"2024-01-01T00:00:00Z"}
    ]"#;
    let backend = MemoryKeyValueStore::with_entry(DEFAULT_STORAGE_KEY, raw);

    let store = PostStore::load(backend, DEFAULT_STORAGE_KEY);

    assert_eq!(store.len(), 1);
    assert_eq!(store.posts()[0].title, "first");
}

#[test]
fn failed_write_keeps_in_memory_mutation() {
    let mut store = PostStore::load(ReadOnlyStore, DEFAULT_STORAGE_KEY);

    let id = store.create(PostDraft::new("t", "Ann", "b")).id.clone();

    assert_eq!(store.len(), 1);
    assert!(store.get(&id).is_some());
    assert!(store.persist().is_err());
}

#[test]
fn author_filter_matches_case_insensitive_substrings() {
    let mut store = empty_store();
    for (i, author) in ["Ann", "Anna", "Joanna", "Bob"].iter().enumerate() {
        store.create_at(PostDraft::new("t", *author, "b"), at(i as i64));
    }

    let visible = store.list("ann", SortKey::Author);

    assert_eq!(authors(&visible), vec!["Ann", "Anna", "Joanna"]);
}

#[test]
fn empty_filter_keeps_every_post() {
    let mut store = empty_store();
    store.create_at(PostDraft::new("t", "Ann", "b"), at(1));
    store.create_at(PostDraft::new("t", "Bob", "b"), at(2));

    assert_eq!(store.list("", SortKey::Newest).len(), 2);
}

#[test]
fn sorting_follows_selector() {
    let mut store = empty_store();
    let a = store
        .create_at(PostDraft::new("A", "Bob", "b"), at(1))
        .id
        .clone();
    let b = store
        .create_at(PostDraft::new("B", "Ann", "b"), at(2))
        .id
        .clone();

    let by_date: Vec<PostId> = store
        .list("", SortKey::from_selector("date"))
        .into_iter()
        .map(|post| post.id)
        .collect();
    assert_eq!(by_date, vec![b.clone(), a.clone()]);

    let by_author: Vec<PostId> = store
        .list("", SortKey::from_selector("author"))
        .into_iter()
        .map(|post| post.id)
        .collect();
    assert_eq!(by_author, vec![b, a]);
}

#[test]
fn newest_sort_uses_timestamps_not_insertion_order() {
    let mut store = empty_store();
    store.create_at(PostDraft::new("t", "late", "b"), at(50));
    store.create_at(PostDraft::new("t", "early", "b"), at(5));
    store.create_at(PostDraft::new("t", "middle", "b"), at(20));

    let visible = store.list("", SortKey::Newest);

    assert_eq!(authors(&visible), vec!["late", "middle", "early"]);
}

#[test]
fn author_sort_is_lexicographic_and_stable() {
    let mut store = empty_store();
    store.create_at(PostDraft::new("older", "Carl", "b"), at(1));
    store.create_at(PostDraft::new("t", "Ann", "b"), at(2));
    store.create_at(PostDraft::new("newer", "Carl", "b"), at(3));
    store.create_at(PostDraft::new("t", "Bea", "b"), at(4));

    let visible = store.list("", SortKey::Author);

    assert_eq!(authors(&visible), vec!["Ann", "Bea", "Carl", "Carl"]);
    assert_eq!(visible[2].title, "newer");
    assert_eq!(visible[3].title, "older");
}

#[test]
fn listing_never_reorders_the_store() {
    let mut store = empty_store();
    store.create_at(PostDraft::new("t", "Zed", "b"), at(1));
    store.create_at(PostDraft::new("t", "Amy", "b"), at(2));
    let before = store.posts().to_vec();

    let _ = store.list("", SortKey::Author);
    let _ = store.list("zed", SortKey::Newest);

    assert_eq!(store.posts(), before.as_slice());
}

#[test]
fn replace_all_imports_and_persists_unique_posts() {
    let mut source = empty_store();
    source.create_at(PostDraft::new("t", "Ann", "b"), at(1));
    source.create_at(PostDraft::new("t", "Bob", "b"), at(2));
    let mut imported = source.posts().to_vec();
    imported.push(imported[0].clone());

    let mut store = empty_store();
    assert_eq!(store.replace_all(imported), 2);

    let reloaded = PostStore::load(store.backend().clone(), DEFAULT_STORAGE_KEY);
    assert_eq!(reloaded.posts(), source.posts());
}

#[test]
fn clear_persists_an_empty_snapshot() {
    let mut store = empty_store();
    store.create(PostDraft::new("t", "Ann", "b"));

    store.clear();

    assert!(store.is_empty());
    assert_eq!(stored_snapshot(&store).as_deref(), Some("[]"));
}

#[test]
fn author_sort_ignores_case() {
    let mut store = empty_store();
    for (i, author) in ["alice", "Bob", "Zed", "bob"].iter().enumerate() {
        store.create_at(PostDraft::new("t", *author, "b"), at(i as i64));
    }

    let visible = store.list("", SortKey::Author);

    assert_eq!(authors(&visible), vec!["alice", "Bob", "bob", "Zed"]);
}

#[test]
fn checked_mutations_write_the_snapshot_exactly_once() {
    let mut store = PostStore::load(CountingStore::default(), DEFAULT_STORAGE_KEY);

    let id = store
        .try_create(PostDraft::new("t", "Ann", "b"))
        .expect("create")
        .id
        .clone();
    assert_eq!(store.backend().writes, 1);

    assert!(store
        .try_update(&id, PostDraft::new("t2", "Ann", "b"))
        .expect("update"));
    assert_eq!(store.backend().writes, 2);

    let imported = store.posts().to_vec();
    assert_eq!(store.try_replace_all(imported).expect("replace"), 1);
    assert_eq!(store.backend().writes, 3);

    assert!(store.try_delete(&id).expect("delete").is_some());
    assert_eq!(store.backend().writes, 4);

    store.try_clear().expect("clear");
    assert_eq!(store.backend().writes, 5);
}

#[test]
fn checked_mutations_of_unknown_ids_write_nothing() {
    let mut store = PostStore::load(CountingStore::default(), DEFAULT_STORAGE_KEY);
    let missing = PostId::from("missing");

    assert!(!store
        .try_update(&missing, PostDraft::new("x", "y", "z"))
        .expect("update"));
    assert!(store.try_delete(&missing).expect("delete").is_none());
    assert_eq!(store.backend().writes, 0);
}

#[test]
fn checked_mutations_return_write_errors_and_keep_the_change() {
    let mut store = PostStore::load(ReadOnlyStore, DEFAULT_STORAGE_KEY);

    assert!(store.try_create(PostDraft::new("t", "Ann", "b")).is_err());
    assert_eq!(store.len(), 1);

    let id = store.posts()[0].id.clone();
    assert!(store
        .try_update(&id, PostDraft::new("t2", "Ann", "b"))
        .is_err());
    assert_eq!(store.get(&id).expect("post").title, "t2");

    assert!(store.try_delete(&id).is_err());
    assert!(store.is_empty());

    assert!(store.try_clear().is_err());
}

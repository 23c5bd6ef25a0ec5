//! End-to-end tests for the public repository API.

use intern_mem::{Error, Frequency, Repository, RepositoryFactory, StringId};

/// Checks that `repository` holds exactly `expected`, with ids in order.
fn assert_strings(repository: &Repository, expected: &[&str]) {
    assert_eq!(repository.count() as usize, expected.len(), "unexpected count");

    for (i, s) in expected.iter().enumerate() {
        let id = repository.lookup(s).map(StringId::as_u32);
        assert_eq!(id, Some(i as u32 + 1), "wrong id for {s:?}");
        assert_eq!(repository.lookup_str(i as u32 + 1), Some(*s));
    }

    assert_eq!(
        repository.lookup_id(expected.len() as u32 + 1),
        None,
        "unexpected extra strings in repository"
    );
}

// ============================================================================
// Interning and lookup
// ============================================================================

#[test]
fn test_intern_is_idempotent() {
    let mut repository = Repository::new();

    let ids: Vec<u32> = ["foo", "bar", "baz", "foo"]
        .iter()
        .map(|s| repository.intern(s).unwrap().as_u32())
        .collect();

    assert_eq!(ids, [1, 2, 3, 1]);
}

#[test]
fn test_count_ignores_duplicates() {
    let mut repository = Repository::new();
    assert_eq!(repository.count(), 0);

    for s in ["foo", "bar", "qux", "qux", "qux", "foo"] {
        repository.intern(s).unwrap();
    }

    assert_eq!(repository.count(), 3);
}

#[test]
fn test_large_repository() {
    let count: u32 = 100_000;
    let mut repository = Repository::new();
    let start_size = repository.allocated_bytes();

    for i in 1..=count {
        let s = i.to_string();
        let id = repository.intern(&s).unwrap();

        assert_eq!(id.as_u32(), i);
        assert_eq!(repository.intern(&s).unwrap(), id);
        assert_eq!(repository.lookup(&s), Some(id));
        assert_eq!(repository.lookup_str(id), Some(s.as_str()));
    }

    assert!(repository.allocated_bytes() > start_size);
    assert!(repository.stats().page_count > 1);
    assert_eq!(repository.count(), count);

    let mut cursor = repository.cursor();
    assert_eq!(cursor.raw_id(), 0);
    assert!(cursor.bytes().is_empty());

    let mut i = 0;
    while cursor.advance() {
        i += 1;
        assert_eq!(cursor.raw_id(), i);
        assert_eq!(cursor.as_str(), Some(i.to_string().as_str()));
    }
    assert_eq!(i, count);

    assert_eq!(cursor.raw_id(), 0);
    assert!(cursor.bytes().is_empty());
}

#[test]
fn test_page_size_boundary() {
    let factory = RepositoryFactory::new(100).unwrap();
    let mut repository = factory.create_repository();

    let too_long = "a".repeat(100);
    assert_eq!(
        repository.intern(&too_long),
        Err(Error::StringTooLarge {
            len: 100,
            page_size: 100,
        })
    );
    assert_eq!(
        repository.intern("a".repeat(101)),
        Err(Error::StringTooLarge {
            len: 101,
            page_size: 100,
        })
    );
    assert!(repository.is_empty());

    let longest = "a".repeat(99);
    let id = repository.intern(&longest).unwrap();
    assert_eq!(repository.lookup_str(id), Some(longest.as_str()));
    assert_eq!(repository.allocated_bytes(), 100);
}

#[test]
fn test_allocated_bytes_strictly_grows_on_new_page() {
    let mut repository = Repository::with_page_size(64).unwrap();
    repository.intern("seed").unwrap();
    let one_page = repository.allocated_bytes();

    let mut grew = false;
    for i in 0..64 {
        let before = repository.allocated_bytes();
        repository.intern(format!("value-{i:04}")).unwrap();
        let after = repository.allocated_bytes();
        assert!(after >= before);
        grew |= after > before;
    }

    assert!(grew);
    assert!(repository.allocated_bytes() > one_page);
}

// ============================================================================
// Snapshots
// ============================================================================

#[test]
fn test_snapshot_restore() {
    let mut repository = Repository::new();
    let start = repository.snapshot();
    repository.intern("foo").unwrap();
    repository.intern("bar").unwrap();
    let mid = repository.snapshot();
    repository.intern("qux").unwrap();
    repository.intern("xyz").unwrap();
    let end = repository.snapshot();

    repository.restore(end).unwrap();
    assert_strings(&repository, &["foo", "bar", "qux", "xyz"]);

    repository.restore(mid).unwrap();
    assert_strings(&repository, &["foo", "bar"]);

    repository.restore(start).unwrap();
    assert_strings(&repository, &[]);

    // Restoring to the start invalidated the mid snapshot.
    assert_eq!(
        repository.restore(mid),
        Err(Error::InvalidSnapshot {
            snapshot_mark: 2,
            current_mark: 0,
        })
    );
    assert_strings(&repository, &[]);
}

#[test]
fn test_restore_reassigns_discarded_ids() {
    let mut repository = Repository::new();

    repository.intern("foo").unwrap();
    let snapshot = repository.snapshot();
    repository.intern("bar").unwrap();
    repository.intern("qux").unwrap();

    repository.restore(snapshot).unwrap();
    assert_eq!(repository.intern("xyz").unwrap().as_u32(), 2);

    let listing: Vec<(u32, &str)> = repository
        .iter()
        .map(|(id, s)| (id.as_u32(), std::str::from_utf8(s).unwrap()))
        .collect();
    assert_eq!(listing, [(1, "foo"), (2, "xyz")]);
}

#[test]
fn test_restore_without_mutation_is_invisible() {
    let mut repository = Repository::with_page_size(32).unwrap();
    for i in 0..50 {
        repository.intern(format!("s{i}")).unwrap();
    }
    let before: Vec<(StringId, Vec<u8>)> = repository
        .iter()
        .map(|(id, s)| (id, s.to_vec()))
        .collect();
    let stats = repository.stats();

    let snapshot = repository.snapshot();
    repository.restore(snapshot).unwrap();

    let after: Vec<(StringId, Vec<u8>)> = repository
        .iter()
        .map(|(id, s)| (id, s.to_vec()))
        .collect();
    assert_eq!(before, after);
    assert_eq!(repository.stats(), stats);
}

#[test]
fn test_repeated_rollback_cycles_do_not_grow_memory() {
    let mut repository = Repository::with_page_size(128).unwrap();
    repository.intern("base").unwrap();
    let snapshot = repository.snapshot();

    for i in 0..200 {
        repository.intern(format!("batch-{i:03}")).unwrap();
    }
    let high_water = repository.allocated_bytes();

    for round in 0..10 {
        repository.restore(snapshot).unwrap();
        for i in 0..200 {
            let id = repository.intern(format!("r{round}-{i:03}")).unwrap();
            assert_eq!(id.as_u32(), i + 2);
        }
    }

    // Smaller batches fit in the pages kept from the first batch.
    assert_eq!(repository.allocated_bytes(), high_water);
    assert_eq!(repository.lookup_str(1u32), Some("base"));
    assert_eq!(repository.lookup("batch-000"), None);
}

// ============================================================================
// Optimize
// ============================================================================

#[test]
fn test_optimize() {
    let mut repository = Repository::new();
    for s in ["foo", "bar", "baz"] {
        repository.intern(s).unwrap();
    }
    let bar = StringId::new(2).unwrap();
    let baz = StringId::new(3).unwrap();

    let mut frequency = Frequency::new();
    frequency.add(bar);
    let optimized = repository.optimize(&frequency).unwrap();
    assert_strings(&optimized, &["bar"]);

    frequency.add(baz);
    frequency.add(baz);
    let optimized = repository.optimize(&frequency).unwrap();
    assert_strings(&optimized, &["baz", "bar"]);

    frequency.add_all(&repository);
    frequency.add(baz);
    frequency.add(bar);
    let optimized = repository.optimize(&frequency).unwrap();
    assert_strings(&optimized, &["baz", "bar", "foo"]);

    assert_strings(&repository, &["foo", "bar", "baz"]);
}

#[test]
fn test_optimize_groups_hot_strings_in_first_page() {
    let mut repository = Repository::with_page_size(64).unwrap();
    let mut frequency = Frequency::new();

    let ids: Vec<StringId> = (0..40)
        .map(|i| repository.intern(format!("word{i:02}")).unwrap())
        .collect();
    // Every fifth word is hot.
    for (i, &id) in ids.iter().enumerate() {
        let hits = if i % 5 == 0 { 10 } else { 1 };
        for _ in 0..hits {
            frequency.add(id);
        }
    }

    let optimized = repository.optimize(&frequency).unwrap();
    assert_eq!(optimized.count(), 40);

    let hot: Vec<&str> = optimized
        .iter()
        .take(8)
        .map(|(_, s)| std::str::from_utf8(s).unwrap())
        .collect();
    assert_eq!(
        hot,
        ["word00", "word05", "word10", "word15", "word20", "word25", "word30", "word35"]
    );
}

//! Committed table growth and commit failure atomicity.

use txkv_core::{Config, CoreError, Database};

fn keys(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}{i}")).collect()
}

#[test]
fn first_commit_allocates_initial_capacity() {
    let mut db: Database = Database::new();
    assert_eq!(db.capacity(), 0);

    db.transaction(|db| db.put("A", 1)).unwrap();
    assert_eq!(db.capacity(), 16);
}

#[test]
fn crossing_load_boundary_doubles() {
    let names = keys("k", 13);
    let mut db: Database = Database::new();

    db.transaction(|db| {
        for key in names.iter().take(12) {
            db.put(key, 1)?;
        }
        Ok(())
    })
    .unwrap();
    assert_eq!(db.capacity(), 16);

    db.transaction(|db| db.put(&names[12], 1)).unwrap();
    assert_eq!(db.capacity(), 32);
    assert_eq!(db.len(), 13);
}

#[test]
fn one_large_commit_doubles_repeatedly() {
    let names = keys("bulk", 1000);
    let mut db: Database = Database::new();

    db.begin().unwrap();
    for (i, key) in names.iter().enumerate() {
        db.put(key, i as i32).unwrap();
    }
    let summary = db.commit().unwrap();

    assert_eq!(summary.previous_capacity, 0);
    assert_eq!(summary.capacity, 2048);
    assert_eq!(summary.inserted, 1000);
    assert_eq!(db.len(), 1000);
}

#[test]
fn growth_preserves_every_committed_pair() {
    let names = keys("entry", 500);
    let mut db: Database = Database::new();

    for (batch, chunk) in names.chunks(7).enumerate() {
        db.transaction(|db| {
            for key in chunk {
                db.put(key, batch as i32)?;
            }
            Ok(())
        })
        .unwrap();

        let load = db.len() * 100 / db.capacity();
        assert!(load <= 75, "load {load}% after batch {batch}");
    }

    assert_eq!(db.len(), names.len());
    for (i, key) in names.iter().enumerate() {
        assert_eq!(db.get(key), Some(&((i / 7) as i32)), "key {key}");
    }
    assert!(db.stats().table_growths() >= 5);
}

#[test]
fn growth_and_overwrite_in_one_commit() {
    let names = keys("mix", 20);
    let mut db: Database = Database::new();

    db.transaction(|db| {
        for key in names.iter().take(10) {
            db.put(key, 1)?;
        }
        Ok(())
    })
    .unwrap();

    db.begin().unwrap();
    for key in &names {
        db.put(key, 2).unwrap();
    }
    db.put(&names[0], 3).unwrap();
    let summary = db.commit().unwrap();

    assert!(summary.grew());
    assert_eq!(summary.inserted, 10);
    assert_eq!(summary.updated, 11);
    assert_eq!(db.len(), 20);
    assert_eq!(db.get(&names[0]), Some(&3));
    assert_eq!(db.get(&names[19]), Some(&2));
}

#[test]
fn capacity_overflow_leaves_everything_untouched() {
    let names = keys("cap", 30);
    let config = Config::default().max_table_capacity(32);
    let mut db: Database = Database::with_config(config).unwrap();

    db.transaction(|db| {
        for key in names.iter().take(20) {
            db.put(key, 1)?;
        }
        Ok(())
    })
    .unwrap();
    assert_eq!(db.capacity(), 32);

    db.begin().unwrap();
    for key in names.iter() {
        db.put(key, 2).unwrap();
    }
    let result = db.commit();

    assert_eq!(result, Err(CoreError::CapacityOverflow { required: 50 }));
    assert!(db.is_active());
    assert_eq!(db.pending_writes(), 30);
    assert_eq!(db.len(), 20);
    assert_eq!(db.capacity(), 32);
    assert_eq!(db.get(&names[0]), Some(&1));
    assert!(db.get(&names[25]).is_none());

    db.rollback().unwrap();
    assert_eq!(db.len(), 20);
}

#[test]
fn failed_commit_can_be_retried_after_rollback() {
    let names = keys("retry", 40);
    let config = Config::default()
        .initial_table_capacity(8)
        .max_table_capacity(16);
    let mut db: Database = Database::with_config(config).unwrap();

    db.begin().unwrap();
    for key in &names {
        db.put(key, 1).unwrap();
    }
    assert!(matches!(
        db.commit(),
        Err(CoreError::CapacityOverflow { required: 40 })
    ));
    db.rollback().unwrap();

    db.transaction(|db| {
        for key in names.iter().take(12) {
            db.put(key, 1)?;
        }
        Ok(())
    })
    .unwrap();
    assert_eq!(db.len(), 12);
    assert_eq!(db.capacity(), 16);
}

#[test]
fn custom_load_factor_is_respected() {
    let names = keys("half", 9);
    let config = Config::default().max_load_percent(50);
    let mut db: Database = Database::with_config(config).unwrap();

    db.transaction(|db| {
        for key in &names {
            db.put(key, 0)?;
        }
        Ok(())
    })
    .unwrap();

    assert_eq!(db.capacity(), 32);
}

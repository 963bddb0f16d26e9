//! Row store integration tests.

#[cfg(feature = "kv")]
use tempfile::TempDir;
use typed_props::prelude::*;
use typed_props::StoreError;

fn task_properties() -> PropertyCollection {
    let mut props = PropertyCollection::new();
    props
        .add("initial", 'g', CharSchema::range('a', 'z').into())
        .unwrap();
    props
        .add("priority", 2, Schema::from(IntSchema::range(1, 5)).read_only())
        .unwrap();
    props
        .add(
            "ratio",
            1.0715660391465826e-75,
            Schema::from(DoubleSchema::range(0.0, f64::INFINITY)).with_default(f64::INFINITY),
        )
        .unwrap();
    props
        .add(
            "watchers",
            vec!["ana".to_string(), "li".to_string()],
            StringArraySchema::new().into(),
        )
        .unwrap();
    props
}

fn exercise_store(store: &mut impl RowStore) {
    assert!(store.owners().unwrap().is_empty());
    assert!(store.load_properties("task-1").unwrap().is_none());

    store.save_properties("task-1", &task_properties()).unwrap();
    store.save_properties("task-2", &PropertyCollection::new()).unwrap();
    assert_eq!(store.owners().unwrap(), vec!["task-1", "task-2"]);

    let loaded = store.load_properties("task-1").unwrap().unwrap();
    assert_eq!(loaded, task_properties());

    let mut updated = loaded;
    assert_eq!(
        updated.set("priority", 4).unwrap_err().reason(),
        Some(typed_props::reason::READONLY)
    );
    updated.set("initial", "q").unwrap();
    store.save_properties("task-1", &updated).unwrap();
    let reloaded = store.load_properties("task-1").unwrap().unwrap();
    assert_eq!(reloaded.get("initial"), Some(&Value::Char('q')));

    assert!(store.delete_owner("task-1").unwrap());
    assert!(!store.delete_owner("task-1").unwrap());
    assert_eq!(store.owners().unwrap(), vec!["task-2"]);
}

#[test]
fn memory_store() {
    let mut store = MemoryRowStore::new();
    exercise_store(&mut store);
}

#[cfg(feature = "kv")]
#[test]
fn fjall_store() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig::at(dir.path().join("props"));
    let mut store = FjallRowStore::init(&config).unwrap();
    exercise_store(&mut store);
}

#[cfg(feature = "kv")]
#[test]
fn fjall_store_from_config_file() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("props");
    let config_path = dir.path().join("typed-props.toml");
    std::fs::write(
        &config_path,
        format!(
            "[store]\npath = {:?}\nsync_on_write = false\n",
            store_path.display().to_string()
        ),
    )
    .unwrap();

    let config = StoreConfig::from_file(&config_path).unwrap();
    assert_eq!(config.store.path, store_path);
    assert!(!config.store.sync_on_write);

    {
        let mut store = FjallRowStore::init(&config).unwrap();
        store.save_properties("case-9", &task_properties()).unwrap();
        store.flush().unwrap();
    }

    let store = FjallRowStore::open(&config).unwrap();
    assert_eq!(
        store.load_properties("case-9").unwrap(),
        Some(task_properties())
    );
}

#[cfg(feature = "kv")]
#[test]
fn fjall_open_uninitialized() {
    let dir = TempDir::new().unwrap();
    let err = FjallRowStore::open_path(&dir.path().join("nothing-here")).unwrap_err();
    assert!(matches!(err, StoreError::NotInitialized(_)));
}

#[test]
fn store_errors_convert_into_crate_error() {
    let err: Error = StoreError::Corrupt {
        owner: "o".to_string(),
        detail: "checksum mismatch".to_string(),
    }
    .into();
    assert!(matches!(err, Error::Store(_)));
    assert!(err.to_string().contains("checksum mismatch"));
}

use super::*;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

fn t(title: &str) -> Track {
    Track {
        title: title.into(),
        description: format!("about {title}"),
        release_date: 1_700_000_000,
    }
}

#[test]
fn create_then_load_one_round_trips() {
    let dir = tempdir().unwrap();
    let store = TrackStore::new(dir.path());

    let track = Track {
        title: "My Song".into(),
        description: "x".into(),
        release_date: 1_700_000_000,
    };
    store.create(&track).unwrap();

    assert_eq!(store.load_one("My Song").unwrap(), track);
}

#[test]
fn create_writes_kebab_case_metadata() {
    let dir = tempdir().unwrap();
    let store = TrackStore::new(dir.path());
    store.create(&t("Song")).unwrap();

    let raw = fs::read_to_string(dir.path().join("Song").join("info.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["title"], "Song");
    assert_eq!(value["release-date"], 1_700_000_000);
    assert!(!dir.path().join("Song").join("info.json.tmp").exists());
}

#[test]
fn create_is_idempotent_and_overwrites_metadata() {
    let dir = tempdir().unwrap();
    let store = TrackStore::new(dir.path());

    store.create(&t("Song")).unwrap();
    let updated = Track {
        description: "second take".into(),
        ..t("Song")
    };
    store.create(&updated).unwrap();

    assert_eq!(store.load_one("Song").unwrap().description, "second take");
}

#[test]
fn create_rejects_disallowed_titles() {
    let dir = tempdir().unwrap();
    let store = TrackStore::new(dir.path().join("data"));
    fs::create_dir_all(store.root()).unwrap();

    for title in ["../escape", "a/b", "", "..", "."] {
        let err = store.create(&t(title)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidName(_)), "{title:?}");
    }
    assert!(!dir.path().join("escape").exists());
    assert!(!store.root().join("info.json").exists());
}

#[test]
fn create_with_media_writes_audio_and_cover() {
    let dir = tempdir().unwrap();
    let store = TrackStore::new(dir.path());

    let media = TrackMedia {
        audio: Some(b"ID3 fake mp3".to_vec()),
        cover: Some(b"\x89PNG fake".to_vec()),
    };
    store.create_with_media(&t("Song"), &media).unwrap();

    assert_eq!(fs::read(store.audio_path("Song").unwrap()).unwrap(), b"ID3 fake mp3");
    assert_eq!(fs::read(store.cover_path("Song").unwrap()).unwrap(), b"\x89PNG fake");
    assert_eq!(store.load_one("Song").unwrap(), t("Song"));
}

#[test]
fn create_without_media_leaves_existing_files_alone() {
    let dir = tempdir().unwrap();
    let store = TrackStore::new(dir.path());
    let audio = store.audio_path("Song").unwrap();
    fs::create_dir_all(audio.parent().unwrap()).unwrap();
    fs::write(&audio, b"already here").unwrap();

    store.create(&t("Song")).unwrap();

    assert_eq!(fs::read(&audio).unwrap(), b"already here");
}

#[test]
fn load_one_distinguishes_missing_and_malformed() {
    let dir = tempdir().unwrap();
    let store = TrackStore::new(dir.path());

    assert!(matches!(store.load_one("does-not-exist"), Err(StoreError::NotFound(_))));

    fs::create_dir_all(dir.path().join("empty")).unwrap();
    assert!(matches!(store.load_one("empty"), Err(StoreError::NotFound(_))));

    fs::create_dir_all(dir.path().join("broken")).unwrap();
    fs::write(dir.path().join("broken").join("info.json"), b"{\"title\": \"bro").unwrap();
    assert!(matches!(store.load_one("broken"), Err(StoreError::InvalidData { .. })));

    assert!(matches!(
        store.load_one("../../etc/passwd"),
        Err(StoreError::InvalidName(_))
    ));
}

#[test]
fn load_one_rejects_title_that_disagrees_with_directory() {
    let dir = tempdir().unwrap();
    let store = TrackStore::new(dir.path());
    store.create(&t("Original")).unwrap();
    fs::rename(dir.path().join("Original"), dir.path().join("Renamed")).unwrap();

    assert!(matches!(store.load_one("Renamed"), Err(StoreError::InvalidData { .. })));
}

#[test]
fn load_all_skips_corrupt_entries_and_sorts_by_name() {
    let dir = tempdir().unwrap();
    let store = TrackStore::new(dir.path());

    store.create(&t("b side")).unwrap();
    store.create(&t("A side")).unwrap();

    let broken = dir.path().join("corrupt");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join("info.json"), b"{ truncated").unwrap();

    // Half-finished create: directory present, no metadata yet.
    fs::create_dir_all(dir.path().join("pending").join("audio")).unwrap();

    // Stray files at the root are not tracks.
    fs::write(dir.path().join("notes.txt"), b"hello").unwrap();

    let tracks = store.load_all().unwrap();
    let titles: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["A side", "b side"]);
}

#[test]
fn load_all_skips_directories_with_disallowed_names() {
    let dir = tempdir().unwrap();
    let store = TrackStore::new(dir.path());

    let odd = dir.path().join("odd#name");
    fs::create_dir_all(&odd).unwrap();
    fs::write(
        odd.join("info.json"),
        serde_json::to_vec(&t("odd#name")).unwrap(),
    )
    .unwrap();

    assert!(store.load_all().unwrap().is_empty());
}

#[test]
fn load_all_of_empty_root_is_empty() {
    let dir = tempdir().unwrap();
    assert!(TrackStore::new(dir.path()).load_all().unwrap().is_empty());
}

#[test]
fn load_all_fails_when_root_is_missing_or_a_file() {
    let dir = tempdir().unwrap();

    let missing = TrackStore::new(dir.path().join("missing"));
    assert!(matches!(missing.load_all(), Err(StoreError::Io(_))));

    let file = dir.path().join("file");
    fs::write(&file, b"").unwrap();
    assert!(matches!(
        TrackStore::new(&file).load_all(),
        Err(StoreError::NotADirectory(_))
    ));
}

#[cfg(unix)]
#[test]
fn load_all_fails_when_root_cannot_be_listed() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let root = dir.path().join("data");
    let store = TrackStore::new(&root);
    store.create(&t("Song")).unwrap();

    fs::set_permissions(&root, fs::Permissions::from_mode(0o300)).unwrap();
    let listable = fs::read_dir(&root).is_ok();
    let res = store.load_all();
    fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();

    // Permission bits do not bind a privileged user.
    if listable {
        return;
    }
    assert!(matches!(res, Err(StoreError::Io(_))), "{res:?}");
}

#[test]
fn media_paths_use_fixed_names_and_reject_traversal() {
    let store = TrackStore::new("/srv/data");
    assert_eq!(
        store.audio_path("Song").unwrap(),
        std::path::PathBuf::from("/srv/data/Song/audio/track.mp3")
    );
    assert_eq!(
        store.cover_path("Song").unwrap(),
        std::path::PathBuf::from("/srv/data/Song/image/cover.png")
    );
    assert!(store.audio_path("../Song").is_err());
    assert!(store.cover_path("..").is_err());
}

#[test]
fn catalog_publish_appends_and_replaces_by_title() {
    let catalog = Catalog::new(vec![t("One")]);

    catalog.publish(t("Two"));
    assert_eq!(catalog.len(), 2);

    catalog.publish(Track {
        description: "new".into(),
        ..t("One")
    });
    let snap = catalog.snapshot();
    assert_eq!(snap.len(), 2);
    assert_eq!(snap[0].description, "new");
    assert_eq!(snap[1].title, "Two");
}

#[test]
fn catalog_order_matches_a_fresh_load() {
    let dir = tempdir().unwrap();
    let store = TrackStore::new(dir.path());
    let catalog = Catalog::new(store.load_all().unwrap());

    for title in ["Zebra", "alpha", "Mango", "(intro)", "Beta"] {
        store.create(&t(title)).unwrap();
        catalog.publish(t(title));
    }

    let published: Vec<String> = catalog.snapshot().iter().map(|t| t.title.clone()).collect();
    let reloaded: Vec<String> = store.load_all().unwrap().into_iter().map(|t| t.title).collect();
    assert_eq!(published, reloaded);
    assert_eq!(published, ["(intro)", "Beta", "Mango", "Zebra", "alpha"]);
}

#[test]
fn catalog_new_orders_by_title() {
    let catalog = Catalog::new(vec![t("b"), t("a")]);
    assert_eq!(catalog.snapshot()[0].title, "a");
}

#[test]
fn catalog_snapshot_is_unaffected_by_later_publishes() {
    let catalog = Catalog::new(vec![t("One")]);
    let before = catalog.snapshot();

    catalog.publish(t("Two"));

    assert_eq!(before.len(), 1);
    assert_eq!(catalog.snapshot().len(), 2);
}

#[test]
fn catalog_concurrent_publishes_are_not_lost() {
    let catalog = Catalog::default();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let catalog = catalog.clone();
            thread::spawn(move || {
                for j in 0..25 {
                    catalog.publish(t(&format!("track {i}-{j}")));
                    // Every snapshot a reader sees is a complete sequence.
                    let snap: Arc<Vec<Track>> = catalog.snapshot();
                    assert!(snap.iter().all(|t| t.title.starts_with("track ")));
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(catalog.len(), 200);
}

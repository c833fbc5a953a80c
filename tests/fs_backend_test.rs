use secnotes::store::backend::StorageBackend;
use secnotes::store::fs_backend::FsBackend;
use secnotes::store::slot_store::SlotStore;
use secnotes::store::RecordKind;
use secnotes::NoteRecord;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("notes"));
    (dir, backend)
}

#[test]
fn test_fs_backend_basic_field_io() {
    let (_dir, backend) = setup();

    backend.write_slot(RecordKind::Note, 0, "Hello World").unwrap();
    assert_eq!(
        backend.read_slot(RecordKind::Note, 0).unwrap(),
        Some("Hello World".to_string())
    );

    backend.write_mask(RecordKind::Note, 0b101).unwrap();
    assert_eq!(backend.read_mask(RecordKind::Note).unwrap(), 0b101);
}

#[test]
fn test_fs_backend_unwritten_fields() {
    let (_dir, backend) = setup();
    assert_eq!(backend.read_slot(RecordKind::Note, 7).unwrap(), None);
    assert_eq!(backend.read_mask(RecordKind::Contact).unwrap(), 0);
    assert_eq!(backend.read_settings().unwrap(), None);
}

#[test]
fn test_fs_backend_file_layout() {
    let (dir, backend) = setup();
    let root = dir.path().join("notes");

    backend.write_slot(RecordKind::Note, 2, "payload").unwrap();
    backend.write_slot(RecordKind::Contact, 0, "c").unwrap();
    backend.write_mask(RecordKind::Note, 0b100).unwrap();
    backend.write_settings("{}").unwrap();

    assert!(root.join("note-2.json").exists());
    assert!(root.join("contact-0.json").exists());
    assert!(root.join("note-mask.json").exists());
    assert!(root.join("settings.json").exists());
}

#[test]
fn test_fs_backend_no_tmp_files_left_behind() {
    let (dir, backend) = setup();
    let root = dir.path().join("notes");

    backend.write_slot(RecordKind::Note, 0, "a").unwrap();
    backend.write_slot(RecordKind::Note, 0, "b").unwrap();
    backend.write_mask(RecordKind::Note, 1).unwrap();

    let leftovers: Vec<_> = fs::read_dir(&root)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|x| x == "tmp").unwrap_or(false))
        .collect();
    assert!(leftovers.is_empty(), "tmp files left: {leftovers:?}");
}

#[test]
fn test_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("notes");

    let slot = {
        let mut store = SlotStore::with_backend(FsBackend::new(root.clone()));
        let slot = store
            .add_note(&NoteRecord::new("Persisted", "Line one\nLine two"))
            .unwrap();
        let doomed = store.add_note(&NoteRecord::new("Gone", "x")).unwrap();
        store.delete_note(doomed).unwrap();
        slot
    };

    // A fresh store over the same directory sees the same state.
    let store = SlotStore::with_backend(FsBackend::new(root));
    assert_eq!(store.count(RecordKind::Note).unwrap(), 1);
    let note = store.note(slot).unwrap();
    assert_eq!(note.title, "Persisted");
    assert_eq!(note.content, "Line one\nLine two");
}

#[test]
fn test_settings_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("notes");

    {
        let mut store = SlotStore::with_backend(FsBackend::new(root.clone()));
        let mut settings = store.settings().unwrap();
        settings.set_passcode(&[3, 1, 4, 1, 5]).unwrap();
        store.set_settings(&settings).unwrap();
    }

    let store = SlotStore::with_backend(FsBackend::new(root));
    let settings = store.settings().unwrap();
    assert!(settings.locked);
    assert_eq!(settings.digits, vec![3, 1, 4, 1, 5]);
}

use super::*;

#[test]
fn normalize_rel_path_cleans_separators_and_dots() {
    assert_eq!(normalize_rel_path("flags/fr.svg").unwrap(), "flags/fr.svg");
    assert_eq!(
        normalize_rel_path("flags\\.\\de.svg").unwrap(),
        "flags/de.svg"
    );
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
}

#[test]
fn normalize_rel_path_rejects_escapes() {
    assert!(normalize_rel_path("/etc/passwd").is_err());
    assert!(normalize_rel_path("../outside.svg").is_err());
    assert!(normalize_rel_path("flags/../../outside.svg").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./.").is_err());
}

#[test]
fn fs_resolver_reads_relative_to_root() {
    let dir = std::env::temp_dir().join(format!("flagblend_src_{}", std::process::id()));
    std::fs::create_dir_all(dir.join("flags")).unwrap();
    std::fs::write(dir.join("flags/solid.bin"), b"bytes").unwrap();

    let resolver = FsResolver::new(&dir);
    let bytes = resolver.resolve(&ImageSource::new("flags/solid.bin")).unwrap();
    assert_eq!(bytes, b"bytes");

    assert!(resolver.resolve(&ImageSource::new("flags/missing.bin")).is_err());
    assert!(resolver.resolve(&ImageSource::new("../solid.bin")).is_err());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn memory_resolver_round_trips_entries() {
    let mut resolver = MemoryResolver::new();
    resolver.insert("fr", vec![1, 2, 3]);

    assert_eq!(resolver.resolve(&ImageSource::new("fr")).unwrap(), [1, 2, 3]);
    assert!(resolver.resolve(&ImageSource::new("de")).is_err());
}

#[test]
fn image_source_serde_round_trip() {
    let sources = vec![ImageSource::new("flags/fr.svg"), ImageSource::new("flags/de.svg")];
    let json = serde_json::to_string(&sources).unwrap();
    let back: Vec<ImageSource> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, sources);
}

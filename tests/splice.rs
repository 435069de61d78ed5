use std::fs;

use assert_matches::assert_matches;
use lemoe_crud::ScaffoldError;
use lemoe_crud::splice::{AggregateFile, AnchorSpec, splice};

const ROUTES: &str = "<?php\n\nuse Illuminate\\Support\\Facades\\Route;\n\nRoute::prefix('v1')->group(function () {\n    Route::middleware(['auth'])->group(function () {\n        Route::get('me', [\\App\\Http\\Controllers\\AuthController::class, 'me']);\n    });\n});\n";

#[test]
fn route_fragment_lands_inside_the_auth_group() {
    let fragment = "        Route::apiResource('orders', \\App\\Http\\Controllers\\OrderController::class);\n";
    let spliced = splice(ROUTES, AnchorSpec::route_table(), fragment).unwrap();

    let anchor = "    Route::middleware(['auth'])->group(function () {\n";
    let expected = ROUTES.replacen(anchor, &format!("{anchor}{fragment}"), 1);
    assert_eq!(spliced, expected);
}

#[test]
fn splicing_twice_inserts_two_copies() {
    let fragment = "    { title: 'Orders' },\n";
    let existing = "export default {\n  items: [\n  ],\n};\n";
    let once = splice(existing, AnchorSpec::menu_items(), fragment).unwrap();
    let twice = splice(&once, AnchorSpec::menu_items(), fragment).unwrap();

    assert_eq!(twice.matches(fragment).count(), 2);
    assert_eq!(twice.len(), existing.len() + 2 * fragment.len());
}

#[test]
fn custom_pattern_anchor() {
    let anchor = AnchorSpec::after(r"// generated routes\n").unwrap();
    let spliced = splice("a\n// generated routes\nb\n", &anchor, "x\n").unwrap();
    assert_eq!(spliced, "a\n// generated routes\nx\nb\n");
}

#[test]
fn invalid_anchor_pattern_is_rejected() {
    assert!(AnchorSpec::after("(unclosed").is_err());
}

#[tokio::test]
async fn aggregate_file_is_rewritten_in_place() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("api.php");
    fs::write(&path, ROUTES).expect("seed routes");

    let file = AggregateFile::new(&path);
    let outcome = file
        .splice(AnchorSpec::route_table(), "        // orders\n")
        .await
        .expect("splice");

    let updated = fs::read_to_string(&path).expect("read back");
    assert_eq!(outcome.inserted_bytes, "        // orders\n".len());
    assert_eq!(&updated[outcome.offset..outcome.offset + 18], "        // orders\n");
    assert_eq!(outcome.content_hash, lemoe_crud::writer::content_hash(&updated));
}

#[tokio::test]
async fn router_without_anchor_is_left_unmodified() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("router.js");
    let original = "export default {\n  routes: [],\n};\n";
    fs::write(&path, original).expect("seed router");

    let err = AggregateFile::new(&path)
        .splice(AnchorSpec::router_items(), "    { path: '/orders' },\n")
        .await
        .unwrap_err();

    assert_matches!(err, ScaffoldError::AnchorNotFound { path: Some(ref p), .. } if *p == path);
    assert_eq!(fs::read_to_string(&path).expect("read back"), original);
}

#[tokio::test]
async fn missing_aggregate_file_is_a_filesystem_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = AggregateFile::new(dir.path().join("menu.js"))
        .splice(AnchorSpec::menu_items(), "x")
        .await
        .unwrap_err();
    assert!(err.is_fatal());
}

#[tokio::test]
async fn concurrent_splices_keep_every_fragment() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("menu.js");
    fs::write(&path, "export default {\n  items: [\n  ],\n};\n").expect("seed menu");

    let first = AggregateFile::new(&path);
    let second = AggregateFile::new(&path);
    let (a, b) = tokio::join!(
        first.splice(AnchorSpec::menu_items(), "    { title: 'A' },\n"),
        second.splice(AnchorSpec::menu_items(), "    { title: 'B' },\n"),
    );
    a.expect("first splice");
    b.expect("second splice");

    let updated = fs::read_to_string(&path).expect("read back");
    assert!(updated.contains("    { title: 'A' },\n"));
    assert!(updated.contains("    { title: 'B' },\n"));
}

#[cfg(unix)]
#[tokio::test]
async fn splice_keeps_the_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("menu.js");
    fs::write(&path, "export default {\n  items: [\n  ],\n};\n").expect("seed menu");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod menu");

    AggregateFile::new(&path)
        .splice(AnchorSpec::menu_items(), "    { title: 'Orders' },\n")
        .await
        .expect("splice");

    let mode = fs::metadata(&path).expect("stat menu").permissions().mode();
    assert_eq!(mode & 0o777, 0o644);
}

//! Concurrent render isolation
//!
//! Two renders in flight at the same time must not read each other's
//! composition source. The render pipeline writes each source to a
//! per-render path, so overlapping renders stay isolated even when the
//! external tool reads its input late.

use std::time::Duration;

use api::renderer::Renderer;
use common::config::RenderConfig;
use tempfile::TempDir;

fn stub_renderer(tmp: &TempDir, script: &str) -> (Renderer, std::path::PathBuf) {
    let remotion_dir = tmp.path().join("remotion");
    let renders_dir = tmp.path().join("renders");
    std::fs::create_dir_all(&remotion_dir).unwrap();
    std::fs::create_dir_all(&renders_dir).unwrap();
    std::fs::write(remotion_dir.join("render-remotion.js"), script).unwrap();

    let config = RenderConfig {
        remotion_dir,
        renders_dir: renders_dir.clone(),
        node_bin: "sh".to_string(),
        timeout: Duration::from_secs(10),
    };
    (
        Renderer::new(config, "http://localhost:8000".to_string()),
        renders_dir,
    )
}

#[tokio::test]
async fn concurrent_renders_do_not_corrupt_each_other() {
    let tmp = TempDir::new().unwrap();
    // Stub tool: wait long enough for the two renders to overlap, then
    // copy the source it was given to the output path.
    let script = "sleep 0.3\ncp \"$1\" \"$2\"\n\
                  echo 'RESULT_JSON:{\"success\": true, \"fileSizeMb\": 0.01}'\n";
    let (renderer, renders_dir) = stub_renderer(&tmp, script);

    let (a, b) = tokio::join!(
        renderer.render("// source-alpha", Some("alpha")),
        renderer.render("// source-beta", Some("beta")),
    );
    let a = a.expect("render alpha should succeed");
    let b = b.expect("render beta should succeed");
    assert_eq!(a.filename, "alpha.mp4");
    assert_eq!(b.filename, "beta.mp4");

    let alpha = std::fs::read_to_string(renders_dir.join("alpha.mp4")).unwrap();
    let beta = std::fs::read_to_string(renders_dir.join("beta.mp4")).unwrap();
    assert_eq!(alpha, "// source-alpha");
    assert_eq!(beta, "// source-beta");
}

#[tokio::test]
async fn scratch_source_is_removed_after_render() {
    let tmp = TempDir::new().unwrap();
    let script = "cp \"$1\" \"$2\"\n\
                  echo 'RESULT_JSON:{\"success\": true, \"fileSizeMb\": 0.01}'\n";
    let (renderer, _) = stub_renderer(&tmp, script);

    renderer.render("// once", Some("once")).await.unwrap();

    let scratch_dir = tmp.path().join("remotion").join("src").join("user");
    let leftovers = std::fs::read_dir(&scratch_dir).unwrap().count();
    assert_eq!(leftovers, 0);
}

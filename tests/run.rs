mod support;

use clap::Parser;
use lemoe_crud::{CliArgs, GeneratorConfig, RunStatus, run};
use support::Workspace;

const COLUMNS: &str = r#"{
    "products": [
        {"Field": "id", "Type": "bigint unsigned", "Default": null, "Comment": ""},
        {"Field": "category_id", "Type": "bigint unsigned", "Default": null, "Comment": "分类"},
        {"Field": "name", "Type": "varchar(50)", "Default": null, "Comment": "名称"},
        {"Field": "created_at", "Type": "timestamp", "Default": "CURRENT_TIMESTAMP", "Comment": ""}
    ]
}"#;

fn config(workspace: &Workspace, extra: &[&str]) -> GeneratorConfig {
    workspace.seed("columns.json", COLUMNS);
    let columns = workspace.path("columns.json");
    let root = workspace.root().to_str().unwrap().to_string();
    let mut argv = vec![
        "lemoe-crud",
        "--workspace-root",
        root.as_str(),
        "generate",
        "--model",
        "product",
        "--columns",
        columns.to_str().unwrap(),
        "--no-input",
    ];
    argv.extend_from_slice(extra);
    GeneratorConfig::from_args(CliArgs::parse_from(argv)).expect("config")
}

#[tokio::test]
async fn runs_php_generation_from_a_column_export() {
    let workspace = Workspace::laravel();
    let report = run(config(&workspace, &["--target", "php"]))
        .await
        .expect("run");

    assert_eq!(report.status, RunStatus::Success);
    let store = workspace.read("app/Http/Requests/Product/StoreRequest.php");
    assert!(store.contains("'name' => 'required|max:50',"));
    assert!(!store.contains("'created_at'"));
}

#[tokio::test]
async fn template_directory_overrides_builtin_templates() {
    let workspace = Workspace::vue();
    workspace.seed("stubs/web/api.js.tera", "// api for {{ entity.plural }}\n");

    let report = run(config(
        &workspace,
        &["--target", "web", "--title", "商品", "--template-dir", "stubs"],
    ))
    .await
    .expect("run");

    assert_eq!(report.status, RunStatus::Success);
    assert_eq!(workspace.read("src/apis/product.js"), "// api for products\n");
    assert!(workspace.read("src/views/product/structure.js").contains("title: '商品',"));
}

#[tokio::test]
async fn unknown_table_stops_before_any_write() {
    let workspace = Workspace::laravel();
    let mut config = config(&workspace, &["--target", "php"]);
    if let lemoe_crud::Action::Generate { request, .. } = &mut config.action {
        request.model = "order".to_string();
    }

    let err = run(config).await.unwrap_err();
    assert!(format!("{err:#}").contains("orders"));
    assert!(!workspace.path("app").exists());
}

#[tokio::test]
async fn no_input_declines_existing_artifacts() {
    let workspace = Workspace::laravel();
    workspace.seed("app/Models/Product.php", "<?php // keep\n");

    let report = run(config(&workspace, &["--target", "php"]))
        .await
        .expect("run");

    assert_eq!(report.status, RunStatus::Partial);
    assert_eq!(workspace.read("app/Models/Product.php"), "<?php // keep\n");
}

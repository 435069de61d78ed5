//! Shared fixtures for the orchestrator tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lemoe_crud::Generator;
use lemoe_crud::prompt::OverwritePrompt;
use lemoe_crud::schema::ColumnRecord;
use lemoe_crud::source::StaticColumnSource;
use lemoe_crud::template::TeraRenderer;
use lemoe_crud::writer::ArtifactWriter;
use tempfile::TempDir;

pub const ROUTES: &str = "<?php\n\nuse Illuminate\\Support\\Facades\\Route;\n\nRoute::prefix('v1')->group(function () {\n    Route::middleware(['auth'])->group(function () {\n    });\n});\n";

pub const MENU: &str = "const state = {\n  items: [\n    {\n      title: '首页',\n      path: '/',\n    },\n  ],\n};\n\nexport default { namespaced: true, state };\n";

pub const ROUTER: &str = "const state = {\n  items: [\n  ],\n};\n\nexport default { namespaced: true, state };\n";

/// A throwaway project root with the host-owned aggregate files in place.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().expect("workspace tempdir"),
        }
    }

    pub fn laravel() -> Self {
        let workspace = Self::empty();
        workspace.seed("routes/api.php", ROUTES);
        workspace
    }

    pub fn vue() -> Self {
        let workspace = Self::empty();
        workspace.seed("src/store/modules/menu.js", MENU);
        workspace.seed("src/store/modules/router.js", ROUTER);
        workspace
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn seed(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, content).expect("seed file");
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative))
            .unwrap_or_else(|err| panic!("read {relative}: {err}"))
    }

    pub fn generator(&self, prompt: impl OverwritePrompt + 'static) -> Generator {
        Generator::new(
            ArtifactWriter::new(self.root()),
            Arc::new(TeraRenderer::builtin().expect("built-in templates")),
            Arc::new(prompt),
        )
    }
}

/// `products` as `SHOW FULL COLUMNS` would describe it.
pub fn product_columns() -> Vec<ColumnRecord> {
    vec![
        ColumnRecord::new("id", "bigint unsigned", false, ""),
        ColumnRecord::new("category_id", "bigint unsigned", false, "分类"),
        ColumnRecord::new("name", "varchar(50)", false, "名称"),
        ColumnRecord::new("price", "decimal(10,2)", false, "价格"),
        ColumnRecord::new("status", "tinyint unsigned", true, "状态 1上架 2下架"),
        ColumnRecord::new("meta", "json", true, "扩展"),
        ColumnRecord::new("created_at", "timestamp", true, ""),
        ColumnRecord::new("updated_at", "timestamp", true, ""),
        ColumnRecord::new("deleted_at", "timestamp", true, ""),
    ]
}

pub fn product_source() -> StaticColumnSource {
    StaticColumnSource::new(product_columns())
}

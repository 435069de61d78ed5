//! Vue admin target: API module, list view, menu entry and router entry.

use std::path::PathBuf;

use super::{GenerationReport, Generator, Operation, RunLog, Target};
use crate::error::ScaffoldResult;
use crate::schema::{ClassifiedTable, EntityNames};
use crate::splice::AnchorSpec;
use crate::template::context;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebPaths {
    pub api: PathBuf,
    pub view: PathBuf,
    pub menu: PathBuf,
    pub router: PathBuf,
}

impl WebPaths {
    pub fn new(entity: &EntityNames) -> Self {
        let model = &entity.model;
        Self {
            api: PathBuf::from(format!("src/apis/{model}.js")),
            view: PathBuf::from(format!("src/views/{model}")),
            menu: PathBuf::from("src/store/modules/menu.js"),
            router: PathBuf::from("src/store/modules/router.js"),
        }
    }
}

impl Generator {
    pub async fn generate_web(
        &self,
        table: &ClassifiedTable,
        title: &str,
        diagnostics: Vec<String>,
    ) -> GenerationReport {
        tracing::info!(model = %table.entity.model, target = "web", title, "generating");
        let mut log =
            RunLog::new(Operation::Generate, Target::Web, &table.entity).with_diagnostics(diagnostics);
        let outcome = self.web_steps(&mut log, table, title).await;
        log.finish(outcome)
    }

    async fn web_steps(
        &self,
        log: &mut RunLog,
        table: &ClassifiedTable,
        title: &str,
    ) -> ScaffoldResult<()> {
        let paths = WebPaths::new(&table.entity);

        self.file_step(
            log,
            "api",
            paths.api,
            "web/api.js",
            context::api_context(&table.entity, title),
        )
        .await?;

        let view = vec![
            (
                "index.vue".to_string(),
                "web/view/index.vue".to_string(),
                context::view_context(&table.entity, title),
            ),
            (
                "structure.js".to_string(),
                "web/structure.js".to_string(),
                context::structure_context(table, title),
            ),
        ];
        self.directory_step(log, "view", paths.view, view).await?;

        self.splice_step(
            log,
            "menu",
            paths.menu,
            AnchorSpec::menu_items(),
            "web/menu.js",
            context::menu_context(&table.entity, title),
        )
        .await?;

        self.splice_step(
            log,
            "router",
            paths.router,
            AnchorSpec::router_items(),
            "web/router.js",
            context::router_context(&table.entity, title),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_keep_model_case() {
        let paths = WebPaths::new(&EntityNames::new("productCategory"));
        assert_eq!(paths.api, PathBuf::from("src/apis/productCategory.js"));
        assert_eq!(paths.view, PathBuf::from("src/views/productCategory"));
        assert_eq!(paths.menu, PathBuf::from("src/store/modules/menu.js"));
    }
}

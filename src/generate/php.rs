//! Laravel target: controller, form requests, resource, model, service and a
//! route group entry.

use std::path::PathBuf;

use super::{GenerationReport, Generator, Operation, RunLog, Target};
use crate::error::ScaffoldResult;
use crate::schema::{ClassifiedTable, EntityNames};
use crate::splice::AnchorSpec;
use crate::template::context::{self, RequestKind};

/// Where each Laravel artifact of one model lives, relative to the
/// workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhpPaths {
    pub controller: PathBuf,
    pub requests: PathBuf,
    pub resource: PathBuf,
    pub model: PathBuf,
    pub service: PathBuf,
    pub routes: PathBuf,
}

impl PhpPaths {
    pub fn new(entity: &EntityNames) -> Self {
        let pascal = &entity.pascal;
        Self {
            controller: PathBuf::from(format!("app/Http/Controllers/{pascal}Controller.php")),
            requests: PathBuf::from(format!("app/Http/Requests/{pascal}")),
            resource: PathBuf::from(format!("app/Http/Resources/{pascal}Resource.php")),
            model: PathBuf::from(format!("app/Models/{pascal}.php")),
            service: PathBuf::from(format!("app/Services/{pascal}Service.php")),
            routes: PathBuf::from("routes/api.php"),
        }
    }
}

impl Generator {
    pub async fn generate_php(
        &self,
        table: &ClassifiedTable,
        title: &str,
        diagnostics: Vec<String>,
    ) -> GenerationReport {
        tracing::info!(model = %table.entity.model, target = "php", "generating");
        let mut log =
            RunLog::new(Operation::Generate, Target::Php, &table.entity).with_diagnostics(diagnostics);
        let outcome = self.php_steps(&mut log, table, title).await;
        log.finish(outcome)
    }

    async fn php_steps(
        &self,
        log: &mut RunLog,
        table: &ClassifiedTable,
        title: &str,
    ) -> ScaffoldResult<()> {
        let paths = PhpPaths::new(&table.entity);

        self.file_step(
            log,
            "controller",
            paths.controller,
            "php/controller.php",
            context::controller_context(table, title),
        )
        .await?;

        let requests = RequestKind::all()
            .map(|kind| {
                (
                    format!("{kind}.php"),
                    kind.template_id(),
                    context::request_context(table, title, kind),
                )
            })
            .collect();
        self.directory_step(log, "requests", paths.requests, requests)
            .await?;

        self.file_step(
            log,
            "resource",
            paths.resource,
            "php/resource.php",
            context::resource_context(table, title),
        )
        .await?;

        self.file_step(
            log,
            "model",
            paths.model,
            "php/model.php",
            context::model_context(table, title),
        )
        .await?;

        self.file_step(
            log,
            "service",
            paths.service,
            "php/service.php",
            context::service_context(table, title),
        )
        .await?;

        self.splice_step(
            log,
            "routes",
            paths.routes,
            AnchorSpec::route_table(),
            "php/route.php",
            context::route_context(&table.entity, title),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_use_pascal_case() {
        let paths = PhpPaths::new(&EntityNames::new("productCategory"));
        assert_eq!(
            paths.controller,
            PathBuf::from("app/Http/Controllers/ProductCategoryController.php")
        );
        assert_eq!(paths.requests, PathBuf::from("app/Http/Requests/ProductCategory"));
        assert_eq!(paths.model, PathBuf::from("app/Models/ProductCategory.php"));
        assert_eq!(paths.routes, PathBuf::from("routes/api.php"));
    }
}

//! Removal of dedicated artifacts.
//!
//! Only files the generator owns outright are deleted. Entries spliced into
//! the route table, menu or router stay where they are.

use super::{
    GenerationReport, Generator, Operation, PhpPaths, RunLog, Target, WebPaths,
    validate_model_name,
};
use crate::error::ScaffoldResult;
use crate::schema::EntityNames;

impl Generator {
    pub async fn remove(&self, target: Target, model: &str) -> ScaffoldResult<GenerationReport> {
        validate_model_name(model)?;
        let entity = EntityNames::new(model);
        tracing::info!(model, %target, "removing");

        let mut log = RunLog::new(Operation::Remove, target, &entity);
        let outcome = match target {
            Target::Php => self.remove_php(&mut log, &entity).await,
            Target::Web => self.remove_web(&mut log, &entity).await,
        };
        Ok(log.finish(outcome))
    }

    async fn remove_php(&self, log: &mut RunLog, entity: &EntityNames) -> ScaffoldResult<()> {
        let paths = PhpPaths::new(entity);
        self.remove_step(log, "controller", paths.controller).await?;
        self.remove_step(log, "requests", paths.requests).await?;
        self.remove_step(log, "resource", paths.resource).await?;
        self.remove_step(log, "model", paths.model).await?;
        self.remove_step(log, "service", paths.service).await
    }

    async fn remove_web(&self, log: &mut RunLog, entity: &EntityNames) -> ScaffoldResult<()> {
        let paths = WebPaths::new(entity);
        self.remove_step(log, "api", paths.api).await?;
        self.remove_step(log, "view", paths.view).await
    }
}

//! Workout templates: named, ordered lists of exercise names.

use crate::errors::{AppError, AppResult};
use crate::models::catalog::catalog_name;
use crate::models::template::WorkoutTemplate;
use crate::models::{TemplateId, UserId};
use crate::store::DocumentStore;

pub struct TemplateBook<'a, S: DocumentStore> {
    store: &'a S,
    owner: UserId,
}

impl<'a, S: DocumentStore> TemplateBook<'a, S> {
    pub fn new(store: &'a S, owner: &UserId) -> Self {
        Self {
            store,
            owner: owner.clone(),
        }
    }

    /// Save a template. Blank exercise names are dropped and catalog names
    /// take their canonical spelling.
    pub async fn create<I, T>(&self, name: &str, exercises: I) -> AppResult<WorkoutTemplate>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("template name is empty".into()));
        }

        let exercises: Vec<String> = exercises
            .into_iter()
            .map(|e| e.as_ref().trim().to_string())
            .filter(|e| !e.is_empty())
            .map(|e| catalog_name(&e).map(str::to_string).unwrap_or(e))
            .collect();
        if exercises.is_empty() {
            return Err(AppError::Validation(
                "a template needs at least one exercise".into(),
            ));
        }

        let template = self.store.add_template(&self.owner, name, &exercises).await?;
        tracing::info!(user = %self.owner, template = %template.id, "template saved");
        Ok(template)
    }

    pub async fn list(&self) -> AppResult<Vec<WorkoutTemplate>> {
        self.store.templates(&self.owner).await
    }

    /// First template whose name matches (case-insensitive).
    pub async fn find(&self, name: &str) -> AppResult<WorkoutTemplate> {
        let wanted = name.trim();
        self.list()
            .await?
            .into_iter()
            .find(|t| t.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AppError::NotFound(format!("template '{wanted}'")))
    }

    pub async fn delete(&self, id: &TemplateId) -> AppResult<()> {
        if !self.store.delete_template(&self.owner, id).await? {
            return Err(AppError::NotFound(format!("template {id}")));
        }
        tracing::info!(user = %self.owner, template = %id, "template deleted");
        Ok(())
    }
}

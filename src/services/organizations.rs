//! Organizations service

use crate::{
    error::{AppError, AppResult},
    models::organization::{CreateOrganization, Organization, UpdateOrganization},
    repository::Repository,
};

#[derive(Clone)]
pub struct OrganizationsService {
    repository: Repository,
}

impl OrganizationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Organization>> {
        self.repository.organizations.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Organization> {
        self.repository.organizations.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateOrganization) -> AppResult<Organization> {
        if self.repository.organizations.name_taken(&data.name, None).await? {
            return Err(AppError::Conflict(format!(
                "Organization '{}' already exists",
                data.name
            )));
        }
        let organization = self.repository.organizations.create(data).await?;
        tracing::info!("Created organization {} ({})", organization.id, organization.name);
        Ok(organization)
    }

    pub async fn update(&self, id: i32, data: &UpdateOrganization) -> AppResult<Organization> {
        if let Some(ref name) = data.name {
            if self.repository.organizations.name_taken(name, Some(id)).await? {
                return Err(AppError::Conflict(format!(
                    "Organization '{}' already exists",
                    name
                )));
            }
        }
        self.repository.organizations.update(id, data).await
    }

    /// Soft delete, refused while live units belong to the organization
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.organizations.get_by_id(id).await?;
        if self.repository.organizations.has_units(id).await? {
            return Err(AppError::Conflict(
                "Organization still has equipment units".to_string(),
            ));
        }
        self.repository.organizations.soft_delete(id).await
    }
}

use uuid::Uuid;

use crate::domain::actor::Actor;
use crate::domain::catalog::{
    CourierView, PackageCategory, PackageDraft, PackageKind, PackageView, PaymentMethodView,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;

// The original catering menu rules: a readable name and description, at
// least one serving, and a minimum price of 1000 minor units.
const MIN_NAME_LEN: usize = 3;
const MIN_DESCRIPTION_LEN: usize = 10;
const MIN_UNIT_PRICE: i64 = 1000;

fn validate_package(draft: &PackageDraft) -> Result<(), DomainError> {
    if draft.name.trim().len() < MIN_NAME_LEN {
        return Err(DomainError::Validation(format!(
            "package name must be at least {MIN_NAME_LEN} characters"
        )));
    }
    if draft.description.trim().len() < MIN_DESCRIPTION_LEN {
        return Err(DomainError::Validation(format!(
            "package description must be at least {MIN_DESCRIPTION_LEN} characters"
        )));
    }
    if draft.serving_capacity < 1 {
        return Err(DomainError::Validation(
            "serving capacity must be at least 1".to_string(),
        ));
    }
    if draft.unit_price < MIN_UNIT_PRICE {
        return Err(DomainError::Validation(format!(
            "unit price must be at least {MIN_UNIT_PRICE}"
        )));
    }
    Ok(())
}

pub struct CatalogService<R> {
    repo: R,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// The menu is public; no actor required.
    pub fn list_packages(
        &self,
        kind: Option<PackageKind>,
        category: Option<PackageCategory>,
    ) -> Result<Vec<PackageView>, DomainError> {
        self.repo.list_packages(kind, category)
    }

    pub fn get_package(&self, id: Uuid) -> Result<PackageView, DomainError> {
        self.repo
            .find_package(id)?
            .ok_or(DomainError::NotFound("package"))
    }

    pub fn create_package(
        &self,
        actor: Actor,
        draft: PackageDraft,
    ) -> Result<PackageView, DomainError> {
        actor.require_back_office("managing the package catalog")?;
        validate_package(&draft)?;
        self.repo.create_package(&draft)
    }

    pub fn update_package(
        &self,
        actor: Actor,
        id: Uuid,
        draft: PackageDraft,
    ) -> Result<PackageView, DomainError> {
        actor.require_back_office("managing the package catalog")?;
        validate_package(&draft)?;
        self.repo.update_package(id, &draft)
    }

    pub fn list_payment_methods(&self) -> Result<Vec<PaymentMethodView>, DomainError> {
        self.repo.list_payment_methods()
    }

    pub fn list_couriers(&self, actor: Actor) -> Result<Vec<CourierView>, DomainError> {
        actor.require_back_office("listing couriers")?;
        self.repo.list_couriers()
    }
}

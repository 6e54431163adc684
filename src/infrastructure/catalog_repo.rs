use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::actor::Role;
use crate::domain::catalog::{
    CourierView, PackageCategory, PackageDraft, PackageKind, PackageView, PaymentMethodDetailView,
    PaymentMethodView,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;
use crate::schema::{packages, payment_methods, staff};

use super::models::{NewPackageRow, PackageRow, PaymentMethodDetailRow, PaymentMethodRow, StaffRow};

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_package_view(row: PackageRow) -> Result<PackageView, DomainError> {
    let kind = row
        .kind
        .parse::<PackageKind>()
        .map_err(|_| DomainError::Internal(format!("corrupt package kind in storage: {}", row.kind)))?;
    let category = row.category.parse::<PackageCategory>().map_err(|_| {
        DomainError::Internal(format!("corrupt package category in storage: {}", row.category))
    })?;
    Ok(PackageView {
        id: row.id,
        name: row.name,
        kind,
        category,
        serving_capacity: row.serving_capacity,
        unit_price: row.unit_price,
        description: row.description,
        created_at: row.created_at,
    })
}

impl CatalogRepository for DieselCatalogRepository {
    fn list_packages(
        &self,
        kind: Option<PackageKind>,
        category: Option<PackageCategory>,
    ) -> Result<Vec<PackageView>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = packages::table.into_boxed();
        if let Some(kind) = kind {
            query = query.filter(packages::kind.eq(kind.as_str()));
        }
        if let Some(category) = category {
            query = query.filter(packages::category.eq(category.as_str()));
        }
        let rows = query
            .order(packages::created_at.desc())
            .select(PackageRow::as_select())
            .load(&mut conn)?;

        rows.into_iter().map(to_package_view).collect()
    }

    fn find_package(&self, id: Uuid) -> Result<Option<PackageView>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = packages::table
            .find(id)
            .select(PackageRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(to_package_view).transpose()
    }

    fn create_package(&self, draft: &PackageDraft) -> Result<PackageView, DomainError> {
        let mut conn = self.pool.get()?;

        let new_row = NewPackageRow {
            id: Uuid::new_v4(),
            name: draft.name.clone(),
            kind: draft.kind.as_str().to_string(),
            category: draft.category.as_str().to_string(),
            serving_capacity: draft.serving_capacity,
            unit_price: draft.unit_price,
            description: draft.description.clone(),
        };
        diesel::insert_into(packages::table)
            .values(&new_row)
            .execute(&mut conn)?;

        let row = packages::table
            .find(new_row.id)
            .select(PackageRow::as_select())
            .first(&mut conn)?;
        to_package_view(row)
    }

    fn update_package(&self, id: Uuid, draft: &PackageDraft) -> Result<PackageView, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(packages::table.find(id))
            .set((
                packages::name.eq(&draft.name),
                packages::kind.eq(draft.kind.as_str()),
                packages::category.eq(draft.category.as_str()),
                packages::serving_capacity.eq(draft.serving_capacity),
                packages::unit_price.eq(draft.unit_price),
                packages::description.eq(&draft.description),
            ))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(DomainError::NotFound("package"));
        }

        let row = packages::table
            .find(id)
            .select(PackageRow::as_select())
            .first(&mut conn)?;
        to_package_view(row)
    }

    fn list_payment_methods(&self) -> Result<Vec<PaymentMethodView>, DomainError> {
        let mut conn = self.pool.get()?;

        let methods = payment_methods::table
            .order(payment_methods::created_at.asc())
            .select(PaymentMethodRow::as_select())
            .load(&mut conn)?;
        let details = PaymentMethodDetailRow::belonging_to(&methods)
            .select(PaymentMethodDetailRow::as_select())
            .load(&mut conn)?;

        Ok(details
            .grouped_by(&methods)
            .into_iter()
            .zip(methods)
            .map(|(details, method)| PaymentMethodView {
                id: method.id,
                name: method.name,
                details: details
                    .into_iter()
                    .map(|d| PaymentMethodDetailView {
                        id: d.id,
                        account_number: d.account_number,
                        provider: d.provider,
                        logo_url: d.logo_url,
                    })
                    .collect(),
            })
            .collect())
    }

    fn list_couriers(&self) -> Result<Vec<CourierView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = staff::table
            .filter(staff::role.eq(Role::Courier.as_str()))
            .order(staff::name.asc())
            .select(StaffRow::as_select())
            .load(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|s| CourierView {
                id: s.id,
                name: s.name,
                email: s.email,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::domain::catalog::{PackageCategory, PackageDraft, PackageKind};
    use crate::domain::ports::CatalogRepository;
    use crate::infrastructure::testsupport::{setup_db, Fixture};

    use super::DieselCatalogRepository;

    fn meeting_box() -> PackageDraft {
        PackageDraft {
            name: "Office Meeting Box".to_string(),
            kind: PackageKind::Box,
            category: PackageCategory::Meeting,
            serving_capacity: 20,
            unit_price: 40_000,
            description: "Premium boxed meal for office meetings.".to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_fetch_package() {
        let (_container, pool) = setup_db().await;
        let _fixture = Fixture::seed(&pool);
        let repo = DieselCatalogRepository::new(pool);

        let created = repo.create_package(&meeting_box()).expect("create failed");
        let found = repo
            .find_package(created.id)
            .expect("find failed")
            .expect("package exists");

        assert_eq!(found.name, "Office Meeting Box");
        assert_eq!(found.kind, PackageKind::Box);
        assert_eq!(found.category, PackageCategory::Meeting);
        assert_eq!(found.unit_price, 40_000);
    }

    #[tokio::test]
    async fn list_filters_by_kind_and_category() {
        let (_container, pool) = setup_db().await;
        let _fixture = Fixture::seed(&pool);
        let repo = DieselCatalogRepository::new(pool);

        // Fixture seeds one BOX/BIRTHDAY and one BUFFET/WEDDING package.
        let boxes = repo
            .list_packages(Some(PackageKind::Box), None)
            .expect("list failed");
        assert_eq!(boxes.len(), 1);

        let weddings = repo
            .list_packages(None, Some(PackageCategory::Wedding))
            .expect("list failed");
        assert_eq!(weddings.len(), 1);
        assert_eq!(weddings[0].kind, PackageKind::Buffet);

        let all = repo.list_packages(None, None).expect("list failed");
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn update_package_rewrites_fields() {
        let (_container, pool) = setup_db().await;
        let _fixture = Fixture::seed(&pool);
        let repo = DieselCatalogRepository::new(pool);

        let created = repo.create_package(&meeting_box()).expect("create failed");
        let mut draft = meeting_box();
        draft.unit_price = 45_000;
        let updated = repo.update_package(created.id, &draft).expect("update failed");

        assert_eq!(updated.unit_price, 45_000);
    }

    #[tokio::test]
    async fn update_unknown_package_is_not_found() {
        let (_container, pool) = setup_db().await;
        let _fixture = Fixture::seed(&pool);
        let repo = DieselCatalogRepository::new(pool);

        assert!(repo.update_package(Uuid::new_v4(), &meeting_box()).is_err());
    }

    #[tokio::test]
    async fn payment_methods_carry_their_account_details() {
        let (_container, pool) = setup_db().await;
        let _fixture = Fixture::seed(&pool);
        let repo = DieselCatalogRepository::new(pool);

        let methods = repo.list_payment_methods().expect("list failed");
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].name, "Bank Transfer");
        assert_eq!(methods[0].details.len(), 1);
        assert_eq!(methods[0].details[0].provider, "BCA");
    }

    #[tokio::test]
    async fn couriers_listing_excludes_other_staff() {
        let (_container, pool) = setup_db().await;
        let fixture = Fixture::seed(&pool);
        let repo = DieselCatalogRepository::new(pool);

        let couriers = repo.list_couriers().expect("list failed");
        assert_eq!(couriers.len(), 1);
        assert_eq!(couriers[0].id, fixture.courier_id);
    }
}

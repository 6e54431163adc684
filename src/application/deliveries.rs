use uuid::Uuid;

use crate::domain::actor::{Actor, Role};
use crate::domain::errors::DomainError;
use crate::domain::order::DeliveryView;
use crate::domain::ports::DeliveryRepository;
use crate::domain::status::DeliveryStatus;

pub struct DeliveryService<R> {
    repo: R,
}

impl<R: DeliveryRepository> DeliveryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Staff see every delivery; couriers see their own work queue.
    pub fn list_deliveries(&self, actor: Actor) -> Result<Vec<DeliveryView>, DomainError> {
        match actor.role {
            Role::Admin | Role::Owner => self.repo.list(None),
            Role::Courier => self.repo.list(Some(actor.id)),
            Role::Customer => Err(DomainError::Forbidden(
                "customers follow their order status instead of deliveries".to_string(),
            )),
        }
    }

    pub fn update_delivery(
        &self,
        actor: Actor,
        delivery_id: Uuid,
        requested: DeliveryStatus,
        photo: Option<&str>,
    ) -> Result<DeliveryView, DomainError> {
        let delivery = self
            .repo
            .find_by_id(delivery_id)?
            .ok_or(DomainError::NotFound("delivery"))?;

        match actor.role {
            Role::Admin | Role::Owner => {}
            Role::Courier if delivery.courier_id == actor.id => {}
            Role::Courier => {
                return Err(DomainError::Forbidden(
                    "couriers can only update their own deliveries".to_string(),
                ));
            }
            Role::Customer => {
                return Err(DomainError::Forbidden(
                    "customers cannot update deliveries".to_string(),
                ));
            }
        }

        self.repo.update(delivery_id, requested, photo)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use uuid::Uuid;

    use crate::domain::actor::{Actor, Role};
    use crate::domain::errors::DomainError;
    use crate::domain::order::DeliveryView;
    use crate::domain::ports::DeliveryRepository;
    use crate::domain::status::DeliveryStatus;

    use super::DeliveryService;

    #[derive(Default)]
    struct FakeRepo {
        deliveries: Mutex<Vec<DeliveryView>>,
        updates: Mutex<u32>,
    }

    fn delivery_for(courier_id: Uuid) -> DeliveryView {
        DeliveryView {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            courier_id,
            status: DeliveryStatus::InTransit,
            dispatched_at: Utc::now(),
            arrived_at: None,
            arrival_photo: None,
        }
    }

    impl DeliveryRepository for FakeRepo {
        fn find_by_id(&self, id: Uuid) -> Result<Option<DeliveryView>, DomainError> {
            Ok(self
                .deliveries
                .lock()
                .unwrap()
                .iter()
                .find(|d| d.id == id)
                .cloned())
        }

        fn list(&self, courier: Option<Uuid>) -> Result<Vec<DeliveryView>, DomainError> {
            Ok(self
                .deliveries
                .lock()
                .unwrap()
                .iter()
                .filter(|d| courier.map_or(true, |c| d.courier_id == c))
                .cloned()
                .collect())
        }

        fn update(
            &self,
            delivery_id: Uuid,
            requested: DeliveryStatus,
            photo: Option<&str>,
        ) -> Result<DeliveryView, DomainError> {
            *self.updates.lock().unwrap() += 1;
            let mut delivery = self
                .find_by_id(delivery_id)?
                .ok_or(DomainError::NotFound("delivery"))?;
            delivery.status = requested;
            if let Some(p) = photo {
                delivery.arrival_photo = Some(p.to_string());
            }
            Ok(delivery)
        }
    }

    #[test]
    fn courier_sees_only_their_own_queue() {
        let repo = FakeRepo::default();
        let courier_id = Uuid::new_v4();
        repo.deliveries.lock().unwrap().push(delivery_for(courier_id));
        repo.deliveries
            .lock()
            .unwrap()
            .push(delivery_for(Uuid::new_v4()));
        let service = DeliveryService::new(repo);

        let own = service
            .list_deliveries(Actor::new(courier_id, Role::Courier))
            .expect("list failed");
        assert_eq!(own.len(), 1);

        let all = service
            .list_deliveries(Actor::new(Uuid::new_v4(), Role::Admin))
            .expect("list failed");
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn customers_cannot_list_deliveries() {
        let service = DeliveryService::new(FakeRepo::default());

        let result = service.list_deliveries(Actor::new(Uuid::new_v4(), Role::Customer));

        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }

    #[test]
    fn assigned_courier_can_update_their_delivery() {
        let repo = FakeRepo::default();
        let courier_id = Uuid::new_v4();
        let delivery = delivery_for(courier_id);
        let delivery_id = delivery.id;
        repo.deliveries.lock().unwrap().push(delivery);
        let service = DeliveryService::new(repo);

        let updated = service
            .update_delivery(
                Actor::new(courier_id, Role::Courier),
                delivery_id,
                DeliveryStatus::Arrived,
                Some("arrival.jpg"),
            )
            .expect("update failed");

        assert_eq!(updated.status, DeliveryStatus::Arrived);
        assert_eq!(updated.arrival_photo.as_deref(), Some("arrival.jpg"));
    }

    #[test]
    fn another_courier_cannot_touch_the_delivery() {
        let repo = FakeRepo::default();
        let delivery = delivery_for(Uuid::new_v4());
        let delivery_id = delivery.id;
        repo.deliveries.lock().unwrap().push(delivery);
        let service = DeliveryService::new(repo);

        let result = service.update_delivery(
            Actor::new(Uuid::new_v4(), Role::Courier),
            delivery_id,
            DeliveryStatus::Arrived,
            None,
        );

        assert!(matches!(result, Err(DomainError::Forbidden(_))));
        assert_eq!(*service.repo.updates.lock().unwrap(), 0);
    }

    #[test]
    fn unknown_delivery_is_not_found() {
        let service = DeliveryService::new(FakeRepo::default());

        let result = service.update_delivery(
            Actor::new(Uuid::new_v4(), Role::Admin),
            Uuid::new_v4(),
            DeliveryStatus::Arrived,
            None,
        );

        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }
}

//! [`StoreEntity`] implementation that lets [`CustomerOrder`] live in a
//! [`StoreActor`](crate::framework::StoreActor).

use crate::framework::StoreEntity;
use crate::model::CustomerOrder;

impl StoreEntity for CustomerOrder {
    type Id = String;

    fn id(&self) -> Option<&String> {
        self.id.as_ref()
    }

    fn with_id(self, id: String) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }
}

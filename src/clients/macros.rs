/// Generates `new(inner)` for a client that only wraps its own store.
macro_rules! impl_client_new {
    ($client_name:ident, $entity:ty) => {
        impl $client_name {
            pub fn new(inner: $crate::actor_framework::ResourceClient<$entity>) -> Self {
                Self { inner }
            }
        }
    };
}

/// Generates `find_<entity>(id)`, a raw store lookup that ignores visibility rules.
macro_rules! impl_client_methods {
    ($client_name:ident, $entity:ty, $id:ty, $error:ty, $entity_name_snake:ident) => {
        paste::paste! {
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<find_ $entity_name_snake>](&self, id: $id) -> Result<Option<$entity>, $error> {
                    tracing::debug!("Sending request");
                    Ok(self.inner.get(id).await?)
                }
            }
        }
    };
}

macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $id:ty, $error:ty, $entity_name_snake:ident) => {
        impl_client_new!($client_name, $entity);
        impl_client_methods!($client_name, $entity, $id, $error, $entity_name_snake);
    };
}

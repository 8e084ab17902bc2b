//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_get`] or [`expect_action`] to assert behavior
//! and script the store's answer, including failures.

use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};

pub type MockResponder<R, T> = oneshot::Sender<Result<R, FrameworkError<<T as Entity>::Error>>>;

/// Creates a mock client and a receiver for asserting requests.
///
/// The client sends to a channel the test controls, so each request can be
/// inspected and answered deterministically without a running actor.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, MockResponder<T, T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, MockResponder<Option<T>, T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Patch, MockResponder<T, T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update { id, patch, respond_to }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, MockResponder<T::ActionResult, T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ProductClient;
    use crate::domain::{Product, ProductId};
    use crate::product_actor::ProductError;
    use crate::test_support::product;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_mock_client() {
        let (inner, mut receiver) = create_mock_client::<Product>(10);
        let client = ProductClient::new(inner);
        let granola = product("Granola", dec!(4.00), dec!(10));
        let id = granola.id;

        let get_task = tokio::spawn(async move { client.get_product(id).await });

        let (requested, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(requested, id);
        responder.send(Ok(Some(granola.clone()))).unwrap();

        let result = get_task.await.unwrap();
        assert_eq!(result, Ok(Some(granola)));
    }

    #[tokio::test]
    async fn scripted_transport_failures_reach_the_caller() {
        let (inner, mut receiver) = create_mock_client::<Product>(10);
        let client = ProductClient::new(inner);

        let task = tokio::spawn(async move { client.check_stock(ProductId::new()).await });

        let (_, _, responder) = expect_action(&mut receiver).await.expect("Expected Action request");
        responder.send(Err(FrameworkError::ActorDropped)).unwrap();

        assert!(matches!(
            task.await.unwrap(),
            Err(ProductError::ActorCommunicationError(_))
        ));
    }
}

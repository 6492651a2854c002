use super::{ApiEntity, EndpointClient, EntityEndpoint, EntityList};
use crate::forms::OrderForm;
use crate::framework::{CacheClient, FrameworkError, Tag};
use crate::http::Transport;
use crate::model::Order;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

impl ApiEntity for Order {
    type Form = OrderForm;

    const NAME: &'static str = "order";
    const LABEL: &'static str = "Order";
    const TAG: Tag = Tag::ORDER;

    const LIST_ENDPOINT: &'static str = "allOrder";
    const LIST_PATH: &'static str = "/v1/order/all_order";
    const ADD_ENDPOINT: &'static str = "addOrder";
    const ADD_PATH: &'static str = "/v1/order/add_order";
}

/// Client for the order endpoints. Prices are computed by the server.
#[derive(Clone)]
pub struct OrderClient {
    inner: EntityEndpoint<Order>,
}

impl OrderClient {
    pub fn new(cache: CacheClient, transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: EntityEndpoint::new(cache, transport),
        }
    }

    pub async fn all_orders(&self) -> Result<EntityList<Order>, FrameworkError> {
        self.list().await
    }

    #[instrument(skip(self, form))]
    pub async fn add_order(&self, form: &OrderForm) -> Result<Value, FrameworkError> {
        debug!(?form, "add_order called");
        self.add(form).await
    }
}

impl EndpointClient<Order> for OrderClient {
    fn endpoint(&self) -> &EntityEndpoint<Order> {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::ListState;
    use crate::framework::mock::MockTransport;
    use crate::framework::QueryCache;
    use crate::http::{ApiError, Method, RequestBody};
    use serde_json::json;

    fn setup(mock: &Arc<MockTransport>) -> OrderClient {
        let (cache, client) = QueryCache::new(8);
        tokio::spawn(cache.run());
        OrderClient::new(client, mock.clone())
    }

    #[tokio::test]
    async fn test_add_order_posts_form_values() {
        let mock = Arc::new(MockTransport::new());
        mock.expect_post(Order::ADD_PATH)
            .return_ok(json!({ "data": { "price": 9.5, "totalPrice": 28.5, "netAmount": 28.5 } }));
        let orders = setup(&mock);

        let form = OrderForm {
            order_date: "2024-03-01".into(),
            item_id: "i1".into(),
            supplier_id: "s1".into(),
            qty: "3".into(),
        };
        let created = orders.add_order(&form).await.unwrap();
        assert_eq!(created["data"]["totalPrice"], json!(28.5));
        assert_eq!(
            mock.requests()[0].body,
            Some(RequestBody::Json(json!({
                "orderDate": "2024-03-01",
                "itemId": "i1",
                "supplierId": "s1",
                "qty": "3"
            })))
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_add_order_failure_is_returned() {
        let mock = Arc::new(MockTransport::new());
        mock.expect_post(Order::ADD_PATH).return_err(ApiError::Transport("reset".into()));
        let orders = setup(&mock);

        let result = orders.add_order(&OrderForm::default()).await;
        assert_eq!(
            result,
            Err(FrameworkError::Api(ApiError::Transport("reset".into())))
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_orders_list_and_refetch() {
        let mock = Arc::new(MockTransport::new());
        mock.expect_get(Order::LIST_PATH).return_ok(json!({ "data": [] }));
        mock.expect_get(Order::LIST_PATH).return_ok(json!({
            "data": [{
                "_id": "o1", "orderDate": "2024-03-01T00:00:00Z", "qty": 3,
                "itemId": { "_id": "i1", "itemName": "Widget" },
                "supplierId": { "_id": "s1", "supplierName": "Acme" },
                "price": 9.5, "totalPrice": 28.5
            }]
        }));
        let orders = setup(&mock);

        let mut list = orders.all_orders().await.unwrap();
        assert_eq!(list.settled().await.unwrap(), ListState::Ready(vec![]));

        orders.refetch().await.unwrap();
        let rows = loop {
            if let ListState::Ready(rows) = list.settled().await.unwrap() {
                if !rows.is_empty() {
                    break rows;
                }
            }
            list.changed().await.unwrap();
        };
        assert_eq!(rows[0].item_name(), "Widget");
        assert_eq!(rows[0].order_day(), "2024-03-01");
        assert_eq!(mock.calls_to(Method::Get, Order::LIST_PATH), 2);
        mock.verify();
    }
}

//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::{
    AppState,
    auth::auth_guard,
    category::{
        create_category_endpoint, delete_category_endpoint, list_categories_endpoint,
        update_category_endpoint,
    },
    dashboard::{get_category_stats_endpoint, get_dashboard_stats_endpoint},
    endpoints,
    health::get_health,
    not_found::{get_404_not_found, get_405_method_not_allowed},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        list_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Every route except the health check requires a bearer token.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new().route(endpoints::HEALTH, get(get_health));

    let protected_routes = Router::new()
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            put(update_category_endpoint).delete(delete_category_endpoint),
        )
        .route(endpoints::DASHBOARD, get(get_dashboard_stats_endpoint))
        .route(endpoints::CATEGORY_STATS, get(get_category_stats_endpoint))
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .method_not_allowed_fallback(get_405_method_not_allowed)
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod routing_tests {
    use axum::{body::Bytes, http::StatusCode};
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{get_test_app_state, make_token},
    };

    use super::build_router;

    fn get_test_server() -> TestServer {
        TestServer::try_new(build_router(get_test_app_state())).expect("Could not create test server")
    }

    #[derive(serde::Serialize)]
    struct PageQuery {
        limit: u64,
        skip: u64,
    }

    #[tokio::test]
    async fn health_check_needs_no_token() {
        let server = get_test_server();

        let response = server.get(endpoints::HEALTH).await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Server is running");
    }

    #[tokio::test]
    async fn protected_routes_need_a_token() {
        let server = get_test_server();

        for path in [
            endpoints::CATEGORIES,
            endpoints::TRANSACTIONS,
            endpoints::DASHBOARD,
            endpoints::CATEGORY_STATS,
        ] {
            let response = server.get(path).await;

            response.assert_status_unauthorized();
            response.assert_json(&json!({"success": false, "message": "Not authorized, no token"}));
        }
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let server = get_test_server();

        let response = server.get("/api/nope").await;

        response.assert_status_not_found();
        response.assert_json(&json!({"success": false, "message": "Route not found"}));
    }

    #[tokio::test]
    async fn wrong_method_is_json_method_not_allowed() {
        let server = get_test_server();

        let response = server
            .get(&format_endpoint(endpoints::CATEGORY, 1))
            .authorization_bearer(make_token(1))
            .await;

        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        response.assert_json(&json!({"success": false, "message": "Method not allowed"}));
    }

    #[tokio::test]
    async fn invalid_utf8_in_json_body_is_rejected() {
        let server = get_test_server();

        let response = server
            .post(endpoints::CATEGORIES)
            .authorization_bearer(make_token(1))
            .content_type("application/json")
            .bytes(Bytes::from_static(
                b"{\"name\": \"\xff\", \"icon\": \"x\", \"color\": \"#000000\", \"type\": \"expense\"}",
            ))
            .await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["success"], false);
    }

    #[tokio::test]
    async fn dashboard_is_not_mistaken_for_a_transaction_id() {
        let server = get_test_server();

        let response = server
            .get(endpoints::DASHBOARD)
            .authorization_bearer(make_token(1))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"]["expenseCount"], 0);
    }

    #[tokio::test]
    async fn listing_categories_is_idempotent() {
        let server = get_test_server();
        let token = make_token(1);

        let first = server
            .get(endpoints::CATEGORIES)
            .authorization_bearer(&token)
            .await
            .json::<Value>();
        let second = server
            .get(endpoints::CATEGORIES)
            .authorization_bearer(&token)
            .await
            .json::<Value>();

        assert_eq!(first["data"].as_array().unwrap().len(), 15);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn categories_are_scoped_to_owner() {
        let server = get_test_server();

        let created = server
            .post(endpoints::CATEGORIES)
            .authorization_bearer(make_token(1))
            .json(&json!({"name": "Pets", "icon": "🐶", "color": "#A16207", "type": "expense"}))
            .await;
        created.assert_status(StatusCode::CREATED);
        let id = created.json::<Value>()["data"]["id"].as_i64().unwrap();

        let response = server
            .delete(&format_endpoint(endpoints::CATEGORY, id))
            .authorization_bearer(make_token(2))
            .await;

        response.assert_status_not_found();
        response.assert_json(&json!({"success": false, "message": "Category not found"}));
    }

    #[tokio::test]
    async fn default_categories_are_forbidden_to_change() {
        let server = get_test_server();
        let token = make_token(1);
        let categories = server
            .get(endpoints::CATEGORIES)
            .authorization_bearer(&token)
            .await
            .json::<Value>();
        let id = categories["data"][0]["id"].as_i64().unwrap();
        let path = format_endpoint(endpoints::CATEGORY, id);

        let edit = server
            .put(&path)
            .authorization_bearer(&token)
            .json(&json!({"name": "Renamed"}))
            .await;
        let delete = server.delete(&path).authorization_bearer(&token).await;

        edit.assert_status_forbidden();
        edit.assert_json(&json!({"success": false, "message": "Cannot edit default categories"}));
        delete.assert_status_forbidden();
        delete.assert_json(&json!({"success": false, "message": "Cannot delete default categories"}));
    }

    #[tokio::test]
    async fn category_in_use_cannot_be_deleted_until_transactions_are_gone() {
        let server = get_test_server();
        let token = make_token(1);
        let category_id = server
            .post(endpoints::CATEGORIES)
            .authorization_bearer(&token)
            .json(&json!({"name": "Food", "icon": "🍕", "color": "#EF4444", "type": "expense"}))
            .await
            .json::<Value>()["data"]["id"]
            .as_i64()
            .unwrap();
        let mut transaction_ids = Vec::new();
        for (amount, date) in [(100, "2025-03-05"), (50, "2025-03-20")] {
            let response = server
                .post(endpoints::TRANSACTIONS)
                .authorization_bearer(&token)
                .json(&json!({"type": "expense", "amount": amount, "category": "Food", "date": date}))
                .await;
            response.assert_status(StatusCode::CREATED);
            transaction_ids.push(response.json::<Value>()["data"]["id"].as_i64().unwrap());
        }
        let category_path = format_endpoint(endpoints::CATEGORY, category_id);

        let blocked = server.delete(&category_path).authorization_bearer(&token).await;

        blocked.assert_status_bad_request();
        blocked.assert_json(&json!({
            "success": false,
            "message": "Cannot delete category. It is used in 2 transaction(s)"
        }));

        for id in transaction_ids {
            server
                .delete(&format_endpoint(endpoints::TRANSACTION, id))
                .authorization_bearer(&token)
                .await
                .assert_status_ok();
        }

        let allowed = server.delete(&category_path).authorization_bearer(&token).await;

        allowed.assert_status_ok();
        allowed.assert_json(&json!({"success": true, "message": "Category deleted successfully"}));
    }

    #[tokio::test]
    async fn march_food_statistics() {
        let server = get_test_server();
        let token = make_token(1);
        server
            .post(endpoints::CATEGORIES)
            .authorization_bearer(&token)
            .json(&json!({"name": "Food", "icon": "🍕", "color": "#EF4444", "type": "expense"}))
            .await
            .assert_status(StatusCode::CREATED);
        for (amount, date) in [("100.00", "2025-03-05"), ("50.00", "2025-03-20")] {
            server
                .post(endpoints::TRANSACTIONS)
                .authorization_bearer(&token)
                .json(&json!({"type": "expense", "amount": amount, "category": "Food", "date": date}))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let dashboard = server
            .get(endpoints::DASHBOARD)
            .add_query_param("startDate", "2025-03-01")
            .add_query_param("endDate", "2025-03-31")
            .authorization_bearer(&token)
            .await
            .json::<Value>();
        let category_stats = server
            .get(endpoints::CATEGORY_STATS)
            .add_query_param("type", "expense")
            .add_query_param("startDate", "2025-03-01")
            .add_query_param("endDate", "2025-03-31")
            .authorization_bearer(&token)
            .await
            .json::<Value>();

        assert_eq!(dashboard["data"]["expense"], 150.0);
        assert_eq!(dashboard["data"]["expenseCount"], 2);
        assert_eq!(dashboard["data"]["income"], 0.0);
        assert_eq!(dashboard["data"]["balance"], -150.0);
        assert_eq!(
            category_stats["data"]["categories"],
            json!([{"category": "Food", "amount": 150.0, "count": 2, "percentage": 100.0}])
        );
    }

    #[tokio::test]
    async fn oversized_amounts_are_rejected_and_largest_amounts_still_sum() {
        let server = get_test_server();
        let token = make_token(1);
        server
            .get(endpoints::CATEGORIES)
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        let rejected = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({"type": "expense", "amount": "92233720368547758.07", "category": "Travel"}))
            .await;

        rejected.assert_status_bad_request();
        rejected.assert_json(&json!({"success": false, "message": "Amount cannot exceed 999999999.99"}));

        for _ in 0..2 {
            server
                .post(endpoints::TRANSACTIONS)
                .authorization_bearer(&token)
                .json(&json!({
                    "type": "expense",
                    "amount": "999999999.99",
                    "category": "Travel",
                    "date": "2025-03-10",
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let dashboard = server
            .get(endpoints::DASHBOARD)
            .add_query_param("startDate", "2025-03-01")
            .add_query_param("endDate", "2025-03-31")
            .authorization_bearer(&token)
            .await;
        let category_stats = server
            .get(endpoints::CATEGORY_STATS)
            .add_query_param("startDate", "2025-03-01")
            .add_query_param("endDate", "2025-03-31")
            .authorization_bearer(&token)
            .await;

        dashboard.assert_status_ok();
        category_stats.assert_status_ok();
        assert_eq!(dashboard.json::<Value>()["data"]["expense"], 1999999999.98);
        assert_eq!(category_stats.json::<Value>()["data"]["total"], 1999999999.98);
    }

    #[tokio::test]
    async fn transactions_are_paginated() {
        let server = get_test_server();
        let token = make_token(1);
        server
            .get(endpoints::CATEGORIES)
            .authorization_bearer(&token)
            .await
            .assert_status_ok();
        for day in 1..=25 {
            server
                .post(endpoints::TRANSACTIONS)
                .authorization_bearer(&token)
                .json(&json!({
                    "type": "expense",
                    "amount": day,
                    "category": "Travel",
                    "date": format!("2025-01-{day:02}"),
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let query = serde_urlencoded::to_string(PageQuery { limit: 20, skip: 0 }).unwrap();
        let first = server
            .get(&format!("{}?{query}", endpoints::TRANSACTIONS))
            .authorization_bearer(&token)
            .await
            .json::<Value>();
        let query = serde_urlencoded::to_string(PageQuery { limit: 20, skip: 20 }).unwrap();
        let second = server
            .get(&format!("{}?{query}", endpoints::TRANSACTIONS))
            .authorization_bearer(&token)
            .await
            .json::<Value>();

        assert_eq!(first["data"].as_array().unwrap().len(), 20);
        assert_eq!(first["total"], 25);
        assert_eq!(first["hasMore"], true);
        assert_eq!(first["data"][0]["amount"], 25.0);
        assert_eq!(second["data"].as_array().unwrap().len(), 5);
        assert_eq!(second["hasMore"], false);
    }

    #[tokio::test]
    async fn malformed_body_is_a_json_error() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(make_token(1))
            .content_type("application/json")
            .text("{")
            .await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["success"], false);
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_json_error() {
        let server = get_test_server();

        let response = server
            .get("/api/transactions/abc")
            .authorization_bearer(make_token(1))
            .await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["success"], false);
    }
}

//! Integration tests for the lawyers API endpoint

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    use crate::test_utils::{body_to_string, test_app};

    /// Tests the lawyers endpoint lists every profile
    #[tokio::test]
    async fn it_lists_lawyers() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/lawyers")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        let lawyers = body.as_array().unwrap();
        assert_eq!(lawyers.len(), 2);
        assert_eq!(lawyers[0]["id"], "DH");
        assert_eq!(lawyers[0]["workingHours"]["start"], "09:00");
        assert_eq!(lawyers[0]["workingHours"]["end"], "17:00");
        assert_eq!(lawyers[1]["id"], "XX");
        assert_eq!(lawyers[1]["unavailability"]["office"][0], "Monday");
    }
}

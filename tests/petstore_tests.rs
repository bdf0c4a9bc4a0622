use mockito::Matcher;
use playwright_suite::petstore::{create_pet_request_body, PetStoreClient, PET_PATH};
use playwright_suite::specs::petstore;
use playwright_suite::{EnvProfile, Runner, RunnerConfig, TestStatus};
use serde_json::json;

const LIVE_BASE_URL: &str = "https://petstore.swagger.io";

#[tokio::test]
async fn test_add_pet_echoes_fields() {
    let mut server = mockito::Server::new_async().await;
    let body = create_pet_request_body("Fluffy", 123, "available");
    let mock = server
        .mock("POST", PET_PATH)
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(body.clone()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let client = PetStoreClient::from_base_url(&server.url()).unwrap();
    let response = client.add_pet(&body).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body["id"], 123);
    assert_eq!(response.body["name"], "Fluffy");
    assert_eq!(response.body["status"], "available");
}

#[tokio::test]
async fn test_delete_then_get_is_404() {
    let mut server = mockito::Server::new_async().await;
    let delete = server
        .mock("DELETE", "/v2/pet/2123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":200,"type":"unknown","message":"2123"}"#)
        .create_async()
        .await;
    let get = server
        .mock("GET", "/v2/pet/2123")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":1,"type":"error","message":"Pet not found"}"#)
        .create_async()
        .await;

    let client = PetStoreClient::from_base_url(&server.url()).unwrap();
    assert_eq!(client.delete_pet(2123).await.unwrap().status, 200);
    let fetched = client.get_pet(2123).await.unwrap();

    delete.assert_async().await;
    get.assert_async().await;
    assert_eq!(fetched.status, 404);
    assert!(fetched.is_client_error());
}

#[tokio::test]
async fn test_find_by_status_sends_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/pet/findByStatus")
        .match_query(Matcher::UrlEncoded("status".into(), "sold".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([create_pet_request_body("Max", 789, "sold")]).to_string())
        .create_async()
        .await;

    let client = PetStoreClient::from_base_url(&server.url()).unwrap();
    let response = client.find_by_status("sold").await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.body.as_array().map(Vec::len), Some(1));
    assert_eq!(response.content_type(), Some("application/json"));
}

#[tokio::test]
async fn test_form_update_is_url_encoded() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v2/pet/1123")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "FluffyForm".into()),
            Matcher::UrlEncoded("status".into(), "pending".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":200,"type":"unknown","message":"1123"}"#)
        .create_async()
        .await;

    let client = PetStoreClient::from_base_url(&server.url()).unwrap();
    let response = client
        .update_pet_with_form(1123, "FluffyForm", "pending")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.body["message"], "1123");
}

#[tokio::test]
async fn test_negative_suite_against_mock_server() {
    let mut server = mockito::Server::new_async().await;
    let _missing = server
        .mock("GET", Matcher::Regex(r"^/v2/pet/\d+$".into()))
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":1,"type":"error","message":"Pet not found"}"#)
        .create_async()
        .await;
    let _empty_body = server
        .mock("POST", PET_PATH)
        .with_status(405)
        .create_async()
        .await;

    let config = RunnerConfig {
        api_base_url: server.url(),
        retries: 0,
        ..RunnerConfig::default()
    };
    let suites = [
        petstore::negative().grep("Non-existent pet"),
        petstore::negative().grep("Invalid request body"),
    ];
    let summary = Runner::new(config, EnvProfile::default())
        .unwrap()
        .run(&suites)
        .await;

    assert_eq!(summary.total(), 2);
    for (info, result) in &summary.results {
        assert_eq!(result.status, TestStatus::Passed, "{}: {:?}", info.title, result.error);
    }
}

#[tokio::test]
#[ignore = "hits the public Petstore demo server"]
async fn test_live_add_pet() {
    let client = PetStoreClient::from_base_url(LIVE_BASE_URL).unwrap();
    let body = create_pet_request_body("Fluffy", 123, "available");
    let response = client.add_pet(&body).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body["name"], "Fluffy");
    assert_eq!(response.body["status"], "available");
}

#[tokio::test]
#[ignore = "hits the public Petstore demo server"]
async fn test_live_delete_then_get() {
    let client = PetStoreClient::from_base_url(LIVE_BASE_URL).unwrap();
    client
        .add_pet(&create_pet_request_body("Pet2456", 2456, "available"))
        .await
        .unwrap();

    assert_eq!(client.delete_pet(2456).await.unwrap().status, 200);
    assert_eq!(client.get_pet(2456).await.unwrap().status, 404);
}

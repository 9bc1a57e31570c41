//! Borrow/return lifecycle integration tests

use reqwest::Client;
use serde_json::{json, Value};

use crate::common::{create_author, create_book, register_and_login, BASE_URL};

async fn borrow(client: &Client, token: &str, book_id: i64) -> reqwest::Response {
    client
        .post(format!("{}/borrow", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send borrow request")
}

async fn return_record(client: &Client, token: &str, record_id: i64) -> reqwest::Response {
    client
        .post(format!("{}/borrow/return/{}", BASE_URL, record_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send return request")
}

async fn get_book(client: &Client, token: &str, book_id: i64) -> Value {
    client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send get book request")
        .json()
        .await
        .expect("Failed to parse book response")
}

#[tokio::test]
#[ignore]
async fn test_borrow_marks_book_unavailable() {
    let client = Client::new();
    let (token, user_id) = register_and_login(&client, "borrow").await;

    let author_id = create_author(&client, &token).await;
    let book_id = create_book(&client, &token, author_id, "The Tombs of Atuan").await;

    let response = borrow(&client, &token, book_id).await;
    assert_eq!(response.status(), 201);

    let record: Value = response.json().await.expect("Failed to parse record");
    assert_eq!(record["user"]["id"].as_i64(), Some(user_id));
    assert_eq!(record["book"]["id"].as_i64(), Some(book_id));
    assert!(record["borrow_date"].is_string());
    assert!(record["return_date"].is_null());

    let book = get_book(&client, &token, book_id).await;
    assert_eq!(book["is_available"], false);
}

#[tokio::test]
#[ignore]
async fn test_borrow_unavailable_book_conflicts() {
    let client = Client::new();
    let (token, _user_id) = register_and_login(&client, "conflict-a").await;
    let (other_token, other_user_id) = register_and_login(&client, "conflict-b").await;

    let author_id = create_author(&client, &token).await;
    let book_id = create_book(&client, &token, author_id, "The Farthest Shore").await;

    assert_eq!(borrow(&client, &token, book_id).await.status(), 201);

    // Second borrow, different user: rejected with no new record
    let response = borrow(&client, &other_token, book_id).await;
    assert_eq!(response.status(), 400);

    let response = client
        .get(format!("{}/borrow/history", BASE_URL))
        .header("Authorization", format!("Bearer {}", other_token))
        .send()
        .await
        .expect("Failed to send history request");
    let history: Value = response.json().await.expect("Failed to parse history");
    let records = history.as_array().expect("History is not a list");
    assert!(records
        .iter()
        .all(|r| r["user"]["id"].as_i64() == Some(other_user_id)));
    assert!(!records
        .iter()
        .any(|r| r["book"]["id"].as_i64() == Some(book_id)));
}

#[tokio::test]
#[ignore]
async fn test_borrow_missing_book_not_found() {
    let client = Client::new();
    let (token, _user_id) = register_and_login(&client, "missing").await;

    let response = borrow(&client, &token, 999_999_999).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_return_restores_availability() {
    let client = Client::new();
    let (token, _user_id) = register_and_login(&client, "restore").await;

    let author_id = create_author(&client, &token).await;
    let book_id = create_book(&client, &token, author_id, "Tehanu").await;

    let response = borrow(&client, &token, book_id).await;
    assert_eq!(response.status(), 201);
    let record: Value = response.json().await.expect("Failed to parse record");
    let record_id = record["id"].as_i64().expect("No record id");
    let borrow_date = record["borrow_date"].as_str().unwrap().to_string();

    let response = return_record(&client, &token, record_id).await;
    assert_eq!(response.status(), 200);

    let returned: Value = response.json().await.expect("Failed to parse record");
    let return_date = returned["return_date"].as_str().expect("No return date");
    assert!(return_date >= borrow_date.as_str());

    let book = get_book(&client, &token, book_id).await;
    assert_eq!(book["is_available"], true);

    // Book is borrowable again after the return
    assert_eq!(borrow(&client, &token, book_id).await.status(), 201);
}

#[tokio::test]
#[ignore]
async fn test_double_return_conflicts() {
    let client = Client::new();
    let (token, _user_id) = register_and_login(&client, "double-return").await;

    let author_id = create_author(&client, &token).await;
    let book_id = create_book(&client, &token, author_id, "The Word for World Is Forest").await;

    let response = borrow(&client, &token, book_id).await;
    let record: Value = response.json().await.expect("Failed to parse record");
    let record_id = record["id"].as_i64().expect("No record id");

    assert_eq!(return_record(&client, &token, record_id).await.status(), 200);
    assert_eq!(return_record(&client, &token, record_id).await.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_return_other_users_record_not_found() {
    let client = Client::new();
    let (token, _user_id) = register_and_login(&client, "owner").await;
    let (other_token, _other_id) = register_and_login(&client, "intruder").await;

    let author_id = create_author(&client, &token).await;
    let book_id = create_book(&client, &token, author_id, "Rocannon's World").await;

    let response = borrow(&client, &token, book_id).await;
    let record: Value = response.json().await.expect("Failed to parse record");
    let record_id = record["id"].as_i64().expect("No record id");

    // Ownership mismatch reads as absence, not as a permission error
    let response = return_record(&client, &other_token, record_id).await;
    assert_eq!(response.status(), 404);

    // The rightful owner can still return it
    assert_eq!(return_record(&client, &token, record_id).await.status(), 200);
}

#[tokio::test]
#[ignore]
async fn test_delete_borrowed_book_conflicts() {
    let client = Client::new();
    let (token, _user_id) = register_and_login(&client, "delete-borrowed").await;

    let author_id = create_author(&client, &token).await;
    let book_id = create_book(&client, &token, author_id, "City of Illusions").await;

    assert_eq!(borrow(&client, &token, book_id).await.status(), 201);

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send delete request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_history_spans_open_and_closed_records() {
    let client = Client::new();
    let (token, user_id) = register_and_login(&client, "history").await;

    let author_id = create_author(&client, &token).await;
    let first_book = create_book(&client, &token, author_id, "Planet of Exile").await;
    let second_book = create_book(&client, &token, author_id, "The Lathe of Heaven").await;

    let response = borrow(&client, &token, first_book).await;
    let record: Value = response.json().await.expect("Failed to parse record");
    let first_record = record["id"].as_i64().expect("No record id");
    assert_eq!(return_record(&client, &token, first_record).await.status(), 200);

    assert_eq!(borrow(&client, &token, second_book).await.status(), 201);

    let response = client
        .get(format!("{}/borrow/history", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send history request");
    assert!(response.status().is_success());

    let history: Value = response.json().await.expect("Failed to parse history");
    let records = history.as_array().expect("History is not a list");
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|r| r["user"]["id"].as_i64() == Some(user_id)));
    // Closed record first (insertion order), then the open one
    assert!(records[0]["return_date"].is_string());
    assert!(records[1]["return_date"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_concurrent_borrows_one_winner() {
    let client = Client::new();
    let (token_a, _a) = register_and_login(&client, "race-a").await;
    let (token_b, _b) = register_and_login(&client, "race-b").await;

    let author_id = create_author(&client, &token_a).await;
    let book_id = create_book(&client, &token_a, author_id, "The Telling").await;

    let (first, second) = tokio::join!(
        borrow(&client, &token_a, book_id),
        borrow(&client, &token_b, book_id)
    );

    let statuses = [first.status().as_u16(), second.status().as_u16()];
    assert!(
        statuses.contains(&201) && statuses.contains(&400),
        "expected exactly one winner, got {:?}",
        statuses
    );
}

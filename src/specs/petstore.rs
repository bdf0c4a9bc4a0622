//! Petstore API contract suites

use anyhow::{ensure, Context};
use tracing::info;

use crate::bridge::WebResponse;
use crate::fixtures::Fixtures;
use crate::petstore::data::{
    CREATED_PET_WITH_ID_DATA, CREATE_PET_DATA, DELETE_TEST_DATA, NEGATIVE_PET_STATUS_DATA,
    PET_STATUS_DATA, UPDATE_PET_DATA,
};
use crate::petstore::{create_pet_request_body, Pet, PetData, PET_PATH};
use crate::runner::{TestCase, TestSuite};
use crate::support::get_random_number;

fn expect_status(response: &WebResponse, status: u16) -> anyhow::Result<()> {
    ensure!(
        response.status == status,
        "expected HTTP {} but got {}: {}",
        status,
        response.status,
        response.body
    );
    Ok(())
}

fn expect_json(response: &WebResponse) -> anyhow::Result<()> {
    let content_type = response.content_type().unwrap_or_default();
    ensure!(
        content_type.contains("application/json"),
        "expected a JSON response, got content-type '{}'",
        content_type
    );
    Ok(())
}

/// The response echoes the pet that was sent
fn expect_pet(response: &WebResponse, pet: &PetData) -> anyhow::Result<()> {
    let body = &response.body;
    ensure!(body["id"] == pet.id, "id mismatch in {}", body);
    ensure!(body["name"] == pet.name, "name mismatch in {}", body);
    ensure!(body["status"] == pet.status, "status mismatch in {}", body);
    Ok(())
}

fn add_pet_test(pet: PetData) -> TestCase {
    TestCase::api(
        format!(
            "POST Add New Pet {} - Multiple pets with different statuses",
            pet.name
        ),
        move |fixtures: Fixtures| async move {
            let body = create_pet_request_body(pet.name, pet.id, pet.status);
            let response = fixtures.petstore().add_pet(&body).await?;
            expect_status(&response, 200)?;
            expect_json(&response)?;
            expect_pet(&response, &pet)
        },
    )
}

fn update_pet_test(pet: PetData) -> TestCase {
    TestCase::api(
        format!("PUT Update Pet {} - Update existing pets with new status", pet.name),
        move |fixtures: Fixtures| async move {
            let body = create_pet_request_body(pet.name, pet.id, pet.status);
            let response = fixtures.petstore().update_pet(&body).await?;
            expect_status(&response, 200)?;
            expect_json(&response)?;
            expect_pet(&response, &pet)
        },
    )
}

fn find_by_status_test(status: &'static str) -> TestCase {
    TestCase::api(
        format!("GET All Pets By Status: {} - Valid statuses", status),
        move |fixtures: Fixtures| async move {
            let response = fixtures.petstore().find_by_status(status).await?;
            expect_status(&response, 200)?;
            expect_json(&response)?;

            let items = response
                .body
                .as_array()
                .context("findByStatus did not return an array")?;
            ensure!(!items.is_empty(), "no pets with status {}", status);

            let pets = Pet::valid_entries(&response.body).unwrap_or_default();
            let valid = pets
                .iter()
                .find(|p| p.status == status && !p.category.name.is_empty());
            ensure!(
                valid.is_some(),
                "none of the {} pets with status {} match the pet schema",
                items.len(),
                status
            );
            Ok(())
        },
    )
}

fn get_pet_by_id_test() -> TestCase {
    TestCase::api(
        "GET Pet By ID - Retrieve existing pet",
        |fixtures: Fixtures| async move {
            let pet = CREATE_PET_DATA[0];
            let client = fixtures.petstore();
            client
                .add_pet(&create_pet_request_body(pet.name, pet.id, pet.status))
                .await?;

            let response = client.get_pet(pet.id).await?;
            expect_status(&response, 200)?;
            expect_json(&response)?;
            expect_pet(&response, &pet)
        },
    )
}

fn form_update_test(id: i64, name: &'static str, status: &'static str) -> TestCase {
    TestCase::api(
        format!("POST Pet By ID: {} - Update pet with form data", id),
        move |fixtures: Fixtures| async move {
            let client = fixtures.petstore();
            client
                .add_pet(&create_pet_request_body(name, id, "available"))
                .await?;

            let response = client.update_pet_with_form(id, name, status).await?;
            expect_status(&response, 200)?;
            expect_json(&response)?;
            ensure!(
                !response.body["message"].is_null(),
                "form update response has no message: {}",
                response.body
            );
            Ok(())
        },
    )
}

fn delete_pet_test(id: i64) -> TestCase {
    TestCase::api(
        format!(
            "DELETE Pet By ID: {} - Delete existing pets and verify deletion",
            id
        ),
        move |fixtures: Fixtures| async move {
            let client = fixtures.petstore();
            client
                .add_pet(&create_pet_request_body(&format!("Pet{}", id), id, "available"))
                .await?;

            let deleted = client.delete_pet(id).await?;
            expect_status(&deleted, 200)?;
            expect_json(&deleted)?;

            let fetched = client.get_pet(id).await?;
            expect_status(&fetched, 404)
        },
    )
}

/// Create, update, read, form-update and delete, in that order
pub fn positive() -> TestSuite {
    TestSuite::new("Positive Tests (Status Code 2xx)")
        .serial()
        .tests(CREATE_PET_DATA.iter().copied().map(add_pet_test))
        .tests(UPDATE_PET_DATA.iter().copied().map(update_pet_test))
        .tests(PET_STATUS_DATA.iter().copied().map(find_by_status_test))
        .test(get_pet_by_id_test())
        .tests(
            CREATED_PET_WITH_ID_DATA
                .iter()
                .map(|d| form_update_test(d.id, d.name, d.status)),
        )
        .tests(DELETE_TEST_DATA.iter().copied().map(delete_pet_test))
}

pub fn negative() -> TestSuite {
    TestSuite::new("Negative Tests (Status Code 4xx)")
        .parallel()
        .test(TestCase::api(
            "POST Add New Pet - Invalid request body should return 405",
            |fixtures: Fixtures| async move {
                let response = fixtures
                    .petstore()
                    .post_raw(PET_PATH, "", "application/json")
                    .await?;
                expect_status(&response, 405)
            },
        ))
        .tests(NEGATIVE_PET_STATUS_DATA.iter().copied().map(|status| {
            TestCase::api(
                format!(
                    "GET Pets By Status: {} - Invalid status values should return empty array",
                    status
                ),
                move |fixtures: Fixtures| async move {
                    let response = fixtures.petstore().find_by_status(status).await?;
                    expect_status(&response, 200)?;
                    let pets = response
                        .body
                        .as_array()
                        .context("findByStatus did not return an array")?;
                    ensure!(pets.is_empty(), "expected no pets, got {}", pets.len());
                    Ok(())
                },
            )
        }))
        .test(TestCase::api(
            "GET Pet By ID - Non-existent pet should return 404",
            |fixtures: Fixtures| async move {
                let random_id = get_random_number(10);
                let response = fixtures.petstore().get_pet(&random_id).await?;
                expect_status(&response, 404)
            },
        ))
        .test(TestCase::api(
            "PUT Update Non-Existent Pet - Should return 200 (creates new pet)",
            |fixtures: Fixtures| async move {
                let response = fixtures
                    .petstore()
                    .update_pet(&create_pet_request_body("NonExistentPet", 0, "sold"))
                    .await?;
                expect_status(&response, 200)?;
                info!(
                    "Update non-existent pet response code: {}",
                    response.status
                );
                Ok(())
            },
        ))
}

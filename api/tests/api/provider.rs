use payloads::requests;
use reqwest::StatusCode;
use rust_decimal::Decimal;

use test_helpers::{
    all_week_availability, assert_status_code, cleaning_service_details,
    provider_profile_details, spawn_app, time_of,
};

#[tokio::test]
async fn customer_cannot_create_provider_profile() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.create_alice_customer().await?;
    let result = app
        .client
        .create_provider_profile(&provider_profile_details())
        .await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn create_and_read_profile() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.create_paul_provider().await?;
    let created = app
        .client
        .create_provider_profile(&provider_profile_details())
        .await?;
    assert_eq!(created.profile_details, provider_profile_details());
    assert!(created.profile_complete);
    assert_eq!(created.average_rating, Decimal::ZERO);
    assert_eq!(created.total_reviews, 0);
    assert_eq!(created.completed_bookings, 0);

    // profile reads are public
    app.client.logout().await?;
    let read = app.client.get_provider_profile(&created.user_id).await?;
    assert_eq!(read.profile_id, created.profile_id);
    assert_eq!(read.profile_details, provider_profile_details());

    Ok(())
}

#[tokio::test]
async fn second_profile_conflicts() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.create_paul_provider().await?;
    app.client
        .create_provider_profile(&provider_profile_details())
        .await?;
    let result = app
        .client
        .create_provider_profile(&provider_profile_details())
        .await;
    assert_status_code(result, StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn update_profile() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.create_paul_provider().await?;
    app.client
        .create_provider_profile(&provider_profile_details())
        .await?;

    let mut details = provider_profile_details();
    details.bio = None;
    details.years_experience = 12;
    let updated = app.client.update_provider_profile(&details).await?;
    assert_eq!(updated.profile_details, details);
    // a missing bio leaves the profile incomplete
    assert!(!updated.profile_complete);

    Ok(())
}

#[tokio::test]
async fn create_and_list_services() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.create_paul_provider().await?;
    let profile = app
        .client
        .create_provider_profile(&provider_profile_details())
        .await?;
    let service = app
        .client
        .create_service(&requests::CreateService {
            service: cleaning_service_details(),
        })
        .await?;
    assert_eq!(service.service_details, cleaning_service_details());

    let services = app.client.list_services(&profile.user_id).await?;
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].service_id, service.service_id);

    Ok(())
}

#[tokio::test]
async fn set_and_read_availability() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.create_paul_provider().await?;
    let profile = app
        .client
        .create_provider_profile(&provider_profile_details())
        .await?;
    app.client.set_availability(&all_week_availability()).await?;

    let windows = app.client.get_availability(&profile.user_id).await?;
    assert_eq!(windows.len(), 7);
    assert_eq!(
        windows.iter().map(|w| w.day_of_week).collect::<Vec<_>>(),
        (0..7).collect::<Vec<_>>()
    );

    // replacing wholesale drops the old pattern
    let weekdays_only = requests::SetAvailability {
        windows: all_week_availability()
            .windows
            .into_iter()
            .take(5)
            .collect(),
    };
    app.client.set_availability(&weekdays_only).await?;
    let windows = app.client.get_availability(&profile.user_id).await?;
    assert_eq!(windows.len(), 5);

    Ok(())
}

#[tokio::test]
async fn invalid_availability_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.create_paul_provider().await?;
    app.client
        .create_provider_profile(&provider_profile_details())
        .await?;

    // start after end
    let mut details = all_week_availability();
    details.windows[0].start_time = time_of("19:00");
    let result = app.client.set_availability(&details).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    // two windows for the same weekday
    let mut details = all_week_availability();
    details.windows[1].day_of_week = 0;
    let result = app.client.set_availability(&details).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    // weekday out of range
    let mut details = all_week_availability();
    details.windows[6].day_of_week = 7;
    let result = app.client.set_availability(&details).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn blocked_dates_roundtrip() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.create_paul_provider().await?;
    let profile = app
        .client
        .create_provider_profile(&provider_profile_details())
        .await?;

    let date: jiff::civil::Date = "2025-12-24".parse()?;
    app.client
        .add_blocked_date(&requests::AddBlockedDate { date })
        .await?;
    // blocking twice is a no-op
    app.client
        .add_blocked_date(&requests::AddBlockedDate { date })
        .await?;

    let dates = app.client.list_blocked_dates(&profile.user_id).await?;
    assert_eq!(dates, vec![date]);

    app.client
        .remove_blocked_date(&requests::RemoveBlockedDate { date })
        .await?;
    let dates = app.client.list_blocked_dates(&profile.user_id).await?;
    assert!(dates.is_empty());

    Ok(())
}
